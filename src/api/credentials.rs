use std::fmt;
use std::fs;
use std::path::Path;

use log::info;

use crate::config::ClientConfig;
use crate::error::{Result, SwsError};

/// PEM client certificate and private key for the private tier.
///
/// Loaded once when the client is built and never modified afterwards.
#[derive(Clone)]
pub struct Credentials {
    cert: Vec<u8>,
    key: Vec<u8>,
}

impl Credentials {
    pub fn from_pem(cert: impl Into<Vec<u8>>, key: impl Into<Vec<u8>>) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
        }
    }

    /// Read both PEM files. A path that does not exist is a configuration error.
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert = read_pem(cert_path)?;
        let key = read_pem(key_path)?;
        info!("loaded cert and key files");
        Ok(Self { cert, key })
    }

    /// Credentials named by `config`, or `None` when neither path is set
    pub fn from_config(config: &ClientConfig) -> Result<Option<Self>> {
        match (&config.cert_path, &config.key_path) {
            (None, None) => Ok(None),
            (Some(cert), Some(key)) => Self::load(cert, key).map(Some),
            (Some(_), None) => Err(SwsError::Config(
                "A client certificate was given without a private key".to_string(),
            )),
            (None, Some(_)) => Err(SwsError::Config(
                "A private key was given without a client certificate".to_string(),
            )),
        }
    }

    /// TLS identity for reqwest: certificate chain followed by the key
    pub fn identity(&self) -> Result<reqwest::Identity> {
        let mut pem = Vec::with_capacity(self.cert.len() + self.key.len() + 1);
        pem.extend_from_slice(&self.cert);
        if !self.cert.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend_from_slice(&self.key);

        reqwest::Identity::from_pem(&pem)
            .map_err(|e| SwsError::Config(format!("Invalid client certificate or key: {}", e)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cert", &format!("{} bytes", self.cert.len()))
            .field("key", &"<redacted>")
            .finish()
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(SwsError::Config(format!("Could not find {}", path.display())));
    }
    fs::read(path).map_err(|e| SwsError::Config(format!("Failed to read {}: {}", path.display(), e)))
}
