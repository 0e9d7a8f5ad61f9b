use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::Result;

/// Execute config command
pub fn execute(args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("✅ Configuration updated: {} = {}", key, value);
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(key) {
                Some(value) => println!("{}: {}", key, value),
                None => println!("Configuration key '{}' not set", key),
            }
            Ok(())
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ Configuration initialized");
            println!();
            println!("To access private resources, point the client at your certificate:");
            println!("  sws config set cert_path /path/to/client.pem");
            println!("  sws config set key_path /path/to/client.key");
            Ok(())
        }
    }
}
