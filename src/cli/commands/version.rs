use crate::config::DEFAULT_BASE_URL;

/// Execute version command
pub fn execute() {
    println!("sws {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Default service root: {}", DEFAULT_BASE_URL);
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}
