use clap::{Args, Subcommand};

/// Cache management arguments
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show cache location and statistics
    Status,

    /// Delete every cached response
    Clear {
        /// Force clear without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Print the cache file backing a request URL
    Path {
        /// Full request URL
        url: String,
    },
}
