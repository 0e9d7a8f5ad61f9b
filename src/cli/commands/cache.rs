use std::io::{self, Write};

use colored::*;

use super::resolve_config;
use crate::api::{EndpointResolver, Tier};
use crate::cache::{CacheConfig, ResponseCache};
use crate::cli::args::{CacheArgs, CacheCommand, ClientOverrides};
use crate::error::{Result, SwsError};

/// Execute cache management commands
pub fn execute(args: &CacheArgs, overrides: &ClientOverrides) -> Result<()> {
    let config = resolve_config(overrides)?;
    // Management always touches the directory, even with --no-cache
    let cache = ResponseCache::new(CacheConfig {
        enabled: true,
        dir: config.cache_dir.clone(),
    });

    match &args.command {
        CacheCommand::Status => show_status(&cache, config.use_cache),
        CacheCommand::Clear { force } => clear_cache(&cache, *force),
        CacheCommand::Path { url } => {
            let endpoints = EndpointResolver::new(&config.base_url, false)?;
            if !url.starts_with(endpoints.base(Tier::Private).as_str()) {
                return Err(SwsError::InvalidInput(format!(
                    "{} is not under {}",
                    url, config.base_url
                )));
            }
            let path = cache.path_for(url);
            let marker = if path.exists() { "cached".green() } else { "not cached".yellow() };
            println!("{} ({})", path.display(), marker);
            Ok(())
        }
    }
}

fn show_status(cache: &ResponseCache, enabled: bool) -> Result<()> {
    let stats = cache.stats()?;

    println!("{}", "Cache Status".bold().cyan());
    println!("{}", "=".repeat(50));
    println!(
        "  {} {}",
        "Enabled:".bold(),
        if enabled { "Yes".green() } else { "No".red() }
    );
    println!("  {} {}", "Directory:".bold(), cache.dir().display());
    println!("  {} {}", "Entries:".bold(), stats.total_entries);
    println!(
        "  {} {:.2} MB",
        "Size:".bold(),
        stats.total_size as f64 / 1_048_576.0
    );
    if stats.total_entries > 0 {
        println!(
            "  {} {} bytes",
            "Average entry:".bold(),
            stats.average_entry_size()
        );
    }

    Ok(())
}

fn clear_cache(cache: &ResponseCache, force: bool) -> Result<()> {
    if !force {
        print!(
            "Delete every cached response in {}? (y/N): ",
            cache.dir().display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = cache.clear()?;
    println!("{}", format!("Removed {} cached responses.", removed).green());
    Ok(())
}
