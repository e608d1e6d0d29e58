//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Display configuration status. Never contacts the API.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "refstore Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;

    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Create {} with `api_host` and `api_token`.",
                config_path.display().to_string().cyan()
            );
            println!();
            return Ok(());
        }
    };
    opts.apply_to(&mut config);

    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    match config.api_host {
        Some(ref host) => println!("{} API host: {}", "✓".green(), host.cyan()),
        None => println!("{} API host not configured", "✗".red()),
    }

    if config.api_token.is_some() {
        println!("{} API token configured", "✓".green());
    } else {
        println!("{} API token not configured", "✗".red());
    }

    match config.workspace_id {
        Some(ref workspace) => println!("{} Workspace: {}", "✓".green(), workspace),
        None => println!("{} No workspace set", "○".dimmed()),
    }

    println!("{} Scope: {}", "○".dimmed(), config.scope);
    println!(
        "{} Reference TTL: {}s, batch {} / {}ms, chunk {}",
        "○".dimmed(),
        config.reference.ttl_secs,
        config.reference.batch_size,
        config.reference.debounce_ms,
        config.reference.chunk_size
    );
    println!();

    Ok(())
}
