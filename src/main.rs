//! refstore CLI - inspect the reference data cache of a cloud console

use clap::Parser;

use refstore::cli::{self, Cli, CommandContext, Commands, GlobalOptions};
use refstore::error::Result;
use refstore::reference::ResourceKind;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug output, otherwise `RUST_LOG` applies
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Status => cli::status::run(&opts),
        Commands::Resources => cli::resources::run(opts.format.unwrap_or_default()),
        Commands::Version => {
            println!("refstore version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::List { kind, force } => {
            let kind: ResourceKind = kind.parse()?;
            let ctx = CommandContext::new(&opts).await?;
            cli::list::run(&ctx, kind, force).await
        }
        Commands::Warm { force } => {
            let ctx = CommandContext::new(&opts).await?;
            cli::list::warm(&ctx, force).await
        }
        Commands::Resolve { kind, ids } => {
            let kind: ResourceKind = kind.parse()?;
            let ctx = CommandContext::new(&opts).await?;
            cli::resolve::run(&ctx, kind, &ids).await
        }
    }
}
