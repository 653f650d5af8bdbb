use std::io;

use anyhow::Result;
use ivona_speak::app::{self, Outcome};
use ivona_speak::cli::Cli;
use ivona_speak::IvonaClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse_args();
    debug!("Region: {}", cli.region);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let stdout = io::stdout();
        app::run(&cli, None, IvonaClient::new, &mut stdout.lock()).await
    })?;

    match outcome {
        Outcome::Usage => eprint!("{}", Cli::usage()),
        Outcome::Listed(count) => debug!("Listed {} voices", count),
        Outcome::Wrote { .. } => {}
    }

    Ok(())
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
