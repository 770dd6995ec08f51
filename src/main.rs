use clap::Parser;
use hspf_met::cli::{run, Cli};
use hspf_met::error::Result;
use std::sync::Mutex;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).with_target(false);
    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            subscriber.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }

    run(cli).await
}
