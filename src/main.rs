use clap::Parser;
use tracing::{error, info, Level};

use yt_grab::cli::Cli;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the menus on stdout
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting yt-grab v{}", env!("CARGO_PKG_VERSION"));

    let code = match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    // tokio reads stdin on a blocking thread that cannot be cancelled, so a
    // pending read would otherwise keep the runtime alive after Ctrl-C
    std::process::exit(code);
}
