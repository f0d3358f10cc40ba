use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = webexact::cli::Cli::parse();
    webexact::logging::init(cli.global.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        webexact::cli::Command::Extract(args) => {
            webexact::extract::run(args, &cli.global)
                .await
                .context("extract")?;
        }
        webexact::cli::Command::Feed(args) => {
            webexact::feed::run(args, &cli.global)
                .await
                .context("feed")?;
        }
        webexact::cli::Command::Scrape(args) => {
            webexact::scrape::run(args, &cli.global)
                .await
                .context("scrape")?;
        }
    }

    Ok(())
}
