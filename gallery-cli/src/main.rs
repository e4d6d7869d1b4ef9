//! Gallery - terminal viewer for assets held by a ledger address

mod config;
mod render;

use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Args;
use gallery_core::{DasLedgerClient, Gallery, GallerySession, HttpMetadataResolver};
use render::Input;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gallery={},gallery_core={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let config = args.gallery_config();
    info!(rpc = %args.rpc_url, page_size = config.page_size, "Starting gallery");

    let ledger = DasLedgerClient::new(args.rpc_url.clone(), &config)?;
    let resolver = HttpMetadataResolver::new(&config)?;
    let session = GallerySession::spawn(Gallery::new(Arc::new(ledger), Arc::new(resolver), config));

    // Print every published frame
    let mut views = session.subscribe();
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let frame = render::frame(&views.borrow_and_update());
            print!("{}", frame);
        }
    });

    println!("{}", render::HELP);
    if !args.owner.trim().is_empty() {
        session.fetch(args.owner.clone()).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match render::parse_input(&line) {
            Input::Fetch(identity) => session.fetch(identity).await?,
            Input::Next => session.next().await?,
            Input::Prev => session.prev().await?,
            Input::Help => println!("{}", render::HELP),
            Input::Quit => break,
            Input::Empty => {}
            Input::Unknown(text) => println!("unknown command: {} ({})", text, render::HELP),
        }
    }

    session.shutdown().await?;
    printer.abort();
    Ok(())
}
