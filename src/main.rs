// stellarlink: multi-session TCP rendezvous point
//
// Accepts peer connections, buffers their output, and lets the operator
// console attach to one session at a time.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use stellarlink::console::{Console, spawn_output_writer};
use stellarlink::observer::ObserverHub;
use stellarlink::{LinkConfig, SessionManager, server};

/// How long to wait for queued notifications on exit
const OBSERVER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "stellarlink", version, about = "Multi-session TCP rendezvous point")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "stellarlink.json")]
    config: PathBuf,
}

fn build_observer(config: &LinkConfig) -> Result<(ObserverHub, tokio::task::JoinHandle<()>)> {
    #[allow(unused_mut)]
    let mut builder = ObserverHub::builder()
        .capacity(config.observer.queue_capacity)
        .add_callback(ObserverHub::log_callback());

    if let Some(url) = &config.observer.webhook_url {
        #[cfg(feature = "http")]
        {
            let webhook = stellarlink::observer::webhook::WebhookObserver::new(url)
                .context("Failed to set up webhook observer")?;
            builder = builder.add_callback(webhook.into_callback());
        }
        #[cfg(not(feature = "http"))]
        log::warn!("Webhook {url} configured but the `http` feature is disabled");
    }

    Ok(builder.spawn())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = LinkConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let (observer, delivery) = build_observer(&config)?;
    let manager = Arc::new(SessionManager::new(observer));

    let address = config.listen_address();
    let listener = server::bind(&address).await?;
    println!("Listening on {address}");

    let cancel = CancellationToken::new();
    let accept = tokio::spawn(server::run_listener(
        listener,
        Arc::clone(&manager),
        cancel.clone(),
    ));

    let (out, writer) = spawn_output_writer(tokio::io::stdout());
    let mut console = Console::new(Arc::clone(&manager), out);
    let result = console.run(BufReader::new(tokio::io::stdin())).await;

    cancel.cancel();
    let _ = accept.await;
    drop(console);
    let _ = writer.await;

    drop(manager);
    if tokio::time::timeout(OBSERVER_DRAIN_TIMEOUT, delivery)
        .await
        .is_err()
    {
        log::debug!("Observer delivery still busy at exit");
    }

    result.context("Console input failed")
}
