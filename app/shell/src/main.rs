//! Terminal host for the movie list: wires config, logging, stores and the refresh loop.

mod commands;
mod hooks;

use std::sync::Arc;

use anyhow::{Context, Result};
use movies_core::config::load_config;
use movies_core::gateway::HttpGateway;
use movies_core::log::LogConfig;
use movies_core::store::{AnnotationStore, FileStore, KeyValueStore, SessionStore};
use movies_core::{MovieList, RefreshScheduler};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{Command, Shell};
use crate::hooks::ConsoleHost;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_config(None);

    let log_config = LogConfig::default().with_directory(&config.log_dir);
    if let Err(err) = movies_core::log::init(log_config) {
        eprintln!("failed to initialise logging: {err:#}");
    }
    tracing::info!(version = movies_core::version(), base_url = %config.base_url, "starting");

    let kv: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::new(config.storage_path())
            .with_context(|| format!("opening storage at {}", config.storage_path().display()))?,
    );
    let session = SessionStore::new(Arc::clone(&kv));
    let gateway =
        Arc::new(HttpGateway::new(&config, session.clone()).context("building http client")?);
    let annotations = Arc::new(AnnotationStore::new(Arc::clone(&kv)));
    let host = Arc::new(ConsoleHost::new());
    let list = Arc::new(MovieList::new(
        gateway.clone(),
        annotations,
        host.clone(),
        host.clone(),
    ));

    let mut shell =
        Shell::new(gateway, list, host, RefreshScheduler::new(config.refresh_interval));
    if session.is_logged_in()? {
        shell.focus();
    } else {
        println!("Not logged in. Use `login <email> <password>` or `signup ...`.");
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let command = match commands::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        match shell.execute(command).await {
            Ok(output) if output.is_empty() => {}
            Ok(output) => println!("{output}"),
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    shell.shutdown().await;
    tracing::info!("bye");
    Ok(())
}
