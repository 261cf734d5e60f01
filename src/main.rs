use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use trace_explorer::config::TraceServerConfig;
use trace_explorer::extension::TraceExtension;
use trace_explorer::host::{HostServices, LoggingHost};
use trace_explorer::protocol::InboundMessage;
use trace_explorer::view::{opened_traces, SurfaceEvent, SurfaceHandle};

#[derive(Parser)]
#[command(
    name = "trace-explorer",
    about = "Headless trace explorer host: webview messages on stdin, surface events on stdout."
)]
struct Cli {
    /// Config file (defaults to user + project config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trace server URL, overriding any config
    #[arg(long)]
    url: Option<String>,

    /// View that receives the inbound messages
    #[arg(long, default_value = opened_traces::VIEW_TYPE)]
    view: String,

    /// Also print rendered HTML documents
    #[arg(long)]
    html: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trace_explorer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => TraceServerConfig::load_from(path).map_err(anyhow::Error::msg)?,
        None => TraceServerConfig::load(),
    };
    if let Some(url) = cli.url {
        config.url = url;
    }

    let services = HostServices::from_single(Rc::new(LoggingHost));
    let extension = TraceExtension::activate(config, services);
    let target = extension
        .provider(&cli.view)
        .with_context(|| format!("unknown view type: {}", cli.view))?;

    let mut surfaces = Vec::new();
    for provider in extension.providers() {
        let (surface, rx) = SurfaceHandle::channel();
        provider.resolve(surface);
        surfaces.push((provider.view_type(), rx));
    }
    flush(&mut surfaces, cli.html)?;

    info!(view = %cli.view, "reading webview messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundMessage>(line) {
            Ok(message) => target.handle_message(message),
            Err(e) => warn!(error = %e, "skipping unparsable input line"),
        }
        flush(&mut surfaces, cli.html)?;
    }

    extension.deactivate();
    Ok(())
}

/// Print every pending surface event as one JSON line.
fn flush(
    surfaces: &mut [(&'static str, UnboundedReceiver<SurfaceEvent>)],
    html: bool,
) -> Result<()> {
    for (view, rx) in surfaces.iter_mut() {
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SurfaceEvent::Html(_)) && !html {
                continue;
            }
            println!("{}", serde_json::to_string(&json!({ "view": view, "event": event }))?);
        }
    }
    Ok(())
}
