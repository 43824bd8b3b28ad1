//! pixie-background: drives the action panel coordinator over stdio.

mod bridge;
mod cli;

use std::sync::Arc;

use pixie_forms::FormRegistry;
use pixie_panel::ActionFrameService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

use crate::bridge::{write_lines, Incoming, Outgoing, Reply, Request, StdioHost};

const DEFAULT_DIRECTIVE: &str = "pixie=info";

fn env_filter(directive: &str) -> EnvFilter {
    let directive = directive
        .parse::<Directive>()
        .unwrap_or_else(|_| DEFAULT_DIRECTIVE.parse().expect("static directive"));
    EnvFilter::from_default_env().add_directive(directive)
}

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Logs go to stderr; stdout carries the bridge protocol. Logging starts
    // before the config loads so its warnings are kept, and the configured
    // level is applied afterwards unless `--log-level` was given.
    let (filter, filter_handle) = reload::Layer::new(env_filter(
        args.log_level.as_deref().unwrap_or(DEFAULT_DIRECTIVE),
    ));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("pixie-background v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }

    let config = pixie_config::load_config(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {e}");
        pixie_config::BackgroundConfig::default()
    });
    if args.log_level.is_none() {
        let directive = config.logging.level.directive();
        if let Err(e) = filter_handle.reload(env_filter(directive)) {
            tracing::warn!("failed to apply log level {directive}: {e}");
        }
    }

    let (host, lines) = StdioHost::new();
    let host = Arc::new(host);
    let writer = tokio::spawn(write_lines(lines, tokio::io::stdout()));

    let service = ActionFrameService::from_config(host.clone(), &config);
    let forms = Arc::new(FormRegistry::new());

    let mut tasks = JoinSet::new();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match input.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read error");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let incoming: Incoming = match serde_json::from_str(&line) {
            Ok(incoming) => incoming,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed line");
                continue;
            }
        };

        let (id, sender, request) = match incoming {
            Incoming::HostReply { call_id, reply } => {
                host.resolve(call_id, reply);
                continue;
            }
            Incoming::Request {
                id,
                sender,
                request,
            } => (id, sender, request),
        };

        // Each request runs on its own task so a forward waiting for its
        // frame does not hold up the registration it is waiting for.
        let service = service.clone();
        let forms = forms.clone();
        let host = host.clone();
        tasks.spawn(async move {
            let response = match request {
                Request::Panel(request) => Reply::Panel(service.dispatch(&sender, request).await),
                Request::Form(request) => Reply::Form(forms.dispatch(request).await),
            };
            if let Err(e) = host.emit(&Outgoing::Response { id, response }) {
                tracing::warn!(id, error = %e, "failed to send response");
            }
        });
    }

    // No more replies can arrive once stdin is closed.
    host.abandon_pending();
    tracing::info!(pending = tasks.len(), "stdin closed, draining requests");
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::warn!(error = %e, "request task failed");
        }
    }

    drop(service);
    drop(host);
    match writer.await {
        Ok(Err(e)) => tracing::warn!(error = %e, "stdout write error"),
        Err(e) => tracing::warn!(error = %e, "stdout writer failed"),
        Ok(Ok(())) => {}
    }
}
