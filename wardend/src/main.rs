//! The firewall/NAT daemon binary: wires the [`warden_control::Context`]
//! together with the filter/conntrack/NAT pipeline, serves the control
//! channel, and runs the timeout reaper.

mod cli;
mod control_socket;
mod pipeline;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use warden_control::{Context, LogRingLayer};

use cli::Cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let context = Arc::new(Context::new(
        cli.filter_rules.clone(),
        cli.nat_rules.clone(),
        cli.log_file.clone(),
    ));

    // The env filter falls back to every crate's declared default level
    // (§11.1), overridable with RUST_LOG; the ring layer is the §6 log
    // stream endpoint, composed alongside the usual fmt layer rather than
    // replacing it.
    let default_directives = warden_tracectl::default_env_filter_directives();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&default_directives))?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(LogRingLayer::new(Arc::clone(&context.log_ring)))
        .try_init()?;

    if let Err(error) = context.reload_rules() {
        warn!(%error, "initial rule load failed, starting with empty rule and NAT rule sets");
    }

    if cli.enable_filter {
        context.handle_command(b"0").ok();
    }

    context.spawn_reaper_with(
        Duration::from_secs(cli.reaper_tick_secs),
        cli.idle_threshold_secs,
    );

    control_socket::serve(context, &cli.control_socket).await
}
