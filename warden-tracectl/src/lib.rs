//! Compile-time registry of trace targets.
//!
//! Every crate that emits `tracing` events calls [`trace_target!`] once at
//! the top of its `lib.rs`, naming the `tracing` target it logs under, a
//! default [`LevelFilter`](tracing::level_filters::LevelFilter), and the
//! names of any other targets it considers "dependencies" for log-level
//! purposes (raising a target's level also raises its dependencies' levels
//! unless they are set explicitly). Targets are collected into a single
//! [`linkme::distributed_slice`] with no runtime registration step, and
//! [`default_env_filter`] turns that slice into a `tracing-subscriber`
//! `EnvFilter` directive string a binary can hand to `RUST_LOG` defaults.

use tracing::level_filters::LevelFilter;

/// One crate's declared trace target.
pub struct TraceTargetInfo {
    pub name: &'static str,
    pub default_level: LevelFilter,
    pub deps: &'static [&'static str],
}

#[linkme::distributed_slice]
pub static TRACE_TARGETS: [TraceTargetInfo] = [..];

/// Registers a crate's trace target in [`TRACE_TARGETS`].
///
/// ```ignore
/// warden_tracectl::trace_target!("warden-nat", tracing::level_filters::LevelFilter::INFO, &["warden-conntrack"]);
/// ```
#[macro_export]
macro_rules! trace_target {
    ($name:expr, $level:expr, $deps:expr) => {
        #[$crate::linkme::distributed_slice($crate::TRACE_TARGETS)]
        static __WARDEN_TRACE_TARGET: $crate::TraceTargetInfo = $crate::TraceTargetInfo {
            name: $name,
            default_level: $level,
            deps: $deps,
        };
    };
}

pub use linkme;

/// Builds an `env_filter`-compatible directive string (`target=level,...`)
/// from every registered trace target's default level, suitable as the
/// fallback passed to `EnvFilter::try_new` before overlaying `RUST_LOG`.
pub fn default_env_filter_directives() -> String {
    TRACE_TARGETS
        .iter()
        .map(|target| format!("{}={}", target.name, target.default_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs a `Registry` subscriber with an `EnvFilter` (seeded from
/// [`default_env_filter_directives`] and overridable via `RUST_LOG`) and an
/// `fmt` layer. Returns an error if a subscriber is already installed.
pub fn init_tracing() -> Result<(), TraceInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let default_directives = default_env_filter_directives();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_directives))
        .map_err(|source| TraceInitError::Filter { source })?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|source| TraceInitError::AlreadyInstalled { source })
}

#[derive(Debug, thiserror::Error)]
pub enum TraceInitError {
    #[error("failed to build trace filter")]
    Filter {
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}
