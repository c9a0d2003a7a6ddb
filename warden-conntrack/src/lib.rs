//! The connection table, state engine, and timeout reaper (§4.6, §4.7, §4.8).

warden_tracectl::trace_target!("warden-conntrack", tracing::level_filters::LevelFilter::INFO, &[]);

mod clock;
mod reaper;
mod record;
mod stage;
mod state;
mod table;

pub use clock::Clock;
pub use reaper::{Reaper, DEFAULT_IDLE_THRESHOLD_SECS, DEFAULT_TICK};
pub use record::{FlowRecord, FlowState};
pub use stage::ConntrackStage;
pub use state::{derive_state, observe};
pub use table::{ConnTable, FlowKey};
