//! Filter rule store and filter engine (§4.2, §4.4).

warden_tracectl::trace_target!("warden-rules", tracing::level_filters::LevelFilter::INFO, &[]);

mod engine;
mod rule;
mod stage;
mod store;

pub use engine::{evaluate, Verdict};
pub use rule::{Action, FilterRule};
pub use stage::FilterStage;
pub use store::{RuleSnapshot, RuleStore};
