//! NAT rule store and NAT engine (§4.3, §4.5).

warden_tracectl::trace_target!("warden-nat", tracing::level_filters::LevelFilter::INFO, &[]);

mod engine;
mod rule;
mod stage;
mod store;

pub use engine::apply;
pub use rule::{NatDirection, NatRule};
pub use stage::NatStage;
pub use store::NatRuleStore;
