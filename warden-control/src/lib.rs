//! The control channel, rule-file loaders, log ring, and connection-table
//! export: the external interfaces of §6, plus the owning [`Context`] the
//! design notes call for in place of the original module's globals.

warden_tracectl::trace_target!("warden-control", tracing::level_filters::LevelFilter::INFO, &[]);

mod command;
mod context;
mod error;
mod export;
mod logring;
mod rules_io;

pub use command::ControlCommand;
pub use context::Context;
pub use error::ControlError;
pub use export::export_csv;
pub use logring::{LogRing, LogRingLayer};
pub use rules_io::{load_filter_rules, load_nat_rules, parse_filter_rule, parse_nat_rule};
