use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};
use warden_concurrency::sync::Mutex;
use warden_conntrack::{Clock, ConnTable, Reaper};
use warden_nat::NatRuleStore;
use warden_rules::{Action, RuleStore};

use crate::command::ControlCommand;
use crate::error::ControlError;
use crate::{export, logring::LogRing, rules_io};

/// The single owning context the design notes call for (§9): replaces the
/// original module's scattered globals (`rule_list`, `nat_rule_list`,
/// `connection_table`, `filter_status`, `rule_file_path`,
/// `nat_rule_file_path`, `log_file_path`) with one value, constructed once
/// and carried by reference through every external entry point and every
/// datapath stage.
pub struct Context {
    pub rule_store: Arc<RuleStore>,
    pub nat_store: Arc<NatRuleStore>,
    pub conn_table: Arc<ConnTable>,
    pub clock: Arc<Clock>,
    pub log_ring: Arc<LogRing>,
    filter_enabled: AtomicBool,
    log_path: Mutex<PathBuf>,
}

impl Context {
    pub fn new(
        filter_rule_path: impl Into<PathBuf>,
        nat_rule_path: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        Context {
            rule_store: Arc::new(RuleStore::new(Action::Accept, filter_rule_path)),
            nat_store: Arc::new(NatRuleStore::new(nat_rule_path)),
            conn_table: Arc::new(ConnTable::new()),
            clock: Arc::new(Clock::new()),
            log_ring: LogRing::new(),
            filter_enabled: AtomicBool::new(false),
            log_path: Mutex::new(log_path.into()),
        }
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled.load(Ordering::Relaxed)
    }

    pub fn set_filter_rule_path(&self, path: impl Into<PathBuf>) {
        self.rule_store.set_path(path);
    }

    pub fn set_nat_rule_path(&self, path: impl Into<PathBuf>) {
        self.nat_store.set_path(path);
    }

    pub fn set_log_path(&self, path: impl Into<PathBuf>) {
        *self.log_path.lock() = path.into();
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path.lock().clone()
    }

    /// Spawns the periodic timeout reaper on the current tokio runtime,
    /// using the default tick and idle threshold (§4.8).
    pub fn spawn_reaper(&self) -> tokio::task::JoinHandle<()> {
        Reaper::new(Arc::clone(&self.conn_table), Arc::clone(&self.clock)).spawn()
    }

    /// Spawns the reaper with a caller-supplied tick interval and idle
    /// threshold, overriding the defaults (§4.8).
    pub fn spawn_reaper_with(
        &self,
        tick: std::time::Duration,
        idle_threshold_secs: u64,
    ) -> tokio::task::JoinHandle<()> {
        Reaper::new(Arc::clone(&self.conn_table), Arc::clone(&self.clock))
            .with_tick(tick)
            .with_idle_threshold_secs(idle_threshold_secs)
            .spawn()
    }

    /// Loads both rule files and publishes them atomically with respect to
    /// each other: if either load fails, neither store is touched (§7 "no
    /// partial state is applied").
    pub fn reload_rules(&self) -> Result<(), ControlError> {
        let filter_rules = rules_io::load_filter_rules(&self.rule_store.path())?;
        let nat_rules = rules_io::load_nat_rules(&self.nat_store.path())?;
        let filter_count = filter_rules.len();
        let nat_count = nat_rules.len();
        self.rule_store.replace(filter_rules);
        self.nat_store.replace(nat_rules);
        info!(target: "warden-control", filter_count, nat_count, "rules reloaded");
        Ok(())
    }

    /// Handles one control-channel write (§6). Returns the response bytes
    /// for the read half — empty for every command but `'3'`, which
    /// returns the connection-table CSV snapshot.
    pub fn handle_command(&self, bytes: &[u8]) -> Result<Vec<u8>, ControlError> {
        let command = ControlCommand::decode(bytes)?;
        match command {
            ControlCommand::EnableFilter => {
                if !self.filter_enabled.swap(true, Ordering::SeqCst) {
                    info!(target: "warden-control", "filter enabled");
                }
                Ok(Vec::new())
            }
            ControlCommand::DisableFilter => {
                if self.filter_enabled.swap(false, Ordering::SeqCst) {
                    info!(target: "warden-control", "filter disabled");
                }
                Ok(Vec::new())
            }
            ControlCommand::ReloadRules => {
                if let Err(error) = self.reload_rules() {
                    warn!(target: "warden-control", %error, "rule reload failed");
                    return Err(error);
                }
                Ok(Vec::new())
            }
            ControlCommand::SnapshotConnections => Ok(export::export_csv(&self.conn_table).into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("warden_control_test_{name}_{}.csv", std::process::id()))
    }

    #[test]
    fn enable_disable_are_idempotent() {
        let ctx = Context::new("unused.csv", "unused_nat.csv", "unused.log");
        assert!(!ctx.filter_enabled());
        ctx.handle_command(b"0").expect("enable");
        assert!(ctx.filter_enabled());
        ctx.handle_command(b"0").expect("enable again is a no-op");
        assert!(ctx.filter_enabled());
        ctx.handle_command(b"1").expect("disable");
        assert!(!ctx.filter_enabled());
    }

    #[test]
    fn unknown_command_and_bad_length_are_rejected() {
        let ctx = Context::new("unused.csv", "unused_nat.csv", "unused.log");
        assert!(ctx.handle_command(b"9").is_err());
        assert!(ctx.handle_command(b"01").is_err());
    }

    #[test]
    fn reload_loads_both_rule_files_and_applies_them_together() {
        let filter_path = scratch_path("filter_reload");
        let nat_path = scratch_path("nat_reload");

        std::fs::File::create(&filter_path)
            .unwrap()
            .write_all(b"header\n,,,,6,0,1,0\n")
            .unwrap();
        std::fs::File::create(&nat_path)
            .unwrap()
            .write_all(b"10.0.0.1,1234,192.168.1.1,4321,6,0\n")
            .unwrap();

        let ctx = Context::new(filter_path.clone(), nat_path.clone(), "unused.log");
        ctx.handle_command(b"2").expect("reload succeeds");

        assert_eq!(ctx.rule_store.snapshot().rules.len(), 1);
        assert_eq!(ctx.nat_store.snapshot().len(), 1);

        std::fs::remove_file(&filter_path).ok();
        std::fs::remove_file(&nat_path).ok();
    }

    #[test]
    fn reload_failure_leaves_existing_rules_untouched() {
        let ctx = Context::new("/nonexistent/warden/filter.csv", "/nonexistent/warden/nat.csv", "unused.log");
        ctx.rule_store.replace(Vec::new());
        let before = ctx.rule_store.snapshot().rules.len();
        assert!(ctx.handle_command(b"2").is_err());
        assert_eq!(ctx.rule_store.snapshot().rules.len(), before);
    }
}
