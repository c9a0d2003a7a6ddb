use std::path::PathBuf;
use std::sync::Arc;

use warden_concurrency::Published;
use warden_concurrency::sync::Mutex;

use crate::rule::NatRule;

/// Ordered, atomically-reloadable NAT rewrite rule list (§4.3 — same
/// contract as the filter rule store, a separate instance).
pub struct NatRuleStore {
    published: Published<Vec<NatRule>>,
    path: Mutex<PathBuf>,
}

impl NatRuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        NatRuleStore {
            published: Published::new(Vec::new()),
            path: Mutex::new(path.into()),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<NatRule>> {
        Arc::clone(&self.published.load())
    }

    pub fn replace(&self, rules: Vec<NatRule>) {
        self.published.store(rules);
    }

    pub fn set_path(&self, path: impl Into<PathBuf>) {
        *self.path.lock() = path.into();
    }

    pub fn path(&self) -> PathBuf {
        self.path.lock().clone()
    }
}

impl Default for NatRuleStore {
    fn default() -> Self {
        NatRuleStore::new(PathBuf::from("nat_rule.csv"))
    }
}
