use std::path::PathBuf;
use std::sync::Arc;

use warden_concurrency::Published;
use warden_concurrency::sync::Mutex;

use crate::rule::Action;
use crate::rule::FilterRule;

/// The rules and default action a packet traversal sees as one atomic unit.
///
/// The default action travels with the rule list rather than as a separate
/// published cell: a reload and a default-action toggle issued back to back
/// must never let a packet observe a mix of the old rules with the new
/// default (or vice versa).
#[derive(Debug, Clone)]
pub struct RuleSnapshot {
    pub rules: Arc<[FilterRule]>,
    pub default_action: Action,
}

/// Ordered, atomically-reloadable filter rule list (§4.2).
pub struct RuleStore {
    published: Published<RuleSnapshot>,
    path: Mutex<PathBuf>,
}

impl RuleStore {
    pub fn new(default_action: Action, path: impl Into<PathBuf>) -> Self {
        RuleStore {
            published: Published::new(RuleSnapshot {
                rules: Arc::from(Vec::new()),
                default_action,
            }),
            path: Mutex::new(path.into()),
        }
    }

    /// Acquires a stable snapshot for one packet traversal (§4.2, §5).
    pub fn snapshot(&self) -> Arc<RuleSnapshot> {
        Arc::clone(&self.published.load())
    }

    /// Atomically swaps in a freshly loaded rule list, keeping the current
    /// default action.
    pub fn replace(&self, rules: Vec<FilterRule>) {
        let default_action = self.snapshot().default_action;
        self.published.store(RuleSnapshot {
            rules: Arc::from(rules),
            default_action,
        });
    }

    /// Flips accept<->drop for unmatched packets (`switch_default_action`
    /// in the original module).
    pub fn toggle_default_action(&self) {
        let current = self.snapshot();
        let flipped = match current.default_action {
            Action::Accept => Action::Drop,
            Action::Drop => Action::Accept,
        };
        self.published.store(RuleSnapshot {
            rules: current.rules.clone(),
            default_action: flipped,
        });
    }

    pub fn set_path(&self, path: impl Into<PathBuf>) {
        *self.path.lock() = path.into();
    }

    pub fn path(&self) -> PathBuf {
        self.path.lock().clone()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        RuleStore::new(Action::Accept, PathBuf::from("net_rule.csv"))
    }
}
