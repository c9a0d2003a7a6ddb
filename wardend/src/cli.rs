use std::path::PathBuf;

use clap::Parser;

/// Stateful IPv4 firewall/NAT daemon (§1). Configuration paths default to
/// the original module's compiled-in defaults; every path is also
/// reconfigurable at runtime via the control channel's rule-reload command
/// once the daemon is running (§6).
#[derive(Debug, Parser)]
#[command(name = "wardend", version, about)]
pub struct Cli {
    /// Path to the filter rule CSV file (§6 "Rule file format (filter)").
    #[arg(long, default_value = "net_rule.csv")]
    pub filter_rules: PathBuf,

    /// Path to the NAT rule CSV file (§6 "Rule file format (NAT)").
    #[arg(long, default_value = "nat_rule.csv")]
    pub nat_rules: PathBuf,

    /// Path to the log file backing the log-stream observability endpoint.
    #[arg(long, default_value = "net_log.txt")]
    pub log_file: PathBuf,

    /// Path to the control channel's Unix domain socket (§6).
    #[arg(long, default_value = "/tmp/wardend.sock")]
    pub control_socket: PathBuf,

    /// Reaper tick interval, in seconds (§4.8).
    #[arg(long, default_value_t = 5)]
    pub reaper_tick_secs: u64,

    /// Idle threshold before a flow is reaped, in seconds (§4.8).
    #[arg(long, default_value_t = 5)]
    pub idle_threshold_secs: u64,

    /// Start with the filter enabled, equivalent to issuing command `'0'`
    /// immediately after startup.
    #[arg(long)]
    pub enable_filter: bool,
}
