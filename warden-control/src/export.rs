use std::fmt::Write as _;

use warden_conntrack::ConnTable;

/// Renders the connection table as the export CSV (§6):
/// `src_ip,dst_ip,src_port,dst_port,proto,state,last_seen`, header row
/// first. Never evicts a record as a side effect of exporting it.
pub fn export_csv(table: &ConnTable) -> String {
    let mut out = String::from("src_ip,dst_ip,src_port,dst_port,proto,state,last_seen\n");
    table.scan(|key, record| {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            key.src_ip,
            key.dst_ip,
            key.src_port,
            key.dst_port,
            key.protocol,
            record.state_code(),
            record.last_seen(),
        );
        true
    });
    out
}
