//! Output formatting helpers for human-readable and JSON output.

use virtdeck::model::{Guest, Node, StorageVolume, User};

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    // Calculate column widths (max of header and all row values)
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    // Print header
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  "));

    // Print rows
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  "));
    }
}

pub fn node_rows(nodes: &[Node]) -> Vec<Vec<String>> {
    nodes
        .iter()
        .map(|n| {
            vec![
                n.id.clone(),
                format!("{:?}", n.status).to_lowercase(),
                format!("{:.0}%", n.cpu_fraction * 100.0),
                format!("{} / {}", human_bytes(n.mem_used), human_bytes(n.mem_max)),
                human_uptime(n.uptime_secs),
            ]
        })
        .collect()
}

pub fn guest_rows(guests: &[Guest]) -> Vec<Vec<String>> {
    guests
        .iter()
        .map(|g| {
            vec![
                g.vmid.to_string(),
                g.name.clone().unwrap_or_default(),
                g.node.clone(),
                format!("{:?}", g.status).to_lowercase(),
                human_uptime(g.uptime_secs),
            ]
        })
        .collect()
}

pub fn storage_rows(storage: &[StorageVolume]) -> Vec<Vec<String>> {
    storage
        .iter()
        .map(|v| {
            vec![
                v.id.clone(),
                v.node.clone().unwrap_or_else(|| "-".to_string()),
                v.kind.clone(),
                format!("{:.0}%", v.usage_fraction() * 100.0),
                if v.shared { "shared" } else { "local" }.to_string(),
            ]
        })
        .collect()
}

pub fn user_rows(users: &[User]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| {
            vec![
                u.userid.clone(),
                if u.enable { "enabled" } else { "disabled" }.to_string(),
                u.comment.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn human_uptime(secs: u64) -> String {
    if secs == 0 {
        return "-".to_string();
    }
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
