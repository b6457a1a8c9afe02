use std::io::Write;
use regex::Regex;
use crate::session_log::Tee;
use crate::tools::{HostTools, ProcessRow};

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessMemoryRecord {
    pub pid: u32,
    pub rss_kb: u64,
    pub cpu_percent: f64,
    pub command: String,
}

impl ProcessMemoryRecord {
    pub fn from_row(row: &ProcessRow) -> Self {
        Self { pid: row.pid, rss_kb: row.rss_kb, cpu_percent: row.cpu_percent, command: row.command.clone() }
    }

    pub fn memory_mb(&self) -> f64 { self.rss_kb as f64 / 1024.0 }
}

pub fn format_memory_line(r: &ProcessMemoryRecord) -> String {
    let cpu = format!("{:.1}", r.cpu_percent);
    format!("PID: {:<6} RSS: {:<8} KB ({:.2} MB) CPU: {:<5}% CMD: {}", r.pid, r.rss_kb, r.memory_mb(), cpu, r.command)
}

/// Rows whose command matches `pattern`, in listing order.
pub fn matching_records(rows: &[ProcessRow], pattern: &Regex) -> Vec<ProcessMemoryRecord> {
    rows.iter().filter(|r| pattern.is_match(&r.command)).map(ProcessMemoryRecord::from_row).collect()
}

/// Writes the bracketed memory report. Listing failures become a warning
/// line; only session output errors are returned.
pub fn report<H: HostTools, W: Write>(host: &H, pattern: &Regex, out: &mut Tee<W>) -> std::io::Result<usize> {
    out.marker(&format!("--- Process memory ({}) ---", pattern.as_str()))?;
    let rows = match host.list_processes() {
        Ok(r) => r,
        Err(e) => {
            log::warn!("process listing failed: {}", e);
            out.warn(&format!("WARNING: process listing unavailable: {}", e))?;
            Vec::new()
        }
    };
    let records = matching_records(&rows, pattern);
    for r in &records { out.line(&format_memory_line(r))?; }
    if records.is_empty() { log::info!("no processes matched {}", pattern.as_str()); }
    out.marker("--- End process memory ---")?;
    Ok(records.len())
}
