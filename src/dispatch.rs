use std::io::Write;
use crate::categories::{DiagnosticCategory, CATALOG};
use crate::config::Settings;
use crate::memory;
use crate::session_log::Tee;
use crate::tools::HostTools;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchResult {
    pub lines: usize,
    pub warned: bool,
}

pub fn start_marker(c: &DiagnosticCategory, window: &str) -> String {
    format!("=== [{}] {} | last {} | scan started ===", c.id, c.name, window)
}

pub fn finish_marker(c: &DiagnosticCategory) -> String {
    format!("=== [{}] {} | scan finished ===", c.id, c.name)
}

/// Runs one category: start marker, relayed lines, finish marker. A failed
/// query is reported and the block still closes. Errors returned here are
/// session output failures only.
pub fn run_category<H: HostTools, W: Write>(host: &H, settings: &Settings, c: &DiagnosticCategory, out: &mut Tee<W>) -> std::io::Result<DispatchResult> {
    out.marker(&start_marker(c, &settings.window))?;
    let mut sink_err: Option<std::io::Error> = None;
    let mut relayed = 0usize;
    let res = host.log_query(c.predicate, &settings.window, &mut |line: &str| {
        if sink_err.is_some() { return; }
        match out.line(line) { Ok(()) => relayed += 1, Err(e) => sink_err = Some(e) }
    });
    if let Some(e) = sink_err { return Err(e); }
    let mut warned = false;
    if let Err(e) = res {
        log::warn!("log query for category {} failed: {}", c.id, e);
        out.warn(&format!("WARNING: log query for {} failed: {}", c.name, e))?;
        warned = true;
    }
    if c.report_memory { memory::report(host, &settings.agent_pattern, out)?; }
    out.marker(&finish_marker(c))?;
    out.flush()?;
    Ok(DispatchResult { lines: relayed, warned })
}

/// Every catalogue entry once, in order, regardless of individual failures.
pub fn run_all<H: HostTools, W: Write>(host: &H, settings: &Settings, out: &mut Tee<W>) -> std::io::Result<Vec<DispatchResult>> {
    let mut results = Vec::with_capacity(CATALOG.len());
    for c in CATALOG { results.push(run_category(host, settings, c, out)?); }
    Ok(results)
}
