use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub cpu_percent: f64,
    pub rss_kb: u64,
    pub command: String,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} not found on this host")]
    NotFound(&'static str),
    #[error("failed to run {tool}: {source}")]
    Spawn { tool: &'static str, source: std::io::Error },
    #[error("{tool} exited with {status}")]
    ExitStatus { tool: &'static str, status: std::process::ExitStatus },
    #[error("reading {tool} output: {source}")]
    Io { tool: &'static str, source: std::io::Error },
}

/// The two host utilities the tool drives.
///
/// `log_query` relays lines through `on_line` as they arrive and returns how
/// many were relayed; lines already relayed stay relayed even when it errors.
pub trait HostTools {
    fn log_query(&self, predicate: &str, window: &str, on_line: &mut dyn FnMut(&str)) -> Result<usize, ToolError>;
    fn list_processes(&self) -> Result<Vec<ProcessRow>, ToolError>;
}
