use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use crate::tools::{HostTools, ProcessRow, ToolError};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    LogQuery { predicate: String, window: String },
    ListProcesses,
}

/// In-memory `HostTools` that replays fixed line sets and records calls.
#[derive(Default)]
pub struct FakeHost {
    lines: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    processes: Vec<ProcessRow>,
    listing_fails: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeHost {
    pub fn with_lines(mut self, predicate: &str, lines: &[&str]) -> Self {
        self.lines.insert(predicate.to_string(), lines.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Relays its lines (if any), then fails as a non-zero exit would.
    pub fn failing_query(mut self, predicate: &str) -> Self {
        self.failing.insert(predicate.to_string());
        self
    }

    pub fn with_processes(mut self, rows: Vec<ProcessRow>) -> Self {
        self.processes = rows;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> { self.calls.borrow().clone() }

    pub fn queried_predicates(&self) -> Vec<String> {
        self.calls.borrow().iter().filter_map(|c| match c { Call::LogQuery { predicate, .. } => Some(predicate.clone()), _ => None }).collect()
    }
}

impl HostTools for FakeHost {
    fn log_query(&self, predicate: &str, window: &str, on_line: &mut dyn FnMut(&str)) -> Result<usize, ToolError> {
        self.calls.borrow_mut().push(Call::LogQuery { predicate: predicate.to_string(), window: window.to_string() });
        let lines = self.lines.get(predicate).cloned().unwrap_or_default();
        for l in &lines { on_line(l); }
        if self.failing.contains(predicate) { return Err(ToolError::NotFound("log")); }
        Ok(lines.len())
    }

    fn list_processes(&self) -> Result<Vec<ProcessRow>, ToolError> {
        self.calls.borrow_mut().push(Call::ListProcesses);
        if self.listing_fails { return Err(ToolError::NotFound("ps")); }
        Ok(self.processes.clone())
    }
}
