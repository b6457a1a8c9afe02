use std::collections::VecDeque;
use std::io::{BufRead, Write};
use comfy_table::{ContentArrangement, Table};
use crate::categories::{self, DiagnosticCategory, CATALOG, RUN_ALL_ID};
use crate::config::Settings;
use crate::dispatch;
use crate::session_log::Tee;
use crate::tools::HostTools;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState { AwaitingSelection, Executing, Terminated }

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Help,
    Category(&'static DiagnosticCategory),
    RunAll,
    Quit,
    Invalid(String),
}

/// What one selection produced. Exactly one per selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome { Help, Dispatched, Terminated, Invalid }

pub fn parse_selection(token: &str) -> Selection {
    let t = token.trim();
    match t {
        "h" | "H" => Selection::Help,
        "q" | "Q" => Selection::Quit,
        _ if t == RUN_ALL_ID => Selection::RunAll,
        _ => match categories::find(t) { Some(c) => Selection::Category(c), None => Selection::Invalid(t.to_string()) },
    }
}

pub trait SelectionSource {
    /// `None` when input is exhausted.
    fn next_selection(&mut self) -> std::io::Result<Option<String>>;
}

pub struct LineSelections<R: BufRead> { reader: R }

impl<R: BufRead> LineSelections<R> {
    pub fn new(reader: R) -> Self { Self { reader } }
}

impl<R: BufRead> SelectionSource for LineSelections<R> {
    fn next_selection(&mut self) -> std::io::Result<Option<String>> {
        let mut buf: Vec<u8> = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 { return Ok(None); }
        // undecodable bytes become U+FFFD and fall through to the invalid-option path
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
pub struct ScriptedSelections(VecDeque<String>);

#[cfg(test)]
impl ScriptedSelections {
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(items: I) -> Self { Self(items.into_iter().map(Into::into).collect()) }
}

#[cfg(test)]
impl SelectionSource for ScriptedSelections {
    fn next_selection(&mut self) -> std::io::Result<Option<String>> { Ok(self.0.pop_front()) }
}

pub fn render_menu() -> Vec<String> {
    let mut out = vec!["macOS background daemon triage".to_string()];
    for c in CATALOG { out.push(format!("  {:>2}) {}", c.id, c.name)); }
    out.push(format!("  {:>2}) Run all", RUN_ALL_ID));
    out.push("   h) Help    q) Quit".to_string());
    out
}

/// `wrap` fits the table to the terminal width; off when output is not a terminal.
pub fn render_help(settings: &Settings, log_path: &std::path::Path, wrap: bool) -> String {
    let mut table = Table::new();
    if wrap { table.set_content_arrangement(ContentArrangement::Dynamic); } else { table.force_no_tty(); }
    table.set_header(vec!["#", "Category", "What it shows", "log predicate"]);
    for c in CATALOG {
        let name = if c.report_memory { format!("{} (+ memory)", c.name) } else { c.name.to_string() };
        table.add_row(vec![c.id.to_string(), name, c.description.to_string(), c.predicate.to_string()]);
    }
    table.add_row(vec![RUN_ALL_ID.to_string(), "Run all".to_string(), format!("Categories 1-{} in order", CATALOG.len()), String::new()]);
    format!(
        "{}\nWindow: last {} (pass a different window as the first argument, e.g. 1h or 24h)\nMemory report pattern: {}\nSession log: {}",
        table, settings.window, settings.agent_pattern.as_str(), log_path.display()
    )
}

pub struct Session<'a, H: HostTools, W: Write> {
    host: &'a H,
    settings: &'a Settings,
    out: Tee<W>,
    state: LoopState,
}

impl<'a, H: HostTools, W: Write> Session<'a, H, W> {
    pub fn new(host: &'a H, settings: &'a Settings, out: Tee<W>) -> Self {
        Self { host, settings, out, state: LoopState::AwaitingSelection }
    }

    pub fn state(&self) -> LoopState { self.state }

    #[cfg(test)]
    pub fn output(&self) -> &Tee<W> { &self.out }

    /// Handles one selection token and returns to `AwaitingSelection`
    /// unless it was the quit token.
    pub fn step(&mut self, token: &str) -> std::io::Result<Outcome> {
        if self.state == LoopState::Terminated { return Ok(Outcome::Terminated); }
        match parse_selection(token) {
            Selection::Help => {
                let help = render_help(self.settings, self.out.log_path(), self.settings.color);
                for l in help.lines() { self.out.notice(l, None)?; }
                Ok(Outcome::Help)
            }
            Selection::Quit => {
                self.state = LoopState::Terminated;
                self.out.flush()?;
                Ok(Outcome::Terminated)
            }
            Selection::Invalid(t) => {
                log::debug!("invalid selection {:?}", t);
                self.out.notice(&format!("Invalid option: {:?} (h for help, q to quit)", t), Some("31"))?;
                Ok(Outcome::Invalid)
            }
            Selection::Category(c) => {
                self.state = LoopState::Executing;
                let r = dispatch::run_category(self.host, self.settings, c, &mut self.out);
                self.state = LoopState::AwaitingSelection;
                let res = r?;
                log::debug!("category {} relayed {} lines (warned: {})", c.id, res.lines, res.warned);
                Ok(Outcome::Dispatched)
            }
            Selection::RunAll => {
                self.state = LoopState::Executing;
                let r = dispatch::run_all(self.host, self.settings, &mut self.out);
                self.state = LoopState::AwaitingSelection;
                let results = r?;
                let failed = results.iter().filter(|d| d.warned).count();
                if failed > 0 { log::warn!("run all: {} of {} categories reported a query failure", failed, results.len()); }
                Ok(Outcome::Dispatched)
            }
        }
    }

    /// Shows the menu, reads, steps, until quit or end of input.
    pub fn run<S: SelectionSource>(&mut self, source: &mut S) -> std::io::Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        while self.state() != LoopState::Terminated {
            for l in render_menu() { self.out.notice(&l, Some("1"))?; }
            self.out.prompt("Select an option: ")?;
            let token = match source.next_selection()? {
                Some(t) => t,
                None => { log::info!("selection input closed, ending session"); "q".to_string() }
            };
            outcomes.push(self.step(&token)?);
        }
        Ok(outcomes)
    }
}
