use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Local};

pub fn session_log_name(started: DateTime<Local>) -> String {
    format!("macos_diagnostics_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Append-only capture of one run. Plain text, no colour codes.
pub struct SessionLog {
    path: PathBuf,
    file: File,
}

impl SessionLog {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { path: path.to_path_buf(), file })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn append_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.file, "{}", line)
    }

    pub fn flush(&mut self) -> std::io::Result<()> { self.file.flush() }
}

/// Writes every line to the terminal (painted when colour is on) and to the
/// session log (plain), in the same order.
pub struct Tee<W: Write> {
    terminal: W,
    log: SessionLog,
    color: bool,
}

impl<W: Write> Tee<W> {
    pub fn new(terminal: W, log: SessionLog, color: bool) -> Self { Self { terminal, log, color } }

    pub fn log_path(&self) -> &Path { self.log.path() }

    #[cfg(test)]
    pub fn terminal(&self) -> &W { &self.terminal }

    fn paint(&self, s: &str, code: &str) -> String {
        if self.color { format!("\x1b[{}m{}\x1b[0m", code, s) } else { s.to_string() }
    }

    fn both(&mut self, line: &str, code: Option<&str>) -> std::io::Result<()> {
        let shown = match code { Some(c) => self.paint(line, c), None => line.to_string() };
        writeln!(self.terminal, "{}", shown)?;
        self.log.append_line(line)
    }

    pub fn line(&mut self, line: &str) -> std::io::Result<()> { self.both(line, None) }
    pub fn marker(&mut self, line: &str) -> std::io::Result<()> { self.both(line, Some("1;36")) }
    pub fn warn(&mut self, line: &str) -> std::io::Result<()> { self.both(line, Some("33")) }

    /// Terminal only: menus, help, prompts and invalid-option notices.
    pub fn notice(&mut self, line: &str, code: Option<&str>) -> std::io::Result<()> {
        let shown = match code { Some(c) => self.paint(line, c), None => line.to_string() };
        writeln!(self.terminal, "{}", shown)
    }

    pub fn prompt(&mut self, text: &str) -> std::io::Result<()> {
        write!(self.terminal, "{}", text)?;
        self.terminal.flush()
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.terminal.flush()?;
        self.log.flush()
    }
}
