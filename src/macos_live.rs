use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use crate::process_list::{parse_ps_output, PS_ARGS};
use crate::tools::{HostTools, ProcessRow, ToolError};

const LOG_TOOL: &str = "log";
const PS_TOOL: &str = "ps";

/// Shells out to `log show` and `ps` on the running host.
pub struct MacHost;

fn spawn_error(tool: &'static str, e: std::io::Error) -> ToolError {
    if e.kind() == std::io::ErrorKind::NotFound { ToolError::NotFound(tool) } else { ToolError::Spawn { tool, source: e } }
}

pub fn log_show_args<'a>(predicate: &'a str, window: &'a str) -> [&'a str; 9] {
    ["show", "--predicate", predicate, "--info", "--debug", "--style", "compact", "--last", window]
}

// Stdout must already be dropped, or a child blocked on a full pipe never exits.
fn abandon(child: &mut Child) {
    if let Err(e) = child.kill() { log::debug!("kill {} failed: {}", child.id(), e); }
    match child.wait() {
        Ok(status) => log::debug!("abandoned child {} exited with {}", child.id(), status),
        Err(e) => log::debug!("wait on abandoned child {} failed: {}", child.id(), e),
    }
}

impl HostTools for MacHost {
    fn log_query(&self, predicate: &str, window: &str, on_line: &mut dyn FnMut(&str)) -> Result<usize, ToolError> {
        let args = log_show_args(predicate, window);
        log::debug!("spawning {} {:?}", LOG_TOOL, args);
        // stderr goes straight to the operator, e.g. log's own complaint about a bad --last value
        let mut child = Command::new(LOG_TOOL)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_error(LOG_TOOL, e))?;
        let mut relayed = 0usize;
        if let Some(stdout) = child.stdout.take() {
            let mut br = BufReader::new(stdout);
            let mut buf: Vec<u8> = Vec::new();
            loop {
                buf.clear();
                let read = match br.read_until(b'\n', &mut buf) {
                    Ok(n) => n,
                    Err(e) => {
                        drop(br);
                        abandon(&mut child);
                        return Err(ToolError::Io { tool: LOG_TOOL, source: e });
                    }
                };
                if read == 0 { break; }
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\n', '\r']));
                relayed += 1;
            }
        }
        let status = child.wait().map_err(|e| ToolError::Io { tool: LOG_TOOL, source: e })?;
        if !status.success() { return Err(ToolError::ExitStatus { tool: LOG_TOOL, status }); }
        Ok(relayed)
    }

    fn list_processes(&self) -> Result<Vec<ProcessRow>, ToolError> {
        log::debug!("spawning {} {:?}", PS_TOOL, PS_ARGS);
        let output = Command::new(PS_TOOL)
            .args(PS_ARGS)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error(PS_TOOL, e))?;
        if !output.status.success() { return Err(ToolError::ExitStatus { tool: PS_TOOL, status: output.status }); }
        Ok(parse_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}
