use crate::tools::ProcessRow;

// Column layout produced by `ps -axo pid=,%cpu=,rss=,command=`: three
// whitespace-separated numeric fields, then the command with its own spaces.
// This is a host format assumption; keep it here so another layout can be
// swapped in without touching the reporter.
pub const PS_ARGS: [&str; 2] = ["-axo", "pid=,%cpu=,rss=,command="];

pub fn parse_ps_output(stdout: &str) -> Vec<ProcessRow> {
    stdout.lines().filter_map(parse_ps_line).collect()
}

pub fn parse_ps_line(line: &str) -> Option<ProcessRow> {
    let (pid, rest) = next_field(line)?;
    let (cpu, rest) = next_field(rest)?;
    let (rss, rest) = next_field(rest)?;
    let command = rest.trim();
    if command.is_empty() { return None; }
    Some(ProcessRow {
        pid: pid.parse().ok()?,
        cpu_percent: cpu.parse().ok()?,
        rss_kb: rss.parse().ok()?,
        command: command.to_string(),
    })
}

fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() { return None; }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_keeps_command_spaces() {
        let out = "    1   0.0  13520 /sbin/launchd\n  812  12.5 345004 /Library/Backblaze.bzpkg/bztransmit -thread 3\n";
        let rows = parse_ps_output(out);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].pid, 812);
        assert_eq!(rows[1].cpu_percent, 12.5);
        assert_eq!(rows[1].rss_kb, 345004);
        assert_eq!(rows[1].command, "/Library/Backblaze.bzpkg/bztransmit -thread 3");
    }

    #[test]
    fn skips_headers_and_short_lines() {
        assert!(parse_ps_line("  PID  %CPU    RSS COMMAND").is_none());
        assert!(parse_ps_line("  42  0.1 1024").is_none());
        assert!(parse_ps_line("").is_none());
    }

    #[test]
    fn rejects_comma_decimal_cpu() {
        assert!(parse_ps_line("  42  0,1 1024 /usr/bin/foo").is_none());
    }
}
