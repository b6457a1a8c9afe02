use std::path::{Path, PathBuf};
use anyhow::Context;
use chrono::{DateTime, Local};
use regex::Regex;
use serde::Deserialize;
use crate::session_log::session_log_name;

pub const DEFAULT_WINDOW: &str = "30m";
pub const DEFAULT_AGENT_PATTERN: &str = "bzserv|bztransmit|bzfilelist";
pub const CONFIG_ENV: &str = "MACTRIAGE_CONFIG";
pub const CONFIG_FILE: &str = "mactriage.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel { Error, Warn, Info, Debug, Trace }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat { Text, Json }

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub default_window: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub agent_pattern: Option<String>,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub no_color: Option<bool>,
    pub force_color: Option<bool>,
}

pub fn parse_config(text: &str) -> Result<FileConfig, toml::de::Error> { toml::from_str(text) }

/// Reads the optional config file. A missing file is silent; anything else
/// that goes wrong comes back as a warning and defaults apply. The warning is
/// returned rather than logged because this runs before the logger is set up.
pub fn load_config(path_opt: Option<&Path>) -> (FileConfig, Option<String>) {
    let p = path_opt
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let text = match std::fs::read_to_string(&p) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (FileConfig::default(), None),
        Err(e) => return (FileConfig::default(), Some(format!("Failed to read config file {}: {}", p.display(), e))),
    };
    match parse_config(&text) {
        Ok(c) => (c, None),
        Err(e) => (FileConfig::default(), Some(format!("Failed to parse config file {}: {}", p.display(), e))),
    }
}

/// Everything the dispatcher and reporter need, fixed for the whole session.
#[derive(Clone, Debug)]
pub struct Settings {
    pub window: String,
    pub log_path: PathBuf,
    pub agent_pattern: Regex,
    pub color: bool,
}

impl Settings {
    pub fn build(window_arg: Option<String>, cfg: &FileConfig, started: DateTime<Local>, terminal_color: bool) -> anyhow::Result<Self> {
        let window = window_arg
            .or_else(|| cfg.default_window.clone())
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WINDOW.to_string());
        let dir = cfg.log_dir.clone().unwrap_or_else(std::env::temp_dir);
        let pattern = cfg.agent_pattern.as_deref().unwrap_or(DEFAULT_AGENT_PATTERN);
        let agent_pattern = Regex::new(pattern).with_context(|| format!("invalid agent_pattern {:?}", pattern))?;
        let color = if cfg.force_color.unwrap_or(false) { true } else { terminal_color && !cfg.no_color.unwrap_or(false) };
        Ok(Self { window, log_path: dir.join(session_log_name(started)), agent_pattern, color })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Local> { Local.with_ymd_and_hms(2026, 10, 16, 14, 3, 9).unwrap() }

    #[test]
    fn defaults_without_config() {
        let s = Settings::build(None, &FileConfig::default(), t0(), true).unwrap();
        assert_eq!(s.window, "30m");
        assert_eq!(s.agent_pattern.as_str(), DEFAULT_AGENT_PATTERN);
        assert_eq!(s.log_path, std::env::temp_dir().join("macos_diagnostics_20261016_140309.log"));
        assert!(s.color);
    }

    #[test]
    fn argument_beats_config_window() {
        let cfg = parse_config("default_window = \"2h\"").unwrap();
        assert_eq!(Settings::build(None, &cfg, t0(), false).unwrap().window, "2h");
        assert_eq!(Settings::build(Some("24h".into()), &cfg, t0(), false).unwrap().window, "24h");
    }

    #[test]
    fn window_passes_through_uninterpreted() {
        let s = Settings::build(Some("banana".into()), &FileConfig::default(), t0(), false).unwrap();
        assert_eq!(s.window, "banana");
    }

    #[test]
    fn color_overrides() {
        let cfg = parse_config("no_color = true").unwrap();
        assert!(!Settings::build(None, &cfg, t0(), true).unwrap().color);
        let cfg = parse_config("force_color = true").unwrap();
        assert!(Settings::build(None, &cfg, t0(), false).unwrap().color);
    }

    #[test]
    fn full_file_parses() {
        let cfg = parse_config("default_window = \"1h\"\nlog_dir = \"/var/tmp\"\nagent_pattern = \"mds|mdworker\"\nlog_level = \"debug\"\nlog_format = \"json\"\n").unwrap();
        assert_eq!(cfg.log_level, Some(LogLevel::Debug));
        assert_eq!(cfg.log_format, Some(LogFormat::Json));
        let s = Settings::build(None, &cfg, t0(), false).unwrap();
        assert!(s.log_path.starts_with("/var/tmp"));
        assert!(s.agent_pattern.is_match("/usr/libexec/mdworker_shared"));
    }

    #[test]
    fn bad_pattern_is_fatal() {
        let cfg = parse_config("agent_pattern = \"bz(serv\"").unwrap();
        assert!(Settings::build(None, &cfg, t0(), false).is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(parse_config("colour = true").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, warning) = load_config(Some(&dir.path().join("absent.toml")));
        assert!(cfg.default_window.is_none());
        assert!(warning.is_none());
    }

    #[test]
    fn unparseable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.toml");
        std::fs::write(&p, "default_window = [").unwrap();
        let (cfg, warning) = load_config(Some(&p));
        assert!(cfg.agent_pattern.is_none());
        assert!(warning.unwrap().starts_with("Failed to parse config file"));
    }
}
