use anyhow::Context;
use is_terminal::IsTerminal;
use chrono::Local;
use clap::Parser;
mod categories;
mod config;
mod dispatch;
mod macos_live;
mod memory;
mod menu;
mod process_list;
mod session_log;
mod tools;
#[cfg(test)]
mod fake_host;

use config::{FileConfig, LogFormat, LogLevel, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "mactriage",
    version,
    about = "Interactive macOS log triage for misbehaving background daemons",
    long_about = "Interactive menu of canned `log show` queries for Spotlight, Time Machine, memory pressure and backup agents. Everything shown is also appended to a timestamped session log in the temp directory.",
    after_long_help = "Examples:\n  mactriage\n  mactriage 1h\n  mactriage 24h\n\nConfig: ./mactriage.toml or $MACTRIAGE_CONFIG (default_window, log_dir, agent_pattern, log_level, log_format, no_color, force_color)"
)]
struct Args {
    /// Relative time window handed to `log show --last` (e.g. 30m, 1h, 24h)
    #[arg(value_name = "WINDOW", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    window: Option<String>,
}

fn init_logger(cfg: &FileConfig) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(lvl) = cfg.log_level {
        let f = match lvl { LogLevel::Error => log::LevelFilter::Error, LogLevel::Warn => log::LevelFilter::Warn, LogLevel::Info => log::LevelFilter::Info, LogLevel::Debug => log::LevelFilter::Debug, LogLevel::Trace => log::LevelFilter::Trace };
        builder.filter_level(f);
    }
    match cfg.log_format.unwrap_or(LogFormat::Text) {
        LogFormat::Json => {
            builder.format(|buf, record| {
                use std::io::Write;
                let obj = serde_json::json!({
                    "ts": Local::now().to_rfc3339(),
                    "level": record.level().to_string(),
                    "target": record.target(),
                    "msg": record.args().to_string(),
                });
                writeln!(buf, "{}", obj)
            });
        }
        LogFormat::Text => {
            builder.format(|buf, record| {
                use std::io::Write;
                writeln!(buf, "[{:<5} {}] {}", record.level(), Local::now().format("%H:%M:%S"), record.args())
            });
        }
    }
    builder.target(env_logger::Target::Stderr);
    builder.init();
}

fn terminal_color() -> bool {
    let term = std::env::var("TERM").unwrap_or_default();
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none() && term != "dumb"
}

fn drive<H: tools::HostTools, W: std::io::Write, S: menu::SelectionSource>(session: &mut menu::Session<'_, H, W>, source: &mut S) -> anyhow::Result<()> {
    let outcomes = session.run(source).context("interactive session failed")?;
    log::info!("session ended after {} selections", outcomes.len());
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let started = Local::now();
    let (cfg, cfg_warning) = config::load_config(None);
    init_logger(&cfg);
    if let Some(w) = cfg_warning { log::warn!("{}", w); }
    let settings = Settings::build(args.window, &cfg, started, terminal_color())?;
    let log = session_log::SessionLog::open(&settings.log_path)
        .with_context(|| format!("cannot create session log {}", settings.log_path.display()))?;
    log::info!("session log {} window {}", settings.log_path.display(), settings.window);
    let mut out = session_log::Tee::new(std::io::stdout().lock(), log, settings.color);
    out.marker(&format!("Session started {} | window: last {} | log: {}", started.format("%Y-%m-%d %H:%M:%S"), settings.window, settings.log_path.display()))
        .context("writing session header")?;
    let host = macos_live::MacHost;
    {
        let mut session = menu::Session::new(&host, &settings, out);
        let mut selections = menu::LineSelections::new(std::io::stdin().lock());
        drive(&mut session, &mut selections)?;
    }
    println!("Session log saved to {}", settings.log_path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("mactriage: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_optional_positional() {
        assert_eq!(Args::try_parse_from(["mactriage"]).unwrap().window, None);
        assert_eq!(Args::try_parse_from(["mactriage", "24h"]).unwrap().window.as_deref(), Some("24h"));
    }

    #[test]
    fn window_is_not_validated_beyond_empty() {
        assert_eq!(Args::try_parse_from(["mactriage", "7 fortnights"]).unwrap().window.as_deref(), Some("7 fortnights"));
        assert!(Args::try_parse_from(["mactriage", ""]).is_err());
    }

    #[test]
    fn no_flags_accepted() {
        assert!(Args::try_parse_from(["mactriage", "--last", "1h"]).is_err());
        assert!(Args::try_parse_from(["mactriage", "1h", "2h"]).is_err());
    }

    struct BrokenInput;

    impl menu::SelectionSource for BrokenInput {
        fn next_selection(&mut self) -> std::io::Result<Option<String>> { Err(std::io::Error::other("stdin went away")) }
    }

    #[test]
    fn input_failure_is_reported_as_session_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::build(None, &FileConfig::default(), Local::now(), false).unwrap();
        let log = session_log::SessionLog::open(&dir.path().join("s.log")).unwrap();
        let host = fake_host::FakeHost::default();
        let mut session = menu::Session::new(&host, &settings, session_log::Tee::new(Vec::new(), log, false));
        let err = drive(&mut session, &mut BrokenInput).unwrap_err();
        assert_eq!(format!("{:#}", err), "interactive session failed: stdin went away");
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
