//! `wifibars`: Wi-Fi signal indicator for the terminal.
//!
//! Built on [ratatui](https://ratatui.rs). A [`SignalIndicator`] subscribes
//! to a signal source from `wifibars-core` (the kernel wireless table or a
//! demo sweep), shows the level as one of five bar icons, and reports each
//! level to a status-line observer.
//!
//! Logs are written to a file (default `/tmp/wifibars.log`) to avoid
//! corrupting the terminal UI.
//!
//! [`SignalIndicator`]: widgets::signal_indicator::SignalIndicator

mod action;
mod app;
mod component;
mod event;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wifibars_config::{Config, SourceKindSetting, TintSetting};
use wifibars_core::build_source;

use crate::app::App;
use crate::widgets::icons::{IconSet, resolve_tint};
use crate::widgets::signal_indicator::SignalIndicator;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Poll the kernel wireless status table
    Proc,
    /// Sweep through every level
    Demo,
}

impl From<SourceArg> for SourceKindSetting {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Proc => Self::Proc,
            SourceArg::Demo => Self::Demo,
        }
    }
}

/// Terminal Wi-Fi signal strength indicator.
#[derive(Parser, Debug)]
#[command(name = "wifibars", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long, env = "WIFIBARS_CONFIG")]
    config: Option<PathBuf>,

    /// Signal source
    #[arg(short = 's', long, value_enum)]
    source: Option<SourceArg>,

    /// Wireless interface to read (first listed when omitted)
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Icon tint: color name, #rrggbb, or 0xRRGGBB ("none" or 0 disables)
    #[arg(short = 't', long)]
    tint: Option<TintSetting>,

    /// Poll interval, e.g. "500ms" or "2s"
    #[arg(long, value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log file path (defaults to /tmp/wifibars.log)
    #[arg(long, default_value = "/tmp/wifibars.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. The returned guard flushes logs on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wifibars_tui={log_level},wifibars_core={log_level},wifibars_config={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wifibars.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file + environment, then CLI flags on top.
fn effective_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => wifibars_config::load_config_from(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => wifibars_config::load_config().wrap_err_with(|| {
            format!("loading {}", wifibars_config::config_path().display())
        })?,
    };

    if let Some(source) = cli.source {
        cfg.source.kind = source.into();
    }
    if let Some(interface) = &cli.interface {
        cfg.source.interface = Some(interface.clone());
    }
    if let Some(period) = cli.poll_interval {
        cfg.source.poll_interval_ms =
            u64::try_from(period.as_millis()).wrap_err("poll interval too large")?;
    }
    if let Some(tint) = &cli.tint {
        cfg.indicator.tint = Some(tint.clone());
    }
    Ok(cfg)
}

/// Build the indicator described by `cfg`.
fn build_indicator(cfg: &Config) -> Result<SignalIndicator> {
    let source = build_source(&cfg.source.to_source_config()?);
    let icons = Arc::new(IconSet::from_settings(cfg.indicator.glyphs.as_ref()));
    let tint = match &cfg.indicator.tint {
        Some(setting) => resolve_tint(setting)?,
        None => None,
    };
    debug!(icons = icons.len(), tinted = tint.is_some(), "indicator built");
    Ok(SignalIndicator::new(source, icons, tint))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let cfg = effective_config(&cli)?;
    if cli.print_config {
        print!("{}", wifibars_config::render_config(&cfg)?);
        return Ok(());
    }

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    info!(
        source = ?cfg.source.kind,
        interface = cfg.source.interface.as_deref().unwrap_or("(first listed)"),
        poll_interval_ms = cfg.source.poll_interval_ms,
        "starting wifibars"
    );

    let indicator = build_indicator(&cfg)?;
    App::new(indicator).run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn config_file(toml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn cli_flags_override_the_config_file() {
        let file = config_file("[source]\nkind = \"proc\"\npoll_interval_ms = 2000\n");
        let cli = Cli::try_parse_from([
            "wifibars",
            "--config",
            file.path().to_str().unwrap(),
            "--source",
            "demo",
            "--poll-interval",
            "500ms",
        ])
        .unwrap();

        let cfg = effective_config(&cli).unwrap();
        assert_eq!(cfg.source.kind, SourceKindSetting::Demo);
        assert_eq!(cfg.source.poll_interval_ms, 500);
    }

    #[test]
    fn zero_poll_interval_is_rejected_before_the_source_runs() {
        let file = config_file("[source]\nkind = \"demo\"\n");
        let cli = Cli::try_parse_from([
            "wifibars",
            "--config",
            file.path().to_str().unwrap(),
            "--poll-interval",
            "0s",
        ])
        .unwrap();

        let cfg = effective_config(&cli).unwrap();
        assert!(build_indicator(&cfg).is_err());
    }
}
