//! 日志初始化
//!
//! Logs go to stderr so stdout carries only the report. `RUST_LOG` wins over the
//! `-v`/`-q` flags. `log` records from the toolbox are forwarded into `tracing`.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the given flags.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let initialized = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(verbose > 1)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(filter)
        .try_init();

    if let Err(e) = initialized {
        eprintln!("Failed to initialize logging: {e}");
    }
}
