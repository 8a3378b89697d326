//! rdap-viewer
//!
//! 查询域名注册数据（RDAP）并输出为纯文本报告。
//!
//! main.rs 依次：
//!     解析参数            // cli.rs
//!     初始化日志          // logging.rs（stderr，stdout 只输出报告）
//!     加载配置            // config.rs（文件 + 命令行覆盖）
//!     执行子命令          // app.rs

mod app;
mod cli;
mod config;
mod logging;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rdap_viewer_toolbox::{FileExporter, LookupSession, RdapClient};

use cli::{Cli, Commands, ConfigAction};
use config::{AppConfig, ConfigService, LocalConfigService};

async fn run(cli: Cli) -> Result<()> {
    let service = LocalConfigService::resolve(cli.config.as_deref())?;

    match &cli.command {
        Commands::Lookup(args) => {
            let mut config = service.load()?;
            args.connection.apply_to(&mut config);
            let client = RdapClient::new(&config.client_options())?;
            tracing::info!("Querying {} via {}", args.domain.trim(), client.endpoint());

            let mut stdout = std::io::stdout().lock();
            if let Some(path) = app::lookup(&client, &config, args, &mut stdout).await? {
                eprintln!("Saved {}", path.display());
            }
        }
        Commands::Interactive(overrides) => {
            let mut config = service.load()?;
            overrides.apply_to(&mut config);
            let client = RdapClient::new(&config.client_options())?;
            let exporter = FileExporter::new(&config.output_dir);
            let mut session = LookupSession::new(config.format_options());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());

            app::interactive(
                &client,
                &mut session,
                &exporter,
                stdin,
                &mut std::io::stdout(),
            )
            .await?;
        }
        Commands::Config { action } => {
            // A broken file must not block `config init --force`.
            let config = match action {
                ConfigAction::Show => service.load()?,
                ConfigAction::Path | ConfigAction::Init { .. } => AppConfig::default(),
            };
            app::config_command(&service, &config, action, &mut std::io::stdout())?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
