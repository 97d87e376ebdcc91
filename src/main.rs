use clap::Parser;
use strictapi::cli::{run_cli, Cli};
use strictapi::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Command output shares stdout with the log writer; stay quiet unless asked.
    let mut log_config = LogConfig::from_env();
    log_config.async_logging = false;
    if std::env::var_os("STRICTAPI_LOG_LEVEL").is_none() {
        log_config.log_level = "warn".to_string();
    }
    let _guard = init_logging_with_config(&log_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_cli(cli, &mut out)
}
