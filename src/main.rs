use clap::Parser;
use log::{error, info};

use address_monitor::blockchain::{AddressMonitor, EnvAddressSource, MonitorSettings, RpcClient};
use address_monitor::cli::Cli;
use address_monitor::config::{AppConfig, RPC_URL_VAR};
use address_monitor::error::ConfigError;
use address_monitor::logging::init_logging;
use address_monitor::output::EventPrinter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.sample_config {
        print!("{}", AppConfig::generate_sample_config()?);
        return Ok(());
    }

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(ConfigError::MissingEnvVar(var)) if var == RPC_URL_VAR => {
            eprintln!(
                "Error: set {} environment variable (e.g. https://mainnet.infura.io/v3/YOUR_KEY)",
                RPC_URL_VAR
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config.logging.level)?;

    let reader = RpcClient::new_with_config(config.rpc.endpoint.clone(), config.rpc.timeout_seconds)?;
    let source = EnvAddressSource::new(&config.monitor.address_env_var, config.monitor.address.clone());
    let settings = MonitorSettings::from_config(&config);

    let mut printer = EventPrinter::stdout();
    printer.print_line("Address monitor running...")?;

    let mut monitor = match AddressMonitor::initialize(reader, source, settings).await {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Could not read the current block height: {}", e);
            eprintln!("Error: could not read the current block height from {}: {}", config.rpc.endpoint, e);
            std::process::exit(1);
        }
    };

    if cli.once {
        let summary = monitor.run_cycle().await;
        printer.print_all(&summary.events)?;
        return Ok(());
    }

    let last_height = monitor.run(&mut printer, shutdown_signal()).await;
    info!("Stopped after scanning up to block {}", last_height);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
