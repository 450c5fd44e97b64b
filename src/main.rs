//! energy-tracker entry point: CLI wiring, config loading and command dispatch.

use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use energy_tracker::cli::{self, Command};
use energy_tracker::config::AppConfig;
use energy_tracker::io::export::export_csv;
use energy_tracker::registry::Registry;
use energy_tracker::stats::{UsageStats, leaderboard};
use energy_tracker::store::JsonFileStore;

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
    let cfg = match path {
        Some(path) => AppConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        None => AppConfig::default(),
    };
    Ok(cfg)
}

fn run(command: Command, registry: Registry, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List { location } => {
            let devices = registry.list(location.as_deref());
            if devices.is_empty() {
                println!("no devices");
            }
            for device in &devices {
                println!("{device}");
            }
        }
        Command::Add(draft) => {
            let device = registry.add(draft)?;
            println!("added {}", device.name);
        }
        Command::Remove { name } => {
            registry.remove(&name)?;
            println!("removed {name}");
        }
        Command::Clear => {
            registry.clear()?;
            println!("cleared all devices");
        }
        Command::Stats => {
            let stats = UsageStats::from_devices(&registry.snapshot(), config.pricing.rate_per_kwh);
            println!("{stats}");
        }
        Command::Leaderboard => {
            for entry in leaderboard(&registry.snapshot()) {
                println!("{:>3}. {entry}", entry.rank);
            }
        }
        Command::Export { out } => {
            export_csv(&registry.snapshot(), &out)?;
            eprintln!("Devices written to {}", out.display());
        }
        #[cfg(feature = "api")]
        Command::Serve { bind } => {
            use std::sync::Arc;

            let mut config = config.clone();
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let addr = config.bind_addr()?;
            let state = Arc::new(energy_tracker::api::AppState {
                registry: Arc::new(registry),
                rate_per_kwh: config.pricing.rate_per_kwh,
            });
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(energy_tracker::api::serve(state, addr))?;
        }
        Command::Help => cli::print_usage(),
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            return ExitCode::FAILURE;
        }
    };
    if opts.command == Command::Help {
        cli::print_usage();
        return ExitCode::SUCCESS;
    }

    let mut config = match load_config(opts.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(store) = opts.store {
        config.store.path = store;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        return ExitCode::FAILURE;
    }

    init_logging(&config.logging.level);

    let registry = match Registry::open(JsonFileStore::new(&config.store.path)) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: cannot open device store: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(opts.command, registry, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
