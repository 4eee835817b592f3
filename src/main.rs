use clap::Parser;

use ascii_courier::cli::{self, Args, Command};
use ascii_courier::config::Config;

/// Load environment variables from .env file if present
fn load_env() {
    // Silently ignore if .env doesn't exist
    let _ = dotenv::dotenv();
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() {
    load_env();
    init_logging();

    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Convert(convert) => cli::run_convert(&config, &convert),
        Command::Serve => cli::run_serve(&config),
        Command::Sweep => cli::run_sweep(&config),
        Command::List => cli::run_list(&config),
        Command::Config { action } => {
            cli::handle_config_action(action, &config, args.config.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
