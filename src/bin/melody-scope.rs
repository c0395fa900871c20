mod commands;

use clap::Parser;
use commands::{execute_command, Commands};
use melody_scope::{ClientConfig, FavouritesStore, FileStorage, MelodyScopeClient};

/// Browse Last.fm albums and tracks and manage favourites
#[derive(Parser)]
#[command(
    name = "melody-scope",
    about = "Browse Last.fm albums and tracks and manage favourites",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let storage = match FileStorage::new() {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    };
    let mut store = FavouritesStore::load(storage);

    let config = ClientConfig::from_env();
    if args.verbose {
        println!("🔍 Verbose mode enabled");
        println!("📁 State directory: {}", store.storage().dir().display());
        println!("🌐 Endpoint: {}", config.base_url);
    }

    let client = MelodyScopeClient::new(Box::new(http_client::native::NativeClient::new()), config);

    if let Err(e) = execute_command(args.command, &client, &mut store).await {
        eprintln!("❌ Command failed: {e}");
        if e.kind() == melody_scope::ErrorKind::Configuration {
            eprintln!();
            eprintln!("Please set the following environment variable:");
            eprintln!("  {}=your_lastfm_api_key", melody_scope::config::API_KEY_ENV_VAR);
        }
        std::process::exit(1);
    }

    Ok(())
}
