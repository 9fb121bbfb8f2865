use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use bucket_bot::application::errors::BotError;
use bucket_bot::application::messaging::CommandDispatcher;
use bucket_bot::domain::traits::BucketStore;
use bucket_bot::infrastructure::adapters::console::ConsoleAdapter;
use bucket_bot::infrastructure::adapters::irc::IrcAdapter;
use bucket_bot::infrastructure::api;
use bucket_bot::infrastructure::config::Config;
use bucket_bot::infrastructure::scripts::LocalScripts;
use bucket_bot::infrastructure::storage::SqliteBucketStore;

#[derive(Parser)]
#[command(name = "bucket-bot")]
#[command(about = "A channel bot that serves quotes from named buckets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to IRC and serve the HTTP API
    Run,
    /// Read messages from stdin instead of IRC (dev mode)
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, false),
        Commands::Console => run_bot(&cli.config, true),
        Commands::Version => {
            println!("bucket-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

/// File names local scripts must never shadow
fn reserved_names(config: &Config, config_path: &str) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(name) = exe.file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
    }
    for path in [Path::new(config_path), config.storage.path.as_path()] {
        if let Some(name) = path.file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
    }
    names
}

fn run_bot(config_path: &str, console: bool) -> Result<(), BotError> {
    let config = load_config(config_path);
    config.validate()?;

    tracing::info!(
        "Starting bucket-bot as {} on {}",
        config.irc.nickname,
        config.irc.channel
    );

    let store = SqliteBucketStore::new(&config.storage.path);
    store.init()?;
    tracing::info!("Database initialized at {:?}", store.path());
    let store: Arc<dyn BucketStore> = Arc::new(store);

    let mut dispatcher = CommandDispatcher::new(config.dispatch_settings(), Arc::clone(&store));
    if config.bot.local_scripts.enabled {
        let scripts = LocalScripts::new(&config.bot.local_scripts.directory)
            .with_reserved(reserved_names(&config, config_path));
        tracing::info!("Local scripts enabled in {:?}", config.bot.local_scripts.directory);
        dispatcher = dispatcher.with_scripts(Arc::new(scripts));
    }
    let dispatcher = Arc::new(dispatcher);

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;

    rt.block_on(async move {
        if config.api.enabled {
            let bind = config.api.bind.clone();
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                if let Err(e) = api::serve(store, &bind).await {
                    tracing::error!("HTTP API stopped: {}", e);
                }
            });
        }

        if console {
            Arc::new(ConsoleAdapter::new(config.irc.nickname.clone()))
                .run(dispatcher)
                .await
        } else {
            Arc::new(IrcAdapter::new(config.irc.clone()))
                .run(dispatcher)
                .await
        }
    })
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
