use assistant_bot::app::console::StdConsole;
use assistant_bot::utils::{logger, validation::Validate};
use assistant_bot::{
    AppContext, AssistantError, CliConfig, CommandRegistry, DataStore, LocalStorage, Repl,
    Settings, TomlConfig,
};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting assistant-bot");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Settings: {:?}", settings);

    let store = DataStore::new(
        LocalStorage::new(&settings.data_dir),
        settings.contacts_file.clone(),
        settings.notes_file.clone(),
    );
    let mut console = StdConsole::new(settings.typing_delay_ms);
    let mut ctx = match AppContext::load(store, settings).await {
        Ok(ctx) => ctx,
        Err(e) => exit_with(&e),
    };

    let repl = Repl::new(CommandRegistry::with_defaults());
    if let Err(e) = repl.run(&mut ctx, &mut console).await {
        exit_with(&e);
    }

    tracing::info!("assistant-bot finished");
    Ok(())
}

/// `--config` 指定時以 TOML 為準，否則使用命令列參數
fn load_settings(cli: &CliConfig) -> assistant_bot::Result<Settings> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Ok(Settings::from_provider(&config))
        }
        None => {
            cli.validate()?;
            Ok(Settings::from_provider(cli))
        }
    }
}

fn exit_with(e: &AssistantError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
