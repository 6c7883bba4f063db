use app_calorie::utils::{logger, validation::Validate};
use app_calorie::{
    AppConfig, CaptureOutcome, CliConfig, Command, FilePhotoSource, FoodTable,
    PhotoAnalysisClient, RowStoreGateway, TableSession,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match AppConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let gateway = RowStoreGateway::from_config(&config.database)?;
    let analyzer = PhotoAnalysisClient::from_config(&config.analysis)?;
    let mut session = TableSession::new(gateway, analyzer);

    if let Err(e) = session.load().await {
        eprintln!("⚠️  Could not load stored rows: {}", e);
    }

    let json = match cli.command {
        Command::List { json } => json,
        Command::Analyze { photo, json } => {
            let source = FilePhotoSource::new(config.app_data_dir()).with_photo(photo);
            match session.capture_and_analyze(&source).await {
                CaptureOutcome::Appended(row) => {
                    tracing::info!("Added '{}' ({} kcal)", row.food_item, row.total_calorie);
                }
                CaptureOutcome::Unsupported => {
                    eprintln!("OOPS: {}", app_calorie::core::session::UNSUPPORTED_DEVICE_MESSAGE);
                }
                CaptureOutcome::Cancelled => {
                    tracing::info!("No photo selected");
                }
                CaptureOutcome::Failed(e) => {
                    eprintln!("⚠️  Photo analysis failed: {}", e);
                }
            }
            json
        }
    };

    print_table(session.table(), json)?;
    Ok(())
}

fn print_table(table: &FoodTable, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        println!("{}", table.render_text());
    }
    Ok(())
}
