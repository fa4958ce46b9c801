use clap::Parser;
use crpt_api::utils::{logger, validation::Validate};
use crpt_api::{CliConfig, CrptApi, CrptError};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration failed: {}", e);
            exit_with(&e);
        }
    };

    logger::init_from_settings(&config.logging.level, config.logging.json, cli.verbose);
    tracing::info!("Starting crpt-api CLI");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        exit_with(&e);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Document submission failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }
}

async fn run(cli: &CliConfig, config: &crpt_api::ClientConfig) -> crpt_api::Result<()> {
    let document = cli.load_document()?;
    let signature = cli.signature()?;
    let api = CrptApi::from_config(config)?;

    let responses = api.create_documents(&document, signature, cli.repeat).await?;
    for response in &responses {
        println!("{}", response);
    }

    api.shutdown();
    tracing::info!("✅ {} document(s) submitted", cli.repeat);
    Ok(())
}

fn exit_with(error: &CrptError) -> ! {
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
    std::process::exit(error.severity().exit_code());
}
