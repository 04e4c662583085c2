use clap::Parser;
use daily_sales_reporter::utils::{logger, validation::Validate};
use daily_sales_reporter::{
    AzureOpenAiClient, AzureOpenAiConfig, ChatAgent, CliConfig, LocalStorage, ReportEngine,
    ReportError, SalesReportPipeline,
};
use std::sync::Arc;

fn fail(e: &ReportError) -> ! {
    tracing::error!(
        "❌ Daily sales report failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    // .env 不存在時沿用既有環境變數
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting daily-sales-reporter");
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 先驗證所有設定，再做任何檔案或網路 I/O
    if let Err(e) = config.validate() {
        fail(&e);
    }
    let azure = match AzureOpenAiConfig::from_env() {
        Ok(azure) => azure,
        Err(e) => fail(&e),
    };
    tracing::debug!("Azure config: {:?}", azure);

    if config.monitor {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let prompt = config.prompt();
    let monitor_enabled = config.monitor;

    let writer = ChatAgent::report_writer(Arc::new(AzureOpenAiClient::new(azure)));
    let pipeline = SalesReportPipeline::new(LocalStorage::default(), config, writer);
    let engine = ReportEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run(&prompt).await {
        Ok(output) => {
            tracing::info!("✅ Report workflow completed");
            print!("{}", output.conversation.render());
            if let Some(path) = output.saved_to {
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => fail(&e),
    }
}
