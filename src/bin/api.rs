use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transaction_risk_analyzer::{
    api::start_server,
    config::AppConfig,
    ner::HuggingFaceNerClient,
    sources::SignalSources,
    TransactionAnalyzer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    if config.hf_api_token.is_none() {
        eprintln!("⚠️  HF_API_TOKEN not set; NER requests will be anonymous and rate limited");
    }

    info!("🚀 Transaction Risk Analyzer - API Server");
    info!("📍 Port: {}", config.port);
    info!("🧠 NER endpoint: {}", config.ner_api_url);

    // The extractor and sources are built once and shared by every request
    let extractor = Arc::new(HuggingFaceNerClient::from_config(&config)?);
    let sources = SignalSources::from_config(&config)?;
    let analyzer = Arc::new(TransactionAnalyzer::new(extractor, sources));

    info!("✅ Analyzer initialized");
    info!("📡 Starting API server...");

    start_server(analyzer, &config).await?;

    Ok(())
}
