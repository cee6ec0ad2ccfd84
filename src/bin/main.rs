use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transaction_risk_analyzer::{
    config::AppConfig,
    ner::HuggingFaceNerClient,
    sources::SignalSources,
    TransactionAnalyzer, TransactionRequest,
};

/// Analyze one transaction description and print the result as JSON
#[derive(Parser, Debug)]
#[command(name = "risk-analyze", version)]
struct Cli {
    /// Free-text transaction description
    details: String,

    /// Identifier echoed back in the result
    #[arg(short, long)]
    transaction_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let extractor = Arc::new(HuggingFaceNerClient::from_config(&config)?);
    let sources = SignalSources::from_config(&config)?;
    let analyzer = TransactionAnalyzer::new(extractor, sources);

    info!(transaction_id = ?cli.transaction_id, "Running analysis");

    let request = TransactionRequest {
        transaction_id: cli.transaction_id,
        details: cli.details,
    };

    match analyzer.analyze(request).await {
        Ok(analysis) => {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
