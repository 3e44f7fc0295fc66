//! Splitflow gateway entry point.
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌────────────┐    ┌──────────┐
//! │ Receipts │───▶│ Extraction│───▶│ Allocation │───▶│  Ledger  │
//! │ (upload) │    │  service  │    │  session   │    │ (expense)│
//! └──────────┘    └───────────┘    └────────────┘    └──────────┘
//! ```

use splitflow::config::AppConfig;
use splitflow::gateway;
use splitflow::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!("splitflow starting (env: {})", env);
    gateway::run_server(&config).await;

    Ok(())
}
