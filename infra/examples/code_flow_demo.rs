//! Send and verify a code against the configured backend
//!
//! Usage: cargo run --example code_flow_demo -- <phone> [code]
//!
//! Without `code` a new code is sent; with it the code is verified.

use re_infra::initialize;
use re_shared::config::AppConfig;
use re_shared::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let mut args = std::env::args().skip(1);
    let phone = args.next().unwrap_or_else(|| "13800001234".to_string());

    let services = initialize(&config).await?;
    let worker = services.start_retry_worker();

    match args.next() {
        Some(code) => {
            let matched = services.code_service.verify("login", &phone, &code).await?;
            println!("code matched: {}", matched);
        }
        None => {
            services.code_service.send("login", &phone).await?;
            println!("code sent through {}", services.gateway.provider_name());
        }
    }

    if let Some(handle) = worker {
        handle.shutdown().await;
    }
    Ok(())
}
