use std::sync::Arc;

use pennypress::{config::Config, init_catalog, init_tracing, make_router, run_app};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_filter);

    let catalog = match init_catalog(&config).await {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            tracing::error!("Error: {:#}", error);
            std::process::exit(1);
        }
    };

    let router = make_router();
    match run_app(router, config.server_address(), catalog).await {
        Ok(_) => (),
        Err(error) => tracing::error!("Error: {:#}", error),
    }
}
