//! Tutor Lambda - serves the tutoring API behind API Gateway.
//!
//! Rate limit counters live in the execution environment, so each warm
//! instance enforces the limit independently.

use api_gateway::build_router;
use lambda_http::{run, Error};
use shared::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let gateway = shared::gateway::connect(&config).await?;
    let router = build_router(gateway, &config)?;

    run(router).await
}
