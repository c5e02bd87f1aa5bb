use lambda_http::{run, service_fn, tracing, Error};
use paperworks_shared::{AppState, Config};
use std::sync::Arc;

mod http_handler;
use http_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let sdk_config = aws_config::load_from_env().await;
    tracing::info!(
        "⚙️ Cold start: table={}, bucket={}, region={}",
        config.table_name,
        config.bucket_name,
        config.region
    );

    let state = Arc::new(AppState::new(&sdk_config, config));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { function_handler(event, state).await }
    }))
    .await
}
