use std::sync::Arc;

use coi_static_server::{logger, server, AppState, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Validates the base directory before anything binds
    let state = Arc::new(AppState::new(cfg)?);

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let listener = server::bind(&state.config)?;
    logger::log_server_start(&listener.local_addr()?);

    server::serve(listener, state, server::shutdown_signal()).await;
    Ok(())
}
