use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, info_span, Instrument};
use crate::state::AppState;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background sweeper...");

    loop {
        sweep_once(&state)
            .instrument(info_span!("background_sweep"))
            .await;
        sleep(SWEEP_INTERVAL).await;
    }
}

pub async fn sweep_once(state: &AppState) {
    match state.verification.purge_expired().await {
        Ok(0) => debug!("No expired verification codes"),
        Ok(removed) => info!(removed, "Purged expired verification codes"),
        Err(e) => error!("Failed to purge verification codes: {:?}", e),
    }
}
