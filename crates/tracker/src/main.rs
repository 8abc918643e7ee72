use std::sync::Arc;

use brewledger_infra::{LedgerStore, TrackerConfig};
use brewledger_tracker::LedgerSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brewledger_observability::init();

    let config = TrackerConfig::from_env();
    tracing::info!(
        data_dir = %config.data_dir.display(),
        store = ?config.store,
        policy = config.snapshot_policy.as_str(),
        "opening ledger"
    );

    let store = Arc::new(LedgerStore::new(config.blob_store()));
    let session = LedgerSession::open(store, config.snapshot_policy).await;

    let report = serde_json::to_string_pretty(&session.report())?;
    println!("{report}");
    Ok(())
}
