use std::sync::Arc;

use brewledger_core::parse_date;
use brewledger_events::{EntryDraft, EntryKind};
use brewledger_infra::{FileBlobStore, LedgerStore};
use brewledger_inventory::SnapshotPolicy;
use brewledger_tracker::LedgerSession;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

async fn file_session(
    dir: &std::path::Path,
    policy: SnapshotPolicy,
) -> LedgerSession<FileBlobStore> {
    let store = Arc::new(LedgerStore::new(FileBlobStore::new(dir)));
    LedgerSession::open(store, policy).await
}

#[tokio::test]
async fn full_crafting_cycle_statistics() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = file_session(tmp.path(), SnapshotPolicy::Replay).await;

    let day = parse_date("2024-06-01").unwrap();
    for (kind, qty, price) in [
        ("material_purchase", "40", "10"),
        ("material_gathered", "12", "0"),
        ("component_purchase", "10", "4"),
        ("product_sale", "10", "44"),
    ] {
        let kind: EntryKind = serde_json::from_value(serde_json::json!(kind)).unwrap();
        let draft = EntryDraft::parse(kind, qty, price).unwrap().at(day);
        session.record(draft).unwrap();
    }

    let stats = session.statistics();
    assert!(close(stats.total_material_spend, 400.0));
    assert!(close(stats.total_component_spend, 40.0));
    assert!(close(stats.total_revenue_after_tax, 418.0));
    assert!(close(stats.net_profit, -22.0));
    assert_eq!(stats.units_produced_from_purchased, 10);
    assert_eq!(stats.units_produced_from_gathered, 3);
    assert!(close(stats.average_material_unit_cost, 400.0 / 52.0));
    assert!(close(stats.average_product_unit_price_after_tax, 41.8));

    let report = session.report();
    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.entries[0].kind, EntryKind::ProductSale);
    assert_eq!(report.stock_history.len(), 1);
    assert_eq!(report.current_stock, 0);
}

#[tokio::test]
async fn purchase_component_sale_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let mut session = file_session(tmp.path(), SnapshotPolicy::Replay).await;

    session.record(EntryDraft::new(EntryKind::MaterialPurchase, 40, 10.0)).unwrap();
    session.record(EntryDraft::new(EntryKind::ComponentPurchase, 10, 4.0)).unwrap();
    session.record(EntryDraft::new(EntryKind::ProductSale, 8, 44.0)).unwrap();

    let stats = session.statistics();
    assert!(close(stats.total_material_spend, 400.0));
    assert!(close(stats.total_component_spend, 40.0));
    assert!(close(stats.total_revenue_after_tax, 334.4));
    assert!(close(stats.net_profit, -105.6));
    assert_eq!(stats.units_produced_from_purchased, 10);
    assert_eq!(stats.units_produced_from_gathered, 0);
}

#[tokio::test]
async fn ledger_survives_reopen_from_disk() {
    let tmp = tempfile::tempdir().unwrap();

    let (entries, snapshots, stats) = {
        let mut session = file_session(tmp.path(), SnapshotPolicy::Replay).await;
        let first = session
            .record(EntryDraft::new(EntryKind::ProductSale, 2, 44.0))
            .unwrap();
        session
            .record(EntryDraft::new(EntryKind::ProductSale, 1, 40.0))
            .unwrap();
        session
            .record(EntryDraft::new(EntryKind::MaterialPurchase, 8, 9.5))
            .unwrap();
        session.remove(first.id());
        session.flush().await;
        (
            session.state().entries().to_vec(),
            session.state().snapshots().to_vec(),
            session.statistics(),
        )
    };

    let reopened = file_session(tmp.path(), SnapshotPolicy::Replay).await;
    assert_eq!(reopened.state().entries(), entries.as_slice());
    assert_eq!(reopened.state().snapshots(), snapshots.as_slice());
    assert_eq!(reopened.statistics(), stats);
    assert_eq!(reopened.state().snapshots().len(), 1);
}

#[tokio::test]
async fn legacy_blobs_load() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("ledger_entries.json"),
        r#"[{"id":"1","type":"fish_purchase","quantity":4,"costPerUnit":10,"timestamp":1700000000000},
            {"id":"2","type":"potion_sale","quantity":1,"costPerUnit":44,"timestamp":1700000001000}]"#,
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("inventory_snapshots.json"),
        r#"[{"timestamp":1700000001000,"potions":0}]"#,
    )
    .unwrap();

    let session = file_session(tmp.path(), SnapshotPolicy::AppendOnly).await;
    assert_eq!(session.state().len(), 2);
    assert_eq!(session.state().snapshots().len(), 1);
    assert!(close(session.statistics().total_material_spend, 40.0));
}

#[tokio::test]
async fn legacy_newest_first_ledger_replays_in_recording_order() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("@fap_transactions.json"),
        r#"[{"id":"2","type":"potion_sale","quantity":1,"costPerUnit":44,"timestamp":2000},
            {"id":"1","type":"potion_sale","quantity":1,"costPerUnit":44,"timestamp":1000}]"#,
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("@fap_stock_history.json"),
        r#"[{"timestamp":1000,"potions":0},{"timestamp":2000,"potions":0}]"#,
    )
    .unwrap();

    let session = file_session(tmp.path(), SnapshotPolicy::Replay).await;

    let times: Vec<_> = session
        .state()
        .snapshots()
        .iter()
        .map(|s| s.timestamp.timestamp_millis())
        .collect();
    assert_eq!(times, vec![1_000, 2_000]);

    let report = session.report();
    assert_eq!(report.entries[0].id, "2");
    assert_eq!(report.entries[1].id, "1");
}
