//! Replays order files from disk through fresh engines

use crossbook_runner::{Bootstrap, EngineConfig, RunnerError, load_orders, render_book, replay};
use rust_decimal_macros::dec;
use std::path::PathBuf;

const SWEEP: &str = r#"{ "orders": [
    { "order_id": "B1", "trader_id": "T1", "symbol": "AAPL", "price": 150.0, "quantity": 100, "is_buy": true },
    { "order_id": "B2", "trader_id": "T2", "symbol": "AAPL", "price": 151.0, "quantity": 50, "is_buy": true },
    { "order_id": "S1", "trader_id": "T3", "symbol": "AAPL", "price": 149.0, "quantity": 75, "is_buy": false },
    { "order_id": "S2", "trader_id": "T4", "symbol": "AAPL", "price": 150.0, "quantity": 50, "is_buy": false }
] }"#;

/// Write `content` to a file unique to this test
fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("crossbook-{}-{}.json", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_replay_sweep_from_file() {
    let _ = env_logger::try_init();
    let path = write_temp("sweep", SWEEP);
    let requests = load_orders(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    for shards in [1, 4] {
        let config = EngineConfig {
            shards,
            ..EngineConfig::default()
        };
        let boot = Bootstrap::new(config).unwrap();
        let summary = replay(boot.gateway.as_ref(), requests.clone());

        assert_eq!(summary.submitted(), 4);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.trades, 3);
        assert_eq!(summary.matched_quantity, 125);
        assert_eq!(summary.outcomes[2].1.matched_price, dec!(150.66666667));

        let book = boot.gateway.view(None);
        assert_eq!(book.total_bids, 1);
        assert_eq!(book.total_asks, 0);

        let table = render_book(&book);
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with("BUY"));
        assert!(row.contains("B1"));
        assert!(row.contains("150.00000000"));
        assert!(table.ends_with("bids: 1 (25 remaining)  asks: 0 (0 remaining)\n"));
    }
}

#[test]
fn test_render_orders_bids_then_asks_best_first() {
    let json = r#"{ "orders": [
        { "order_id": "A2", "trader_id": "T1", "symbol": "AAPL", "price": 103.0, "quantity": 1, "is_buy": false },
        { "order_id": "A1", "trader_id": "T1", "symbol": "AAPL", "price": 102.0, "quantity": 1, "is_buy": false },
        { "order_id": "B2", "trader_id": "T2", "symbol": "AAPL", "price": 99.0, "quantity": 1, "is_buy": true },
        { "order_id": "B1", "trader_id": "T2", "symbol": "AAPL", "price": 100.0, "quantity": 1, "is_buy": true }
    ] }"#;
    let path = write_temp("ladder", json);
    let requests = load_orders(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let boot = Bootstrap::new(EngineConfig::default()).unwrap();
    replay(boot.gateway.as_ref(), requests);

    let table = render_book(&boot.gateway.view(None));
    let ids: Vec<&str> = table
        .lines()
        .skip(1)
        .take(4)
        .map(|line| line.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(ids, ["B1", "B2", "A1", "A2"]);
}

#[test]
fn test_missing_order_file() {
    let err = load_orders("/definitely/not/here/orders.json").unwrap_err();
    assert!(matches!(err, RunnerError::OrderFile { .. }));
}
