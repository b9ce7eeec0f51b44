use std::sync::Arc;

use matchbook::config::InstrumentConfig;
use matchbook::sink::MemorySink;
use matchbook::{EngineError, EventSink, MatchingEngine, Side};

const INSTRUMENT: u64 = 1;

fn instrument(id: u64) -> InstrumentConfig {
    InstrumentConfig {
        instrument_id: id,
        min_price: 1,
        max_price: 1000,
    }
}

fn engine() -> (MatchingEngine, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let engine = MatchingEngine::new(
        vec![instrument(INSTRUMENT)],
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );
    (engine, sink)
}

#[test]
fn no_cross_preserves_both_orders() {
    let (engine, sink) = engine();
    engine.add_order(Side::Buy, INSTRUMENT, 5, 50).unwrap();
    engine.add_order(Side::Sell, INSTRUMENT, 5, 60).unwrap();

    engine.match_instrument(INSTRUMENT).unwrap();

    assert!(sink.trades().is_empty());
    let snapshot = engine.snapshot(INSTRUMENT).unwrap();
    assert_eq!(snapshot.best_bid, Some((50, 5)));
    assert_eq!(snapshot.best_ask, Some((60, 5)));
}

#[test]
fn full_cross_empties_book_at_bid_price() {
    let (engine, sink) = engine();
    let bid_id = engine.add_order(Side::Buy, INSTRUMENT, 10, 100).unwrap();
    let ask_id = engine.add_order(Side::Sell, INSTRUMENT, 10, 90).unwrap();

    engine.match_instrument(INSTRUMENT).unwrap();

    let trades = sink.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 10);
    assert_eq!(trades[0].price, 100);
    assert_eq!(trades[0].bid_order_id, bid_id);
    assert_eq!(trades[0].ask_order_id, ask_id);

    let snapshot = engine.snapshot(INSTRUMENT).unwrap();
    assert_eq!(snapshot.bid_depth + snapshot.ask_depth, 0);
    assert_eq!(snapshot.best_bid, None);
    assert_eq!(snapshot.best_ask, None);
}

#[test]
fn partial_fill_leaves_remainder_resting() {
    let (engine, sink) = engine();
    engine.add_order(Side::Buy, INSTRUMENT, 10, 100).unwrap();
    engine.add_order(Side::Sell, INSTRUMENT, 4, 100).unwrap();

    engine.match_instrument(INSTRUMENT).unwrap();

    let trades = sink.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, 4);
    assert_eq!(trades[0].price, 100);

    let snapshot = engine.snapshot(INSTRUMENT).unwrap();
    assert_eq!(snapshot.best_bid, Some((100, 6)));
    assert_eq!(snapshot.best_ask, None);
    assert_eq!(snapshot.ask_depth, 0);
}

#[test]
fn match_is_idempotent_on_drained_book() {
    let (engine, sink) = engine();
    engine.add_order(Side::Buy, INSTRUMENT, 10, 100).unwrap();
    engine.add_order(Side::Sell, INSTRUMENT, 4, 100).unwrap();
    engine.match_instrument(INSTRUMENT).unwrap();

    let trades_before = sink.trades().len();
    let snapshot_before = engine.snapshot(INSTRUMENT).unwrap();

    engine.match_instrument(INSTRUMENT).unwrap();

    assert_eq!(sink.trades().len(), trades_before);
    assert_eq!(engine.snapshot(INSTRUMENT).unwrap(), snapshot_before);
}

#[test]
fn selection_prefers_price_then_arrival() {
    let (engine, sink) = engine();
    let low = engine.add_order(Side::Buy, INSTRUMENT, 5, 80).unwrap();
    let first_at_95 = engine.add_order(Side::Buy, INSTRUMENT, 5, 95).unwrap();
    let second_at_95 = engine.add_order(Side::Buy, INSTRUMENT, 5, 95).unwrap();

    engine.add_order(Side::Sell, INSTRUMENT, 5, 95).unwrap();
    engine.match_instrument(INSTRUMENT).unwrap();
    engine.add_order(Side::Sell, INSTRUMENT, 5, 95).unwrap();
    engine.match_instrument(INSTRUMENT).unwrap();
    engine.add_order(Side::Sell, INSTRUMENT, 5, 80).unwrap();
    engine.match_instrument(INSTRUMENT).unwrap();

    let filled: Vec<u64> = sink.trades().iter().map(|trade| trade.bid_order_id).collect();
    assert_eq!(filled, vec![first_at_95, second_at_95, low]);

    let snapshot = engine.snapshot(INSTRUMENT).unwrap();
    assert_eq!(snapshot.bid_depth + snapshot.ask_depth, 0);
}

#[test]
fn taker_sweeps_levels_best_first() {
    let (engine, sink) = engine();
    let near = engine.add_order(Side::Sell, INSTRUMENT, 3, 90).unwrap();
    let far = engine.add_order(Side::Sell, INSTRUMENT, 4, 95).unwrap();
    engine.add_order(Side::Buy, INSTRUMENT, 10, 100).unwrap();

    engine.match_instrument(INSTRUMENT).unwrap();

    let trades = sink.trades();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].ask_order_id, near);
    assert_eq!(trades[0].quantity, 3);
    assert_eq!(trades[1].ask_order_id, far);
    assert_eq!(trades[1].quantity, 4);
    // Both prints carry the resting bid's price.
    assert!(trades.iter().all(|trade| trade.price == 100));

    let snapshot = engine.snapshot(INSTRUMENT).unwrap();
    assert_eq!(snapshot.best_bid, Some((100, 3)));
    assert_eq!(snapshot.best_ask, None);
}

#[test]
fn unknown_instrument_is_rejected() {
    let (engine, _sink) = engine();
    assert_eq!(
        engine.add_order(Side::Buy, 99, 1, 10),
        Err(EngineError::UnknownInstrument(99)),
    );
    assert_eq!(
        engine.match_instrument(99),
        Err(EngineError::UnknownInstrument(99)),
    );
}

#[test]
fn instruments_match_independently() {
    let sink = Arc::new(MemorySink::new());
    let engine = MatchingEngine::new(
        vec![instrument(1), instrument(2)],
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );

    engine.add_order(Side::Buy, 1, 5, 100).unwrap();
    engine.add_order(Side::Sell, 1, 5, 90).unwrap();
    engine.add_order(Side::Buy, 2, 5, 100).unwrap();

    engine.match_instrument(1).unwrap();

    let trades = sink.trades();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].instrument_id, 1);
    assert_eq!(engine.snapshot(2).unwrap().best_bid, Some((100, 5)));
}
