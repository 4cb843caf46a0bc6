//! Integration tests for enrichment and aggregation scenarios.
//!
//! Covers the worked examples of the journal's calculations end to end, from
//! raw `TradeRecord` through `PortfolioStatistics`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;
use trade_analytics::calc::{RiskRewardOutcome, calculate_risk_reward};
use trade_analytics::config::{AggregationPolicy, StatisticsConfig};
use trade_analytics::trade::{Direction, Outcome};
use trade_analytics::{
    ClosedTrade, ErrorCode, ProfitFactor, StatisticsAggregator, Trade, TradeEnricher, TradeRecord,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 14, 30, 0).unwrap()
}

fn close(record: TradeRecord) -> ClosedTrade {
    match TradeEnricher::default().enrich(record).unwrap() {
        Trade::Closed(t) => t,
        Trade::Open(_) => panic!("expected closed trade"),
    }
}

fn aggregator(policy: AggregationPolicy) -> StatisticsAggregator {
    StatisticsAggregator::new(StatisticsConfig {
        aggregation_policy: policy,
        ..StatisticsConfig::default()
    })
}

#[test]
fn scenario_a_long_winner() {
    let trade = close(
        TradeRecord::new("a", start(), Direction::Long, dec!(100), dec!(10)).with_exit(dec!(110)),
    );

    assert_eq!(trade.gross_pnl(), dec!(100));
    assert_eq!(trade.net_pnl(), dec!(100));
    assert_eq!(trade.pnl_percentage(), dec!(10));
    assert_eq!(trade.outcome(), Outcome::Win);
}

#[test]
fn scenario_b_short_winner_with_fees() {
    let trade = close(
        TradeRecord::new("b", start(), Direction::Short, dec!(100), dec!(5))
            .with_fees(dec!(2), dec!(2), Decimal::ZERO)
            .with_exit(dec!(90)),
    );

    assert_eq!(trade.gross_pnl(), dec!(50));
    assert_eq!(trade.net_pnl(), dec!(46));
    assert_eq!(trade.outcome(), Outcome::Win);
}

#[test]
fn scenario_c_win_then_loss() {
    let trades = vec![
        close(
            TradeRecord::new("c1", start(), Direction::Long, dec!(1000), dec!(1))
                .with_exit(dec!(1100)),
        ),
        close(
            TradeRecord::new("c2", start() + Duration::days(1), Direction::Long, dec!(1000), dec!(1))
                .with_exit(dec!(850)),
        ),
    ];

    let stats = aggregator(AggregationPolicy::Strict).aggregate(&trades).unwrap();

    assert_eq!(stats.total_net_profit, dec!(-50));
    assert_eq!(stats.win_rate, dec!(50));
    let ProfitFactor::Ratio(pf) = stats.profit_factor else {
        panic!("profit factor should be a ratio");
    };
    assert_eq!(pf.round_dp(3), dec!(0.667));
    assert_eq!(stats.max_drawdown, dec!(150));
}

#[test]
fn scenario_d_empty_list() {
    let stats = aggregator(AggregationPolicy::Strict).aggregate(&[]).unwrap();

    assert_eq!(stats.total_trades, 0);
    assert_eq!(stats.winning_trades, 0);
    assert_eq!(stats.losing_trades, 0);
    assert_eq!(stats.breakeven_trades, 0);
    assert_eq!(stats.win_rate, Decimal::ZERO);
    assert_eq!(stats.loss_rate, Decimal::ZERO);
    assert_eq!(stats.expectancy, Decimal::ZERO);
    assert_eq!(stats.max_drawdown, Decimal::ZERO);
    assert_eq!(stats.sharpe_ratio, Decimal::ZERO);
    assert_eq!(stats.sortino_ratio, Decimal::ZERO);
    assert_eq!(stats.profit_factor, ProfitFactor::NoData);
}

#[test]
fn scenario_e_risk_reward() {
    let outcome =
        calculate_risk_reward(dec!(100), Some(dec!(95)), Some(dec!(115)), Direction::Long).unwrap();
    assert!(matches!(outcome, RiskRewardOutcome::Defined(_)));
    assert_eq!(outcome.ratio(), Some(dec!(3)));
}

#[test_case(Direction::Long, dec!(110), Outcome::Win ; "long up")]
#[test_case(Direction::Long, dec!(90), Outcome::Loss ; "long down")]
#[test_case(Direction::Short, dec!(90), Outcome::Win ; "short down")]
#[test_case(Direction::Short, dec!(110), Outcome::Loss ; "short up")]
#[test_case(Direction::Long, dec!(100), Outcome::Breakeven ; "flat")]
fn direction_determines_outcome(direction: Direction, exit: Decimal, expected: Outcome) {
    let trade =
        close(TradeRecord::new("d", start(), direction, dec!(100), dec!(1)).with_exit(exit));
    assert_eq!(trade.outcome(), expected);
}

#[test]
fn open_trades_rejected_under_strict_policy() {
    let enricher = TradeEnricher::default();
    let trades = vec![
        enricher
            .enrich(TradeRecord::new("x", start(), Direction::Long, dec!(10), dec!(1)).with_exit(dec!(11)))
            .unwrap(),
        enricher
            .enrich(TradeRecord::new("y", start() + Duration::hours(1), Direction::Long, dec!(10), dec!(1)))
            .unwrap(),
    ];

    let err = aggregator(AggregationPolicy::Strict)
        .aggregate_trades(&trades)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PreconditionViolation);

    let stats = aggregator(AggregationPolicy::Lenient)
        .aggregate_trades(&trades)
        .unwrap();
    assert_eq!(stats.total_trades, 1);
    assert_eq!(stats.total_net_profit, dec!(1));
}

#[test]
fn edit_re_enrichment_changes_statistics() {
    let enricher = TradeEnricher::default();
    let record = TradeRecord::new("e", start(), Direction::Long, dec!(50), dec!(4));

    let Trade::Open(open) = enricher.enrich(record.clone()).unwrap() else {
        panic!("expected open trade");
    };
    let closed = enricher.close(open, dec!(55), dec!(1), Decimal::ZERO).unwrap();
    assert_eq!(closed.net_pnl(), dec!(19));

    // Editing the quantity re-derives every field
    let mut edited = closed.record().clone();
    edited.quantity = dec!(2);
    let Trade::Closed(reclosed) = enricher.enrich(edited).unwrap() else {
        panic!("expected closed trade");
    };
    assert_eq!(reclosed.net_pnl(), dec!(9));

    let before = aggregator(AggregationPolicy::Strict).aggregate(&[closed]).unwrap();
    let after = aggregator(AggregationPolicy::Strict).aggregate(&[reclosed]).unwrap();
    assert_eq!(before.total_net_profit, dec!(19));
    assert_eq!(after.total_net_profit, dec!(9));
}

#[test]
fn enriched_row_serializes_flat() {
    let trade = TradeEnricher::default()
        .enrich(
            TradeRecord::new("row", start(), Direction::Long, dec!(100), dec!(10))
                .with_levels(Some(dec!(95)), Some(dec!(115)))
                .with_exit(dec!(110)),
        )
        .unwrap();

    let json = serde_json::to_value(trade.to_enriched()).unwrap();
    assert_eq!(json["id"], "row");
    assert_eq!(json["outcome"], "win");
    assert_eq!(json["net_pnl"], "100");
    let ratio: Decimal = json["risk_reward_ratio"].as_str().unwrap().parse().unwrap();
    assert_eq!(ratio, dec!(3));
}

#[test]
fn records_deserialize_with_defaults() {
    let json = r#"[
        {"id": "j1", "trade_date": "2025-02-03T14:30:00Z", "direction": "long",
         "entry_price": "100", "exit_price": "110", "quantity": "10"},
        {"id": "j2", "trade_date": "2025-02-04T09:00:00Z", "direction": "short",
         "entry_price": 250.5, "quantity": 2, "asset_type": "crypto", "leverage": "5"}
    ]"#;
    let records: Vec<TradeRecord> = serde_json::from_str(json).unwrap();

    assert_eq!(records[0].leverage, Decimal::ONE);
    assert_eq!(records[0].entry_fee, Decimal::ZERO);
    assert!(records[1].is_open());
    assert_eq!(records[1].leverage, dec!(5));

    let trades = TradeEnricher::default().enrich_all(records).unwrap();
    assert_eq!(trades[0].outcome(), Outcome::Win);
    assert_eq!(trades[1].outcome(), Outcome::Open);
}

#[test]
fn oversized_position_rejected_not_panicking() {
    let record = TradeRecord::new(
        "whale",
        start(),
        Direction::Long,
        dec!(1000000000000000),
        dec!(1000000000000000),
    )
    .with_exit(dec!(1000000000000001));

    let err = TradeEnricher::default().enrich(record).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTradeInput);
}

#[test]
fn extreme_returns_aggregate_without_panicking() {
    let trades = vec![
        close(
            TradeRecord::new("tiny-entry", start(), Direction::Long, dec!(0.000001), dec!(1))
                .with_exit(dec!(1000000000000)),
        ),
        close(
            TradeRecord::new("wipeout", start() + Duration::days(1), Direction::Long, dec!(100), dec!(1))
                .with_exit(dec!(0.01)),
        ),
    ];

    let stats = aggregator(AggregationPolicy::Strict).aggregate(&trades).unwrap();
    assert_eq!(stats.total_trades, 2);
    assert_eq!(stats.sharpe_ratio, Decimal::ZERO);
}

#[test]
fn single_losing_trade_has_sortino() {
    let trade = close(
        TradeRecord::new("lone", start(), Direction::Long, dec!(100), dec!(1)).with_exit(dec!(90)),
    );
    let stats = aggregator(AggregationPolicy::Strict).aggregate(&[trade]).unwrap();

    assert_eq!(stats.sharpe_ratio, Decimal::ZERO);
    assert_eq!(stats.sortino_ratio.round_dp(8), dec!(-1));
}
