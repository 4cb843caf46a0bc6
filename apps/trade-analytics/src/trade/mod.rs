//! Trade records and their lifecycle.
//!
//! A [`TradeRecord`] is what the journal stores. [`TradeEnricher`] turns it
//! into a [`Trade`], which is either open (no P&L) or closed (P&L and outcome
//! known). Only [`ClosedTrade`] values can reach the statistics aggregator.

mod enrich;
mod types;

pub use enrich::TradeEnricher;
pub use types::{
    AssetType, ClosedTrade, Direction, EnrichedTrade, OpenTrade, Outcome, Trade, TradeId,
    TradeRecord,
};
