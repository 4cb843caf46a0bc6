//! Trade record and lifecycle types.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calc::{PnlBreakdown, TradeRiskReward};

/// Opaque trade identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    /// Create a new trade identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Profits when price rises.
    Long,
    /// Profits when price falls.
    Short,
}

/// Asset class of the traded instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Equities.
    #[default]
    Stock,
    /// Cryptocurrencies.
    Crypto,
    /// Currency pairs.
    Forex,
    /// Listed options.
    Options,
    /// Futures contracts.
    Futures,
    /// Physical commodities.
    Commodities,
    /// Fixed income.
    Bonds,
    /// Exchange-traded funds.
    Etf,
}

impl AssetType {
    /// Lowercase label as used in journal exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Crypto => "crypto",
            Self::Forex => "forex",
            Self::Options => "options",
            Self::Futures => "futures",
            Self::Commodities => "commodities",
            Self::Bonds => "bonds",
            Self::Etf => "etf",
        }
    }
}

/// Categorical result of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Net P&L above zero.
    Win,
    /// Net P&L below zero.
    Loss,
    /// Net P&L exactly zero.
    Breakeven,
    /// No exit price yet.
    Open,
}

const fn default_leverage() -> Decimal {
    Decimal::ONE
}

/// One logged trade as supplied by the journal.
///
/// This is the inbound shape: it carries no derived values. Run it through
/// [`TradeEnricher`](super::TradeEnricher) to obtain a typed [`Trade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Unique trade identifier.
    pub id: TradeId,
    /// When the trade was initiated.
    pub trade_date: DateTime<Utc>,
    /// Instrument symbol.
    #[serde(default)]
    pub asset_symbol: String,
    /// Asset class.
    #[serde(default)]
    pub asset_type: AssetType,
    /// Long or short.
    pub direction: Direction,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price; absent while the trade is open.
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    /// Units of the underlying.
    pub quantity: Decimal,
    /// Leverage multiplier (1 = none).
    #[serde(default = "default_leverage")]
    pub leverage: Decimal,
    /// Fee paid on entry.
    #[serde(default)]
    pub entry_fee: Decimal,
    /// Fee paid on exit.
    #[serde(default)]
    pub exit_fee: Decimal,
    /// Funding/borrow fees accrued while held.
    #[serde(default)]
    pub funding_fees: Decimal,
    /// Planned stop-loss level.
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    /// Planned take-profit level.
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    /// Strategy label.
    #[serde(default)]
    pub strategy: Option<String>,
    /// Chart timeframe label.
    #[serde(default)]
    pub timeframe: Option<String>,
}

impl TradeRecord {
    /// Create an open, unleveraged, fee-free trade.
    pub fn new(
        id: impl Into<String>,
        trade_date: DateTime<Utc>,
        direction: Direction,
        entry_price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: TradeId::new(id),
            trade_date,
            asset_symbol: String::new(),
            asset_type: AssetType::default(),
            direction,
            entry_price,
            exit_price: None,
            quantity,
            leverage: Decimal::ONE,
            entry_fee: Decimal::ZERO,
            exit_fee: Decimal::ZERO,
            funding_fees: Decimal::ZERO,
            stop_loss: None,
            take_profit: None,
            strategy: None,
            timeframe: None,
        }
    }

    /// Set the exit price.
    #[must_use]
    pub fn with_exit(mut self, exit_price: Decimal) -> Self {
        self.exit_price = Some(exit_price);
        self
    }

    /// Set entry, exit and funding fees.
    #[must_use]
    pub fn with_fees(mut self, entry_fee: Decimal, exit_fee: Decimal, funding_fees: Decimal) -> Self {
        self.entry_fee = entry_fee;
        self.exit_fee = exit_fee;
        self.funding_fees = funding_fees;
        self
    }

    /// Set leverage.
    #[must_use]
    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        self.leverage = leverage;
        self
    }

    /// Set stop-loss and take-profit levels.
    #[must_use]
    pub fn with_levels(mut self, stop_loss: Option<Decimal>, take_profit: Option<Decimal>) -> Self {
        self.stop_loss = stop_loss;
        self.take_profit = take_profit;
        self
    }

    /// Set the instrument symbol and asset class.
    #[must_use]
    pub fn with_asset(mut self, symbol: impl Into<String>, asset_type: AssetType) -> Self {
        self.asset_symbol = symbol.into();
        self.asset_type = asset_type;
        self
    }

    /// Set the strategy label.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Set the timeframe label.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = Some(timeframe.into());
        self
    }

    /// Sum of entry, exit and funding fees, saturating at the decimal range.
    #[must_use]
    pub fn total_fees(&self) -> Decimal {
        self.entry_fee
            .saturating_add(self.exit_fee)
            .saturating_add(self.funding_fees)
    }

    /// True while no exit price has been recorded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.exit_price.is_none()
    }
}

/// A trade without an exit. Carries no P&L or outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTrade {
    pub(crate) record: TradeRecord,
    pub(crate) risk_reward: Option<TradeRiskReward>,
}

impl OpenTrade {
    /// The validated inputs.
    #[must_use]
    pub const fn record(&self) -> &TradeRecord {
        &self.record
    }

    /// Planned risk:reward, if both levels were supplied.
    #[must_use]
    pub const fn risk_reward(&self) -> Option<&TradeRiskReward> {
        self.risk_reward.as_ref()
    }
}

/// A trade with an exit price and derived P&L facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedTrade {
    pub(crate) record: TradeRecord,
    pub(crate) exit_price: Decimal,
    pub(crate) pnl: PnlBreakdown,
    pub(crate) outcome: Outcome,
    pub(crate) risk_reward: Option<TradeRiskReward>,
}

impl ClosedTrade {
    /// The validated inputs.
    #[must_use]
    pub const fn record(&self) -> &TradeRecord {
        &self.record
    }

    /// Trade identifier.
    #[must_use]
    pub const fn id(&self) -> &TradeId {
        &self.record.id
    }

    /// Trade date.
    #[must_use]
    pub const fn trade_date(&self) -> DateTime<Utc> {
        self.record.trade_date
    }

    /// Exit price.
    #[must_use]
    pub const fn exit_price(&self) -> Decimal {
        self.exit_price
    }

    /// P&L facts computed at close.
    #[must_use]
    pub const fn pnl(&self) -> &PnlBreakdown {
        &self.pnl
    }

    /// Gross P&L.
    #[must_use]
    pub const fn gross_pnl(&self) -> Decimal {
        self.pnl.gross_pnl
    }

    /// Net P&L.
    #[must_use]
    pub const fn net_pnl(&self) -> Decimal {
        self.pnl.net_pnl
    }

    /// Percentage return (12.5 = 12.5%).
    #[must_use]
    pub const fn pnl_percentage(&self) -> Decimal {
        self.pnl.pnl_percentage
    }

    /// Win, loss or breakeven. Never `Open`.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Planned risk:reward, if both levels were supplied.
    #[must_use]
    pub const fn risk_reward(&self) -> Option<&TradeRiskReward> {
        self.risk_reward.as_ref()
    }

    /// Risk:reward ratio, when defined.
    #[must_use]
    pub fn risk_reward_ratio(&self) -> Option<Decimal> {
        self.risk_reward.as_ref().and_then(|rr| rr.ratio)
    }

    /// Sum of entry, exit and funding fees.
    #[must_use]
    pub fn total_fees(&self) -> Decimal {
        self.pnl.total_fees
    }
}

/// A trade in either lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Trade {
    /// No exit yet.
    Open(OpenTrade),
    /// Exited; P&L and outcome are known.
    Closed(ClosedTrade),
}

impl Trade {
    /// The validated inputs.
    #[must_use]
    pub const fn record(&self) -> &TradeRecord {
        match self {
            Self::Open(t) => &t.record,
            Self::Closed(t) => &t.record,
        }
    }

    /// Trade date.
    #[must_use]
    pub const fn trade_date(&self) -> DateTime<Utc> {
        self.record().trade_date
    }

    /// Outcome, `Open` for trades without an exit.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Open(_) => Outcome::Open,
            Self::Closed(t) => t.outcome,
        }
    }

    /// The closed trade, if any.
    #[must_use]
    pub const fn as_closed(&self) -> Option<&ClosedTrade> {
        match self {
            Self::Open(_) => None,
            Self::Closed(t) => Some(t),
        }
    }

    /// Flatten into the row handed back to the persistence layer.
    #[must_use]
    pub fn to_enriched(&self) -> EnrichedTrade {
        let (risk_reward, pnl) = match self {
            Self::Open(t) => (t.risk_reward.as_ref(), None),
            Self::Closed(t) => (t.risk_reward.as_ref(), Some(&t.pnl)),
        };

        EnrichedTrade {
            record: self.record().clone(),
            gross_pnl: pnl.map(|p| p.gross_pnl),
            net_pnl: pnl.map(|p| p.net_pnl),
            pnl_percentage: pnl.map(|p| p.pnl_percentage),
            outcome: self.outcome(),
            risk_amount: risk_reward.map(|rr| rr.risk_amount),
            reward_amount: risk_reward.map(|rr| rr.reward_amount),
            risk_reward_ratio: risk_reward.and_then(|rr| rr.ratio),
        }
    }
}

impl From<ClosedTrade> for Trade {
    fn from(trade: ClosedTrade) -> Self {
        Self::Closed(trade)
    }
}

impl From<OpenTrade> for Trade {
    fn from(trade: OpenTrade) -> Self {
        Self::Open(trade)
    }
}

/// Flat trade row with derived fields, as stored alongside the trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTrade {
    /// Inputs.
    #[serde(flatten)]
    pub record: TradeRecord,
    /// Gross P&L (closed trades only).
    pub gross_pnl: Option<Decimal>,
    /// Net P&L (closed trades only).
    pub net_pnl: Option<Decimal>,
    /// Percentage return (closed trades only).
    pub pnl_percentage: Option<Decimal>,
    /// Outcome, `open` for trades without an exit.
    pub outcome: Outcome,
    /// Risk in currency, when both levels are set.
    pub risk_amount: Option<Decimal>,
    /// Reward in currency, when both levels are set.
    pub reward_amount: Option<Decimal>,
    /// Reward / risk, when defined.
    pub risk_reward_ratio: Option<Decimal>,
}
