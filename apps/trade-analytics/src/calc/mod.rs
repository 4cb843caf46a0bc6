//! Per-trade calculators.
//!
//! Stateless functions applied once when a trade is created or edited:
//! - P&L (gross, net, percentage return)
//! - Risk:reward from stop-loss / take-profit levels
//! - Outcome classification (win / loss / breakeven)

mod outcome;
mod pnl;
mod risk_reward;

pub use outcome::classify_outcome;
pub use pnl::{PnlBreakdown, PnlInput, calculate_pnl};
pub use risk_reward::{
    LevelPlacement, RiskReward, RiskRewardOutcome, TradeRiskReward, UndefinedRiskReward,
    calculate_risk_reward, level_placement,
};
