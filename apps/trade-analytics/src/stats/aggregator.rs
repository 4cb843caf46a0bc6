//! Portfolio statistics aggregation.

use std::borrow::Cow;
use std::time::Instant;

use rust_decimal::Decimal;

use super::breakdown::compute_breakdowns;
use super::constants::HUNDRED;
use super::daily::daily_statistics;
use super::math::{downside_deviation, mean, sqrt_decimal, std_dev};
use super::prepare::{ensure_sorted, prepare};
use super::types::{Breakdowns, CurrentStreak, PortfolioStatistics, ProfitFactor, StreakKind};
use crate::config::StatisticsConfig;
use crate::error::AnalyticsResult;
use crate::logging::{create_statistics_computed_event, log_statistics_computed};
use crate::trade::{ClosedTrade, Outcome, Trade};

/// Folds closed trades into a [`PortfolioStatistics`] snapshot.
///
/// Stateless apart from its configuration: every call recomputes from the
/// slice it is given.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    config: StatisticsConfig,
}

impl StatisticsAggregator {
    /// Create an aggregator.
    #[must_use]
    pub const fn new(config: StatisticsConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &StatisticsConfig {
        &self.config
    }

    /// Aggregate closed trades in ascending `trade_date` order.
    ///
    /// Empty input yields the all-zero snapshot. Out-of-order input is
    /// handled per the configured aggregation policy.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` for unsorted input under the strict
    /// policy.
    pub fn aggregate(&self, trades: &[ClosedTrade]) -> AnalyticsResult<PortfolioStatistics> {
        let trades = ensure_sorted(Cow::Borrowed(trades), self.config.aggregation_policy)?;
        Ok(self.compute(&trades))
    }

    /// Aggregate a mixed list of open and closed trades.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` for open or unsorted input under the
    /// strict policy.
    pub fn aggregate_trades(&self, trades: &[Trade]) -> AnalyticsResult<PortfolioStatistics> {
        let closed = prepare(trades, self.config.aggregation_policy)?;
        Ok(self.compute(&closed))
    }

    /// Per-category breakdowns of closed trades. Order-independent.
    #[must_use]
    pub fn breakdowns(&self, trades: &[ClosedTrade]) -> Breakdowns {
        compute_breakdowns(trades)
    }

    fn compute(&self, trades: &[ClosedTrade]) -> PortfolioStatistics {
        let started = Instant::now();
        let stats = self.calculate(trades);
        let duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        log_statistics_computed(&create_statistics_computed_event(&stats, duration_us));
        stats
    }

    fn calculate(&self, trades: &[ClosedTrade]) -> PortfolioStatistics {
        if trades.is_empty() {
            return PortfolioStatistics::default();
        }

        let totals = TradeTotals::from_trades(trades);
        let total = Decimal::from(totals.total);

        let rate = |count: u64| Decimal::from(count) / total * HUNDRED;

        let average_win = if totals.winning > 0 {
            totals.gross_profit / Decimal::from(totals.winning)
        } else {
            Decimal::ZERO
        };
        let average_loss = if totals.losing > 0 {
            totals.gross_loss.abs() / Decimal::from(totals.losing)
        } else {
            Decimal::ZERO
        };
        let payoff_ratio = if average_loss > Decimal::ZERO {
            average_win.checked_div(average_loss)
        } else {
            None
        };

        let ratios: Vec<Decimal> = trades.iter().filter_map(ClosedTrade::risk_reward_ratio).collect();
        let average_risk_reward = mean(&ratios).unwrap_or_default();

        let streaks = calculate_streaks(trades);
        let (max_drawdown, max_drawdown_percentage) =
            calculate_drawdown(trades, self.config.initial_equity);

        let returns: Vec<Decimal> = trades.iter().map(ClosedTrade::pnl_percentage).collect();

        PortfolioStatistics {
            total_trades: totals.total,
            winning_trades: totals.winning,
            losing_trades: totals.losing,
            breakeven_trades: totals.breakeven,
            win_rate: rate(totals.winning),
            loss_rate: rate(totals.losing),
            total_gross_profit: totals.gross_profit,
            total_gross_loss: totals.gross_loss,
            total_net_profit: totals.net_profit,
            total_fees: totals.fees,
            profit_factor: ProfitFactor::from_totals(totals.gross_profit, totals.gross_loss),
            average_win,
            average_loss,
            payoff_ratio,
            expectancy: totals.net_profit / total,
            average_risk_reward,
            largest_win: totals.largest_win,
            largest_loss: totals.largest_loss,
            consecutive_wins: streaks.max_wins,
            consecutive_losses: streaks.max_losses,
            current_streak: streaks.current,
            max_drawdown,
            max_drawdown_percentage,
            sharpe_ratio: self.calculate_sharpe(&returns),
            sortino_ratio: self.calculate_sortino(&returns),
            daily: daily_statistics(trades),
        }
    }

    /// Sharpe = (mean return - risk-free) / stdev(returns).
    ///
    /// 0 below two samples, for a flat series, or when the ratio overflows.
    fn calculate_sharpe(&self, returns: &[Decimal]) -> Decimal {
        if returns.len() < 2 {
            return Decimal::ZERO;
        }
        match std_dev(returns, self.config.deviation) {
            Some(std) if std > Decimal::ZERO => self.risk_adjusted(returns, std),
            _ => Decimal::ZERO,
        }
    }

    /// Sortino = (mean return - risk-free) / downside deviation.
    ///
    /// Defined from a single sample; 0 without negative returns or when the
    /// ratio overflows.
    fn calculate_sortino(&self, returns: &[Decimal]) -> Decimal {
        match downside_deviation(returns) {
            Some(dd) if dd > Decimal::ZERO => self.risk_adjusted(returns, dd),
            _ => Decimal::ZERO,
        }
    }

    fn risk_adjusted(&self, returns: &[Decimal], deviation: Decimal) -> Decimal {
        mean(returns)
            .and_then(|m| m.checked_sub(self.config.risk_free_rate))
            .and_then(|excess| excess.checked_div(deviation))
            .and_then(|ratio| ratio.checked_mul(self.annualization_factor()))
            .unwrap_or(Decimal::ZERO)
    }

    fn annualization_factor(&self) -> Decimal {
        self.config
            .annualization_periods
            .and_then(|periods| sqrt_decimal(Decimal::from(periods)))
            .unwrap_or(Decimal::ONE)
    }
}

/// Single-pass counts and sums.
#[derive(Debug, Default)]
struct TradeTotals {
    total: u64,
    winning: u64,
    losing: u64,
    breakeven: u64,
    gross_profit: Decimal,
    gross_loss: Decimal,
    net_profit: Decimal,
    fees: Decimal,
    largest_win: Decimal,
    largest_loss: Decimal,
}

impl TradeTotals {
    fn from_trades(trades: &[ClosedTrade]) -> Self {
        let mut totals = Self::default();

        for trade in trades {
            totals.total += 1;
            totals.net_profit = totals.net_profit.saturating_add(trade.net_pnl());
            totals.fees = totals.fees.saturating_add(trade.total_fees());

            match trade.outcome() {
                Outcome::Win => {
                    totals.gross_profit = totals.gross_profit.saturating_add(trade.gross_pnl());
                    totals.largest_win = if totals.winning == 0 {
                        trade.net_pnl()
                    } else {
                        totals.largest_win.max(trade.net_pnl())
                    };
                    totals.winning += 1;
                }
                Outcome::Loss => {
                    totals.gross_loss = totals.gross_loss.saturating_add(trade.gross_pnl());
                    totals.largest_loss = if totals.losing == 0 {
                        trade.net_pnl()
                    } else {
                        totals.largest_loss.min(trade.net_pnl())
                    };
                    totals.losing += 1;
                }
                Outcome::Breakeven | Outcome::Open => totals.breakeven += 1,
            }
        }

        totals
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Streaks {
    max_wins: u64,
    max_losses: u64,
    current: Option<CurrentStreak>,
}

/// Longest and trailing runs. A breakeven trade resets both counters.
fn calculate_streaks(trades: &[ClosedTrade]) -> Streaks {
    let mut streaks = Streaks::default();
    let mut current_wins = 0u64;
    let mut current_losses = 0u64;

    for trade in trades {
        match trade.outcome() {
            Outcome::Win => {
                current_wins += 1;
                current_losses = 0;
                streaks.max_wins = streaks.max_wins.max(current_wins);
            }
            Outcome::Loss => {
                current_losses += 1;
                current_wins = 0;
                streaks.max_losses = streaks.max_losses.max(current_losses);
            }
            Outcome::Breakeven | Outcome::Open => {
                current_wins = 0;
                current_losses = 0;
            }
        }
    }

    streaks.current = if current_wins > 0 {
        Some(CurrentStreak {
            kind: StreakKind::Win,
            length: current_wins,
        })
    } else if current_losses > 0 {
        Some(CurrentStreak {
            kind: StreakKind::Loss,
            length: current_losses,
        })
    } else {
        None
    };

    streaks
}

/// Max peak-to-trough decline of the cumulative net P&L curve.
///
/// Returns `(max_drawdown, percentage of the peak it fell from)`. The first
/// occurrence of the maximum determines the peak; a zero peak gives 0%.
/// Equity saturates at the decimal range.
fn calculate_drawdown(trades: &[ClosedTrade], initial_equity: Decimal) -> (Decimal, Decimal) {
    let mut equity = initial_equity;
    let mut peak = initial_equity;
    let mut max_drawdown = Decimal::ZERO;
    let mut peak_at_max = Decimal::ZERO;

    for trade in trades {
        equity = equity.saturating_add(trade.net_pnl());
        peak = peak.max(equity);

        let drawdown = peak.saturating_sub(equity);
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            peak_at_max = peak;
        }
    }

    let percentage = if peak_at_max > Decimal::ZERO {
        max_drawdown
            .checked_div(peak_at_max)
            .and_then(|r| r.checked_mul(HUNDRED))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    (max_drawdown, percentage)
}
