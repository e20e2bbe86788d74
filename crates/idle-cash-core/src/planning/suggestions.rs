use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::FundCategory;
use crate::config::AllocationConfig;
use crate::error::IdleCashError;
use crate::types::{checked, require_amount, round_money, try_percent, Money, Percent, Rate};
use crate::IdleCashResult;

/// A fund position supplied with a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Category key or display label of the fund
    pub fund_name: String,
    /// Cost basis per unit
    pub holding_cost: Money,
    /// Current value per unit
    pub current_nav: Money,
    /// Amount currently held
    pub holding_amount: Money,
}

impl Holding {
    /// (current - cost) / cost, or `Ok(None)` when the cost basis is zero.
    /// A quotient outside `Decimal`'s range is an error.
    pub fn return_rate(&self) -> IdleCashResult<Option<Rate>> {
        if self.holding_cost.is_zero() {
            return Ok(None);
        }
        let rate = self
            .current_nav
            .checked_sub(self.holding_cost)
            .and_then(|gain| gain.checked_div(self.holding_cost));
        checked("holding_cost", rate).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPositionSuggestion {
    pub fund_name: String,
    pub fund: FundCategory,
    pub return_rate: Percent,
    pub threshold: Percent,
    pub add_ratio: Percent,
    pub add_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitSuggestion {
    pub fund_name: String,
    pub fund: FundCategory,
    pub return_rate: Percent,
    pub threshold: Percent,
    pub profit_ratio: Percent,
    pub profit_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub add_position_suggestions: Vec<AddPositionSuggestion>,
    pub take_profit_suggestions: Vec<TakeProfitSuggestion>,
    pub total_add_amount: Money,
    pub total_profit_amount: Money,
}

impl SuggestionSummary {
    pub fn empty() -> Self {
        Self {
            add_position_suggestions: Vec::new(),
            take_profit_suggestions: Vec::new(),
            total_add_amount: Decimal::ZERO,
            total_profit_amount: Decimal::ZERO,
        }
    }
}

/// Reject holdings with negative or out-of-range figures.
pub fn validate_holdings(holdings: &[Holding]) -> IdleCashResult<()> {
    for (i, h) in holdings.iter().enumerate() {
        require_amount(&format!("holdings[{i}].holding_cost"), h.holding_cost)?;
        require_amount(&format!("holdings[{i}].current_nav"), h.current_nav)?;
        require_amount(&format!("holdings[{i}].holding_amount"), h.holding_amount)?;
    }
    Ok(())
}

/// Evaluate add-position and take-profit rules for each holding.
///
/// Only the dividend, US index and gold ETF funds are considered; anything
/// else (the bond fund, unknown names) and holdings with a zero cost basis
/// are skipped. At most one add-position rule applies per holding, the most
/// severe one satisfied. Take-profit is evaluated independently, so a rule
/// set whose ranges overlap can yield both suggestions for one holding.
/// Totals are summed from unrounded amounts and rounded once.
///
/// Arithmetic is checked: a return rate or amount that leaves `Decimal`'s
/// range is reported against the offending holding.
pub fn evaluate_holdings(
    holdings: &[Holding],
    config: &AllocationConfig,
) -> IdleCashResult<SuggestionSummary> {
    let mut summary = SuggestionSummary::empty();
    let mut total_add = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;

    for (i, holding) in holdings.iter().enumerate() {
        let fund = match FundCategory::from_name(&holding.fund_name) {
            Some(f) if f.is_rule_eligible() => f,
            _ => continue,
        };
        let cost_field = format!("holdings[{i}].holding_cost");
        let amount_field = format!("holdings[{i}].holding_amount");
        let rate = holding.return_rate().map_err(|e| match e {
            IdleCashError::InvalidInput { reason, .. } => IdleCashError::InvalidInput {
                field: cost_field.clone(),
                reason,
            },
            other => other,
        })?;
        let Some(return_rate) = rate else {
            tracing::debug!(fund = %holding.fund_name, "zero cost basis, skipping holding");
            continue;
        };
        let return_pct = try_percent(&cost_field, return_rate)?;

        if let Some(rule) = config.add_position_rules.first_match(return_rate) {
            let add_amount =
                checked(&amount_field, holding.holding_amount.checked_mul(rule.add_ratio))?;
            tracing::debug!(
                fund = %holding.fund_name,
                %return_rate,
                threshold = %rule.threshold,
                "add-position rule matched"
            );
            total_add = checked(&amount_field, total_add.checked_add(add_amount))?;
            summary.add_position_suggestions.push(AddPositionSuggestion {
                fund_name: holding.fund_name.clone(),
                fund,
                return_rate: return_pct,
                threshold: try_percent("add_position_rules.threshold", rule.threshold)?,
                add_ratio: try_percent("add_position_rules.add_ratio", rule.add_ratio)?,
                add_amount: round_money(add_amount),
            });
        }

        let take_profit = &config.take_profit;
        if return_rate >= take_profit.threshold {
            let profit_amount =
                checked(&amount_field, holding.holding_amount.checked_mul(take_profit.ratio))?;
            tracing::debug!(fund = %holding.fund_name, %return_rate, "take-profit rule matched");
            total_profit = checked(&amount_field, total_profit.checked_add(profit_amount))?;
            summary.take_profit_suggestions.push(TakeProfitSuggestion {
                fund_name: holding.fund_name.clone(),
                fund,
                return_rate: return_pct,
                threshold: try_percent("take_profit.threshold", take_profit.threshold)?,
                profit_ratio: try_percent("take_profit.ratio", take_profit.ratio)?,
                profit_amount: round_money(profit_amount),
            });
        }
    }

    summary.total_add_amount = round_money(total_add);
    summary.total_profit_amount = round_money(total_profit);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AddPositionRule, AddPositionRules};
    use rust_decimal_macros::dec;

    fn holding(name: &str, cost: Decimal, nav: Decimal, amount: Decimal) -> Holding {
        Holding {
            fund_name: name.into(),
            holding_cost: cost,
            current_nav: nav,
            holding_amount: amount,
        }
    }

    #[test]
    fn test_most_severe_rule_wins() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[holding("dividend_fund", dec!(1.0), dec!(0.90), dec!(10000))],
            &config,
        ).unwrap();
        assert_eq!(s.add_position_suggestions.len(), 1);
        let a = &s.add_position_suggestions[0];
        assert_eq!(a.threshold, dec!(-10.00));
        assert_eq!(a.return_rate, dec!(-10.00));
        assert_eq!(a.add_ratio, dec!(15.00));
        assert_eq!(a.add_amount, dec!(1500.00));
        assert!(s.take_profit_suggestions.is_empty());
    }

    #[test]
    fn test_mild_drawdown_matches_shallow_rule() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[holding("gold_etf", dec!(1.0), dec!(0.94), dec!(5000))],
            &config,
        ).unwrap();
        assert_eq!(s.add_position_suggestions[0].threshold, dec!(-5.00));
        assert_eq!(s.add_position_suggestions[0].add_amount, dec!(500.00));
    }

    #[test]
    fn test_take_profit() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[holding("us_index_fund", dec!(1.0), dec!(1.35), dec!(10000))],
            &config,
        ).unwrap();
        assert!(s.add_position_suggestions.is_empty());
        assert_eq!(s.take_profit_suggestions.len(), 1);
        let t = &s.take_profit_suggestions[0];
        assert_eq!(t.profit_amount, dec!(2000.00));
        assert_eq!(t.return_rate, dec!(35.00));
        assert_eq!(t.threshold, dec!(30.00));
        assert_eq!(s.total_profit_amount, dec!(2000.00));
    }

    #[test]
    fn test_bond_fund_and_unknown_funds_skipped() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[
                holding("bond_fund", dec!(1.0), dec!(0.50), dec!(10000)),
                holding("bond_fund", dec!(1.0), dec!(2.00), dec!(10000)),
                holding("mystery fund", dec!(1.0), dec!(0.50), dec!(10000)),
            ],
            &config,
        ).unwrap();
        assert_eq!(s, SuggestionSummary::empty());
    }

    #[test]
    fn test_zero_cost_basis_skipped() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[holding("dividend_fund", dec!(0), dec!(0.50), dec!(10000))],
            &config,
        ).unwrap();
        assert!(s.add_position_suggestions.is_empty());
        assert!(s.take_profit_suggestions.is_empty());
    }

    #[test]
    fn test_totals_rounded_once_from_unrounded_amounts() {
        let config = AllocationConfig::default();
        // 0.05 * 10% = 0.005 each; three of them sum to 0.015 -> 0.02,
        // whereas rounding each first would give 0.00 + 0.00 + 0.00.
        let holdings = vec![
            holding("dividend_fund", dec!(1.0), dec!(0.94), dec!(0.05)),
            holding("us_index_fund", dec!(1.0), dec!(0.94), dec!(0.05)),
            holding("gold_etf", dec!(1.0), dec!(0.94), dec!(0.05)),
        ];
        let s = evaluate_holdings(&holdings, &config).unwrap();
        assert_eq!(s.add_position_suggestions.len(), 3);
        assert!(s.add_position_suggestions.iter().all(|a| a.add_amount.is_zero()));
        assert_eq!(s.total_add_amount, dec!(0.02));
    }

    #[test]
    fn test_overlapping_rules_yield_both_suggestions() {
        let mut config = AllocationConfig::default();
        config.add_position_rules = AddPositionRules::new(vec![AddPositionRule {
            threshold: dec!(0.50),
            add_ratio: dec!(0.10),
        }]);
        let s = evaluate_holdings(
            &[holding("dividend_fund", dec!(1.0), dec!(1.40), dec!(1000))],
            &config,
        ).unwrap();
        assert_eq!(s.add_position_suggestions.len(), 1);
        assert_eq!(s.take_profit_suggestions.len(), 1);
    }

    #[test]
    fn test_label_names_are_recognised() {
        let config = AllocationConfig::default();
        let s = evaluate_holdings(
            &[holding(
                FundCategory::DividendFund.label(),
                dec!(2.0),
                dec!(1.6),
                dec!(1000),
            )],
            &config,
        ).unwrap();
        assert_eq!(s.add_position_suggestions[0].fund, FundCategory::DividendFund);
        assert_eq!(s.add_position_suggestions[0].add_amount, dec!(200.00));
    }

    #[test]
    fn test_validate_holdings_rejects_negative() {
        let bad = vec![holding("gold_etf", dec!(1.0), dec!(-0.1), dec!(100))];
        let err = validate_holdings(&bad).unwrap_err();
        assert!(err.to_string().contains("holdings[0].current_nav"));
    }

    #[test]
    fn test_tiny_cost_basis_overflow_is_an_error() {
        let config = AllocationConfig::default();
        let tiny = holding(
            "dividend_fund",
            dec!(0.0000000000000000000000001),
            dec!(100000),
            dec!(1000),
        );
        match evaluate_holdings(&[tiny], &config) {
            Err(IdleCashError::InvalidInput { field, reason }) => {
                assert_eq!(field, "holdings[0].holding_cost");
                assert_eq!(reason, "arithmetic overflow");
            }
            other => panic!("expected overflow error, got {other:?}"),
        }
    }

    #[test]
    fn test_return_rate_overflow_is_an_error() {
        let h = holding("gold_etf", dec!(0.0000000000000000000000001), dec!(100000), dec!(1));
        assert!(h.return_rate().is_err());
        let h = holding("gold_etf", dec!(0), dec!(1), dec!(1));
        assert_eq!(h.return_rate().unwrap(), None);
    }

    #[test]
    fn test_validate_holdings_rejects_amount_above_bound() {
        let bad = vec![holding("gold_etf", dec!(1.0), dec!(1.0), Decimal::MAX)];
        let err = validate_holdings(&bad).unwrap_err();
        assert!(err.to_string().contains("holdings[0].holding_amount"));
    }
}
