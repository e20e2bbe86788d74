use idle_cash_core::categories::FundCategory;
use idle_cash_core::planning::allocator::{
    allocate_framework, allocate_fund_portfolio, compute_gap, compute_investable,
};
use idle_cash_core::planning::calculator::{calculate, CalculationInput, PlanStatus};
use idle_cash_core::planning::schedule::ContributionDay;
use idle_cash_core::planning::suggestions::{evaluate_holdings, Holding};
use idle_cash_core::{AllocationConfig, IdleCashError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Full calculation tests
// ===========================================================================

fn holding(name: &str, cost: Decimal, nav: Decimal, amount: Decimal) -> Holding {
    Holding {
        fund_name: name.into(),
        holding_cost: cost,
        current_nav: nav,
        holding_amount: amount,
    }
}

fn sample_input() -> CalculationInput {
    CalculationInput {
        target_living_expense: dec!(15000),
        current_living_expense: dec!(10000),
        debt: dec!(2000),
        new_income: dec!(20000),
        holdings: vec![
            holding("dividend_fund", dec!(1.0), dec!(0.92), dec!(10000)),
            holding("us_index_fund", dec!(1.0), dec!(1.35), dec!(10000)),
            holding("bond_fund", dec!(1.0), dec!(0.70), dec!(10000)),
        ],
    }
}

#[test]
fn test_full_calculation() {
    let out = calculate(&sample_input(), &AllocationConfig::default()).unwrap();
    let r = &out.result;

    assert_eq!(r.status, PlanStatus::Funded);
    assert_eq!(r.living_expense_gap, dec!(5000));
    assert_eq!(r.investable_amount, dec!(13000));

    let fw = r.framework_allocation.as_ref().unwrap();
    assert_eq!(fw.fund_portfolio, dec!(3900));
    assert_eq!(fw.bank_fixed_income, dec!(7800));
    assert_eq!(fw.physical_gold, dec!(650));
    assert_eq!(fw.reserve_fund, dec!(650));

    let plan = &r.regular_investment_plan;
    assert_eq!(plan.tuesday_amount, dec!(585));
    assert_eq!(plan.thursday_amount, dec!(3315));
    assert_eq!(plan.weekly_total, plan.tuesday_amount + plan.thursday_amount);
    assert_eq!(plan.funds[0].fund, FundCategory::UsIndexFund);
    assert_eq!(plan.funds[0].day, ContributionDay::Tuesday);

    // Dividend fund at -8%: shallow rule (10%). US index at +35%: take profit.
    let s = &r.suggestions;
    assert_eq!(s.add_position_suggestions.len(), 1);
    assert_eq!(s.add_position_suggestions[0].fund, FundCategory::DividendFund);
    assert_eq!(s.add_position_suggestions[0].add_amount, dec!(1000.00));
    assert_eq!(s.take_profit_suggestions.len(), 1);
    assert_eq!(s.take_profit_suggestions[0].profit_amount, dec!(2000.00));
    assert_eq!(s.total_add_amount, dec!(1000.00));
    assert_eq!(s.total_profit_amount, dec!(2000.00));
}

#[test]
fn test_gap_property() {
    for (target, current) in [
        (dec!(100), dec!(50)),
        (dec!(50), dec!(100)),
        (dec!(0), dec!(0)),
        (dec!(1234.56), dec!(1234.56)),
    ] {
        let gap = compute_gap(target, current);
        if target <= current {
            assert_eq!(gap, Decimal::ZERO);
        } else {
            assert_eq!(gap, target - current);
        }
    }
}

#[test]
fn test_investable_property() {
    let gap = compute_gap(dec!(15000), dec!(10000));
    assert_eq!(compute_investable(dec!(3000), gap, dec!(500)), dec!(-2500));
}

#[test]
fn test_insufficient_has_no_allocations_or_suggestions() {
    let mut input = sample_input();
    input.new_income = dec!(1000);
    let out = calculate(&input, &AllocationConfig::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.status, PlanStatus::Insufficient);
    assert_eq!(r.investable_amount, dec!(-6000));
    assert!(r.framework_allocation.is_none());
    assert!(r.fund_allocation.is_none());
    assert!(r.suggestions.add_position_suggestions.is_empty());
    assert!(r.suggestions.take_profit_suggestions.is_empty());
    assert_eq!(r.regular_investment_plan.weekly_total, Decimal::ZERO);
    assert!(r.warning.is_some());
}

#[test]
fn test_allocations_are_independently_rounded_products() {
    let config = AllocationConfig::default();
    let investable = dec!(12345.67);
    let fw = allocate_framework(investable, &config);
    assert_eq!(fw.fund_portfolio, (investable * dec!(0.30)).round_dp(2));
    assert_eq!(fw.bank_fixed_income, (investable * dec!(0.60)).round_dp(2));
    assert_eq!(fw.physical_gold, (investable * dec!(0.05)).round_dp(2));
    assert_eq!(fw.reserve_fund, (investable * dec!(0.05)).round_dp(2));

    let funds = allocate_fund_portfolio(fw.fund_portfolio, &config);
    assert_eq!(funds.bond_fund, (fw.fund_portfolio * dec!(0.40)).round_dp(2));
    assert_eq!(funds.gold_etf, (fw.fund_portfolio * dec!(0.15)).round_dp(2));
}

#[test]
fn test_ten_percent_drawdown_matches_ten_percent_rule() {
    let s = evaluate_holdings(
        &[holding("gold_etf", dec!(1.0), dec!(0.90), dec!(10000))],
        &AllocationConfig::default(),
    )
    .unwrap();
    assert_eq!(s.add_position_suggestions[0].threshold, dec!(-10.00));
}

#[test]
fn test_bond_fund_never_suggested() {
    let s = evaluate_holdings(
        &[
            holding("bond_fund", dec!(1.0), dec!(0.10), dec!(10000)),
            holding(FundCategory::BondFund.label(), dec!(1.0), dec!(9.0), dec!(10000)),
        ],
        &AllocationConfig::default(),
    )
    .unwrap();
    assert!(s.add_position_suggestions.is_empty());
    assert!(s.take_profit_suggestions.is_empty());
}

#[test]
fn test_input_from_json_with_numbers() {
    let json = r#"{
        "target_living_expense": 15000,
        "current_living_expense": 10000,
        "debt": 2000,
        "new_income": 20000,
        "holdings": [
            {"fund_name": "dividend_fund", "holding_cost": 1.0, "current_nav": 0.92, "holding_amount": 10000}
        ]
    }"#;
    let input: CalculationInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.holdings[0].current_nav, dec!(0.92));
    let out = calculate(&input, &AllocationConfig::default()).unwrap();
    assert_eq!(out.result.investable_amount, dec!(13000));
}

#[test]
fn test_holdings_are_optional_in_json() {
    let json = r#"{"target_living_expense": 0, "current_living_expense": 0, "debt": 0, "new_income": 100}"#;
    let input: CalculationInput = serde_json::from_str(json).unwrap();
    assert!(input.holdings.is_empty());
}

#[test]
fn test_negative_income_rejected() {
    let mut input = sample_input();
    input.new_income = dec!(-5);
    assert!(matches!(
        calculate(&input, &AllocationConfig::default()),
        Err(IdleCashError::InvalidInput { .. })
    ));
}

#[test]
fn test_max_target_and_debt_rejected_without_panic() {
    let input = CalculationInput {
        target_living_expense: Decimal::MAX,
        current_living_expense: dec!(0),
        debt: Decimal::MAX,
        new_income: dec!(0),
        holdings: vec![],
    };
    let err = calculate(&input, &AllocationConfig::default()).unwrap_err();
    assert!(matches!(err, IdleCashError::InvalidInput { .. }));
}

#[test]
fn test_tiny_cost_basis_reports_overflow() {
    let input = CalculationInput {
        target_living_expense: dec!(0),
        current_living_expense: dec!(0),
        debt: dec!(0),
        new_income: dec!(10000),
        holdings: vec![holding(
            "dividend_fund",
            dec!(0.0000000000000000000000001),
            dec!(100000),
            dec!(1000),
        )],
    };
    match calculate(&input, &AllocationConfig::default()) {
        Err(IdleCashError::InvalidInput { field, reason }) => {
            assert_eq!(field, "holdings[0].holding_cost");
            assert_eq!(reason, "arithmetic overflow");
        }
        other => panic!("expected overflow error, got {other:?}"),
    }
}
