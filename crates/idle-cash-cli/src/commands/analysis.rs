use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use idle_cash_core::analysis::portfolio::{self, PortfolioSnapshot};
use idle_cash_core::AllocationConfig;

use crate::input;

/// Arguments for holdings ratio analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON file with category amounts
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub bond_fund: Option<Decimal>,

    #[arg(long)]
    pub dividend_fund: Option<Decimal>,

    #[arg(long)]
    pub us_index_fund: Option<Decimal>,

    #[arg(long)]
    pub gold_etf: Option<Decimal>,

    #[arg(long)]
    pub bank_fixed_income: Option<Decimal>,

    #[arg(long)]
    pub physical_gold: Option<Decimal>,

    #[arg(long)]
    pub reserve_fund: Option<Decimal>,
}

impl AnalyzeArgs {
    fn flags(&self) -> [Option<Decimal>; 7] {
        [
            self.bond_fund,
            self.dividend_fund,
            self.us_index_fund,
            self.gold_etf,
            self.bank_fixed_income,
            self.physical_gold,
            self.reserve_fund,
        ]
    }

    fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            bond_fund: self.bond_fund.unwrap_or_default(),
            dividend_fund: self.dividend_fund.unwrap_or_default(),
            us_index_fund: self.us_index_fund.unwrap_or_default(),
            gold_etf: self.gold_etf.unwrap_or_default(),
            bank_fixed_income: self.bank_fixed_income.unwrap_or_default(),
            physical_gold: self.physical_gold.unwrap_or_default(),
            reserve_fund: self.reserve_fund.unwrap_or_default(),
        }
    }
}

pub fn run_analyze(
    args: AnalyzeArgs,
    config: &AllocationConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: PortfolioSnapshot = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.flags().iter().any(Option::is_some) {
        args.snapshot()
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("Provide category amounts (e.g. --bond-fund 16000), --input <file.json>, \
                    or pipe JSON via stdin"
            .into());
    };

    let output = portfolio::analyze_portfolio(&snapshot, config)?;
    Ok(serde_json::to_value(output)?)
}
