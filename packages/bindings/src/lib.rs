use std::sync::OnceLock;

use idle_cash_core::analysis::portfolio::{self, PortfolioSnapshot};
use idle_cash_core::planning::calculator::{self, CalculationInput};
use idle_cash_core::{ConfigStore, ConfigUpdate};
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Configuration shared by every call into this module. Calculations read a
/// snapshot; updates swap it whole.
fn store() -> &'static ConfigStore {
    static STORE: OnceLock<ConfigStore> = OnceLock::new();
    STORE.get_or_init(ConfigStore::default)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate(input_json: String) -> NapiResult<String> {
    let input: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = store().snapshot();
    let output = calculator::calculate(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_portfolio(holdings_json: String) -> NapiResult<String> {
    let snapshot: PortfolioSnapshot =
        serde_json::from_str(&holdings_json).map_err(to_napi_error)?;
    let config = store().snapshot();
    let output = portfolio::analyze_portfolio(&snapshot, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[napi]
pub fn get_config() -> NapiResult<String> {
    serde_json::to_string(&*store().snapshot()).map_err(to_napi_error)
}

/// Apply a partial update; rejected updates leave the active config as is.
#[napi]
pub fn update_config(update_json: String) -> NapiResult<String> {
    let update: ConfigUpdate = serde_json::from_str(&update_json).map_err(to_napi_error)?;
    let updated = store().update(&update).map_err(to_napi_error)?;
    serde_json::to_string(&*updated).map_err(to_napi_error)
}
