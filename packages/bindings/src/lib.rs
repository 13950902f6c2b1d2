use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Loan terms plus the optional schedule anchor date. The date defaults to
/// today here, at the boundary, so the core stays deterministic.
#[derive(serde::Deserialize)]
struct ScheduleBindingInput {
    #[serde(flatten)]
    terms: amort_core::amortization::LoanTerms,
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

#[napi]
pub fn build_amortization(input_json: String) -> NapiResult<String> {
    let input: ScheduleBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let start_date = input.start_date.unwrap_or_else(|| Local::now().date_naive());
    let output = amort_core::amortization::build_amortization(&input.terms, start_date)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_summary(input_json: String) -> NapiResult<String> {
    let input: amort_core::amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        amort_core::amortization::payment_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn outstanding_balance(input_json: String, periods_paid: u32) -> NapiResult<String> {
    let input: amort_core::amortization::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let balance = amort_core::amortization::outstanding_balance(&input, periods_paid)
        .map_err(to_napi_error)?;
    serde_json::to_string(&balance).map_err(to_napi_error)
}
