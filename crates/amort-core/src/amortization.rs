//! Fixed-payment loan amortization.
//!
//! Converts loan terms into a constant monthly payment and a full
//! period-by-period repayment schedule. All math uses `rust_decimal::Decimal`;
//! summary figures are rounded to cents at the output boundary only, and the
//! final period retires the exact outstanding balance so rounding drift can
//! never leave a residue.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::dating::PaymentDating;
use crate::error::AmortError;
use crate::time_value::annuity_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AmortResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);
/// Annual rates above this (percentage points) trigger an advisory warning.
const HIGH_RATE_WARNING_PCT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// How interest accrues over the life of the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestMethod {
    /// Declining-balance annuity: constant payment, interest charged on the
    /// outstanding balance each period.
    #[default]
    DecliningBalance,
    /// Flat rate: simple interest on the original principal, spread evenly
    /// across the term. Common quoting convention among microfinance lenders.
    Flat,
}

/// Terms of a fixed-payment loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Original loan amount, currency units.
    pub principal: Money,
    /// Annual interest rate in percentage points (12 = 12%/year).
    pub annual_rate_pct: Rate,
    /// Number of equal monthly installments.
    pub term_months: u32,
    /// Interest accrual method.
    #[serde(default)]
    pub method: InterestMethod,
    /// Due-date policy for schedule entries.
    #[serde(default)]
    pub dating: PaymentDating,
}

impl LoanTerms {
    /// Terms with the default method and dating policy.
    pub fn new(principal: Money, annual_rate_pct: Rate, term_months: u32) -> Self {
        LoanTerms {
            principal,
            annual_rate_pct,
            term_months,
            method: InterestMethod::default(),
            dating: PaymentDating::default(),
        }
    }
}

/// One period of the repayment schedule.
///
/// Amounts carry full internal precision; rounding to cents happens only on
/// the summary fields of [`AmortizationSchedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based period index, chronological.
    pub payment_number: u32,
    /// Due date under the terms' dating policy.
    pub payment_date: NaiveDate,
    /// Total paid this period (principal + interest).
    pub payment_amount: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    /// Balance after this payment. Never negative; exactly zero on the
    /// final entry.
    pub remaining_balance: Money,
}

/// Full amortization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Constant monthly payment, rounded to cents.
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// One entry per month of the term, period 1 first.
    pub schedule: Vec<ScheduleEntry>,
}

/// Payment figures without the period-by-period breakdown, for callers that
/// render no schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a full amortization schedule.
///
/// `start_date` anchors the due dates; the first payment falls one period
/// after it. The result is a pure function of `(terms, start_date)`.
pub fn build_amortization(
    terms: &LoanTerms,
    start_date: NaiveDate,
) -> AmortResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    validate(terms)?;
    let warnings = advisory_warnings(terms);

    let summary = summarize(terms);
    let schedule = match terms.method {
        InterestMethod::DecliningBalance => declining_schedule(terms, start_date),
        InterestMethod::Flat => flat_schedule(terms, start_date),
    };

    let output = AmortizationSchedule {
        monthly_payment: summary.monthly_payment,
        total_payment: summary.total_payment,
        total_interest: summary.total_interest,
        schedule,
    };

    Ok(with_metadata(
        methodology(terms.method),
        terms,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

/// Compute the monthly payment and totals without generating the schedule.
///
/// Needs no start date, so it is deterministic from the terms alone.
pub fn payment_summary(terms: &LoanTerms) -> AmortResult<ComputationOutput<PaymentSummary>> {
    let start = Instant::now();
    validate(terms)?;
    let warnings = advisory_warnings(terms);
    let summary = summarize(terms);

    Ok(with_metadata(
        methodology(terms.method),
        terms,
        warnings,
        start.elapsed().as_micros() as u64,
        summary,
    ))
}

/// Outstanding balance after `periods_paid` on-schedule payments.
///
/// Uses the same recurrence as the schedule, so the result agrees exactly
/// with the corresponding [`ScheduleEntry::remaining_balance`].
pub fn outstanding_balance(terms: &LoanTerms, periods_paid: u32) -> AmortResult<Money> {
    validate(terms)?;

    if periods_paid == 0 {
        return Ok(terms.principal);
    }
    if periods_paid >= terms.term_months {
        return Ok(Decimal::ZERO);
    }

    let balance = match terms.method {
        InterestMethod::DecliningBalance => {
            let rate = monthly_rate(terms);
            let payment = annuity_payment(terms.principal, rate, terms.term_months);
            let mut balance = terms.principal;
            for _ in 0..periods_paid {
                let interest = balance * rate;
                balance -= payment - interest;
            }
            balance
        }
        InterestMethod::Flat => {
            let principal_per = terms.principal / Decimal::from(terms.term_months);
            terms.principal - principal_per * Decimal::from(periods_paid)
        }
    };

    Ok(balance.max(Decimal::ZERO))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn validate(terms: &LoanTerms) -> AmortResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(AmortError::InvalidPrincipal(terms.principal));
    }
    if terms.annual_rate_pct < Decimal::ZERO {
        return Err(AmortError::InvalidRate(terms.annual_rate_pct));
    }
    if terms.term_months == 0 {
        return Err(AmortError::InvalidTerm(
            "term must be at least 1 month".into(),
        ));
    }
    Ok(())
}

fn advisory_warnings(terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    if terms.annual_rate_pct > HIGH_RATE_WARNING_PCT {
        warnings.push(format!(
            "Annual rate of {}% exceeds 100%; check the rate is quoted in percentage points",
            terms.annual_rate_pct
        ));
    }
    warnings
}

fn methodology(method: InterestMethod) -> &'static str {
    match method {
        InterestMethod::DecliningBalance => "Declining-balance annuity amortization",
        InterestMethod::Flat => "Flat-rate amortization",
    }
}

fn monthly_rate(terms: &LoanTerms) -> Rate {
    terms.annual_rate_pct / PERCENT / MONTHS_PER_YEAR
}

/// Simple interest on the original principal over the whole term.
fn flat_total_interest(terms: &LoanTerms) -> Money {
    terms.principal
        * (terms.annual_rate_pct / PERCENT)
        * (Decimal::from(terms.term_months) / MONTHS_PER_YEAR)
}

/// Round to cents, midpoint away from zero, with a fixed 2dp scale.
fn to_cents(value: Money) -> Money {
    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents
}

/// Summary figures rounded to cents.
///
/// Declining balance reports the rounded payment and derives the totals from
/// it, so `total_payment == monthly_payment * term`. Flat quotes the exact
/// simple interest and derives the payment from the total.
fn summarize(terms: &LoanTerms) -> PaymentSummary {
    let n = Decimal::from(terms.term_months);
    match terms.method {
        InterestMethod::DecliningBalance => {
            let monthly = to_cents(annuity_payment(
                terms.principal,
                monthly_rate(terms),
                terms.term_months,
            ));
            let total = monthly * n;
            PaymentSummary {
                monthly_payment: monthly,
                total_payment: total,
                total_interest: total - terms.principal,
            }
        }
        InterestMethod::Flat => {
            let interest = to_cents(flat_total_interest(terms));
            let total = terms.principal + interest;
            PaymentSummary {
                monthly_payment: to_cents(total / n),
                total_payment: total,
                total_interest: interest,
            }
        }
    }
}

fn declining_schedule(terms: &LoanTerms, start_date: NaiveDate) -> Vec<ScheduleEntry> {
    let rate = monthly_rate(terms);
    let payment = annuity_payment(terms.principal, rate, terms.term_months);

    let mut entries = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for n in 1..=terms.term_months {
        let interest = balance * rate;
        // Final period retires the exact balance rather than the
        // formula-derived amount.
        let principal_part = if n == terms.term_months {
            balance
        } else {
            payment - interest
        };
        balance = (balance - principal_part).max(Decimal::ZERO);

        entries.push(ScheduleEntry {
            payment_number: n,
            payment_date: terms.dating.date_for(start_date, n),
            payment_amount: principal_part + interest,
            principal_payment: principal_part,
            interest_payment: interest,
            remaining_balance: balance,
        });
    }

    entries
}

fn flat_schedule(terms: &LoanTerms, start_date: NaiveDate) -> Vec<ScheduleEntry> {
    let n_dec = Decimal::from(terms.term_months);
    let principal_per = terms.principal / n_dec;
    let interest_per = flat_total_interest(terms) / n_dec;

    let mut entries = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for n in 1..=terms.term_months {
        let principal_part = if n == terms.term_months {
            balance
        } else {
            principal_per
        };
        balance = (balance - principal_part).max(Decimal::ZERO);

        entries.push(ScheduleEntry {
            payment_number: n,
            payment_date: terms.dating.date_for(start_date, n),
            payment_amount: principal_part + interest_per,
            principal_payment: principal_part,
            interest_payment: interest_per,
            remaining_balance: balance,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_monthly_payment_standard_loan() {
        let terms = LoanTerms::new(dec!(5000), dec!(12), 12);
        let out = build_amortization(&terms, start()).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(444.24));
        assert_eq!(out.result.total_payment, dec!(5330.88));
        assert_eq!(out.result.total_interest, dec!(330.88));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let terms = LoanTerms::new(dec!(1000), Decimal::ZERO, 10);
        let out = build_amortization(&terms, start()).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(100.00));
        assert_eq!(out.result.total_interest, dec!(0.00));
        for entry in &out.result.schedule {
            assert_eq!(entry.interest_payment, Decimal::ZERO);
        }
    }

    #[test]
    fn test_first_period_interest_on_full_principal() {
        let terms = LoanTerms::new(dec!(5000), dec!(12), 12);
        let out = build_amortization(&terms, start()).unwrap();
        // 1%/month on 5000
        assert_eq!(out.result.schedule[0].interest_payment, dec!(50));
    }

    #[test]
    fn test_final_balance_exactly_zero() {
        let terms = LoanTerms::new(dec!(12000), dec!(24), 24);
        let out = build_amortization(&terms, start()).unwrap();
        assert_eq!(out.result.schedule.len(), 24);
        assert_eq!(
            out.result.schedule.last().unwrap().remaining_balance,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_flat_method_even_portions() {
        let terms = LoanTerms {
            method: InterestMethod::Flat,
            ..LoanTerms::new(dec!(1000), dec!(10), 12)
        };
        let out = build_amortization(&terms, start()).unwrap();
        assert_eq!(out.result.total_interest, dec!(100.00));
        assert_eq!(out.result.total_payment, dec!(1100.00));
        assert_eq!(out.result.monthly_payment, dec!(91.67));
        // Interest identical every period under flat accrual
        let first = out.result.schedule[0].interest_payment;
        for entry in &out.result.schedule {
            assert_eq!(entry.interest_payment, first);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let zero_principal = LoanTerms::new(Decimal::ZERO, dec!(12), 12);
        assert!(matches!(
            payment_summary(&zero_principal),
            Err(AmortError::InvalidPrincipal(_))
        ));

        let negative_rate = LoanTerms::new(dec!(1000), dec!(-5), 12);
        assert!(matches!(
            payment_summary(&negative_rate),
            Err(AmortError::InvalidRate(_))
        ));

        let zero_term = LoanTerms::new(dec!(1000), dec!(12), 0);
        assert!(matches!(
            payment_summary(&zero_term),
            Err(AmortError::InvalidTerm(_))
        ));
    }

    #[test]
    fn test_high_rate_warning() {
        let terms = LoanTerms::new(dec!(1000), dec!(150), 12);
        let out = payment_summary(&terms).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_outstanding_balance_matches_schedule() {
        let terms = LoanTerms::new(dec!(5000), dec!(12), 12);
        let out = build_amortization(&terms, start()).unwrap();
        for k in 1..12u32 {
            let balance = outstanding_balance(&terms, k).unwrap();
            assert_eq!(
                balance,
                out.result.schedule[(k - 1) as usize].remaining_balance
            );
        }
        assert_eq!(outstanding_balance(&terms, 0).unwrap(), dec!(5000));
        assert_eq!(outstanding_balance(&terms, 12).unwrap(), Decimal::ZERO);
        assert_eq!(outstanding_balance(&terms, 40).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_single_period_loan() {
        let terms = LoanTerms::new(dec!(1000), dec!(12), 1);
        let out = build_amortization(&terms, start()).unwrap();
        assert_eq!(out.result.schedule.len(), 1);
        let entry = &out.result.schedule[0];
        assert_eq!(entry.principal_payment, dec!(1000));
        assert_eq!(entry.interest_payment, dec!(10));
        assert_eq!(entry.remaining_balance, Decimal::ZERO);
    }
}
