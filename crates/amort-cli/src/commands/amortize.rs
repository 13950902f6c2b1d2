use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use amort_core::amortization::{self, InterestMethod, LoanTerms};
use amort_core::dating::PaymentDating;

use crate::input;

/// Interest accrual method
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Declining-balance annuity (constant payment, interest on balance)
    Declining,
    /// Flat rate (simple interest on the original principal)
    Flat,
}

impl From<MethodArg> for InterestMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Declining => InterestMethod::DecliningBalance,
            MethodArg::Flat => InterestMethod::Flat,
        }
    }
}

/// Due-date stepping policy
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DatingArg {
    /// Fixed stride of --stride-days per period
    Stride,
    /// True calendar months, clamped at month end
    Calendar,
}

/// Arguments for building a full amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percentage points (12 = 12%/year)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Date the schedule is anchored to (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Interest accrual method
    #[arg(long, value_enum, default_value = "declining")]
    pub method: MethodArg,

    /// Due-date stepping policy
    #[arg(long, value_enum, default_value = "stride")]
    pub dating: DatingArg,

    /// Days per period when --dating stride
    #[arg(long, default_value_t = 30)]
    pub stride_days: u32,
}

/// Arguments for the payment summary
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percentage points (12 = 12%/year)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Interest accrual method
    #[arg(long, value_enum, default_value = "declining")]
    pub method: MethodArg,
}

/// Arguments for the outstanding balance lookup
#[derive(Args)]
pub struct BalanceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percentage points (12 = 12%/year)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Interest accrual method
    #[arg(long, value_enum, default_value = "declining")]
    pub method: MethodArg,

    /// Number of on-schedule payments already made
    #[arg(long)]
    pub periods_paid: u32,
}

/// JSON request shape for file/stdin input: loan terms plus an optional
/// start date resolved at this boundary.
#[derive(Deserialize)]
struct ScheduleRequest {
    #[serde(flatten)]
    terms: LoanTerms,
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (terms, start_date) = if let Some(ref path) = args.input {
        let request: ScheduleRequest = input::read_json(path)?;
        (request.terms, request.start_date)
    } else if let Some(data) = input::read_stdin()? {
        let request: ScheduleRequest = serde_json::from_value(data)?;
        (request.terms, request.start_date)
    } else {
        let terms = LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            method: args.method.into(),
            dating: match args.dating {
                DatingArg::Stride => PaymentDating::FixedStride {
                    days: args.stride_days,
                },
                DatingArg::Calendar => PaymentDating::CalendarMonths,
            },
        };
        (terms, args.start_date)
    };

    // Wall-clock enters only here; the engine itself takes the date.
    let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let result = amortization::build_amortization(&terms, start_date)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            method: args.method.into(),
            dating: PaymentDating::default(),
        }
    };

    let result = amortization::payment_summary(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            method: args.method.into(),
            dating: PaymentDating::default(),
        }
    };

    let balance = amortization::outstanding_balance(&terms, args.periods_paid)?;
    Ok(serde_json::json!({
        "outstanding_balance": balance,
        "periods_paid": args.periods_paid,
        "term_months": terms.term_months,
    }))
}
