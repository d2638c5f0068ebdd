use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use home_finance_core::calculator::build_calculator;
use home_finance_core::mortgage::affordability::{self, AffordabilityInputs, PaymentSplitMethod};
use home_finance_core::mortgage::amortization::{self, rate_warnings, LoanInputs};
use home_finance_core::mortgage::comparison::{self, LoanComparisonInput, MAX_COMPARED_OPTIONS};
use home_finance_core::with_metadata;

use crate::input;

/// Loan described on the command line or in a JSON file
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON file with loan inputs (otherwise flags, then stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5 for 5%)
    #[arg(long, default_value = "5")]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term: u32,
}

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Ask the remote pricing service first, falling back to local math
    #[arg(long)]
    pub remote: bool,

    /// Calculator configuration file (TOML)
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the affordability check
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON file with affordability inputs (otherwise flags, then stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual household income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Cash available for the down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual mortgage rate in percent
    #[arg(long, default_value = "5")]
    pub rate: Decimal,

    /// Mortgage term in years
    #[arg(long, default_value = "30")]
    pub term: u32,

    /// Annual property tax in percent of home price
    #[arg(long, default_value = "1.2")]
    pub tax_rate: Decimal,

    /// Annual homeowner's insurance in percent of home price
    #[arg(long, default_value = "0.5")]
    pub insurance_rate: Decimal,

    /// Report a first-month principal/interest split instead of the 40/60 approximation
    #[arg(long)]
    pub first_period_split: bool,
}

/// Arguments for the loan comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON file with `{"options": [...]}` (otherwise stdin)
    #[arg(long)]
    pub input: Option<String>,
}

fn resolve_loan(args: &LoanArgs) -> Result<LoanInputs, Box<dyn std::error::Error>> {
    match (args.input.as_deref(), args.principal) {
        (None, Some(principal)) => Ok(LoanInputs {
            principal,
            annual_interest_rate_percent: args.rate,
            term_years: args.term,
        }),
        (path, _) => input::read_input(path)?
            .ok_or_else(|| "--principal, --input <file.json> or stdin required".into()),
    }
}

pub async fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let loan = resolve_loan(&args.loan)?;
    let config = input::config::load_calculator_config(args.config.as_deref(), args.remote)?;

    let calculator = build_calculator(&config)?;
    tracing::debug!(calculator = calculator.name(), "calculating payment");
    let breakdown = calculator.calculate(&loan).await?;

    let methodology = format!(
        "Fixed-rate level-payment amortisation ({} calculator)",
        calculator.name()
    );
    let output = with_metadata(
        &methodology,
        &loan,
        rate_warnings(loan.annual_interest_rate_percent),
        start,
        breakdown,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args.loan)?;
    let result = amortization::amortization_schedule(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut aff_input: AffordabilityInputs = match (args.input.as_deref(), args.income) {
        (None, Some(income)) => AffordabilityInputs {
            annual_income: income,
            monthly_debts: args.monthly_debts,
            down_payment: args.down_payment,
            annual_interest_rate_percent: args.rate,
            term_years: args.term,
            property_tax_rate_percent: args.tax_rate,
            insurance_rate_percent: args.insurance_rate,
            split_method: PaymentSplitMethod::default(),
        },
        (path, _) => input::read_input(path)?
            .ok_or("--income, --input <file.json> or stdin required for affordability")?,
    };
    if args.first_period_split {
        aff_input.split_method = PaymentSplitMethod::FirstPeriod;
    }

    let result = affordability::calculate_affordability(&aff_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: LoanComparisonInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for loan comparison")?;

    let count = cmp_input.options.len();
    if !(1..=MAX_COMPARED_OPTIONS).contains(&count) {
        return Err(format!(
            "Compare between 1 and {MAX_COMPARED_OPTIONS} loan options (got {count})"
        )
        .into());
    }

    let result = comparison::calculate_loan_comparison(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
