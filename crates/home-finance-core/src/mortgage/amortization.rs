//! Fixed-rate, level-payment mortgage amortisation.
//!
//! Computes the monthly payment, total paid and total interest for a loan
//! quoted as principal, annual percentage rate and term in years, plus the
//! full period-by-period schedule. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeFinanceError;
use crate::time_value::{checked, level_payment, monthly_rate, total_periods, MAX_TERM_YEARS};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HomeFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Annual rates above this trigger a warning, not an error.
const HIGH_RATE_WARNING_PERCENT: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fixed-rate loan quoted the way a borrower sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Amount borrowed. Must be positive.
    pub principal: Money,
    /// Annual interest rate as a percentage (e.g. 5 = 5%). Must be >= 0.
    pub annual_interest_rate_percent: Percent,
    /// Loan term in whole years, 1 to 50.
    pub term_years: u32,
}

/// Level-payment figures for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
}

/// One month of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number.
    pub period: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Outstanding balance after this payment.
    pub balance: Money,
}

/// Full schedule together with the headline figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub breakdown: PaymentBreakdown,
    pub rows: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the level monthly payment, total paid and total interest.
///
/// Rejects non-positive principal, a zero term and negative rates rather than
/// producing nonsense figures.
pub fn compute_payment(inputs: &LoanInputs) -> HomeFinanceResult<PaymentBreakdown> {
    validate_loan_inputs(inputs)?;

    let rate = monthly_rate(inputs.annual_interest_rate_percent);
    let nper = total_periods(inputs.term_years)?;
    let monthly_payment = level_payment(inputs.principal, rate, nper)?;

    if rate.is_zero() {
        // Straight-line repayment: nothing beyond the principal is ever paid.
        return Ok(PaymentBreakdown {
            monthly_payment,
            total_payment: inputs.principal,
            total_interest: Decimal::ZERO,
        });
    }

    let total_payment = checked(
        monthly_payment.checked_mul(Decimal::from(nper)),
        "total payment",
    )?;
    Ok(PaymentBreakdown {
        monthly_payment,
        total_payment,
        total_interest: total_payment - inputs.principal,
    })
}

/// Payment calculation wrapped in the standard output envelope.
pub fn calculate_payment(
    inputs: &LoanInputs,
) -> HomeFinanceResult<ComputationOutput<PaymentBreakdown>> {
    let start = Instant::now();
    let breakdown = compute_payment(inputs)?;
    let warnings = rate_warnings(inputs.annual_interest_rate_percent);

    Ok(with_metadata(
        "Fixed-rate level-payment amortisation",
        inputs,
        warnings,
        start,
        breakdown,
    ))
}

/// Month-by-month amortisation schedule.
///
/// Interest accrues on the opening balance; the final period retires whatever
/// balance remains so the schedule always closes at exactly zero.
pub fn amortization_schedule(
    inputs: &LoanInputs,
) -> HomeFinanceResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let breakdown = compute_payment(inputs)?;

    let rate = monthly_rate(inputs.annual_interest_rate_percent);
    let nper = total_periods(inputs.term_years)?;

    let mut rows = Vec::with_capacity(nper as usize);
    let mut balance = inputs.principal;

    for period in 1..=nper {
        let interest = checked(balance.checked_mul(rate), "schedule interest")?;
        let (payment, principal) = if period == nper {
            (
                checked(balance.checked_add(interest), "final schedule payment")?,
                balance,
            )
        } else {
            (
                breakdown.monthly_payment,
                breakdown.monthly_payment - interest,
            )
        };
        balance -= principal;

        rows.push(AmortizationRow {
            period,
            payment,
            principal,
            interest,
            balance,
        });
    }

    let warnings = rate_warnings(inputs.annual_interest_rate_percent);
    Ok(with_metadata(
        "Fixed-rate amortisation schedule (interest on opening balance)",
        inputs,
        warnings,
        start,
        AmortizationSchedule { breakdown, rows },
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_loan_inputs(inputs: &LoanInputs) -> HomeFinanceResult<()> {
    if inputs.principal <= Decimal::ZERO {
        return Err(HomeFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if inputs.annual_interest_rate_percent < Decimal::ZERO {
        return Err(HomeFinanceError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if inputs.term_years == 0 || inputs.term_years > MAX_TERM_YEARS {
        return Err(HomeFinanceError::invalid(
            "term_years",
            format!("Loan term must be between 1 and {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}

/// Non-fatal warnings about the quoted rate.
pub fn rate_warnings(annual_rate_percent: Percent) -> Vec<String> {
    let mut warnings = Vec::new();
    if annual_rate_percent > HIGH_RATE_WARNING_PERCENT {
        warnings.push(format!(
            "Interest rate of {annual_rate_percent}% is unusually high for a mortgage"
        ));
    }
    warnings
}
