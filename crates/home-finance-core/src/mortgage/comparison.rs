//! Side-by-side total cost of competing mortgage offers.
//!
//! Each offer is priced independently: level payment from the amortisation
//! engine, lifetime interest, discount points and lender fees. Offers come
//! back in the order supplied; choosing between them is left to the caller.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeFinanceError;
use crate::mortgage::amortization::{compute_payment, rate_warnings, LoanInputs};
use crate::time_value::{checked, MAX_TERM_YEARS};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HomeFinanceResult;

/// Most offers a borrower is expected to weigh at once. Enforced by callers.
pub const MAX_COMPARED_OPTIONS: usize = 3;

/// Product label carried through for display. Does not alter the math:
/// every option is priced as a level-payment loan at its quoted rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    Fixed,
    Arm5,
    Arm7,
    Arm10,
}

/// One mortgage offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOption {
    /// Caller-assigned name, e.g. "Option 1" or "Credit union 15y".
    pub label: String,
    pub amount: Money,
    pub interest_rate_percent: Percent,
    pub term_years: u32,
    /// Discount points; one point costs 1% of the loan amount.
    #[serde(default)]
    pub points: Decimal,
    /// Flat lender fees paid at closing.
    #[serde(default)]
    pub fees: Money,
    #[serde(default)]
    pub loan_type: LoanType,
}

/// An offer with its lifetime cost figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedLoan {
    #[serde(flatten)]
    pub option: LoanOption,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub points_cost: Money,
    /// amount + total_interest + points_cost + fees
    pub total_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    pub options: Vec<LoanOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonOutput {
    pub options: Vec<ComparedLoan>,
}

/// Price every offer, preserving input order.
pub fn compare_loans(options: &[LoanOption]) -> HomeFinanceResult<Vec<ComparedLoan>> {
    options.iter().map(price_option).collect()
}

/// Loan comparison wrapped in the standard output envelope.
pub fn calculate_loan_comparison(
    input: &LoanComparisonInput,
) -> HomeFinanceResult<ComputationOutput<LoanComparisonOutput>> {
    let start = Instant::now();
    let options = compare_loans(&input.options)?;

    let mut warnings = Vec::new();
    if options.is_empty() {
        warnings.push("No loan options supplied".to_string());
    }
    for option in &input.options {
        warnings.extend(
            rate_warnings(option.interest_rate_percent)
                .into_iter()
                .map(|w| format!("{}: {}", option.label, w)),
        );
    }

    Ok(with_metadata(
        "Total cost of ownership: principal + lifetime interest + points + fees",
        input,
        warnings,
        start,
        LoanComparisonOutput { options },
    ))
}

fn price_option(option: &LoanOption) -> HomeFinanceResult<ComparedLoan> {
    validate_option(option)?;
    let loan = LoanInputs {
        principal: option.amount,
        annual_interest_rate_percent: option.interest_rate_percent,
        term_years: option.term_years,
    };

    let breakdown = compute_payment(&loan)?;
    let points_cost = checked(
        (option.points / dec!(100)).checked_mul(option.amount),
        "points cost",
    )?;
    let total_cost = checked(
        option
            .amount
            .checked_add(breakdown.total_interest)
            .and_then(|c| c.checked_add(points_cost))
            .and_then(|c| c.checked_add(option.fees)),
        "total cost",
    )?;

    Ok(ComparedLoan {
        option: option.clone(),
        monthly_payment: breakdown.monthly_payment,
        total_interest: breakdown.total_interest,
        points_cost,
        total_cost,
    })
}

fn validate_option(option: &LoanOption) -> HomeFinanceResult<()> {
    let field = |name: &str| format!("options[{}].{name}", option.label);

    if option.amount <= Decimal::ZERO {
        return Err(HomeFinanceError::invalid(field("amount"), "Loan amount must be positive"));
    }
    if option.interest_rate_percent < Decimal::ZERO {
        return Err(HomeFinanceError::invalid(
            field("interest_rate_percent"),
            "Interest rate cannot be negative",
        ));
    }
    if option.term_years == 0 || option.term_years > MAX_TERM_YEARS {
        return Err(HomeFinanceError::invalid(
            field("term_years"),
            format!("Loan term must be between 1 and {MAX_TERM_YEARS} years"),
        ));
    }
    if option.points < Decimal::ZERO {
        return Err(HomeFinanceError::invalid(field("points"), "Points cannot be negative"));
    }
    if option.fees < Decimal::ZERO {
        return Err(HomeFinanceError::invalid(field("fees"), "Fees cannot be negative"));
    }
    Ok(())
}
