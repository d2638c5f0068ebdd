//! Home affordability under the conventional 28/36 debt-to-income rule.
//!
//! Inverts the level-payment formula: starting from the largest housing
//! payment the borrower's income supports, solves for the loan that payment
//! carries once property tax and insurance are folded in, then adds the down
//! payment to reach a maximum home price.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeFinanceError;
use crate::mortgage::amortization::rate_warnings;
use crate::time_value::{
    checked, level_payment, monthly_rate, payment_factor, total_periods, MAX_TERM_YEARS,
    MONTHS_PER_YEAR,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::HomeFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Front-end ceiling: housing payment as a share of gross monthly income.
pub const FRONT_END_RATIO: Rate = dec!(0.28);

/// Back-end ceiling: all debt payments as a share of gross monthly income.
pub const BACK_END_RATIO: Rate = dec!(0.36);

/// Share of principal-and-interest reported as principal by the approximate split.
const APPROX_PRINCIPAL_SHARE: Rate = dec!(0.4);

/// Share of principal-and-interest reported as interest by the approximate split.
const APPROX_INTEREST_SHARE: Rate = dec!(0.6);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How principal-and-interest is divided in the reported payment breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSplitMethod {
    /// Fixed 40% principal / 60% interest. Matches the figures borrowers
    /// have historically been shown; not derived from the schedule.
    #[default]
    Approximate,
    /// First-month split: interest = loan * monthly rate, principal = rest.
    FirstPeriod,
}

/// Borrower profile and market assumptions for an affordability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    /// Gross annual income. Must be positive.
    pub annual_income: Money,
    /// Existing monthly debt service (cards, auto, student loans).
    pub monthly_debts: Money,
    /// Cash put down at purchase.
    pub down_payment: Money,
    /// Mortgage rate as an annual percentage (e.g. 5 = 5%).
    pub annual_interest_rate_percent: Percent,
    /// Mortgage term in whole years.
    pub term_years: u32,
    /// Annual property tax as a percentage of home price.
    pub property_tax_rate_percent: Percent,
    /// Annual homeowner's insurance as a percentage of home price.
    pub insurance_rate_percent: Percent,
    #[serde(default)]
    pub split_method: PaymentSplitMethod,
}

/// Monthly housing cost split into its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaymentBreakdown {
    pub principal: Money,
    pub interest: Money,
    pub taxes: Money,
    pub insurance: Money,
    pub total: Money,
}

/// Outcome of an affordability check.
///
/// A non-positive `max_home_price` is a valid answer: the borrower cannot
/// afford a home under the modelled ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub max_home_price: Money,
    pub max_loan_amount: Money,
    /// Total monthly housing payment (P&I + taxes + insurance).
    pub monthly_payment: Money,
    pub payment_breakdown: MonthlyPaymentBreakdown,
    pub debt_to_income_ratio_percent: Percent,
    pub monthly_income: Money,
    pub max_housing_payment: Money,
    pub max_total_debt_payment: Money,
    /// Housing budget after existing debts; negative when debts alone breach 36%.
    pub available_for_housing: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum affordable home price and the payment it implies.
pub fn compute_affordability(
    inputs: &AffordabilityInputs,
) -> HomeFinanceResult<AffordabilityResult> {
    validate_input(inputs)?;

    let monthly_income = inputs.annual_income / Decimal::from(MONTHS_PER_YEAR);
    let max_housing_payment = monthly_income * FRONT_END_RATIO;
    let max_total_debt_payment = monthly_income * BACK_END_RATIO;
    let available_for_housing =
        max_housing_payment.min(max_total_debt_payment - inputs.monthly_debts);

    let rate = monthly_rate(inputs.annual_interest_rate_percent);
    let nper = total_periods(inputs.term_years)?;
    let monthly_tax_rate = monthly_rate(inputs.property_tax_rate_percent);
    let monthly_insurance_rate = monthly_rate(inputs.insurance_rate_percent);

    // Zero rate: the whole budget goes to principal; carrying costs are not
    // folded into the inversion.
    let max_loan_amount = if rate.is_zero() {
        checked(
            available_for_housing.checked_mul(Decimal::from(nper)),
            "maximum loan amount",
        )?
    } else {
        let carrying = checked(
            payment_factor(rate, nper)?
                .checked_add(monthly_tax_rate)
                .and_then(|c| c.checked_add(monthly_insurance_rate)),
            "monthly carrying rate",
        )?;
        checked(
            available_for_housing.checked_div(carrying),
            "maximum loan amount",
        )?
    };

    let max_home_price = checked(
        max_loan_amount.checked_add(inputs.down_payment),
        "maximum home price",
    )?;

    let loan_amount = max_home_price - inputs.down_payment;
    let principal_and_interest = level_payment(loan_amount, rate, nper)?;
    let taxes = checked(max_home_price.checked_mul(monthly_tax_rate), "monthly taxes")?;
    let insurance = checked(
        max_home_price.checked_mul(monthly_insurance_rate),
        "monthly insurance",
    )?;
    let total = checked(
        principal_and_interest
            .checked_add(taxes)
            .and_then(|t| t.checked_add(insurance)),
        "monthly housing payment",
    )?;

    let (principal, interest) = match inputs.split_method {
        PaymentSplitMethod::Approximate => (
            principal_and_interest * APPROX_PRINCIPAL_SHARE,
            principal_and_interest * APPROX_INTEREST_SHARE,
        ),
        PaymentSplitMethod::FirstPeriod => {
            let interest = checked(loan_amount.checked_mul(rate), "first-period interest")?;
            (principal_and_interest - interest, interest)
        }
    };

    let debt_to_income_ratio_percent = checked(
        total
            .checked_add(inputs.monthly_debts)
            .and_then(|debt| debt.checked_div(monthly_income))
            .and_then(|ratio| ratio.checked_mul(dec!(100))),
        "debt-to-income ratio",
    )?;

    Ok(AffordabilityResult {
        max_home_price,
        max_loan_amount,
        monthly_payment: total,
        payment_breakdown: MonthlyPaymentBreakdown {
            principal,
            interest,
            taxes,
            insurance,
            total,
        },
        debt_to_income_ratio_percent,
        monthly_income,
        max_housing_payment,
        max_total_debt_payment,
        available_for_housing,
    })
}

/// Affordability check wrapped in the standard output envelope.
pub fn calculate_affordability(
    inputs: &AffordabilityInputs,
) -> HomeFinanceResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let result = compute_affordability(inputs)?;

    let mut warnings = rate_warnings(inputs.annual_interest_rate_percent);
    if result.available_for_housing < Decimal::ZERO {
        warnings.push(format!(
            "Existing monthly debts of {} exceed the 36% back-end ceiling of {}",
            inputs.monthly_debts.round_dp(2),
            result.max_total_debt_payment.round_dp(2)
        ));
    }
    if result.max_home_price <= Decimal::ZERO {
        warnings.push("Cannot afford a home under the 28/36 debt-to-income ratios".into());
    } else if result.debt_to_income_ratio_percent > BACK_END_RATIO * dec!(100) {
        warnings.push(format!(
            "Debt-to-income ratio of {}% exceeds 36%: taxes and insurance on the down payment sit outside the ratio inversion",
            result.debt_to_income_ratio_percent.round_dp(2)
        ));
    }
    if inputs.annual_interest_rate_percent.is_zero()
        && !(inputs.property_tax_rate_percent.is_zero() && inputs.insurance_rate_percent.is_zero())
    {
        warnings.push(
            "Zero interest rate: maximum loan ignores property tax and insurance".into(),
        );
    }

    let methodology = match inputs.split_method {
        PaymentSplitMethod::Approximate => {
            "28/36 DTI affordability inversion (approximate 40/60 principal/interest split)"
        }
        PaymentSplitMethod::FirstPeriod => {
            "28/36 DTI affordability inversion (first-period principal/interest split)"
        }
    };

    Ok(with_metadata(methodology, inputs, warnings, start, result))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(inputs: &AffordabilityInputs) -> HomeFinanceResult<()> {
    if inputs.annual_income <= Decimal::ZERO {
        return Err(HomeFinanceError::invalid(
            "annual_income",
            "Annual income must be positive",
        ));
    }
    let non_negative = [
        ("monthly_debts", inputs.monthly_debts),
        ("down_payment", inputs.down_payment),
        ("annual_interest_rate_percent", inputs.annual_interest_rate_percent),
        ("property_tax_rate_percent", inputs.property_tax_rate_percent),
        ("insurance_rate_percent", inputs.insurance_rate_percent),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(HomeFinanceError::invalid(field, "Must be non-negative"));
        }
    }
    if inputs.term_years == 0 || inputs.term_years > MAX_TERM_YEARS {
        return Err(HomeFinanceError::invalid(
            "term_years",
            format!("Loan term must be between 1 and {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}
