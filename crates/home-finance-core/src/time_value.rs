use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::HomeFinanceError;
use crate::types::{Money, Percent, Rate};
use crate::HomeFinanceResult;

/// Payments per year for every loan in this crate.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term accepted by any engine.
pub const MAX_TERM_YEARS: u32 = 50;

/// Turn a `checked_*` Decimal result into an `Overflow` error naming `context`.
pub fn checked(value: Option<Decimal>, context: &str) -> HomeFinanceResult<Decimal> {
    value.ok_or_else(|| HomeFinanceError::Overflow {
        context: context.to_string(),
    })
}

/// Convert an annual percentage rate into the monthly periodic rate: `pct / 100 / 12`.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly periods in a term quoted in years.
pub fn total_periods(term_years: u32) -> HomeFinanceResult<u32> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| HomeFinanceError::Overflow {
            context: format!("period count for a {term_years}-year term"),
        })
}

/// Compounding factor `(1 + r)^n`, using exact integer exponentiation.
pub fn compound_factor(rate: Rate, nper: u32) -> HomeFinanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| HomeFinanceError::Overflow {
            context: format!("compound factor (1 + {rate})^{nper}"),
        })
}

/// Level-payment factor: payment per unit of principal.
///
/// `r(1+r)^n / ((1+r)^n - 1)` in general, `1 / n` when the rate is zero.
pub fn payment_factor(rate: Rate, nper: u32) -> HomeFinanceResult<Rate> {
    if nper == 0 {
        return Err(HomeFinanceError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(Decimal::ONE / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(HomeFinanceError::DivisionByZero {
            context: "payment factor denominator".into(),
        });
    }

    rate.checked_mul(factor)
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| HomeFinanceError::Overflow {
            context: "payment factor".into(),
        })
}

/// Standard fixed-rate level payment: `P * r(1+r)^n / ((1+r)^n - 1)`.
///
/// A zero rate is amortised straight-line, `P / n`, rather than through the
/// general formula, which degenerates to 0/0.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> HomeFinanceResult<Money> {
    if nper == 0 {
        return Err(HomeFinanceError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = payment_factor(rate, nper)?;
    principal
        .checked_mul(factor)
        .ok_or_else(|| HomeFinanceError::Overflow {
            context: "level payment".into(),
        })
}
