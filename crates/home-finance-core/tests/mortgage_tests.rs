use home_finance_core::mortgage::affordability::{self, AffordabilityInputs, PaymentSplitMethod};
use home_finance_core::mortgage::amortization::{self, LoanInputs};
use home_finance_core::mortgage::comparison::{self, LoanComparisonInput, LoanOption, LoanType};
use home_finance_core::time_value::{level_payment, monthly_rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{msg}: expected ~{expected}, got {actual} (diff = {diff})"
    );
}

fn loan(principal: Decimal, rate: Decimal, years: u32) -> LoanInputs {
    LoanInputs {
        principal,
        annual_interest_rate_percent: rate,
        term_years: years,
    }
}

// ===========================================================================
// Amortisation
// ===========================================================================

#[test]
fn test_total_payment_is_payment_times_periods() {
    for (principal, rate, years) in [
        (dec!(50_000), dec!(3.25), 10),
        (dec!(200_000), dec!(5), 30),
        (dec!(750_000), dec!(7.125), 20),
        (dec!(1_000), dec!(12), 1),
    ] {
        let b = amortization::compute_payment(&loan(principal, rate, years)).unwrap();
        let n = Decimal::from(years * 12);
        assert_close(b.total_payment, b.monthly_payment * n, dec!(0.000001), "total");
        assert_close(
            b.total_interest,
            b.total_payment - principal,
            dec!(0.000001),
            "interest",
        );
        assert!(b.total_interest > Decimal::ZERO);
    }
}

#[test]
fn test_zero_rate_property() {
    for years in [1u32, 5, 15, 30] {
        let principal = dec!(123_456);
        let b = amortization::compute_payment(&loan(principal, Decimal::ZERO, years)).unwrap();
        assert_eq!(b.monthly_payment, principal / Decimal::from(years * 12));
        assert_eq!(b.total_interest, Decimal::ZERO);
    }
}

#[test]
fn test_higher_rate_costs_more() {
    let mut prev = amortization::compute_payment(&loan(dec!(300_000), Decimal::ZERO, 30)).unwrap();
    for rate in [dec!(0.5), dec!(2), dec!(3.75), dec!(5), dec!(6.5), dec!(9)] {
        let next = amortization::compute_payment(&loan(dec!(300_000), rate, 30)).unwrap();
        assert!(next.monthly_payment > prev.monthly_payment, "payment at {rate}%");
        assert!(next.total_interest > prev.total_interest, "interest at {rate}%");
        prev = next;
    }
}

#[test]
fn test_longer_term_lowers_payment_raises_interest() {
    let terms = [10u32, 15, 20, 25, 30];
    let results: Vec<_> = terms
        .iter()
        .map(|&t| amortization::compute_payment(&loan(dec!(250_000), dec!(6), t)).unwrap())
        .collect();
    for pair in results.windows(2) {
        assert!(pair[1].monthly_payment < pair[0].monthly_payment);
        assert!(pair[1].total_interest > pair[0].total_interest);
    }
}

#[test]
fn test_scenario_thirty_year_five_percent() {
    let b = amortization::compute_payment(&loan(dec!(200_000), dec!(5), 30)).unwrap();
    assert_eq!(b.monthly_payment.round_dp(2), dec!(1073.64));
}

#[test]
fn test_scenario_zero_rate() {
    let b = amortization::compute_payment(&loan(dec!(200_000), Decimal::ZERO, 30)).unwrap();
    assert_eq!(b.monthly_payment.round_dp(2), dec!(555.56));
    assert_eq!(b.total_interest, Decimal::ZERO);
}

// ===========================================================================
// Affordability
// ===========================================================================

fn scenario_buyer() -> AffordabilityInputs {
    AffordabilityInputs {
        annual_income: dec!(75_000),
        monthly_debts: dec!(500),
        down_payment: dec!(50_000),
        annual_interest_rate_percent: dec!(5),
        term_years: 30,
        property_tax_rate_percent: dec!(1.2),
        insurance_rate_percent: dec!(0.5),
        split_method: PaymentSplitMethod::Approximate,
    }
}

#[test]
fn test_affordability_scenario() {
    let out = affordability::calculate_affordability(&scenario_buyer()).unwrap();
    let r = &out.result;
    assert!(r.max_home_price > Decimal::ZERO);

    // The ratio inversion covers carrying costs on the loan only; taxes and
    // insurance on the down payment add exactly down * (tax + ins) / 1200.
    let down_carrying = dec!(50_000) * (dec!(1.2) + dec!(0.5)) / dec!(1200);
    let bound = dec!(36) + down_carrying / r.monthly_income * dec!(100);
    assert!(r.debt_to_income_ratio_percent <= bound + dec!(0.000001));
    assert_close(
        r.payment_breakdown.total,
        r.available_for_housing + down_carrying,
        dec!(0.000001),
        "housing budget plus down-payment carrying cost",
    );
}

#[test]
fn test_affordability_inversion_round_trips() {
    for split in [PaymentSplitMethod::Approximate, PaymentSplitMethod::FirstPeriod] {
        let mut input = scenario_buyer();
        input.split_method = split;
        let r = affordability::compute_affordability(&input).unwrap();

        let loan_amount = r.max_home_price - input.down_payment;
        let pi = amortization::compute_payment(&loan(loan_amount, input.annual_interest_rate_percent, 30))
            .unwrap()
            .monthly_payment;
        let taxes = r.max_home_price * monthly_rate(input.property_tax_rate_percent);
        let insurance = r.max_home_price * monthly_rate(input.insurance_rate_percent);

        assert_close(pi + taxes + insurance, r.payment_breakdown.total, dec!(0.0001), "inversion");
        assert_close(
            r.payment_breakdown.principal + r.payment_breakdown.interest,
            pi,
            dec!(0.0001),
            "P&I split sums back",
        );
    }
}

#[test]
fn test_affordability_front_end_binds_without_debts() {
    let mut input = scenario_buyer();
    input.monthly_debts = Decimal::ZERO;
    let r = affordability::compute_affordability(&input).unwrap();
    // 28% of 6250 < 36% of 6250
    assert_eq!(r.available_for_housing, dec!(1750));
}

#[test]
fn test_affordability_back_end_binds_with_heavy_debts() {
    let mut input = scenario_buyer();
    input.monthly_debts = dec!(1000);
    let r = affordability::compute_affordability(&input).unwrap();
    assert_eq!(r.available_for_housing, dec!(1250));
    assert!(r.max_home_price < affordability::compute_affordability(&scenario_buyer()).unwrap().max_home_price);
}

// ===========================================================================
// Loan comparison
// ===========================================================================

fn offer(label: &str, rate: Decimal, years: u32, points: Decimal) -> LoanOption {
    LoanOption {
        label: label.into(),
        amount: dec!(300_000),
        interest_rate_percent: rate,
        term_years: years,
        points,
        fees: dec!(3000),
        loan_type: LoanType::Fixed,
    }
}

#[test]
fn test_total_cost_formula_holds_per_option() {
    let options = vec![
        offer("A", dec!(5.5), 30, Decimal::ZERO),
        offer("B", dec!(4.75), 15, dec!(1)),
        offer("C", dec!(5), 30, dec!(0.5)),
    ];
    let compared = comparison::compare_loans(&options).unwrap();
    for (c, o) in compared.iter().zip(&options) {
        let n = Decimal::from(o.term_years * 12);
        assert_close(c.total_interest, c.monthly_payment * n - o.amount, dec!(0.000001), &o.label);
        assert_eq!(
            c.total_cost,
            o.amount + c.total_interest + o.points / dec!(100) * o.amount + o.fees
        );
    }

    // Pricing is independent of the neighbours in the list
    let alone = comparison::compare_loans(&options[1..2]).unwrap();
    assert_eq!(alone[0], compared[1]);
}

#[test]
fn test_points_buy_down_pays_off_over_thirty_years() {
    let compared = comparison::compare_loans(&[
        offer("A", dec!(4.5), 30, dec!(2)),
        offer("B", dec!(5), 30, Decimal::ZERO),
    ])
    .unwrap();
    assert_close(compared[0].total_cost, dec!(556_220.13), dec!(0.05), "A total cost");
    assert_close(compared[1].total_cost, dec!(582_767.35), dec!(0.05), "B total cost");
    assert!(compared[0].total_cost < compared[1].total_cost);
}

#[test]
fn test_lower_rate_does_not_always_win() {
    // Three points to shave 10bp off a 10-year loan costs more than it saves
    let compared = comparison::compare_loans(&[
        offer("A", dec!(4.9), 10, dec!(3)),
        offer("B", dec!(5), 10, Decimal::ZERO),
    ])
    .unwrap();
    assert!(compared[0].monthly_payment < compared[1].monthly_payment);
    assert_close(compared[0].total_cost, dec!(392_078.62), dec!(0.05), "A total cost");
    assert_close(compared[1].total_cost, dec!(384_835.85), dec!(0.05), "B total cost");
    assert!(compared[1].total_cost < compared[0].total_cost);
}

#[test]
fn test_comparison_envelope_round_trips_json() {
    let input: LoanComparisonInput = serde_json::from_str(
        r#"{
            "options": [
                {"label": "Option 1", "amount": "300000", "interest_rate_percent": "5.5", "term_years": 30, "fees": "3000"},
                {"label": "Option 2", "amount": "300000", "interest_rate_percent": "4.75", "term_years": 15, "points": "1", "fees": "4000", "loan_type": "arm5"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(input.options[0].points, Decimal::ZERO);
    assert_eq!(input.options[1].loan_type, LoanType::Arm5);

    let out = comparison::calculate_loan_comparison(&input).unwrap();
    assert_eq!(out.result.options.len(), 2);
    assert_close(out.result.options[0].total_cost, dec!(616_212.12), dec!(0.05), "option 1");
    assert_close(out.result.options[1].total_cost, dec!(427_029.24), dec!(0.05), "option 2");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_level_payment_matches_engine() {
    let b = amortization::compute_payment(&loan(dec!(200_000), dec!(5), 30)).unwrap();
    let direct = level_payment(dec!(200_000), monthly_rate(dec!(5)), 360).unwrap();
    assert_eq!(b.monthly_payment, direct);
}
