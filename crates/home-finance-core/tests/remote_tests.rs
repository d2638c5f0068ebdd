#![cfg(feature = "remote")]

use home_finance_core::calculator::{
    build_calculator, CalculationMode, CalculatorConfig, PaymentCalculator, RemoteCalculator,
    RemoteConfig,
};
use home_finance_core::mortgage::amortization::{compute_payment, LoanInputs};
use home_finance_core::HomeFinanceError;
use httpmock::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;

fn sample_loan() -> LoanInputs {
    LoanInputs {
        principal: dec!(200_000),
        annual_interest_rate_percent: dec!(5),
        term_years: 30,
    }
}

fn remote_config(server: &MockServer, timeout_ms: u64) -> CalculatorConfig {
    CalculatorConfig {
        mode: CalculationMode::Remote,
        remote: RemoteConfig {
            base_url: Some(server.base_url()),
            timeout_ms,
            ..RemoteConfig::default()
        },
    }
}

#[tokio::test]
async fn test_remote_figures_are_used_when_available() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/api/mortgage/calculate")
            .body_contains("\"loanTerm\":30")
            .body_contains("\"principal\":200000")
            .body_contains("\"interestRate\":5");
        then.status(200).json_body(json!({
            "monthlyPayment": 1073.64,
            "totalPayment": 386510.4,
            "totalInterest": 186510.4,
            "amortizationSchedule": [
                {"month": 1, "payment": 1073.64, "principal": 240.31, "interest": 833.33, "balance": 199759.69}
            ]
        }));
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 2000)).unwrap();
    assert_eq!(calc.name(), "remote");

    let result = calc.calculate(&sample_loan()).await.unwrap();
    mock.assert_async().await;
    assert_eq!(result.monthly_payment, dec!(1073.64));
    assert_eq!(result.total_interest, dec!(186510.4));
}

#[tokio::test]
async fn test_server_error_falls_back_to_local() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST).path("/api/mortgage/calculate");
        then.status(500).json_body(json!({"message": "boom"}));
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 2000)).unwrap();
    let result = calc.calculate(&sample_loan()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result, compute_payment(&sample_loan()).unwrap());
}

#[tokio::test]
async fn test_timeout_falls_back_to_local() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/api/mortgage/calculate");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(json!({"monthlyPayment": 1.0, "totalPayment": 1.0, "totalInterest": 0.0}));
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 100)).unwrap();
    let result = calc.calculate(&sample_loan()).await.unwrap();

    assert_eq!(result, compute_payment(&sample_loan()).unwrap());
}

#[tokio::test]
async fn test_undecodable_body_falls_back_to_local() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/api/mortgage/calculate");
        then.status(200).body("<html>maintenance</html>");
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 2000)).unwrap();
    let result = calc.calculate(&sample_loan()).await.unwrap();
    assert_eq!(result, compute_payment(&sample_loan()).unwrap());
}

#[tokio::test]
async fn test_implausible_figures_fall_back_to_local() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/api/mortgage/calculate");
        then.status(200)
            .json_body(json!({"monthlyPayment": 0, "totalPayment": 0, "totalInterest": 0}));
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 2000)).unwrap();
    let result = calc.calculate(&sample_loan()).await.unwrap();
    assert!(result.monthly_payment > Decimal::ZERO);
}

#[tokio::test]
async fn test_unreachable_service_falls_back_to_local() {
    let config = RemoteConfig {
        base_url: Some("http://127.0.0.1:9".into()),
        timeout_ms: 500,
        ..RemoteConfig::default()
    };
    let calc = RemoteCalculator::new(&config).unwrap();
    assert_eq!(calc.url(), "http://127.0.0.1:9/api/mortgage/calculate");

    let result = calc.calculate(&sample_loan()).await.unwrap();
    assert_eq!(result, compute_payment(&sample_loan()).unwrap());
}

#[tokio::test]
async fn test_invalid_input_is_rejected_without_a_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST).path("/api/mortgage/calculate");
        then.status(200);
    })
    .await;

    let calc = build_calculator(&remote_config(&server, 2000)).unwrap();
    let mut inputs = sample_loan();
    inputs.term_years = 0;

    let err = calc.calculate(&inputs).await.unwrap_err();
    assert!(matches!(err, HomeFinanceError::InvalidInput { .. }));
    mock.assert_hits_async(0).await;
}
