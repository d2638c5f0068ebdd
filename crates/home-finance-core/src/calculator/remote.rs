use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LocalCalculator, PaymentCalculator, RemoteConfig};
use crate::error::HomeFinanceError;
use crate::mortgage::amortization::{validate_loan_inputs, LoanInputs, PaymentBreakdown};
use crate::types::Money;
use crate::HomeFinanceResult;

/// Wire body of the payment endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRequest {
    #[serde(with = "rust_decimal::serde::float")]
    principal: Money,
    #[serde(with = "rust_decimal::serde::float")]
    interest_rate: Decimal,
    loan_term: u32,
}

/// Only the headline figures are read; any schedule in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteResponse {
    monthly_payment: Money,
    total_payment: Money,
    total_interest: Money,
}

/// Payment calculation delegated to a pricing service, falling back to the
/// local engine on any transport, status or decoding failure.
#[derive(Debug, Clone)]
pub struct RemoteCalculator {
    client: Client,
    url: String,
    fallback: LocalCalculator,
}

impl RemoteCalculator {
    pub fn new(config: &RemoteConfig) -> HomeFinanceResult<Self> {
        let url = config.url()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url,
            fallback: LocalCalculator,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, inputs: &LoanInputs) -> HomeFinanceResult<PaymentBreakdown> {
        let body = RemoteRequest {
            principal: inputs.principal,
            interest_rate: inputs.annual_interest_rate_percent,
            loan_term: inputs.term_years,
        };

        tracing::debug!(url = %self.url, "requesting remote payment calculation");
        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        tracing::debug!(%status, "remote calculation responded");

        if !status.is_success() {
            return Err(HomeFinanceError::Remote(format!(
                "request failed with status {status}"
            )));
        }

        let payload: RemoteResponse = response.json().await?;
        if payload.monthly_payment <= Decimal::ZERO
            || payload.total_payment < Decimal::ZERO
            || payload.total_interest < Decimal::ZERO
        {
            return Err(HomeFinanceError::Remote(format!(
                "implausible figures in response: {payload:?}"
            )));
        }

        Ok(PaymentBreakdown {
            monthly_payment: payload.monthly_payment,
            total_payment: payload.total_payment,
            total_interest: payload.total_interest,
        })
    }
}

#[async_trait]
impl PaymentCalculator for RemoteCalculator {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn calculate(&self, inputs: &LoanInputs) -> HomeFinanceResult<PaymentBreakdown> {
        // Bad input is the caller's problem, not a reason to fall back.
        validate_loan_inputs(inputs)?;

        match self.request(inputs).await {
            Ok(breakdown) => Ok(breakdown),
            Err(e) => {
                tracing::warn!(error = %e, url = %self.url, "remote calculation unavailable, using local engine");
                self.fallback.calculate(inputs).await
            }
        }
    }
}
