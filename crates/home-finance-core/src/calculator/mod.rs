//! Payment calculation strategies.
//!
//! The amortisation engine is pure and always available. Deployments that
//! run a pricing service can route payment calculations through it instead;
//! the remote strategy answers from the local engine whenever the service
//! cannot, so callers never see a network failure.

mod remote;

pub use remote::RemoteCalculator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HomeFinanceError;
use crate::mortgage::amortization::{compute_payment, LoanInputs, PaymentBreakdown};
use crate::HomeFinanceResult;

/// Default path of the remote payment endpoint.
pub const DEFAULT_ENDPOINT: &str = "/api/mortgage/calculate";

/// Default per-request timeout for the remote endpoint.
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// Source of payment figures for a loan.
#[async_trait]
pub trait PaymentCalculator: Send + Sync {
    /// Short name for logs and output metadata.
    fn name(&self) -> &'static str;

    async fn calculate(&self, inputs: &LoanInputs) -> HomeFinanceResult<PaymentBreakdown>;
}

/// In-process amortisation engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalculator;

#[async_trait]
impl PaymentCalculator for LocalCalculator {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn calculate(&self, inputs: &LoanInputs) -> HomeFinanceResult<PaymentBreakdown> {
        compute_payment(inputs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Scheme and host of the pricing service, e.g. `https://api.example.com`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RemoteConfig {
    /// Full URL of the payment endpoint.
    pub fn url(&self) -> HomeFinanceResult<String> {
        let base = self
            .base_url
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| {
                HomeFinanceError::invalid("remote.base_url", "Remote mode requires a base URL")
            })?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        ))
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Which strategy to use and how to reach the remote one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub mode: CalculationMode,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Build the strategy selected by `config`.
pub fn build_calculator(config: &CalculatorConfig) -> HomeFinanceResult<Box<dyn PaymentCalculator>> {
    match config.mode {
        CalculationMode::Local => Ok(Box::new(LocalCalculator)),
        CalculationMode::Remote => Ok(Box::new(RemoteCalculator::new(&config.remote)?)),
    }
}
