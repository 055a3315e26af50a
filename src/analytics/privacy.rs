//! Laplace-mechanism estimates of ledger aggregates.
//!
//! Every call draws fresh noise; no privacy budget is tracked across calls.

use std::collections::HashSet;
use std::str::FromStr;

use indexmap::IndexMap;
use rand::{distributions::Open01, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::vote::Vote;

/// Privacy parameters. Both must be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrivacyParams {
    epsilon: f64,
    sensitivity: f64,
}

impl PrivacyParams {
    pub fn new(epsilon: f64, sensitivity: f64) -> Result<Self> {
        // Negated comparisons also reject NaN.
        if !(epsilon > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "epsilon must be > 0, got {epsilon}"
            )));
        }
        if !(sensitivity > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "sensitivity must be > 0, got {sensitivity}"
            )));
        }
        Ok(Self {
            epsilon,
            sensitivity,
        })
    }

    /// The Laplace scale `sensitivity / epsilon`.
    pub fn scale(&self) -> f64 {
        self.sensitivity / self.epsilon
    }
}

/// Inverse CDF of Laplace(0, scale) at `u`, where `u` lies in (-0.5, 0.5).
pub fn laplace_inverse_cdf(u: f64, scale: f64) -> f64 {
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
}

/// Draw one sample from Laplace(0, scale).
pub fn laplace_noise<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    let u: f64 = rng.sample::<f64, _>(Open01) - 0.5;
    laplace_inverse_cdf(u, scale)
}

/// Number of distinct voters appearing in the ledger.
pub fn turnout(votes: &[Vote]) -> usize {
    votes
        .iter()
        .map(|v| v.voter_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn noisy_turnout<R: Rng + ?Sized>(rng: &mut R, votes: &[Vote], params: PrivacyParams) -> f64 {
    turnout(votes) as f64 + laplace_noise(rng, params.scale())
}

/// Perturb each total with its own independent draw.
pub fn noisy_per_candidate<R: Rng + ?Sized>(
    rng: &mut R,
    totals: IndexMap<String, f64>,
    params: PrivacyParams,
) -> IndexMap<String, f64> {
    totals
        .into_iter()
        .map(|(candidate, total)| (candidate, total + laplace_noise(rng, params.scale())))
        .collect()
}

/// The aggregate a differential-privacy query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpMetric {
    Turnout,
    PerCandidate,
}

impl FromStr for DpMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "turnout" => Ok(Self::Turnout),
            "per_candidate" => Ok(Self::PerCandidate),
            other => Err(Error::InvalidArgument(format!("Unknown metric '{other}'"))),
        }
    }
}

/// A differential-privacy query. Missing parameters take the configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpRequest {
    pub metric: String,
    #[serde(default)]
    pub epsilon: Option<f64>,
    #[serde(default)]
    pub sensitivity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DpValue {
    Scalar(f64),
    PerCandidate(IndexMap<String, f64>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpResult {
    pub metric: DpMetric,
    pub value: DpValue,
}
