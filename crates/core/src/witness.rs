//! Witness codes.
//!
//! When the donor signs, the certificate provider (or an independent
//! witness) is sent a four digit code and the donor enters it to show the
//! signing was witnessed. Guesses are bounded by the [`Limiter`] stored on
//! the donor's details.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::donor::Provided;
use crate::limiter::Limiter;
use crate::validation::FieldError;

/// How long a witness code can be used for.
pub const WITNESS_CODE_EXPIRY: Duration = Duration::minutes(15);

/// How long to wait before another code can be sent.
pub const WITNESS_CODE_RESEND_INTERVAL: Duration = Duration::minutes(1);

/// Name of the form field the code is entered in.
pub const WITNESS_CODE_FIELD: &str = "witness-code";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessCode {
    pub code: String,
    pub created: DateTime<Utc>,
}

impl WitnessCode {
    #[must_use]
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created) > WITNESS_CODE_EXPIRY
    }
}

/// Every code sent to one witness, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessCodes(Vec<WitnessCode>);

impl WitnessCodes {
    /// The most recent code with the value `code`.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&WitnessCode> {
        self.0
            .iter()
            .filter(|witness_code| witness_code.code == code)
            .max_by_key(|witness_code| witness_code.created)
    }

    /// Create a new code, add it to the list and return it.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> String {
        let code = format!("{:04}", rng.random_range(0..10_000_u32));
        self.0.push(WitnessCode {
            code: code.clone(),
            created: now,
        });
        code
    }

    /// Whether enough time has passed since the last code to send another.
    #[must_use]
    pub fn can_request(&self, now: DateTime<Utc>) -> bool {
        self.0.last().is_none_or(|last| {
            now.signed_duration_since(last.created) >= WITNESS_CODE_RESEND_INTERVAL
        })
    }

    #[must_use]
    pub fn latest(&self) -> Option<&WitnessCode> {
        self.0.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<WitnessCode>> for WitnessCodes {
    fn from(codes: Vec<WitnessCode>) -> Self {
        Self(codes)
    }
}

/// Who witnessed the donor signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WitnessingActor {
    CertificateProvider,
    IndependentWitness,
}

impl WitnessingActor {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CertificateProvider => "certificate-provider",
            Self::IndependentWitness => "independent-witness",
        }
    }
}

impl fmt::Display for WitnessingActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown witness: {0:?}")]
pub struct UnknownWitnessingActor(pub String);

impl FromStr for WitnessingActor {
    type Err = UnknownWitnessingActor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "certificate-provider" => Ok(Self::CertificateProvider),
            "independent-witness" => Ok(Self::IndependentWitness),
            other => Err(UnknownWitnessingActor(other.to_string())),
        }
    }
}

/// Check a submitted witness code with the standard limits.
///
/// # Errors
///
/// Returns the [`FieldError`] to show against the `witness-code` field.
pub fn check_witness_code(
    provided: &mut Provided,
    actor: WitnessingActor,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), FieldError> {
    check_witness_code_with(provided, actor, submitted, now, Limiter::witness_code)
}

/// Check a submitted witness code, creating the limiter with `new_limiter`
/// if this is the first attempt.
///
/// An empty submission is rejected without counting as an attempt. Every
/// other submission is counted, and the limiter is checked before the code
/// itself. A matching code clears the limiter and records when the signing
/// was witnessed.
///
/// The caller must save `provided` whatever the outcome, so the attempt is
/// remembered.
///
/// # Errors
///
/// Returns the [`FieldError`] to show against the `witness-code` field.
pub fn check_witness_code_with(
    provided: &mut Provided,
    actor: WitnessingActor,
    submitted: &str,
    now: DateTime<Utc>,
    new_limiter: impl FnOnce() -> Limiter,
) -> Result<(), FieldError> {
    let submitted = submitted.trim();
    if submitted.is_empty() {
        return Err(FieldError::enter("witnessCode"));
    }

    let limiter = provided.witness_code_limiter.get_or_insert_with(new_limiter);
    if !limiter.allow(now) {
        return Err(FieldError::custom("tooManyWitnessCodeAttempts"));
    }

    let codes = match actor {
        WitnessingActor::CertificateProvider => &provided.certificate_provider_codes,
        WitnessingActor::IndependentWitness => &provided.independent_witness_codes,
    };

    let Some(code) = codes.find(submitted) else {
        return Err(FieldError::custom("witnessCodeDoesNotMatch"));
    };

    if code.has_expired(now) {
        return Err(FieldError::custom("witnessCodeExpired"));
    }

    provided.witness_code_limiter = None;
    match actor {
        WitnessingActor::CertificateProvider => {
            provided.witnessed_by_certificate_provider_at = Some(now);
        }
        WitnessingActor::IndependentWitness => {
            provided.witnessed_by_independent_witness_at = Some(now);
        }
    }

    Ok(())
}
