//! Validated value types flowing through the cloaking pipeline.
//!
//! Each newtype can only be constructed through the checks in
//! [`crate::domain::validation`], so holding one is proof the contained
//! string already passed its syntactic rules.

use std::fmt;

use crate::domain::validation;
use crate::error::ValidationError;

/// Default upper bound for keyword length, overridable via configuration.
pub const DEFAULT_MAX_KEYWORD_LENGTH: usize = 15;

/// A target URL that passed [`validation::validate_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUrl`] with a specific reason.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validation::validate_url(raw)
    }

    /// Constructs without re-validating. Only for use by the validator.
    pub(crate) fn from_validated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A disguise domain that passed [`validation::validate_domain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisguiseDomain(String);

impl DisguiseDomain {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDomain`] with a specific reason.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validation::validate_domain(raw)
    }

    pub(crate) fn from_validated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisguiseDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A masking keyword that passed [`validation::validate_keyword`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword(String);

impl Keyword {
    /// Validates `raw` against `max_length` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidKeyword`] with a specific reason.
    pub fn parse(raw: &str, max_length: usize) -> Result<Self, ValidationError> {
        validation::validate_keyword(raw, max_length)
    }

    pub(crate) fn from_validated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully masked URL ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedUrl(String);

impl MaskedUrl {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MaskedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of work for the orchestrator: the three validated inputs.
///
/// Constructed once, consumed once, never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloakRequest {
    pub target: TargetUrl,
    pub domain: DisguiseDomain,
    pub keyword: Keyword,
}

impl CloakRequest {
    pub fn new(target: TargetUrl, domain: DisguiseDomain, keyword: Keyword) -> Self {
        Self {
            target,
            domain,
            keyword,
        }
    }
}

/// Result of one cloak request: masked links plus per-service failures.
///
/// Both lists follow backend registration order. At least one masked URL is
/// always present; a fully failed request surfaces as
/// [`crate::error::CloakError::AllBackendsFailed`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloakOutcome {
    pub masked_urls: Vec<MaskedUrl>,
    pub failures: Vec<crate::error::BackendError>,
}

impl CloakOutcome {
    /// True when at least one backend failed while others succeeded.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
