//! # ShadowLink
//!
//! URL cloaking toolkit: shortens a target URL through several external
//! shortening services and rewrites each short link so a chosen domain and
//! keyword appear in its authority, while the real connection target stays
//! the shortener's host.
//!
//! ## Architecture
//!
//! The crate follows a layered layout with the pure core kept free of I/O:
//!
//! - **Domain Layer** ([`domain`]) - Validated value types, input
//!   validation, and the masking transform
//! - **Application Layer** ([`application`]) - The [`CloakService`]
//!   orchestrator that fans out to all backends and aggregates results
//! - **Infrastructure Layer** ([`infrastructure`]) - Shortening provider
//!   integrations behind the `ShorteningBackend` trait
//! - **Output Layer** ([`output`]) - Console/JSON/CSV renderings
//!
//! ## Pipeline
//!
//! ```text
//! (url, domain, keyword) -> validation -> CloakService -> backends
//!                                 -> mask each success -> CloakOutcome
//! ```
//!
//! Validation gates what the orchestrator may send; the orchestrator's
//! shortened URLs are the sole input to the masking transform. Partial
//! success (some services down) is the expected steady state and is
//! reported as success with an accompanying failure list.
//!
//! ## Configuration
//!
//! Settings are merged from defaults, system and user config files, and
//! `SHADOWLINK_*` environment variables; see [`config`].
//!
//! [`CloakService`]: application::services::CloakService

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod output;

pub use error::{BackendError, CloakError, MaskingError, ValidationError};

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for the binary and
/// integration tests.
pub mod prelude {
    pub use crate::application::services::CloakService;
    pub use crate::config::ShadowlinkConfig;
    pub use crate::domain::masking::mask;
    pub use crate::domain::validation::{validate_domain, validate_keyword, validate_url};
    pub use crate::domain::values::{
        CloakOutcome, CloakRequest, DisguiseDomain, Keyword, MaskedUrl, TargetUrl,
    };
    pub use crate::error::{BackendError, CloakError, MaskingError, ValidationError};
    pub use crate::infrastructure::shorteners::ShorteningBackend;
    pub use crate::output::{CloakReport, OutputFormat, OutputFormatter};
}
