//! Pure core of the cloaking pipeline.
//!
//! Nothing in this module performs I/O:
//!
//! - [`values`] - validated value types and the cloak request/outcome pair
//! - [`validation`] - syntactic checks for the three user-supplied inputs
//! - [`masking`] - the userinfo-injection transform over shortened URLs

pub mod masking;
pub mod validation;
pub mod values;
