//! Integrations with external systems.
//!
//! Currently only the URL shortening providers live here; see
//! [`shorteners`].

pub mod shorteners;
