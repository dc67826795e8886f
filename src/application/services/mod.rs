//! Application services.

mod cloak_service;

pub use cloak_service::CloakService;
