//! Core driver-facing types for symtrace
//!
//! This crate defines what the verification driver needs from the outside
//! world: its configuration, the [`Frontend`] and [`Verifier`] collaborator
//! traits, and subprocess-backed implementations of both that exchange JSON
//! with external executables. The driver itself lives in the `symtrace`
//! crate; everything here is free of analysis logic.

pub mod config;
pub mod external;
pub mod frontend;
pub mod verifier;

pub use config::DriverConfig;
pub use external::{ExternalFrontend, ExternalVerifier};
pub use frontend::{Frontend, FrontendError};
pub use verifier::{Verifier, VerifierError, VerifyOutcome};
