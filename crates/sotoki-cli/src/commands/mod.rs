//! Command handlers for the `sotoki` binary.
//!
//! Each handler maps its arguments onto one library pipeline and prints a
//! short summary on stdout. Errors go back to `main` for exit-code mapping.

pub mod build;
pub mod inspect;
pub mod load;
