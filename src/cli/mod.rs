//! Command-line front end for the `snmp_get` binary.
//!
//! - [`args`] - clap argument definitions and tracing setup
//! - [`hints`] - OID argument parsing, including well-known names

pub mod args;
pub mod hints;
