//! Shared test infrastructure for snmp-get.
//!
//! Provides TestAgent (in-process UDP agent), fixtures, and utilities.

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

pub use agent::{TestAgent, TestAgentBuilder};
pub use fixtures::{
    COMMUNITY, SYS_DESCR_TEXT, nonexistent_oid, sys_descr, sys_name, sys_uptime, system_mib,
};
