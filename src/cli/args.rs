//! Command-line arguments for `snmp_get`.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::Version;
use crate::client::{DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::query::Query;

/// Short usage text printed for any argument error.
pub const USAGE: &str = "Usage:\nsnmp_get <IP_ADDRESS> <COMMUNITY> <MS_TIMEOUT> <RETRIES> <OID> [<OID> ..]";

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1 (default)
    #[default]
    #[value(name = "1")]
    V1,
    /// SNMPv2c
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Read the current value of one or more OIDs from an SNMP agent.
///
/// Prints one line per OID on stdout, in argument order. A value that could
/// not be read leaves its line blank and is explained on stderr.
#[derive(Debug, Parser)]
#[command(name = "snmp_get", version, about)]
pub struct Args {
    /// Agent host name or address, optionally with ":port".
    #[arg(value_name = "IP_ADDRESS", allow_hyphen_values = true)]
    pub address: String,

    /// Community string.
    #[arg(value_name = "COMMUNITY", allow_hyphen_values = true)]
    pub community: String,

    /// Response timeout in milliseconds (0 selects the 5 second default).
    #[arg(value_name = "MS_TIMEOUT", allow_hyphen_values = true)]
    pub timeout_ms: u32,

    /// Number of retries after a timeout.
    #[arg(value_name = "RETRIES", allow_hyphen_values = true)]
    pub retries: u32,

    /// OIDs to read (dotted notation or well-known names such as sysDescr.0).
    #[arg(required = true, value_name = "OID", allow_hyphen_values = true)]
    pub oids: Vec<String>,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "1")]
    pub snmp_version: SnmpVersion,

    /// Agent port, used when IP_ADDRESS has none.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Enable debug logging (snmp_get=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_get=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl Args {
    /// Initialize tracing on stderr based on the debug/trace flags.
    ///
    /// `RUST_LOG`, when set, replaces the flag-derived filter.
    pub fn init_tracing(&self) {
        use std::io::IsTerminal;
        use tracing_subscriber::EnvFilter;

        let filter = if self.trace {
            "snmp_get=trace"
        } else if self.debug {
            "snmp_get=debug"
        } else {
            "snmp_get=warn"
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init();
    }

    /// Get the timeout as a Duration.
    pub fn timeout_duration(&self) -> Duration {
        match self.timeout_ms {
            0 => DEFAULT_TIMEOUT,
            ms => Duration::from_millis(u64::from(ms)),
        }
    }

    /// The query these arguments describe.
    pub fn into_query(self) -> Query {
        Query {
            timeout: self.timeout_duration(),
            address: self.address,
            community: self.community,
            retries: self.retries,
            version: self.snmp_version.into(),
            port: self.port,
            oids: self.oids,
        }
    }
}
