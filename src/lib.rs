//! # snmp-get
//!
//! SNMP v1/v2c GET client and the library behind the `snmp_get` command.
//!
//! ## Features
//!
//! - Async client built on Tokio, one session per agent
//! - Zero-copy BER encoding/decoding
//! - Type-safe OID and value handling
//! - Line-oriented query runner with a fixed output contract ([`query`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_get::{Auth, Client, oid};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), snmp_get::Error> {
//!     let client = Client::builder("192.168.1.1", Auth::v1("public"))
//!         .timeout(Duration::from_secs(2))
//!         .retry(1)
//!         .connect()
//!         .await?;
//!
//!     let result = client.get(&oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)).await;
//!     client.close().await;
//!     println!("sysDescr: {}", result?.value);
//!
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod cli;
pub mod client;
pub mod error;
pub mod format;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod query;
pub mod transport;
pub mod value;
pub mod varbind;
pub mod version;

pub(crate) mod util;

pub use client::{Auth, Client, ClientBuilder, ClientConfig, CommunityVersion, Retry};
pub use error::{DecodeErrorKind, Error, ErrorStatus, OidErrorKind, Result};
pub use oid::Oid;
pub use pdu::{Pdu, PduType};
pub use transport::{Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;

/// Type alias for a client using a dedicated UDP socket.
pub type UdpClient = Client<UdpTransport>;
