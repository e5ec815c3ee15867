//! The query session behind `snmp_get`.
//!
//! [`run`] opens one session, issues one GET per OID in argument order and
//! writes exactly one stdout line for each: the rendered value, or a blank
//! line when the agent reported an error for that OID. Fatal conditions stop
//! the loop early. The session is closed exactly once on every path that
//! opened it.

use std::future::Future;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use tracing::instrument;

use crate::cli::hints::parse_oid;
use crate::client::{Auth, Client, ClientBuilder};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::format::render;
use crate::transport::{Transport, UdpTransport};
use crate::varbind::VarBind;
use crate::version::Version;

/// Everything needed to run one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Agent host or address, optionally with a port.
    pub address: String,
    pub community: String,
    /// Per-attempt response timeout, also the limit on opening the session.
    pub timeout: Duration,
    /// Retries after a timeout.
    pub retries: u32,
    pub version: Version,
    /// Port used when `address` has none.
    pub port: u16,
    /// OID arguments, verbatim.
    pub oids: Vec<String>,
}

impl Query {
    fn auth(&self) -> Auth {
        match self.version {
            Version::V1 => Auth::v1(self.community.as_str()),
            Version::V2c => Auth::v2c(self.community.as_str()),
        }
    }

    /// A [`ClientBuilder`] configured for this query.
    pub fn builder(&self) -> ClientBuilder {
        ClientBuilder::new(self.address.as_str(), self.auth())
            .port(self.port)
            .timeout(self.timeout)
            .retry(self.retries)
    }
}

/// Opens the session a query runs on.
pub trait Opener {
    type Transport: Transport;

    fn open(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Client<Self::Transport>>> + Send;
}

/// Opens a UDP session to the query's agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpOpener;

impl Opener for UdpOpener {
    type Transport = UdpTransport;

    async fn open(&self, query: &Query) -> Result<Client<UdpTransport>> {
        query.builder().connect().await
    }
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Every OID was processed, whatever the agent answered.
    Success = 0,
    Failure = 1,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// Conditions that end the run with [`Exit::Failure`].
///
/// `Display` is the diagnostic line written to stderr.
#[derive(Debug, thiserror::Error)]
pub enum Fatal {
    #[error("{}", session_failure("Session open", .0))]
    Open(Error),

    #[error("Invalid oid specified: {0}")]
    InvalidOid(String),

    #[error("Failed to allocate binding list for {0}")]
    Resource(String),

    #[error("{}", session_failure("GET request", .0))]
    Request(Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn session_failure(operation: &str, err: &Error) -> String {
    if err.is_timeout() {
        "Timeout".to_owned()
    } else {
        format!("{} failed, error {}", operation, err.code())
    }
}

/// Result of one GET that did not end the run.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// Rendered value for stdout.
    Value(String),
    /// Diagnostic for stderr; stdout gets a blank line.
    Failed(String),
}

/// Classify the agent's answer for `oid`.
fn classify(oid: &str, response: Result<Vec<VarBind>>) -> std::result::Result<Outcome, Fatal> {
    match response {
        Ok(varbinds) => match varbinds.first() {
            // v2c agents report a missing object in the binding, not the status
            Some(vb) if vb.value.is_exception() => Ok(Outcome::Failed(failed(
                oid,
                ErrorStatus::NoSuchName,
            ))),
            Some(vb) => Ok(Outcome::Value(render(&vb.value))),
            None => Err(Fatal::Request(Error::decode(
                0,
                DecodeErrorKind::EmptyResponse,
            ))),
        },
        Err(Error::Snmp { status, .. }) => Ok(Outcome::Failed(failed(oid, status))),
        Err(e) => Err(Fatal::Request(e)),
    }
}

fn failed(oid: &str, status: ErrorStatus) -> String {
    match status {
        ErrorStatus::TooBig => format!(
            "Failed to get value for {}: target system could not place the results into a single message",
            oid
        ),
        ErrorStatus::NoSuchName => {
            format!("Failed to get value for {}: oid unknown to target system", oid)
        }
        other => format!("Failed to get value for {}: {}", oid, other.as_i32()),
    }
}

/// Run `query` against a session from `opener`, writing values to `out` and
/// diagnostics to `err`.
///
/// # Example
///
/// ```rust,no_run
/// use snmp_get::query::{Query, UdpOpener, run};
/// use snmp_get::Version;
/// use std::time::Duration;
///
/// # async fn example() {
/// let query = Query {
///     address: "10.0.0.5".into(),
///     community: "public".into(),
///     timeout: Duration::from_millis(2000),
///     retries: 1,
///     version: Version::V1,
///     port: 161,
///     oids: vec!["1.3.6.1.2.1.1.1.0".into(), "sysName.0".into()],
/// };
/// let exit = run(&query, &UdpOpener, &mut std::io::stdout(), &mut std::io::stderr()).await;
/// # }
/// ```
#[instrument(level = "debug", skip_all, fields(snmp.target = %query.address, snmp.oid_count = query.oids.len()))]
pub async fn run<O, W, E>(query: &Query, opener: &O, out: &mut W, err: &mut E) -> Exit
where
    O: Opener,
    W: Write,
    E: Write,
{
    let client = match opener.open(query).await {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(target: "snmp_get::query", { error = %e }, "session open failed");
            report(err, &Fatal::Open(e));
            return Exit::Failure;
        }
    };

    let result = get_all(&client, query, out, err).await;
    if let Err(fatal) = &result {
        tracing::debug!(target: "snmp_get::query", { error = ?fatal }, "query aborted");
        report(err, fatal);
    }

    client.close().await;

    match result {
        Ok(()) => Exit::Success,
        Err(_) => Exit::Failure,
    }
}

async fn get_all<T, W, E>(
    client: &Client<T>,
    query: &Query,
    out: &mut W,
    err: &mut E,
) -> std::result::Result<(), Fatal>
where
    T: Transport,
    W: Write,
    E: Write,
{
    for text in &query.oids {
        match get_one(client, text).await? {
            Outcome::Value(line) => writeln!(out, "{}", line)?,
            Outcome::Failed(diagnostic) => {
                writeln!(err, "{}", diagnostic)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

#[instrument(level = "debug", skip(client), fields(snmp.oid = %text))]
async fn get_one<T: Transport>(
    client: &Client<T>,
    text: &str,
) -> std::result::Result<Outcome, Fatal> {
    let oid = parse_oid(text).map_err(|e| {
        tracing::debug!(target: "snmp_get::query", { error = %e }, "OID conversion failed");
        Fatal::InvalidOid(text.to_owned())
    })?;

    let mut varbinds = Vec::new();
    varbinds
        .try_reserve_exact(1)
        .map_err(|_| Fatal::Resource(text.to_owned()))?;
    varbinds.push(VarBind::null(oid));

    // The request list moves into the client; the response list is dropped
    // when this function returns.
    classify(text, client.get_varbinds(varbinds).await)
}

fn report<E: Write>(err: &mut E, fatal: &Fatal) {
    // Nothing else can be done if stderr itself is gone.
    let _ = writeln!(err, "{}", fatal);
    let _ = err.flush();
}
