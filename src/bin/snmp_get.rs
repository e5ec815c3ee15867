//! snmp_get: read OID values from an SNMP agent.
//!
//! ```text
//! snmp_get <IP_ADDRESS> <COMMUNITY> <MS_TIMEOUT> <RETRIES> <OID> [<OID> ..]
//! ```

use clap::Parser;
use snmp_get::cli::args::{Args, USAGE};
use snmp_get::query::{Exit, UdpOpener, run};
use std::io::Write;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version are short invocations like any other
        Err(e) => {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", USAGE);
            if args_requested_detail() {
                let _ = writeln!(stderr, "\n{}", e.render());
            }
            return Exit::Failure.into();
        }
    };

    args.init_tracing();

    let query = args.into_query();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();
    run(&query, &UdpOpener, &mut stdout, &mut stderr).await.into()
}

/// Whether -d/-D appeared, in which case clap's own explanation follows the usage text.
fn args_requested_detail() -> bool {
    std::env::args()
        .skip(1)
        .any(|a| matches!(a.as_str(), "-d" | "--debug" | "-D" | "--trace"))
}
