// printsync-api: Async clients for the Cirrato PMC and the SysMan printer API

pub mod encoding;
pub mod error;
pub mod pmc;
pub mod process;
pub mod sysman;
pub mod transport;

pub use encoding::OutputEncoding;
pub use error::Error;
pub use pmc::{PmcClient, PmcOutcome};
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use sysman::{BasicCredentials, SysManClient};
pub use transport::{TlsMode, TransportConfig};
