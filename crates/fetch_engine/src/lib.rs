//! Fetch engine: HTTP transport and the observer task driving fetch cycles.
mod decode;
mod fetch;
mod observer;
mod sink;
mod types;

pub use decode::decode_json;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use observer::ObserverHandle;
pub use sink::SnapshotSink;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
