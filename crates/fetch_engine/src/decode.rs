use serde::de::DeserializeOwned;

use crate::{FailureKind, FetchError, FetchOutput};

/// Parse a fetched body as JSON into the payload type.
///
/// A body that does not match `T` is a transport-level failure: it carries no
/// HTTP status of its own.
pub fn decode_json<T: DeserializeOwned>(output: &FetchOutput) -> Result<T, FetchError> {
    serde_json::from_slice(&output.bytes).map_err(|err| {
        FetchError::new(
            FailureKind::Decode,
            format!("{} ({} bytes)", err, output.metadata.byte_len),
        )
    })
}
