use serde::{Deserialize, Serialize};

use crate::{DEFAULT_FALLBACK_MESSAGE, TRANSPORT_FALLBACK_STATUS};

/// Classification policy for one observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Message for status codes the classifier table does not know.
    pub fallback_message: String,
    /// Status code classified when a cycle fails without a response.
    pub transport_fallback_status: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            transport_fallback_status: TRANSPORT_FALLBACK_STATUS,
        }
    }
}
