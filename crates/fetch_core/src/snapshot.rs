use serde::Serialize;

/// Externally visible tri-state result of the most recent fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSnapshot<T> {
    pub loading: bool,
    pub error_message: Option<String>,
    pub data: Option<T>,
}

impl<T> RequestSnapshot<T> {
    /// Snapshot adopted for every new key and restored on detach.
    pub fn initial() -> Self {
        Self {
            loading: true,
            error_message: None,
            data: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

impl<T> Default for RequestSnapshot<T> {
    fn default() -> Self {
        Self::initial()
    }
}
