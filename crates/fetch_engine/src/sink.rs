use fetch_core::RequestSnapshot;

/// Receives every snapshot an observer publishes, in publication order.
///
/// `key` is the request key the snapshot belongs to; it is `None` for the
/// reset published on detach. Called from the observer task; implementations
/// must not block.
pub trait SnapshotSink<T>: Send + Sync {
    fn publish(&self, key: Option<&str>, snapshot: &RequestSnapshot<T>);
}
