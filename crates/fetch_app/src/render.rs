use fetch_core::{FetchPhase, RequestKey, RequestSnapshot};
use fetch_engine::SnapshotSink;
use serde::Serialize;
use tokio::sync::mpsc;

/// A published snapshot together with the key it was published for.
pub type Publication<T> = (Option<RequestKey>, RequestSnapshot<T>);

/// Key column for the reset published on detach.
pub const DETACHED_KEY: &str = "-";

/// Forwards publications to the app loop, which owns stdout.
pub struct ChannelSink<T> {
    tx: mpsc::UnboundedSender<Publication<T>>,
}

impl<T> ChannelSink<T> {
    pub fn new(tx: mpsc::UnboundedSender<Publication<T>>) -> Self {
        Self { tx }
    }
}

impl<T: Clone + Send + Sync> SnapshotSink<T> for ChannelSink<T> {
    fn publish(&self, key: Option<&str>, snapshot: &RequestSnapshot<T>) {
        let _ = self.tx.send((key.map(str::to_string), snapshot.clone()));
    }
}

/// One output line: the key, the phase and the snapshot as JSON.
pub fn render_line<T: Serialize>(
    key: Option<&str>,
    snapshot: &RequestSnapshot<T>,
) -> Result<String, serde_json::Error> {
    let key = key.unwrap_or(DETACHED_KEY);
    let phase = match snapshot.phase() {
        FetchPhase::Loading => "loading",
        FetchPhase::Failed => "failed",
        FetchPhase::Ready => "ready",
        FetchPhase::Idle => "idle",
    };
    Ok(format!("{key}\t{phase}\t{}", serde_json::to_string(snapshot)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_settled_snapshot() {
        let snapshot = RequestSnapshot {
            loading: false,
            error_message: None,
            data: Some(serde_json::json!([{ "id": 1 }])),
        };
        assert_eq!(
            render_line(Some("/api/users"), &snapshot).unwrap(),
            "/api/users\tready\t{\"loading\":false,\"error_message\":null,\"data\":[{\"id\":1}]}"
        );
    }

    #[test]
    fn renders_failure() {
        let snapshot = RequestSnapshot::<serde_json::Value> {
            loading: false,
            error_message: Some("Forbidden!".to_string()),
            data: None,
        };
        assert!(render_line(Some("/x"), &snapshot)
            .unwrap()
            .starts_with("/x\tfailed\t"));
    }

    #[test]
    fn renders_detach_reset_without_key() {
        let line = render_line(None, &RequestSnapshot::<serde_json::Value>::initial()).unwrap();
        assert_eq!(
            line,
            "-\tloading\t{\"loading\":true,\"error_message\":null,\"data\":null}"
        );
    }

    #[test]
    fn channel_sink_forwards_the_key() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        let snapshot = RequestSnapshot::<serde_json::Value>::initial();

        sink.publish(Some("/a"), &snapshot);
        sink.publish(None, &snapshot);

        assert_eq!(rx.try_recv().unwrap(), (Some("/a".to_string()), snapshot.clone()));
        assert_eq!(rx.try_recv().unwrap(), (None, snapshot));
    }
}
