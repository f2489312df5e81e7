use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use fetch_engine::{FetchSettings, Fetcher, ObserverHandle, ReqwestFetcher};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::render::{render_line, ChannelSink, Publication};

type Publications = mpsc::UnboundedReceiver<Publication<Value>>;

pub async fn run(cli: &Cli, config: AppConfig) -> anyhow::Result<()> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(FetchSettings::from(
        &config.fetch,
    )));
    let (tx, mut publications) = mpsc::unbounded_channel();
    let handle = ObserverHandle::<Value>::spawn_with_sink(
        fetcher,
        config.observer,
        Arc::new(ChannelSink::new(tx)),
    );
    let mut out = io::stdout();

    let mut current: Option<&str> = None;
    for url in &cli.urls {
        if current == Some(url.as_str()) {
            engine_warn!("Skipping repeated key {}", url);
            continue;
        }
        current = Some(url.as_str());
        handle.observe(url.as_str());

        match cli.switch_after_ms {
            Some(ms) => {
                let window = Duration::from_millis(ms);
                print_for(&mut out, &mut publications, window).await?
            }
            None => print_until_settled(&mut out, url, &mut publications).await?,
        }
    }

    let last = handle.detach().await;
    while let Ok(publication) = publications.try_recv() {
        print_publication(&mut out, &publication)?;
    }
    engine_info!("Detached; final snapshot loading={}", last.loading);
    Ok(())
}

/// Print publications until `key` has settled. Lines queued for earlier keys
/// are printed under their own key.
async fn print_until_settled(
    out: &mut impl Write,
    key: &str,
    publications: &mut Publications,
) -> anyhow::Result<()> {
    while let Some(publication) = publications.recv().await {
        print_publication(out, &publication)?;
        let (published_key, snapshot) = &publication;
        if published_key.as_deref() == Some(key) && snapshot.is_settled() {
            break;
        }
    }
    Ok(())
}

async fn print_for(
    out: &mut impl Write,
    publications: &mut Publications,
    window: Duration,
) -> anyhow::Result<()> {
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => return Ok(()),
            Some(publication) = publications.recv() => print_publication(out, &publication)?,
        }
    }
}

fn print_publication(
    out: &mut impl Write,
    publication: &Publication<Value>,
) -> anyhow::Result<()> {
    let (key, snapshot) = publication;
    let line = render_line(key.as_deref(), snapshot).context("rendering snapshot")?;
    writeln!(out, "{line}").context("writing snapshot")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetch_core::RequestSnapshot;
    use serde_json::json;

    fn settled(data: Value) -> RequestSnapshot<Value> {
        RequestSnapshot {
            loading: false,
            error_message: None,
            data: Some(data),
        }
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn late_result_is_printed_under_its_own_key() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((Some("/a".to_string()), settled(json!("from-a"))))
            .unwrap();
        tx.send((Some("/b".to_string()), RequestSnapshot::initial()))
            .unwrap();

        let mut out = Vec::new();
        print_for(&mut out, &mut rx, Duration::from_millis(20))
            .await
            .unwrap();

        let printed = lines(out);
        assert_eq!(printed.len(), 2);
        assert!(printed[0].starts_with("/a\tready\t"));
        assert!(printed[0].ends_with(r#""data":"from-a"}"#));
        assert!(printed[1].starts_with("/b\tloading\t"));
    }

    #[tokio::test]
    async fn waits_for_the_current_key_to_settle() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((Some("/a".to_string()), settled(json!(1)))).unwrap();
        tx.send((Some("/b".to_string()), RequestSnapshot::initial()))
            .unwrap();
        tx.send((Some("/b".to_string()), settled(json!(2)))).unwrap();
        tx.send((None, RequestSnapshot::initial())).unwrap();

        let mut out = Vec::new();
        print_until_settled(&mut out, "/b", &mut rx).await.unwrap();

        let printed = lines(out);
        assert_eq!(printed.len(), 3);
        assert!(printed[0].starts_with("/a\tready\t"));
        assert!(printed[2].starts_with("/b\tready\t"));
        assert_eq!(rx.try_recv().unwrap().0, None);
    }
}
