use crate::downloader::{self, DEFAULT_DOWNLOAD_TIMEOUT};
use crate::model::{DownloadResult, ImageDescriptor, StoredImage};
use crate::progress::ProgressReporter;
use crate::store::ImageStore;
use crate::utils::stats::StatsTimer;
use futures_util::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Downloads a batch of search results concurrently, then stores them in order.
pub struct Harvester {
    client: Client,
    timeout: Duration,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub requested: usize,
    pub downloaded: usize,
    pub stored: usize,
}

impl Harvester {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one batch:
    /// 1. Start a download for every descriptor at once (no cap)
    /// 2. Wait for all of them; results stay index-aligned with `descriptors`
    /// 3. Insert each successful payload sequentially as `image_<position>.jpg`
    ///
    /// A failed download leaves a gap in the numbering. A failed insert is
    /// logged and the remaining rows are still written.
    pub async fn fetch_and_store<S>(
        &self,
        descriptors: &[ImageDescriptor],
        store: &mut S,
        reporter: &dyn ProgressReporter,
    ) -> BatchSummary
    where
        S: ImageStore + ?Sized,
    {
        let mut download_timer = StatsTimer::new();
        reporter.on_download_start(descriptors.len());
        let results = self.download_all(descriptors, reporter).await;
        download_timer.finish();

        let downloaded = results.iter().filter(|r| r.is_some()).count();
        reporter.on_download_complete(
            downloaded,
            descriptors.len(),
            download_timer.get_duration_secs() as f64,
        );
        debug!(
            "Downloads finished in {}, {}/{} succeeded",
            download_timer.get_duration_string(),
            downloaded,
            descriptors.len()
        );

        let mut store_timer = StatsTimer::new();
        let stored = store_all(results, store);
        store_timer.finish();
        reporter.on_store_complete(stored, store_timer.get_duration_secs() as f64);

        BatchSummary {
            requested: descriptors.len(),
            downloaded,
            stored,
        }
    }

    /// Download every thumbnail concurrently over the shared client.
    ///
    /// The returned vector has one entry per descriptor, in input order,
    /// regardless of the order in which the downloads complete.
    pub async fn download_all(
        &self,
        descriptors: &[ImageDescriptor],
        reporter: &dyn ProgressReporter,
    ) -> Vec<DownloadResult> {
        let client = &self.client;
        let timeout = self.timeout;

        let tasks = descriptors.iter().enumerate().map(|(i, descriptor)| {
            let url = descriptor.thumbnail.as_str();
            info!("[{}] downloading {}", i + 1, url);
            async move {
                let result = downloader::download(client, url, timeout).await;
                reporter.on_download_progress(i + 1, result.is_some());
                result
            }
        });

        join_all(tasks).await
    }
}

/// Insert each successful download in order, one at a time.
/// Returns the number of rows written.
pub fn store_all<S>(results: Vec<DownloadResult>, store: &mut S) -> usize
where
    S: ImageStore + ?Sized,
{
    let mut stored = 0;

    for (i, result) in results.into_iter().enumerate() {
        let Some(data) = result else {
            continue;
        };

        let image = StoredImage::at_position(i + 1, data);
        match store.insert(&image.name, &image.data) {
            Ok(()) => {
                info!("Stored {} to db", image.name);
                stored += 1;
            }
            Err(err) => error!("Error storing {}: {}", image.name, err),
        }
    }

    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::testing::CompletionOrder;
    use crate::progress::SilentReporter;
    use crate::store::testing::RecordingStore;
    use httpmock::prelude::*;

    fn descriptors(server: &MockServer, paths: &[&str]) -> Vec<ImageDescriptor> {
        paths
            .iter()
            .map(|p| ImageDescriptor::from_thumbnail(server.url(*p)))
            .collect()
    }

    fn row(name: &str, data: &[u8]) -> StoredImage {
        StoredImage {
            name: name.to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_failed_download_is_skipped_and_names_keep_original_positions() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/a.jpg");
            then.status(200).body(vec![0x01_u8, 0x02]);
        });
        let missing = server.mock(|when, then| {
            when.method(GET).path("/b.jpg");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/c.jpg");
            then.status(200).body(vec![0x03_u8]);
        });

        let mut store = RecordingStore::default();
        let summary = Harvester::new(Client::new())
            .fetch_and_store(
                &descriptors(&server, &["/a.jpg", "/b.jpg", "/c.jpg"]),
                &mut store,
                &SilentReporter,
            )
            .await;

        missing.assert();
        assert_eq!(store.insert_attempts, 2);
        assert_eq!(
            store.rows,
            vec![row("image_1.jpg", &[0x01, 0x02]), row("image_3.jpg", &[0x03])]
        );
        assert_eq!(
            summary,
            BatchSummary {
                requested: 3,
                downloaded: 2,
                stored: 2
            }
        );
    }

    #[tokio::test]
    async fn test_results_stay_aligned_when_downloads_finish_out_of_order() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/slow.jpg");
            then.status(200)
                .body(vec![1_u8])
                .delay(Duration::from_millis(800));
        });
        server.mock(|when, then| {
            when.method(GET).path("/fast.jpg");
            then.status(200).body(vec![2_u8]);
        });
        server.mock(|when, then| {
            when.method(GET).path("/medium.jpg");
            then.status(200)
                .body(vec![3_u8])
                .delay(Duration::from_millis(400));
        });

        let reporter = CompletionOrder::default();
        let mut store = RecordingStore::default();
        Harvester::new(Client::new())
            .fetch_and_store(
                &descriptors(&server, &["/slow.jpg", "/fast.jpg", "/medium.jpg"]),
                &mut store,
                &reporter,
            )
            .await;

        assert_eq!(*reporter.finished.lock().unwrap(), vec![2, 3, 1]);
        assert_eq!(
            store.rows,
            vec![
                row("image_1.jpg", &[1]),
                row("image_2.jpg", &[2]),
                row("image_3.jpg", &[3]),
            ]
        );
    }

    #[tokio::test]
    async fn test_download_all_keeps_input_order() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/one");
            then.status(200)
                .body(vec![1_u8])
                .delay(Duration::from_millis(300));
        });
        server.mock(|when, then| {
            when.method(GET).path("/two");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/three");
            then.status(200).body(vec![3_u8]);
        });

        let results = Harvester::new(Client::new())
            .download_all(&descriptors(&server, &["/one", "/two", "/three"]), &SilentReporter)
            .await;

        assert_eq!(results, vec![Some(vec![1]), None, Some(vec![3])]);
    }

    #[tokio::test]
    async fn test_timeout_only_drops_the_slow_image() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/hung.jpg");
            then.status(200)
                .body(vec![7_u8])
                .delay(Duration::from_secs(3));
        });
        server.mock(|when, then| {
            when.method(GET).path("/ok.jpg");
            then.status(200).body(vec![8_u8]);
        });

        let mut store = RecordingStore::default();
        let summary = Harvester::new(Client::new())
            .with_timeout(Duration::from_millis(250))
            .fetch_and_store(
                &descriptors(&server, &["/hung.jpg", "/ok.jpg"]),
                &mut store,
                &SilentReporter,
            )
            .await;

        assert_eq!(store.rows, vec![row("image_2.jpg", &[8])]);
        assert_eq!(summary.downloaded, 1);
    }

    #[tokio::test]
    async fn test_every_download_failing_stores_nothing() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET);
            then.status(404);
        });

        let mut store = RecordingStore::default();
        let summary = Harvester::new(Client::new())
            .fetch_and_store(
                &descriptors(&server, &["/x", "/y"]),
                &mut store,
                &SilentReporter,
            )
            .await;

        assert_eq!(store.insert_attempts, 0);
        assert_eq!(summary.stored, 0);
        assert_eq!(summary.requested, 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let mut store = RecordingStore::default();
        let summary = Harvester::new(Client::new())
            .fetch_and_store(&[], &mut store, &SilentReporter)
            .await;

        assert_eq!(summary, BatchSummary::default());
        assert_eq!(store.insert_attempts, 0);
    }

    #[test]
    fn test_store_failure_does_not_abort_remaining_rows() {
        let results = vec![Some(vec![1]), Some(vec![2]), None, Some(vec![4])];
        let mut store = RecordingStore::rejecting(&["image_2.jpg"]);

        let stored = store_all(results, &mut store);

        assert_eq!(stored, 2);
        assert_eq!(store.insert_attempts, 3);
        assert_eq!(
            store.rows,
            vec![row("image_1.jpg", &[1]), row("image_4.jpg", &[4])]
        );
    }

    #[test]
    fn test_empty_payload_counts_as_a_successful_download() {
        let results = vec![Some(Vec::new())];
        let mut store = RecordingStore::default();

        assert_eq!(store_all(results, &mut store), 1);
        assert_eq!(store.rows, vec![row("image_1.jpg", &[])]);
    }
}
