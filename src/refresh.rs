//! Periodic snapshot polling with an atomic previous/current swap.
//!
//! The controller owns both snapshots: on every successful poll the
//! outgoing `current` becomes `previous` and the fetched data becomes
//! `current`, under one lock, so the pair is never observed half-updated.
//! Failed, malformed, and empty polls all leave the pair untouched; stale
//! data is preferred over a blank grid, and every tick retries
//! unconditionally.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::matrix::OddsEntry;

/// How one poll attempt failed. All variants are transient to the loop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("snapshot transport failure: {0}")]
    Transport(String),
    #[error("snapshot endpoint returned status {0}")]
    Status(u16),
    #[error("malformed snapshot body: {0}")]
    Malformed(String),
    #[error("snapshot endpoint returned no entries")]
    Empty,
}

/// Fetches the very first snapshot. An empty dataset is a hard error here:
/// there is nothing to render yet, so there is no stale data to fall back
/// on. Once rendering has started, empty polls are merely transient (see
/// [`apply_poll_result`]).
pub async fn fetch_initial(fetcher: &dyn OddsFetcher) -> Result<Vec<OddsEntry>, FetchError> {
    let entries = fetcher.fetch().await?;
    if entries.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(entries)
}

#[async_trait]
pub trait OddsFetcher: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<OddsEntry>, FetchError>;
}

/// Fetches the snapshot endpoint over HTTP and decodes the wire JSON.
pub struct HttpOddsFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpOddsFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl OddsFetcher for HttpOddsFetcher {
    async fn fetch(&self) -> Result<Vec<OddsEntry>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<OddsEntry>>()
            .await
            .map_err(|err| FetchError::Malformed(err.to_string()))
    }
}

/// Poll loop state as observed between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    Fetching,
    FetchFailed,
}

#[derive(Debug)]
struct HistoryInner {
    current: Vec<OddsEntry>,
    previous: Option<Vec<OddsEntry>>,
    status: RefreshStatus,
}

/// The current and previous snapshot behind a single lock.
///
/// On first paint there is no previous snapshot; every cell renders
/// neutral.
#[derive(Clone)]
pub struct SnapshotHistory {
    inner: Arc<RwLock<HistoryInner>>,
}

impl SnapshotHistory {
    pub fn new(initial: Vec<OddsEntry>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HistoryInner {
                current: initial,
                previous: None,
                status: RefreshStatus::Idle,
            })),
        }
    }

    /// Clones both snapshots under one read guard, so the pair is always a
    /// consistent observation.
    pub fn snapshot_pair(&self) -> (Vec<OddsEntry>, Option<Vec<OddsEntry>>) {
        let guard = self
            .inner
            .read()
            .expect("snapshot history lock should not be poisoned");
        (guard.current.clone(), guard.previous.clone())
    }

    pub fn status(&self) -> RefreshStatus {
        self.inner
            .read()
            .expect("snapshot history lock should not be poisoned")
            .status
    }

    /// Rolls the history forward: previous ← current, current ← `next`,
    /// in one write so partially-applied states are never observable.
    pub fn commit(&self, next: Vec<OddsEntry>) {
        let mut guard = self
            .inner
            .write()
            .expect("snapshot history lock should not be poisoned");
        let outgoing = std::mem::replace(&mut guard.current, next);
        guard.previous = Some(outgoing);
        guard.status = RefreshStatus::Idle;
    }

    fn set_status(&self, status: RefreshStatus) {
        self.inner
            .write()
            .expect("snapshot history lock should not be poisoned")
            .status = status;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub refresh_interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(5_000),
        }
    }
}

/// Applies one resolved poll to the history.
///
/// `seq` is the monotonic number the request was issued with and
/// `latest_issued` the newest number issued so far: a success whose `seq`
/// is no longer the latest is discarded, so a slow early fetch resolving
/// after a fast later one cannot roll the grid backward.
pub fn apply_poll_result(
    history: &SnapshotHistory,
    result: Result<Vec<OddsEntry>, FetchError>,
    seq: u64,
    latest_issued: u64,
) {
    match result {
        Ok(entries) => {
            if seq != latest_issued {
                debug!(
                    component = "refresh",
                    event = "poll.stale_discarded",
                    seq,
                    latest_issued
                );
                return;
            }
            if entries.is_empty() {
                // The last non-empty snapshot stays authoritative.
                warn!(component = "refresh", event = "poll.empty", seq);
                history.set_status(RefreshStatus::FetchFailed);
                return;
            }
            info!(
                component = "refresh",
                event = "poll.commit",
                seq,
                entries = entries.len()
            );
            history.commit(entries);
        }
        Err(err) => {
            warn!(component = "refresh", event = "poll.failed", seq, error = %err);
            history.set_status(RefreshStatus::FetchFailed);
        }
    }
}

pub struct RefreshController;

impl RefreshController {
    /// Starts the poll loop against `history`.
    ///
    /// Each tick issues a sequence-tagged fetch on its own task, so a fetch
    /// that outlives the interval never delays the next tick and can be
    /// recognized as stale when it finally resolves.
    pub fn spawn(
        fetcher: Arc<dyn OddsFetcher>,
        history: SnapshotHistory,
        config: RefreshConfig,
    ) -> RefreshHandle {
        let alive = Arc::new(AtomicBool::new(true));
        let issued = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn({
            let alive = Arc::clone(&alive);
            let issued = Arc::clone(&issued);
            async move {
                let mut ticker = tokio::time::interval(config.refresh_interval);
                // The immediate first tick is skipped: the initial snapshot
                // is already in place.
                ticker.tick().await;

                loop {
                    ticker.tick().await;
                    let seq = issued.fetch_add(1, Ordering::SeqCst) + 1;
                    history.set_status(RefreshStatus::Fetching);

                    let fetcher = Arc::clone(&fetcher);
                    let history = history.clone();
                    let alive = Arc::clone(&alive);
                    let issued = Arc::clone(&issued);
                    tokio::spawn(async move {
                        let result = fetcher.fetch().await;
                        if !alive.load(Ordering::SeqCst) {
                            // Resolved after teardown: discard, never apply.
                            return;
                        }
                        apply_poll_result(&history, result, seq, issued.load(Ordering::SeqCst));
                    });
                }
            }
        });

        RefreshHandle { task, alive }
    }
}

/// Scoped handle to the poll loop; dropping it tears the loop down.
pub struct RefreshHandle {
    task: tokio::task::JoinHandle<()>,
    alive: Arc<AtomicBool>,
}

impl RefreshHandle {
    /// Stops ticking and marks in-flight fetches as dead so a late
    /// resolution is discarded instead of applied.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
