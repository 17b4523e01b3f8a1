//! The backing-store collaborator: an owned in-memory odds cache with
//! deterministic-shape random seeding and a periodic mutation job.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::matrix::OddsEntry;

/// Seed dimensions: `runners × bookkeepers` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub runners: usize,
    pub bookkeepers: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            runners: 20,
            bookkeepers: 200,
        }
    }
}

/// Generates the full dense dataset: every runner quoted by every
/// bookkeeper, values at one-decimal precision.
pub fn seed_entries(config: SeedConfig, rng: &mut impl Rng) -> Vec<OddsEntry> {
    let mut entries = Vec::with_capacity(config.runners * config.bookkeepers);
    for runner_idx in 1..=config.runners {
        for bookkeeper_idx in 1..=config.bookkeepers {
            entries.push(OddsEntry {
                runner: format!("Runner {runner_idx}"),
                bookkeeper: format!("Bookkeeper {bookkeeper_idx}"),
                fixed_p: round_to_tenth(rng.gen_range(0.0..10.0)),
                fixed_w: round_to_tenth(rng.gen_range(0.0..5.0)),
            });
        }
    }
    entries
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn perturbed(value: f64, rng: &mut impl Rng) -> f64 {
    round_to_tenth((value + (rng.gen::<f64>() - 0.5) * 0.5).max(0.0))
}

/// Shared handle to the current dataset. Single writer (the mutation job),
/// any number of readers.
#[derive(Clone, Default)]
pub struct OddsStore {
    inner: Arc<RwLock<Vec<OddsEntry>>>,
}

impl OddsStore {
    pub fn new(entries: Vec<OddsEntry>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn seeded(config: SeedConfig, rng: &mut impl Rng) -> Self {
        Self::new(seed_entries(config, rng))
    }

    /// Bulk read of the full current dataset.
    pub fn snapshot(&self) -> Vec<OddsEntry> {
        self.inner
            .read()
            .expect("odds store lock should not be poisoned")
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .expect("odds store lock should not be poisoned")
            .is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("odds store lock should not be poisoned")
            .len()
    }

    pub fn replace(&self, entries: Vec<OddsEntry>) {
        *self
            .inner
            .write()
            .expect("odds store lock should not be poisoned") = entries;
    }

    /// Nudges every value by at most ±0.25, re-rounded to one decimal and
    /// clamped at zero.
    pub fn perturb(&self, rng: &mut impl Rng) {
        let mut guard = self
            .inner
            .write()
            .expect("odds store lock should not be poisoned");
        for entry in guard.iter_mut() {
            entry.fixed_p = perturbed(entry.fixed_p, rng);
            entry.fixed_w = perturbed(entry.fixed_w, rng);
        }
    }
}

/// Mutation cadence; independent of any view-side refresh interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationConfig {
    pub interval: Duration,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3_000),
        }
    }
}

/// Scheduled task that perturbs the store on a fixed cadence, with an
/// explicit shutdown hook.
pub struct MutationJob {
    task: tokio::task::JoinHandle<()>,
}

impl MutationJob {
    pub fn spawn(store: OddsStore, config: MutationConfig) -> Self {
        info!(
            component = "odds_store",
            event = "mutation.start",
            interval_ms = config.interval.as_millis() as u64
        );
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            // Skip the immediate first tick; values were just seeded.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut rng = rand::thread_rng();
                store.perturb(&mut rng);
                debug!(
                    component = "odds_store",
                    event = "mutation.tick",
                    entries = store.len()
                );
            }
        });
        Self { task }
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for MutationJob {
    fn drop(&mut self) {
        self.task.abort();
    }
}
