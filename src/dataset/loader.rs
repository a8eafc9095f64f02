use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::input::sqlite::parse_database;
use crate::input::{DatasetSource, FileSource, LoadError, default_dataset_path};

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<Dataset>, LoadError>>>;

enum Slot {
    Idle,
    Pending(u64, SharedLoad),
    Loaded(Arc<Dataset>),
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(LoadError),
}

/// Loads a [`Dataset`] from `S` at most once per successful attempt.
///
/// Callers that arrive while an attempt is in flight join it. The attempt runs as
/// its own task, so it completes even if every caller goes away. A failed attempt
/// is reported to all joined callers; the next `load()` starts a new one.
pub struct DatasetLoader<S> {
    source: Arc<S>,
    slot: Arc<Mutex<Slot>>,
    attempts: AtomicU64,
}

impl<S: DatasetSource> DatasetLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            slot: Arc::new(Mutex::new(Slot::Idle)),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn resource(&self) -> String {
        self.source.resource()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        let pending = {
            let mut slot = lock_slot(&self.slot);
            match &*slot {
                Slot::Loaded(dataset) => return Ok(Arc::clone(dataset)),
                Slot::Pending(_, pending) => pending.clone(),
                Slot::Idle | Slot::Failed(_) => {
                    let attempt = self.attempts.fetch_add(1, Ordering::Relaxed);
                    let pending = self.start_attempt(attempt);
                    *slot = Slot::Pending(attempt, pending.clone());
                    pending
                }
            }
        };
        pending.await
    }

    pub fn state(&self) -> LoadState {
        match &*lock_slot(&self.slot) {
            Slot::Idle => LoadState::Idle,
            Slot::Pending(..) => LoadState::Loading,
            Slot::Loaded(_) => LoadState::Loaded,
            Slot::Failed(err) => LoadState::Failed(err.clone()),
        }
    }

    /// The loaded dataset, if an attempt already succeeded.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        match &*lock_slot(&self.slot) {
            Slot::Loaded(dataset) => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    fn start_attempt(&self, attempt: u64) -> SharedLoad {
        let source = Arc::clone(&self.source);
        let task_slot = Arc::clone(&self.slot);
        let handle = tokio::spawn(async move {
            let result = run_attempt(source.as_ref()).await;
            settle(&task_slot, attempt, &result);
            result
        });
        // A cancelled or panicked task never settles the slot itself.
        let slot = Arc::clone(&self.slot);
        async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    let err = LoadError::Task(join_err.to_string());
                    warn!(stage = "load", error = %err, "dataset load task did not finish");
                    Err(err)
                }
            };
            settle(&slot, attempt, &result);
            result
        }
        .boxed()
        .shared()
    }
}

async fn run_attempt<S: DatasetSource>(source: &S) -> Result<Arc<Dataset>, LoadError> {
    let resource = source.resource();
    let start = Instant::now();
    info!(stage = "load", resource = resource.as_str(), "starting dataset load");

    let result = async {
        let bytes = source.retrieve().await?;
        let name = resource.clone();
        let parsed = tokio::task::spawn_blocking(move || parse_database(&name, &bytes))
            .await
            .map_err(|err| LoadError::Task(err.to_string()))??;
        Ok::<_, LoadError>(Arc::new(Dataset::from_rows(
            parsed.observations,
            parsed.unkeyed,
        )))
    }
    .await;

    match &result {
        Ok(dataset) => info!(
            stage = "load",
            elapsed_ms = start.elapsed().as_millis(),
            rows = dataset.len(),
            countries = dataset.countries().len(),
            "finished dataset load"
        ),
        Err(err) => warn!(
            stage = "load",
            elapsed_ms = start.elapsed().as_millis(),
            error = %err,
            "dataset load failed"
        ),
    }
    result
}

/// Records the outcome of `attempt` unless a different attempt owns the slot.
fn settle(slot: &Mutex<Slot>, attempt: u64, result: &Result<Arc<Dataset>, LoadError>) {
    let mut guard = lock_slot(slot);
    if matches!(&*guard, Slot::Pending(current, _) if *current == attempt) {
        *guard = match result {
            Ok(dataset) => Slot::Loaded(Arc::clone(dataset)),
            Err(err) => Slot::Failed(err.clone()),
        };
    }
}

fn lock_slot(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide loader over [`default_dataset_path`], created on first use.
pub fn default_loader() -> &'static DatasetLoader<FileSource> {
    static LOADER: OnceLock<DatasetLoader<FileSource>> = OnceLock::new();
    LOADER.get_or_init(|| DatasetLoader::new(FileSource::new(default_dataset_path())))
}

#[cfg(test)]
#[path = "../../tests/src_inline/dataset/loader.rs"]
mod tests;
