//! Refresh cache for normalized sheets
//!
//! One snapshot holds both normalized sheets. It is replaced as a whole and
//! shared behind an [`Arc`], so readers holding the previous snapshot keep a
//! consistent view while a reload happens.

use crate::config::GoalsConfig;
use crate::error::Result;
use crate::loader::{WorkbookSource, load_sheets};
use crate::normalizer::{NormalizedSheet, SheetNormalizer};
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Normalized sheets from one successful fetch
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// In configured sheet order
    pub sheets: Vec<NormalizedSheet>,
    pub loaded_at: DateTime<Local>,
}

impl Snapshot {
    pub fn new(sheets: Vec<NormalizedSheet>) -> Self {
        Self {
            sheets,
            loaded_at: Local::now(),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&NormalizedSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    snapshot: Arc<Snapshot>,
}

/// Serves the current snapshot, reloading it once it is older than the TTL
pub struct SnapshotCache {
    source: Box<dyn WorkbookSource>,
    config: GoalsConfig,
    normalizer: SheetNormalizer,
    ttl: Duration,
    entry: RwLock<Option<Entry>>,
    loads: AtomicUsize,
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("config", &self.config)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SnapshotCache {
    pub fn new(source: Box<dyn WorkbookSource>, config: GoalsConfig) -> Self {
        let ttl = config.cache_ttl();
        Self {
            source,
            config,
            normalizer: SheetNormalizer::new(),
            ttl,
            entry: RwLock::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn config(&self) -> &GoalsConfig {
        &self.config
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Number of fetches performed so far
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// The cached snapshot if still fresh, otherwise a newly loaded one.
    ///
    /// A failed load leaves the cache empty: the error is returned and no
    /// stale sheets are served in its place.
    pub fn get(&self) -> Result<Arc<Snapshot>> {
        if let Some(snapshot) = self.fresh() {
            debug!("Snapshot cache hit");
            return Ok(snapshot);
        }

        let observed = self.stored_at();
        match self.reload() {
            Ok(snapshot) => Ok(snapshot),
            Err(error) => {
                warn!("Workbook load failed: {}", error);
                self.clear_if_unchanged(observed);
                Err(error)
            }
        }
    }

    /// Drop the current snapshot; the next [`get`](Self::get) fetches again
    pub fn invalidate(&self) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        if entry.take().is_some() {
            info!("Snapshot cache invalidated");
        }
    }

    /// Time left before the current snapshot expires
    pub fn time_to_live(&self) -> Option<Duration> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .map(|entry| self.ttl.saturating_sub(entry.stored_at.elapsed()))
    }

    fn fresh(&self) -> Option<Arc<Snapshot>> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        match entry.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(Arc::clone(&entry.snapshot)),
            Some(_) => {
                debug!("Snapshot expired after {:?}", self.ttl);
                None
            }
            None => None,
        }
    }

    fn stored_at(&self) -> Option<Instant> {
        let entry = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        entry.as_ref().map(|entry| entry.stored_at)
    }

    /// Drop the entry unless another load has stored a newer one since `observed`
    fn clear_if_unchanged(&self, observed: Option<Instant>) {
        let mut entry = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        if entry.as_ref().map(|entry| entry.stored_at) == observed {
            *entry = None;
        } else {
            debug!("Keeping snapshot stored by a concurrent load");
        }
    }

    fn reload(&self) -> Result<Arc<Snapshot>> {
        let sheets = load_sheets(self.source.as_ref(), &self.config, &self.normalizer)?;
        let snapshot = Arc::new(Snapshot::new(sheets));
        let count = self.loads.fetch_add(1, Ordering::Relaxed) + 1;

        info!(
            "Loaded snapshot #{}: {}",
            count,
            snapshot
                .sheets
                .iter()
                .map(|sheet| format!("{} ({} records)", sheet.name, sheet.records.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(Entry {
            stored_at: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        Ok(snapshot)
    }
}
