//! Per-run memoization of shot analyses keyed by source path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::foundation::error::SegueResult;
use crate::shot::ShotAnalysis;

type Slot = Arc<OnceLock<SegueResult<Arc<ShotAnalysis>>>>;

/// At-most-once analysis per path. Failures are memoized too, so a broken file is read once.
///
/// The map lock is only held to fetch a slot; concurrent callers for the same path block on
/// that slot's initialization instead of decoding twice.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
    computed: AtomicUsize,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, path: &Path, compute: F) -> SegueResult<Arc<ShotAnalysis>>
    where
        F: FnOnce(&Path) -> SegueResult<ShotAnalysis>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(path.to_path_buf()).or_default().clone()
        };
        let mut fresh = false;
        let result = slot.get_or_init(|| {
            fresh = true;
            self.computed.fetch_add(1, Ordering::Relaxed);
            compute(path).map(Arc::new)
        });
        if !fresh {
            tracing::debug!(path = %path.display(), "descriptor cache hit");
        }
        match result {
            Ok(analysis) => Ok(Arc::clone(analysis)),
            Err(err) => Err(err.replay()),
        }
    }

    /// Number of times a computation actually ran.
    pub fn computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/unit/analysis/cache.rs"]
mod tests;
