//! Per-handle console classification, computed once and cached

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::handle::StreamHandle;
use super::platform::ConsoleAdapter;

/// Cache of "is this handle an interactive console" answers
///
/// The first answer for a handle is kept for the classifier's lifetime;
/// streams are assumed not to be reattached while the process runs.
#[derive(Debug, Default)]
pub struct ConsoleClassifier {
    cache: RwLock<FxHashMap<StreamHandle, bool>>,
}

impl ConsoleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `handle` is attached to a console
    ///
    /// Never fails: a handle the OS reports no console mode for, for any
    /// reason, is classified as not a console.
    pub fn is_console<A: ConsoleAdapter + ?Sized>(&self, adapter: &A, handle: StreamHandle) -> bool {
        if let Some(&known) = self.cache.read().get(&handle) {
            return known;
        }

        let mut cache = self.cache.write();
        *cache.entry(handle).or_insert_with(|| {
            let console = adapter.console_mode(handle).is_some();
            crate::debug!("classified stream {} as console={}", handle, console);
            console
        })
    }

    /// Cached answer without querying the OS
    pub fn cached(&self, handle: StreamHandle) -> Option<bool> {
        self.cache.read().get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}
