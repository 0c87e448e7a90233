// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use pbwire_app_core::config::{ConfigError, ConfigStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory [`ConfigStore`] with call counters and injectable failures.
///
/// Clones share state, so a test can hand one clone to a
/// [`ConfigService`](pbwire_app_core::config::ConfigService) and inspect the
/// other.
///
/// ```
/// use pbwire_app_core::config::ConfigService;
/// use pbwire_app_core::prefs::CodecPrefs;
/// use pbwire_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save_codec_prefs(&CodecPrefs::default()).unwrap();
/// assert_eq!(store.saves(), 1);
/// assert!(store.raw("codec").is_some());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    blobs: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail_loads: bool,
    fail_saves: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one raw blob.
    pub fn with_raw(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store.state().blobs.insert(key.to_owned(), data.to_vec());
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make every later `load_raw` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.state().fail_loads = fail;
    }

    /// Make every later `save_raw` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    /// `load_raw` attempts so far, failed ones included.
    pub fn loads(&self) -> usize {
        self.state().loads
    }

    /// `save_raw` attempts so far, failed ones included.
    pub fn saves(&self) -> usize {
        self.state().saves
    }

    /// Raw blob stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state().blobs.get(key).cloned()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.state().blobs.keys().cloned().collect()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut state = self.state();
        state.loads += 1;
        if state.fail_loads {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        state.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.saves += 1;
        if state.fail_saves {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        state.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
