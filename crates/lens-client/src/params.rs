//! Shareable query parameters.
//!
//! The committed query of a view is mirrored into a [`ParamStore`] so the
//! view can be reproduced elsewhere (an address bar, a saved link). The store
//! is shared: a view owns only the keys its query codec writes and leaves every
//! other key alone.

use std::collections::BTreeMap;

use parking_lot::Mutex;

/// A string key-value store addressable from outside the view.
pub trait ParamStore: Send + Sync {
    /// Current parameters.
    fn load(&self) -> BTreeMap<String, String>;

    /// Replace all parameters.
    fn store(&self, params: BTreeMap<String, String>);

    /// Drop the `owned` keys, then insert `params`. Keys outside `owned` survive.
    fn merge(&self, owned: &[&str], params: BTreeMap<String, String>) {
        let mut current = self.load();
        current.retain(|key, _| !owned.contains(&key.as_str()));
        current.extend(params);
        self.store(current);
    }
}

/// In-memory [`ParamStore`].
#[derive(Debug, Default)]
pub struct MemoryParamStore {
    params: Mutex<BTreeMap<String, String>>,
}

impl MemoryParamStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded from a form-url-encoded string such as `search=api&status=enabled`.
    #[must_use]
    pub fn from_query_string(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let params = url::form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect();
        Self {
            params: Mutex::new(params),
        }
    }

    /// Current parameters as a form-url-encoded string.
    #[must_use]
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.lock().iter())
            .finish()
    }
}

impl ParamStore for MemoryParamStore {
    fn load(&self) -> BTreeMap<String, String> {
        self.params.lock().clone()
    }

    fn store(&self, params: BTreeMap<String, String>) {
        *self.params.lock() = params;
    }

    fn merge(&self, owned: &[&str], params: BTreeMap<String, String>) {
        let mut current = self.params.lock();
        current.retain(|key, _| !owned.contains(&key.as_str()));
        current.extend(params);
    }
}
