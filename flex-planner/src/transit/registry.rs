//! Routers: named partitions of transit data.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::{DataError, TransitData, load_feed};

/// Router id used when a request does not name one.
pub const DEFAULT_ROUTER: &str = "default";

/// Loaded transit data keyed by router id.
///
/// Data is immutable once registered, so lookups hand out shared
/// references that request handlers can hold across awaits.
#[derive(Debug, Clone, Default)]
pub struct RouterRegistry {
    routers: HashMap<String, Arc<TransitData>>,
}

impl RouterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register data under a router id, replacing any previous data.
    pub fn insert(&mut self, router_id: impl Into<String>, data: TransitData) {
        self.routers.insert(router_id.into(), Arc::new(data));
    }

    /// Look up a router. An empty id means [`DEFAULT_ROUTER`].
    ///
    /// # Errors
    ///
    /// Returns [`DataError::RouterNotFound`] for an unknown id.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_planner::transit::{RouterRegistry, TransitData};
    ///
    /// let mut registry = RouterRegistry::new();
    /// registry.insert("default", TransitData::default());
    ///
    /// assert!(registry.get("").is_ok());
    /// assert!(registry.get("nyc").is_err());
    /// ```
    pub fn get(&self, router_id: &str) -> Result<Arc<TransitData>, DataError> {
        let key = if router_id.is_empty() {
            DEFAULT_ROUTER
        } else {
            router_id
        };
        self.routers
            .get(key)
            .cloned()
            .ok_or_else(|| DataError::RouterNotFound(key.to_string()))
    }

    /// Registered router ids, sorted.
    pub fn router_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.routers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Load every `*.json` feed in a directory, one router per file named
    /// after the file stem.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the directory cannot be listed or any feed fails
    /// to load.
    pub fn load_dir(dir: &Path) -> Result<Self, DataError> {
        let io_error = |source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let Some(router_id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping feed with a non UTF-8 name");
                continue;
            };
            let router_id = router_id.to_string();
            let data = load_feed(&path)?;
            registry.insert(router_id, data);
        }

        if registry.is_empty() {
            warn!(dir = %dir.display(), "no feeds found");
        } else {
            info!(dir = %dir.display(), routers = ?registry.router_ids(), "routers ready");
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_FEED: &str = r#"{ "feedId": "f" }"#;

    #[test]
    fn empty_id_means_default() {
        let mut registry = RouterRegistry::new();
        registry.insert(DEFAULT_ROUTER, TransitData::default());

        assert!(registry.get("").is_ok());
        assert!(registry.get("default").is_ok());
    }

    #[test]
    fn unknown_router() {
        let registry = RouterRegistry::new();
        let err = registry.get("nyc").unwrap_err();
        assert_eq!(err.to_string(), "unknown router: nyc");

        let err = registry.get("").unwrap_err();
        assert_eq!(err.to_string(), "unknown router: default");
    }

    #[test]
    fn lookups_share_data() {
        let mut registry = RouterRegistry::new();
        registry.insert("a", TransitData::default());

        let first = registry.get("a").unwrap();
        let second = registry.get("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn load_dir_keys_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.json"), EMPTY_FEED).unwrap();
        std::fs::write(dir.path().join("nyc.json"), EMPTY_FEED).unwrap();
        std::fs::write(dir.path().join("README.txt"), "not a feed").unwrap();

        let registry = RouterRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.router_ids(), vec!["default", "nyc"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn load_dir_reports_bad_feed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[").unwrap();

        let err = RouterRegistry::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouterRegistry::load_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
