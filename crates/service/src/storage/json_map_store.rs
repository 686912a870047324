use std::{collections::BTreeMap, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered key-value map store.
///
/// Persists a `BTreeMap<K, V>` to a JSON file and provides simple CRUD
/// helpers. Iteration order follows key order, so monotone keys give
/// insertion order for free. Intended for lightweight state where a
/// database is overkill.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<BTreeMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: BTreeMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty: BTreeMap<K, V> = BTreeMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?)
                    .await
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// List all entries as `(key, value)` pairs in ascending key order.
    pub async fn list(&self) -> Vec<(K, V)> {
        let map = self.inner.read().await;
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Highest key currently in the map.
    pub async fn max_key(&self) -> Option<K> {
        let map = self.inner.read().await;
        map.keys().next_back().cloned()
    }

    /// Insert or update a value by key and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(key, value);
        drop(map);
        self.save().await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(key).is_some();
        drop(map);
        self.save().await?;
        Ok(existed)
    }

    /// Apply a mutation to the underlying map and persist atomically.
    ///
    /// The closure runs under the write lock, so a check-then-mutate
    /// sequence inside it cannot race with other writers. The mutation is
    /// staged on a copy; an error from the closure leaves the map as it was.
    pub async fn update_map<F>(&self, f: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<(), ServiceError>,
    {
        let mut map = self.inner.write().await;
        let mut staged = map.clone();
        f(&mut staged)?;
        *map = staged;
        drop(map);
        self.save().await?;
        Ok(())
    }
}
