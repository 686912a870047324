use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::errors::ServiceError;
use crate::lines::repository::LineRepository;
use crate::storage::json_map_store::JsonMapStore;
use models::line::{CreateLineInput, Line, UpdateLineInput};

/// File store: persists the line map as a JSON file.
///
/// Ids come from a monotone counter seeded from the highest persisted id,
/// so a deleted id is never handed out again. Listing follows ascending
/// id order, which equals creation order.
#[derive(Clone)]
pub struct LineStore {
    store: Arc<JsonMapStore<i64, Line>>,
    next_id: Arc<AtomicI64>,
}

impl LineStore {
    /// Initialize the store, creating an empty file if missing.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<i64, Line>::new(path).await?;
        let next_id = store.max_key().await.unwrap_or(0) + 1;
        Ok(Arc::new(Self { store, next_id: Arc::new(AtomicI64::new(next_id)) }))
    }

    /// List all lines in creation order.
    pub async fn list(&self) -> Vec<Line> {
        self.store
            .list()
            .await
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    /// Get a line by id.
    pub async fn get(&self, id: i64) -> Option<Line> {
        self.store.get(&id).await
    }

    /// Create a new line; the name must not belong to any live line.
    pub async fn create(&self, input: CreateLineInput) -> Result<Line, ServiceError> {
        input.validate()?;
        let mut created: Option<Line> = None;
        self.store
            .update_map(|map| {
                if map.values().any(|l| l.name == input.name) {
                    return Err(ServiceError::conflict(format!(
                        "line name '{}' already exists",
                        input.name
                    )));
                }
                let line = Line {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    name: input.name.clone(),
                    color: input.color.clone(),
                    up_station_id: input.up_station_id,
                    down_station_id: input.down_station_id,
                    distance: input.distance,
                    created_at: Utc::now(),
                };
                map.insert(line.id, line.clone());
                created = Some(line);
                Ok(())
            })
            .await?;
        Ok(created.expect("created set"))
    }

    /// Update name and color in place. Renaming onto another live line's
    /// name is rejected with the same conflict as create.
    pub async fn update(&self, id: i64, input: UpdateLineInput) -> Result<Line, ServiceError> {
        input.validate()?;
        let mut updated: Option<Line> = None;
        self.store
            .update_map(|map| {
                if !map.contains_key(&id) {
                    return Err(ServiceError::not_found("line"));
                }
                if map.iter().any(|(k, l)| *k != id && l.name == input.name) {
                    return Err(ServiceError::conflict(format!(
                        "line name '{}' already exists",
                        input.name
                    )));
                }
                let existed = map.get_mut(&id).ok_or_else(|| ServiceError::not_found("line"))?;
                existed.name = input.name.clone();
                existed.color = input.color.clone();
                updated = Some(existed.clone());
                Ok(())
            })
            .await?;
        Ok(updated.expect("updated set"))
    }

    /// Delete a line by id; returns whether it existed.
    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        self.store.remove(&id).await
    }
}

#[async_trait::async_trait]
impl LineRepository for LineStore {
    async fn list(&self) -> Vec<Line> { self.list().await }
    async fn get(&self, id: i64) -> Option<Line> { self.get(id).await }
    async fn create(&self, input: CreateLineInput) -> Result<Line, ServiceError> { self.create(input).await }
    async fn update(&self, id: i64, input: UpdateLineInput) -> Result<Line, ServiceError> { self.update(id, input).await }
    async fn delete(&self, id: i64) -> Result<bool, ServiceError> { self.delete(id).await }
}
