use async_trait::async_trait;

use crate::errors::ServiceError;
use models::line::{CreateLineInput, Line, UpdateLineInput};

/// Trait abstraction for line storage (CRUD of subway line entities).
///
/// Implementations must enforce the name uniqueness invariant: `create`
/// and `update` fail with [`ServiceError::Conflict`] when the requested
/// name belongs to another live line.
#[async_trait]
pub trait LineRepository: Send + Sync {
    async fn list(&self) -> Vec<Line>;
    async fn get(&self, id: i64) -> Option<Line>;
    async fn create(&self, input: CreateLineInput) -> Result<Line, ServiceError>;
    async fn update(&self, id: i64, input: UpdateLineInput) -> Result<Line, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}
