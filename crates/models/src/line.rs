use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Persisted subway line entity.
///
/// The endpoint station ids and distance are accepted at creation time and
/// kept for persistence, but the HTTP contract never echoes them back; see
/// [`LineResponse`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub up_station_id: Option<i64>,
    pub down_station_id: Option<i64>,
    pub distance: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Response shape for `/lines` endpoints: id, name and color only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
}

impl From<&Line> for LineResponse {
    fn from(line: &Line) -> Self {
        Self { id: line.id, name: line.name.clone(), color: line.color.clone() }
    }
}

impl From<Line> for LineResponse {
    fn from(line: Line) -> Self {
        Self { id: line.id, name: line.name, color: line.color }
    }
}

/// Creation input: station ids and distance are optional and only recorded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CreateLineInput {
    pub name: String,
    pub color: String,
    #[serde(rename = "upStationId", default, skip_serializing_if = "Option::is_none")]
    pub up_station_id: Option<i64>,
    #[serde(rename = "downStationId", default, skip_serializing_if = "Option::is_none")]
    pub down_station_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
}

impl CreateLineInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_color(&self.color)?;
        Ok(())
    }
}

/// Update input: only name and color are mutable after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdateLineInput {
    pub name: String,
    pub color: String,
}

impl UpdateLineInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_color(&self.color)?;
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ModelError> {
    if color.trim().is_empty() {
        return Err(ModelError::Validation("color must not be empty".into()));
    }
    Ok(())
}
