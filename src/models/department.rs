//! Department model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Organizational unit receiving visits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    /// Short slug, e.g. `hr`
    pub id: String,
    pub name: String,
}
