//! Visitor model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Whether the visitor belongs to the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitorType {
    Internal,
    External,
}

impl VisitorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorType::Internal => "INTERNAL",
            VisitorType::External => "EXTERNAL",
        }
    }
}

impl std::fmt::Display for VisitorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VisitorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INTERNAL" => Ok(VisitorType::Internal),
            "EXTERNAL" => Ok(VisitorType::External),
            _ => Err(format!("Invalid visitor type: {}", s)),
        }
    }
}

text_column!(VisitorType);

/// Person requesting entry, unique by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub visitor_type: VisitorType,
    pub created_at: DateTime<Utc>,
}

/// Visitor fields written on registration (insert or update by email)
#[derive(Debug, Clone)]
pub struct UpsertVisitor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub visitor_type: VisitorType,
}
