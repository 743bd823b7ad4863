//! Category Model

use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{RowId, Timestamp};
use crate::validation::{self, Validate, ValidationErrors};

/// Category entity, used to group and filter products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RowId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: Timestamp,
}

fn default_true() -> bool {
    true
}

impl Record for Category {
    const TABLE: &'static str = "categories";

    fn id(&self) -> RowId {
        self.id
    }
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl Validate for CategoryCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_text(&mut errors, "name", &self.name, 1, validation::MAX_NAME_LEN);
        errors.into_result()
    }
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            validation::required_text(&mut errors, "name", name, 1, validation::MAX_NAME_LEN);
        }
        errors.into_result()
    }
}
