//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{RowId, Timestamp};
use crate::validation::{self, Validate, ValidationErrors};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RowId,
    pub name: String,
    pub description: Option<String>,
    /// Price in rupiah, serialized as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category name
    pub category: String,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: Timestamp,
}

fn default_true() -> bool {
    true
}

impl Record for Product {
    const TABLE: &'static str = "products";

    fn id(&self) -> RowId {
        self.id
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl Validate for ProductCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_text(&mut errors, "name", &self.name, 1, validation::MAX_NAME_LEN);
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            validation::MAX_NOTE_LEN,
        );
        validation::price(&mut errors, "price", self.price);
        validation::required_text(
            &mut errors,
            "category",
            &self.category,
            1,
            validation::MAX_NAME_LEN,
        );
        validation::image_url(&mut errors, "image_url", self.image_url.as_deref());
        validation::stock(&mut errors, "stock", self.stock);
        errors.into_result()
    }
}

/// Update product payload
///
/// `description`, `image_url` and `stock` are nullable columns: `Some(None)`
/// is sent as `null` and clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::nullable"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::nullable"
    )]
    pub image_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::nullable"
    )]
    pub stock: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            validation::required_text(&mut errors, "name", name, 1, validation::MAX_NAME_LEN);
        }
        validation::optional_text(
            &mut errors,
            "description",
            self.description.as_ref().and_then(|d| d.as_deref()),
            validation::MAX_NOTE_LEN,
        );
        if let Some(price) = self.price {
            validation::price(&mut errors, "price", price);
        }
        if let Some(category) = &self.category {
            validation::required_text(&mut errors, "category", category, 1, validation::MAX_NAME_LEN);
        }
        validation::image_url(
            &mut errors,
            "image_url",
            self.image_url.as_ref().and_then(|u| u.as_deref()),
        );
        validation::stock(&mut errors, "stock", self.stock.flatten());
        errors.into_result()
    }
}
