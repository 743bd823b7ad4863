// cafe-client/src/screens/forms/product.rs
// 商品表单 (新增 / 编辑)

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::types::RowId;
use shared::validation::{Validate, ValidationErrors};

use super::{FormResult, FormState, optional};
use crate::table::FilterBuilder;
use crate::{CafeClient, ClientError};

/// Raw inputs; price and stock are typed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub image_url: String,
    pub stock: String,
    pub is_available: bool,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            image_url: String::new(),
            stock: String::new(),
            is_available: true,
        }
    }
}

impl From<&Product> for ProductFields {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone().unwrap_or_default(),
            price: p.price.normalize().to_string(),
            category: p.category.clone(),
            image_url: p.image_url.clone().unwrap_or_default(),
            stock: p.stock.map(|s| s.to_string()).unwrap_or_default(),
            is_available: p.is_available,
        }
    }
}

impl ProductFields {
    /// Parse the text inputs and run the product rules
    pub fn to_create(&self) -> Result<ProductCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let price = match Decimal::from_str(self.price.trim()) {
            Ok(price) => price,
            Err(_) if self.price.trim().is_empty() => {
                errors.add("price", ErrorCode::RequiredField, "price is required");
                Decimal::ZERO
            }
            Err(_) => {
                errors.add("price", ErrorCode::ProductInvalidPrice, "Price must be a number");
                Decimal::ZERO
            }
        };
        let stock = match optional(&self.stock) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(stock) => Some(stock),
                Err(_) => {
                    errors.add(
                        "stock",
                        ErrorCode::ProductInvalidStock,
                        "Stock must be a whole number",
                    );
                    None
                }
            },
        };
        let create = ProductCreate {
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            price,
            category: self.category.trim().to_string(),
            image_url: optional(&self.image_url),
            stock,
            is_available: Some(self.is_available),
        };
        if let Err(found) = create.validate() {
            for e in found.iter() {
                errors.add(e.field, e.code, e.message.clone());
            }
        }
        errors.into_result().map(|()| create)
    }
}

/// Every column of an edited product; blank optional inputs are sent as `null`
fn to_update(c: ProductCreate) -> ProductUpdate {
    ProductUpdate {
        name: Some(c.name),
        description: Some(c.description),
        price: Some(c.price),
        category: Some(c.category),
        image_url: Some(c.image_url),
        stock: Some(c.stock),
        is_available: c.is_available,
    }
}

#[derive(Debug, Default)]
pub struct ProductForm {
    pub fields: ProductFields,
    editing: Option<RowId>,
    state: FormState,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing product; submit then updates it
    pub fn edit(product: &Product) -> Self {
        Self {
            fields: ProductFields::from(product),
            editing: Some(product.id),
            state: FormState::default(),
        }
    }

    pub fn editing(&self) -> Option<RowId> {
        self.editing
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn validate(&mut self) -> FormResult<ProductCreate> {
        match self.fields.to_create() {
            Ok(create) => {
                self.state.check(Ok(()))?;
                Ok(create)
            }
            Err(errors) => Err(self.state.reject(errors)),
        }
    }

    pub async fn submit(&mut self, client: &CafeClient) -> FormResult<Product> {
        let create = self.validate()?;
        self.state.submitting();
        let table = client.from("products");
        let result = match self.editing {
            None => table.insert(&create).execute::<Product>().await,
            Some(id) => table
                .update(&to_update(create))
                .eq("id", id)
                .execute::<Product>()
                .await
                .and_then(|mut rows| {
                    if rows.is_empty() {
                        Err(ClientError::NotFound(format!("product {id}")))
                    } else {
                        Ok(rows.remove(0))
                    }
                }),
        };
        let saved = self.state.settle(result)?;
        self.fields = ProductFields::default();
        self.editing = None;
        Ok(saved)
    }
}
