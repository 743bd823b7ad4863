// cafe-client/src/screens/products.rs
// 商品管理 (Dashboard)

use async_trait::async_trait;
use shared::models::{Category, Product, ProductUpdate};
use shared::query::Direction;
use shared::types::RowId;

use super::list::{ListSource, ListView, search_pattern};
use crate::table::FilterBuilder;
use crate::{CafeClient, ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductSource;

#[async_trait]
impl ListSource for ProductSource {
    type Item = Product;
    type Filter = ProductFilter;

    async fn fetch(&self, client: &CafeClient, filter: &ProductFilter) -> ClientResult<Vec<Product>> {
        let mut query = client.from("products").select();
        if let Some(pattern) = search_pattern(&filter.search) {
            query = query.ilike("name", pattern);
        }
        if let Some(category) = &filter.category {
            query = query.eq("category", category);
        }
        query.order("created_at", Direction::Desc).fetch().await
    }
}

/// Product management screen
pub struct ProductsScreen {
    pub list: ListView<ProductSource>,
    categories: Vec<Category>,
}

impl ProductsScreen {
    pub fn new(client: CafeClient) -> Self {
        Self {
            list: ListView::new(client, ProductSource),
            categories: Vec::new(),
        }
    }

    /// Initial load: categories for the filter control, then products
    pub async fn load(&mut self) -> ClientResult<()> {
        self.categories = self
            .list
            .client()
            .from("categories")
            .select()
            .order("sort_order", Direction::Asc)
            .fetch()
            .await?;
        self.list.refresh().await
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub async fn set_filter(&mut self, filter: ProductFilter) -> ClientResult<()> {
        self.list.set_filter(filter).await
    }

    pub async fn delete(&mut self, id: RowId) -> ClientResult<()> {
        let mutation = self
            .list
            .client()
            .from("products")
            .delete()
            .eq("id", id)
            .execute::<Product>();
        self.list.delete_rows(mutation).await?;
        Ok(())
    }

    /// Flip `is_available`, returning the confirmed value
    pub async fn toggle_availability(&mut self, id: RowId) -> ClientResult<bool> {
        let current = self
            .list
            .find(id)
            .map(|p| p.is_available)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        let patch = ProductUpdate {
            is_available: Some(!current),
            ..Default::default()
        };
        let mutation = self
            .list
            .client()
            .from("products")
            .update(&patch)
            .eq("id", id)
            .execute::<Product>();
        let rows = self.list.update_rows(mutation).await?;
        rows.first()
            .map(|p| p.is_available)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::list::ListState;
    use crate::mock::MockHttpClient;
    use serde_json::{Value, json};
    use shared::error::ErrorCode;

    fn product(id: i64, name: &str, available: bool) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": null,
            "price": 22000.0,
            "category": "Kopi",
            "image_url": null,
            "stock": 10,
            "is_available": available,
            "created_at": 1
        })
    }

    #[tokio::test]
    async fn test_filter_builds_query() {
        let mock = MockHttpClient::new();
        mock.push_ok(json!([product(1, "Es Kopi Susu", true)]));
        let mut screen = ProductsScreen::new(CafeClient::with_http(mock.clone()));

        screen
            .set_filter(ProductFilter {
                search: "kopi".into(),
                category: Some("Kopi".into()),
            })
            .await
            .unwrap();

        assert_eq!(screen.list.items().len(), 1);
        let query = mock.last_request().unwrap().query;
        assert!(query.contains(&("name".into(), "ilike.*kopi*".into())));
        assert!(query.contains(&("category".into(), "eq.Kopi".into())));
        assert!(query.contains(&("order".into(), "created_at.desc".into())));
    }

    #[tokio::test]
    async fn test_delete_removes_after_confirmation() {
        let mock = MockHttpClient::new();
        mock.push_ok(json!([product(1, "Es Kopi Susu", true), product(2, "Teh Tarik", true)]));
        mock.push_ok(json!([product(2, "Teh Tarik", true)]));
        let mut screen = ProductsScreen::new(CafeClient::with_http(mock.clone()));
        screen.list.refresh().await.unwrap();

        screen.delete(2).await.unwrap();
        let names: Vec<_> = screen.list.items().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Es Kopi Susu"]);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_toggle_reconciles_with_backend() {
        let mock = MockHttpClient::new();
        mock.push_ok(json!([product(1, "Es Kopi Susu", true)]));
        mock.push_api_error(500, ErrorCode::DatabaseError);
        // Backend's state after the failure
        mock.push_ok(json!([product(1, "Es Kopi Susu", true)]));
        let mut screen = ProductsScreen::new(CafeClient::with_http(mock.clone()));
        screen.list.refresh().await.unwrap();

        assert!(screen.toggle_availability(1).await.is_err());
        assert!(screen.list.find(1).unwrap().is_available);
        assert!(screen.list.last_error().is_some());
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_reconcile_keeps_last_known_list() {
        let mock = MockHttpClient::new();
        mock.push_ok(json!([product(1, "Es Kopi Susu", true)]));
        mock.push_api_error(500, ErrorCode::DatabaseError);
        mock.push_api_error(503, ErrorCode::NetworkError);
        let mut screen = ProductsScreen::new(CafeClient::with_http(mock.clone()));
        screen.list.refresh().await.unwrap();

        assert!(screen.delete(1).await.is_err());
        assert!(matches!(screen.list.state(), ListState::Loaded(items) if items.len() == 1));
    }
}
