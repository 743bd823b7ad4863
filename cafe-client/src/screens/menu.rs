// cafe-client/src/screens/menu.rs
// 公开菜单 - 按分类分组的在售商品

use shared::models::{Category, Product};
use shared::query::Direction;

use crate::table::FilterBuilder;
use crate::{CafeClient, ClientResult};

/// One category heading with its products
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Group products under the categories, in category order.
///
/// Empty sections and products of unknown categories are left out.
pub fn group_by_category(categories: &[Category], products: &[Product]) -> Vec<MenuSection> {
    categories
        .iter()
        .map(|category| MenuSection {
            category: category.clone(),
            products: products
                .iter()
                .filter(|p| p.category == category.name)
                .cloned()
                .collect(),
        })
        .filter(|section| !section.products.is_empty())
        .collect()
}

/// Public menu screen
pub struct MenuScreen {
    client: CafeClient,
    sections: Vec<MenuSection>,
    selected: Option<String>,
}

impl MenuScreen {
    pub fn new(client: CafeClient) -> Self {
        Self {
            client,
            sections: Vec::new(),
            selected: None,
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let categories: Vec<Category> = self
            .client
            .from("categories")
            .select()
            .eq("is_active", true)
            .order("sort_order", Direction::Asc)
            .fetch()
            .await?;
        let products: Vec<Product> = self
            .client
            .from("products")
            .select()
            .eq("is_available", true)
            .order("name", Direction::Asc)
            .fetch()
            .await?;
        self.sections = group_by_category(&categories, &products);
        tracing::debug!(sections = self.sections.len(), "Menu loaded");
        Ok(())
    }

    /// Category tab; `None` shows everything
    pub fn select_category(&mut self, name: Option<String>) {
        self.selected = name;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn sections(&self) -> Vec<&MenuSection> {
        self.sections
            .iter()
            .filter(|s| {
                self.selected
                    .as_deref()
                    .is_none_or(|name| s.category.name == name)
            })
            .collect()
    }
}
