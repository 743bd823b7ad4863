// cafe-client/src/screens/list.rs
// 列表视图 - idle → loading → (loaded | failed)，变更在远端确认后才落到本地

use std::future::Future;

use async_trait::async_trait;
use shared::models::Record;
use shared::types::RowId;

use crate::{CafeClient, ClientResult};

/// Where a list view gets its rows from
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Record + Clone + Send + Sync;
    type Filter: Clone + Default + Send + Sync;

    async fn fetch(&self, client: &CafeClient, filter: &Self::Filter)
    -> ClientResult<Vec<Self::Item>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

/// A fetched table held in local state
pub struct ListView<S: ListSource> {
    client: CafeClient,
    source: S,
    filter: S::Filter,
    state: ListState<S::Item>,
    last_error: Option<String>,
}

impl<S: ListSource> ListView<S> {
    pub fn new(client: CafeClient, source: S) -> Self {
        Self {
            client,
            source,
            filter: S::Filter::default(),
            state: ListState::Idle,
            last_error: None,
        }
    }

    pub fn client(&self) -> &CafeClient {
        &self.client
    }

    pub fn state(&self) -> &ListState<S::Item> {
        &self.state
    }

    pub fn filter(&self) -> &S::Filter {
        &self.filter
    }

    /// Rows currently shown (empty unless loaded)
    pub fn items(&self) -> &[S::Item] {
        match &self.state {
            ListState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn find(&self, id: RowId) -> Option<&S::Item> {
        self.items().iter().find(|item| item.id() == id)
    }

    /// Message of the most recent failed mutation
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetch and replace the list wholesale
    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.state = ListState::Loading;
        match self.source.fetch(&self.client, &self.filter).await {
            Ok(items) => {
                self.state = ListState::Loaded(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "List fetch failed");
                self.state = ListState::Failed(e.user_message().to_string());
                Err(e)
            }
        }
    }

    pub async fn set_filter(&mut self, filter: S::Filter) -> ClientResult<()> {
        self.filter = filter;
        self.refresh().await
    }

    /// Re-fetch after a failed mutation; keeps the current list if that fails too
    async fn reconcile(&mut self) {
        match self.source.fetch(&self.client, &self.filter).await {
            Ok(items) => self.state = ListState::Loaded(items),
            Err(e) => tracing::warn!(error = %e, "Reconcile fetch failed, keeping last known list"),
        }
    }

    /// Run a remote mutation; apply `on_success` to the local list only once it succeeds
    pub async fn mutate<T, Fut, F>(&mut self, mutation: Fut, on_success: F) -> ClientResult<T>
    where
        Fut: Future<Output = ClientResult<T>>,
        F: FnOnce(&mut Vec<S::Item>, &T),
    {
        match mutation.await {
            Ok(result) => {
                self.last_error = None;
                if let ListState::Loaded(items) = &mut self.state {
                    on_success(items, &result);
                }
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Mutation failed, re-fetching");
                self.last_error = Some(e.user_message().to_string());
                self.reconcile().await;
                Err(e)
            }
        }
    }

    /// Replace rows by id with the confirmed values
    pub async fn update_rows<Fut>(&mut self, mutation: Fut) -> ClientResult<Vec<S::Item>>
    where
        Fut: Future<Output = ClientResult<Vec<S::Item>>>,
    {
        let rows = self
            .mutate(mutation, |items, updated: &Vec<S::Item>| {
                for row in updated {
                    if let Some(slot) = items.iter_mut().find(|i| i.id() == row.id()) {
                        *slot = row.clone();
                    }
                }
            })
            .await?;
        if rows.is_empty() {
            // Row vanished remotely
            self.reconcile().await;
        }
        Ok(rows)
    }

    /// Remove the rows the server reports as deleted
    pub async fn delete_rows<Fut>(&mut self, mutation: Fut) -> ClientResult<Vec<S::Item>>
    where
        Fut: Future<Output = ClientResult<Vec<S::Item>>>,
    {
        self.mutate(mutation, |items, deleted: &Vec<S::Item>| {
            items.retain(|i| !deleted.iter().any(|d| d.id() == i.id()));
        })
        .await
    }
}

/// `*term*` for ilike, `None` for a blank search box
pub fn search_pattern(search: &str) -> Option<String> {
    let term = search.trim();
    (!term.is_empty()).then(|| format!("*{term}*"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern("  kopi "), Some("*kopi*".to_string()));
        assert_eq!(search_pattern("   "), None);
    }
}
