// cafe-client/src/screens/contacts.rs
// 联系消息管理

use async_trait::async_trait;
use shared::models::{ContactMessage, ContactMessageUpdate, ContactStatus};
use shared::query::Direction;
use shared::types::RowId;

use super::list::{ListSource, ListView, search_pattern};
use crate::table::FilterBuilder;
use crate::{CafeClient, ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: String,
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContactSource;

#[async_trait]
impl ListSource for ContactSource {
    type Item = ContactMessage;
    type Filter = ContactFilter;

    async fn fetch(
        &self,
        client: &CafeClient,
        filter: &ContactFilter,
    ) -> ClientResult<Vec<ContactMessage>> {
        let mut query = client.from("contact_messages").select();
        if let Some(pattern) = search_pattern(&filter.search) {
            query = query.ilike("name", pattern);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        query.order("created_at", Direction::Desc).fetch().await
    }
}

pub struct ContactsScreen {
    pub list: ListView<ContactSource>,
}

impl ContactsScreen {
    pub fn new(client: CafeClient) -> Self {
        Self {
            list: ListView::new(client, ContactSource),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.list.refresh().await
    }

    pub async fn set_filter(&mut self, filter: ContactFilter) -> ClientResult<()> {
        self.list.set_filter(filter).await
    }

    /// Unhandled messages in the loaded list
    pub fn pending_count(&self) -> usize {
        self.list
            .items()
            .iter()
            .filter(|m| m.status == ContactStatus::Pending)
            .count()
    }

    pub async fn mark_read(&mut self, id: RowId) -> ClientResult<ContactMessage> {
        self.set_status(id, ContactStatus::Read).await
    }

    pub async fn mark_replied(&mut self, id: RowId) -> ClientResult<ContactMessage> {
        self.set_status(id, ContactStatus::Replied).await
    }

    async fn set_status(&mut self, id: RowId, status: ContactStatus) -> ClientResult<ContactMessage> {
        let mutation = self
            .list
            .client()
            .from("contact_messages")
            .update(&ContactMessageUpdate::status(status))
            .eq("id", id)
            .execute::<ContactMessage>();
        let mut rows = self.list.update_rows(mutation).await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound(format!("contact message {id}")));
        }
        Ok(rows.remove(0))
    }

    pub async fn delete(&mut self, id: RowId) -> ClientResult<()> {
        let mutation = self
            .list
            .client()
            .from("contact_messages")
            .delete()
            .eq("id", id)
            .execute::<ContactMessage>();
        self.list.delete_rows(mutation).await?;
        Ok(())
    }
}
