// cafe-client/src/screens/reservations.rs
// 预订管理

use async_trait::async_trait;
use shared::models::{Reservation, ReservationStatus, ReservationUpdate};
use shared::query::Direction;
use shared::types::RowId;

use super::list::{ListSource, ListView, search_pattern};
use crate::table::FilterBuilder;
use crate::{CafeClient, ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    pub search: String,
    pub status: Option<ReservationStatus>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationSource;

#[async_trait]
impl ListSource for ReservationSource {
    type Item = Reservation;
    type Filter = ReservationFilter;

    async fn fetch(
        &self,
        client: &CafeClient,
        filter: &ReservationFilter,
    ) -> ClientResult<Vec<Reservation>> {
        let mut query = client.from("reservations").select();
        if let Some(pattern) = search_pattern(&filter.search) {
            query = query.ilike("name", pattern);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        query
            .order("date", Direction::Desc)
            .order("time", Direction::Desc)
            .fetch()
            .await
    }
}

/// Reservation management screen
pub struct ReservationsScreen {
    pub list: ListView<ReservationSource>,
}

impl ReservationsScreen {
    pub fn new(client: CafeClient) -> Self {
        Self {
            list: ListView::new(client, ReservationSource),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.list.refresh().await
    }

    pub async fn set_filter(&mut self, filter: ReservationFilter) -> ClientResult<()> {
        self.list.set_filter(filter).await
    }

    /// Number of reservations per status in the loaded list
    pub fn count_by_status(&self, status: ReservationStatus) -> usize {
        self.list
            .items()
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    pub async fn update_status(
        &mut self,
        id: RowId,
        status: ReservationStatus,
    ) -> ClientResult<Reservation> {
        let mutation = self
            .list
            .client()
            .from("reservations")
            .update(&ReservationUpdate::status(status))
            .eq("id", id)
            .execute::<Reservation>();
        let mut rows = self.list.update_rows(mutation).await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound(format!("reservation {id}")));
        }
        Ok(rows.remove(0))
    }

    pub async fn delete(&mut self, id: RowId) -> ClientResult<()> {
        let mutation = self
            .list
            .client()
            .from("reservations")
            .delete()
            .eq("id", id)
            .execute::<Reservation>();
        self.list.delete_rows(mutation).await?;
        Ok(())
    }
}
