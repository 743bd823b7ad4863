// cafe-client/src/screens/forms/reservation.rs
// 预订表单

use chrono::NaiveDate;
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use shared::validation::{self, MAX_GUESTS, MIN_GUESTS};

use super::{FormResult, FormState, optional};
use crate::CafeClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub guests: i32,
    pub special_request: String,
}

impl Default for ReservationFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            date: String::new(),
            time: String::new(),
            guests: 2,
            special_request: String::new(),
        }
    }
}

impl ReservationFields {
    fn to_create(&self) -> ReservationCreate {
        ReservationCreate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            guests: self.guests,
            special_request: optional(&self.special_request),
        }
    }
}

/// Shown after a successful booking; echoes what the server stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfirmation {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub time: String,
    pub guests: i32,
    pub status: ReservationStatus,
}

impl From<&Reservation> for ReservationConfirmation {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            date: r.date.clone(),
            time: r.time.clone(),
            guests: r.guests,
            status: r.status,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReservationForm {
    pub fields: ReservationFields,
    state: FormState,
    confirmation: Option<ReservationConfirmation>,
}

impl ReservationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn confirmation(&self) -> Option<&ReservationConfirmation> {
        self.confirmation.as_ref()
    }

    /// Close the success panel to book again
    pub fn dismiss_confirmation(&mut self) {
        self.confirmation = None;
    }

    pub fn increment_guests(&mut self) -> i32 {
        self.fields.guests = self.fields.guests.saturating_add(1).clamp(MIN_GUESTS, MAX_GUESTS);
        self.fields.guests
    }

    pub fn decrement_guests(&mut self) -> i32 {
        self.fields.guests = self.fields.guests.saturating_sub(1).clamp(MIN_GUESTS, MAX_GUESTS);
        self.fields.guests
    }

    /// Validate against a fixed "today"
    pub fn validate_on(&mut self, today: NaiveDate) -> FormResult<()> {
        self.state.check(self.fields.to_create().validate_on(today))
    }

    pub fn validate(&mut self) -> FormResult<()> {
        self.validate_on(validation::today())
    }

    pub async fn submit(&mut self, client: &CafeClient) -> FormResult<ReservationConfirmation> {
        self.submit_on(client, validation::today()).await
    }

    pub async fn submit_on(
        &mut self,
        client: &CafeClient,
        today: NaiveDate,
    ) -> FormResult<ReservationConfirmation> {
        self.validate_on(today)?;
        self.state.submitting();
        let result = client
            .from("reservations")
            .insert(&self.fields.to_create())
            .execute::<Reservation>()
            .await;
        let reservation = self.state.settle(result)?;
        tracing::info!(id = reservation.id, date = %reservation.date, "Reservation submitted");
        let confirmation = ReservationConfirmation::from(&reservation);
        self.fields = ReservationFields::default();
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHttpClient;
    use crate::screens::forms::{FormError, FormStatus};
    use serde_json::json;
    use shared::error::ErrorCode;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn budi() -> ReservationForm {
        let mut form = ReservationForm::new();
        form.fields = ReservationFields {
            name: "Budi".into(),
            email: "budi@x.com".into(),
            phone: "081234567890".into(),
            date: "2026-10-20".into(),
            time: "19:00".into(),
            guests: 4,
            special_request: String::new(),
        };
        form
    }

    #[test]
    fn test_guest_stepper_clamps() {
        let mut form = ReservationForm::new();
        form.fields.guests = 1;
        assert_eq!(form.decrement_guests(), 1);
        form.fields.guests = 12;
        assert_eq!(form.increment_guests(), 12);
        assert_eq!(form.decrement_guests(), 11);
    }

    #[test]
    fn test_guest_stepper_at_integer_limits() {
        let mut form = ReservationForm::new();
        form.fields.guests = i32::MAX;
        assert_eq!(form.increment_guests(), MAX_GUESTS);
        form.fields.guests = i32::MIN;
        assert_eq!(form.decrement_guests(), MIN_GUESTS);
        form.fields.guests = i32::MIN;
        assert_eq!(form.increment_guests(), MIN_GUESTS);
    }

    #[test]
    fn test_tampered_guest_count_rejected() {
        let mut form = budi();
        form.fields.guests = 40;
        assert!(form.validate_on(today()).is_err());
        assert!(form.state().field_error("guests").is_some());
    }

    #[tokio::test]
    async fn test_past_date_sends_nothing() {
        let mock = MockHttpClient::new();
        let client = CafeClient::with_http(mock.clone());
        let mut form = budi();
        form.fields.date = "2026-10-18".into();

        let err = form.submit_on(&client, today()).await.unwrap_err();
        match err {
            FormError::Invalid(errors) => {
                assert_eq!(errors.get("date").unwrap().code, ErrorCode::ReservationDateInPast)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmation_echoes_booking() {
        let mock = MockHttpClient::new();
        mock.push_ok(json!({
            "id": 42, "name": "Budi", "email": "budi@x.com", "phone": "081234567890",
            "date": "2026-10-20", "time": "19:00", "guests": 4,
            "special_request": null, "status": "pending", "created_at": 1
        }));
        let client = CafeClient::with_http(mock.clone());
        let mut form = budi();

        let confirmation = form.submit_on(&client, today()).await.unwrap();
        assert_eq!(confirmation.date, "2026-10-20");
        assert_eq!(confirmation.time, "19:00");
        assert_eq!(confirmation.guests, 4);
        assert_eq!(confirmation.status, ReservationStatus::Pending);
        assert_eq!(form.fields, ReservationFields::default());
        assert_eq!(form.state().status(), &FormStatus::Succeeded);

        let body = mock.last_request().unwrap().body.unwrap();
        assert!(body.get("status").is_none());
        assert!(body.get("special_request").is_none());
    }
}
