// cafe-client/src/screens/forms/contact.rs
// 联系表单

use shared::models::{ContactMessage, ContactMessageCreate};
use shared::validation::Validate;

use super::{FormResult, FormState};
use crate::CafeClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    fn to_create(&self) -> ContactMessageCreate {
        ContactMessageCreate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ContactForm {
    pub fields: ContactFields,
    state: FormState,
    sent: Option<ContactMessage>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Message confirmed by the last successful submit
    pub fn sent(&self) -> Option<&ContactMessage> {
        self.sent.as_ref()
    }

    pub fn validate(&mut self) -> FormResult<()> {
        self.state.check(self.fields.to_create().validate())
    }

    pub async fn submit(&mut self, client: &CafeClient) -> FormResult<ContactMessage> {
        self.validate()?;
        self.state.submitting();
        let result = client
            .from("contact_messages")
            .insert(&self.fields.to_create())
            .execute::<ContactMessage>()
            .await;
        let sent = self.state.settle(result)?;
        self.fields = ContactFields::default();
        self.sent = Some(sent.clone());
        Ok(sent)
    }
}
