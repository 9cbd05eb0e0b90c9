use crate::config::NotificationConfig;
use crate::models::Lead;
use crate::services::address_book::NotificationAddressBook;
use crate::services::database::LeadStore;
use crate::services::metrics::{record_lead, record_notification};
use crate::services::providers::{EmailMessage, EmailProvider};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::sync::Arc;
use validator::Validate;

const NO_COURSES: &str = "N/A";
const NOT_PROVIDED: &str = "—";

/// Body returned to the form after a lead is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeReceipt {
    pub ok: bool,
    pub id: String,
    pub email_sent: bool,
}

/// Validate, persist, then notify. Only the first two steps can fail the request.
pub struct LeadIntake {
    store: Option<Arc<dyn LeadStore>>,
    email_provider: Arc<dyn EmailProvider>,
    address_book: NotificationAddressBook,
    leads_to: String,
    org_name: String,
}

impl LeadIntake {
    pub fn new(
        store: Option<Arc<dyn LeadStore>>,
        email_provider: Arc<dyn EmailProvider>,
        notifications: &NotificationConfig,
    ) -> Self {
        Self {
            store,
            email_provider,
            address_book: NotificationAddressBook::from_config(notifications),
            leads_to: notifications.leads_to.clone(),
            org_name: notifications.org_name.clone(),
        }
    }

    pub async fn submit(&self, lead: Lead) -> Result<IntakeReceipt, AppError> {
        if let Err(errors) = lead.validate() {
            tracing::info!(errors = %errors, "Rejected invalid lead");
            record_lead("invalid");
            return Err(errors.into());
        }

        let Some(store) = self.store.as_ref() else {
            record_lead("storage_unavailable");
            return Err(AppError::StorageUnavailable(
                "lead store is not configured".to_string(),
            ));
        };

        let lead_id = store
            .insert_lead(&lead)
            .await
            .inspect_err(|_| record_lead("storage_error"))?;

        tracing::info!(
            lead_id = %lead_id,
            sede = %lead.sede,
            program = %lead.program,
            "Lead stored"
        );

        let email = self.compose(&lead, &lead_id);
        let outcome = self.email_provider.send(&email).await;
        record_notification(outcome.label());
        record_lead("accepted");

        if !outcome.is_delivered() {
            tracing::warn!(lead_id = %lead_id, outcome = ?outcome, "Lead stored without notification");
        }

        Ok(IntakeReceipt {
            ok: true,
            id: lead_id,
            email_sent: outcome.is_delivered(),
        })
    }

    /// The notification for a stored lead.
    pub fn compose(&self, lead: &Lead, lead_id: &str) -> EmailMessage {
        let cc = match self.address_book.resolve(&lead.sede) {
            Some(address) => vec![address.to_string()],
            None => {
                tracing::debug!(sede = %lead.sede, "No CC address for location");
                Vec::new()
            }
        };

        EmailMessage {
            to: vec![self.leads_to.clone()],
            cc,
            subject: lead_subject(&self.org_name, lead),
            body_text: lead_body(lead, lead_id),
        }
    }
}

pub fn lead_subject(org_name: &str, lead: &Lead) -> String {
    format!("{} - Lead Kids ({}) - {}", org_name, lead.program, lead.sede)
}

pub fn lead_body(lead: &Lead, lead_id: &str) -> String {
    let courses = if lead.courses.is_empty() {
        NO_COURSES.to_string()
    } else {
        lead.courses.join(", ")
    };

    format!(
        "Nuevo lead recibido para Cursos de Verano Kids\n\n\
         Sede: {sede}\n\
         Programa: {program}\n\
         Cursos de interés: {courses}\n\n\
         Datos del padre/madre:\n\
         - Nombre: {parent_name}\n\
         - Email: {parent_email}\n\
         - Teléfono: {parent_phone}\n\n\
         Datos del niño/niña:\n\
         - Nombre: {child_name}\n\
         - Edad: {child_age}\n\n\
         Mensaje: {message}\n\
         Fuente: {source}\n\
         ID: {lead_id}\n",
        sede = lead.sede,
        program = lead.program,
        courses = courses,
        parent_name = lead.parent_name,
        parent_email = lead.parent_email,
        parent_phone = lead.parent_phone,
        child_name = lead.child_name,
        child_age = lead.child_age,
        message = lead.message.as_deref().unwrap_or(NOT_PROVIDED),
        source = lead.source.as_deref().unwrap_or(NOT_PROVIDED),
        lead_id = lead_id,
    )
}
