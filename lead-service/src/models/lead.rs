use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A parent's inquiry about kids summer courses.
///
/// `program` and `sede` are free text; the form offers "Mini Kids"/"Kids" and
/// the five known locations but other values are stored as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Lead {
    #[validate(custom(function = "not_blank", message = "parent_name is required"))]
    pub parent_name: String,
    #[validate(email(message = "parent_email must be a valid email address"))]
    pub parent_email: String,
    #[validate(custom(function = "not_blank", message = "parent_phone is required"))]
    pub parent_phone: String,

    #[validate(custom(function = "not_blank", message = "child_name is required"))]
    pub child_name: String,
    #[validate(range(min = 3, max = 17, message = "child_age must be between 3 and 17"))]
    pub child_age: i32,

    #[validate(custom(function = "not_blank", message = "program is required"))]
    pub program: String,
    #[validate(custom(function = "not_blank", message = "sede is required"))]
    pub sede: String,

    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Rejects empty and whitespace-only text.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A lead as persisted in the `lead` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLead {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_utc: DateTime<Utc>,
}

impl StoredLead {
    pub fn new(lead: Lead) -> Self {
        Self {
            id: ObjectId::new(),
            lead,
            created_utc: Utc::now(),
        }
    }

    pub fn lead_id(&self) -> String {
        self.id.to_hex()
    }
}
