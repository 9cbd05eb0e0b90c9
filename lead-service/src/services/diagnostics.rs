use crate::config::MongoConfig;
use crate::services::database::LeadStore;
use serde::{Deserialize, Serialize};

const MAX_COLLECTIONS: usize = 10;
const ERROR_EXCERPT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    Connected,
    NotConfigured,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    NotConnected,
}

/// Snapshot served by the `/test` diagnostic endpoint.
///
/// Configuration values are reported as set or not, never echoed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: DatabaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: ConnectionStatus,
    pub database_url_set: bool,
    pub database_name_set: bool,
    pub collections: Vec<String>,
}

pub async fn diagnose(store: Option<&dyn LeadStore>, mongodb: &MongoConfig) -> DiagnosticReport {
    let mut report = DiagnosticReport {
        backend: "running".to_string(),
        database: DatabaseStatus::NotConfigured,
        database_error: None,
        database_name: None,
        connection_status: ConnectionStatus::NotConnected,
        database_url_set: mongodb.uri.is_some(),
        database_name_set: mongodb.database.is_some(),
        collections: Vec::new(),
    };

    let Some(store) = store else {
        return report;
    };

    report.database_name = Some(store.database_name().to_string());
    if store.is_connected() {
        report.connection_status = ConnectionStatus::Connected;
    }

    match store.list_collection_names().await {
        Ok(mut names) => {
            names.truncate(MAX_COLLECTIONS);
            report.collections = names;
            report.database = DatabaseStatus::Connected;
        }
        Err(e) => {
            report.database = DatabaseStatus::Error;
            report.database_error = Some(excerpt(&e.to_string()));
        }
    }

    report
}

fn excerpt(message: &str) -> String {
    message.chars().take(ERROR_EXCERPT_CHARS).collect()
}
