use crate::models::{Lead, StoredLead};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use std::sync::Mutex;

pub const LEADS_COLLECTION: &str = "lead";

/// Storage seam used by the intake workflow and the diagnostics report.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Inserts one new document and returns its generated id.
    async fn insert_lead(&self, lead: &Lead) -> Result<String, AppError>;
    fn database_name(&self) -> &str;
    async fn list_collection_names(&self) -> Result<Vec<String>, AppError>;
    async fn health_check(&self) -> Result<(), AppError>;

    /// False when no driver client could be created for the configured URL.
    fn is_connected(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct LeadDb {
    client: MongoClient,
    db: Database,
}

impl LeadDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub fn leads(&self) -> Collection<StoredLead> {
        self.db.collection(LEADS_COLLECTION)
    }

    pub async fn find_by_id(&self, lead_id: &str) -> Result<Option<StoredLead>, AppError> {
        let id = ObjectId::parse_str(lead_id)
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid lead id: {}", e)))?;

        self.leads()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find lead: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }
}

#[async_trait]
impl LeadStore for LeadDb {
    async fn insert_lead(&self, lead: &Lead) -> Result<String, AppError> {
        let stored = StoredLead::new(lead.clone());

        self.leads().insert_one(&stored, None).await.map_err(|e| {
            tracing::error!("Failed to insert lead: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(stored.lead_id())
    }

    fn database_name(&self) -> &str {
        self.db.name()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        self.db.list_collection_names(None).await.map_err(|e| {
            tracing::warn!("Failed to list collections: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }
}

/// Stands in for a store whose client could not be created at startup.
///
/// Every operation fails with `StorageUnavailable` carrying the driver's
/// reason, so intake answers 503 and diagnostics can show the excerpt.
pub struct UnavailableLeadStore {
    database: String,
    reason: String,
}

impl UnavailableLeadStore {
    pub fn new(database: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            reason: reason.into(),
        }
    }

    fn error(&self) -> AppError {
        AppError::StorageUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl LeadStore for UnavailableLeadStore {
    async fn insert_lead(&self, _lead: &Lead) -> Result<String, AppError> {
        Err(self.error())
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(self.error())
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// In-memory store for tests; optionally rejects every operation.
pub struct MockLeadStore {
    fail: bool,
    leads: Mutex<Vec<StoredLead>>,
}

impl MockLeadStore {
    pub fn new() -> Self {
        Self {
            fail: false,
            leads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            leads: Mutex::new(Vec::new()),
        }
    }

    pub fn stored(&self) -> Vec<StoredLead> {
        self.leads
            .lock()
            .map(|leads| leads.clone())
            .unwrap_or_default()
    }

    fn unavailable() -> AppError {
        AppError::DatabaseError(anyhow::anyhow!("mock store is unavailable"))
    }
}

impl Default for MockLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadStore for MockLeadStore {
    async fn insert_lead(&self, lead: &Lead) -> Result<String, AppError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        let stored = StoredLead::new(lead.clone());
        let lead_id = stored.lead_id();
        self.leads
            .lock()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("mock store poisoned")))?
            .push(stored);
        Ok(lead_id)
    }

    fn database_name(&self) -> &str {
        "mock"
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        let has_leads = self.leads.lock().map(|l| !l.is_empty()).unwrap_or(false);
        Ok(if has_leads {
            vec![LEADS_COLLECTION.to_string()]
        } else {
            Vec::new()
        })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}
