#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use lead_service::config::LeadConfig;
use lead_service::services::{
    EmailProvider, LeadStore, MockEmailProvider, MockLeadStore, SmtpProvider,
};
use lead_service::startup::{build_router, connect_store, AppState};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const LEADS_TO: &str = "cursos@example.com";
pub const SAN_ISIDRO_CC: &str = "sanisidro@example.com";
pub const LA_MOLINA_CC: &str = "lamolina@example.com";
pub const TEST_DATABASE_URL: &str = "mongodb://leads-test.internal:27017";

/// Configuration pointing the store at `database_url`.
pub fn config_with_database_url(database_url: &str) -> LeadConfig {
    let vars = HashMap::from([
        ("LEADS_TO", LEADS_TO),
        ("DATABASE_URL", database_url),
        ("DATABASE_NAME", "leads_test"),
    ]);

    LeadConfig::from_lookup(CoreConfig { port: 0 }, |key| {
        vars.get(key).map(|value| value.to_string())
    })
}

pub fn test_config(with_store: bool) -> LeadConfig {
    let mut vars = HashMap::from([
        ("LEADS_TO", LEADS_TO),
        ("SEDE_SAN_ISIDRO_EMAIL", SAN_ISIDRO_CC),
        ("SEDE_LA_MOLINA_EMAIL", LA_MOLINA_CC),
    ]);
    if with_store {
        vars.insert("DATABASE_URL", TEST_DATABASE_URL);
        vars.insert("DATABASE_NAME", "leads_test");
    }

    LeadConfig::from_lookup(CoreConfig { port: 0 }, |key| {
        vars.get(key).map(|value| value.to_string())
    })
}

/// The valid submission from the intake scenarios.
pub fn valid_lead() -> Value {
    json!({
        "parent_name": "Ana",
        "parent_email": "ana@x.com",
        "parent_phone": "999",
        "child_name": "Leo",
        "child_age": 8,
        "program": "Kids",
        "sede": "San Isidro",
        "courses": ["Ajedrez"]
    })
}

pub struct TestApp {
    pub router: Router,
    pub store: Option<Arc<MockLeadStore>>,
    pub mailer: Option<Arc<MockEmailProvider>>,
}

impl TestApp {
    /// Working store and a recording mail provider.
    pub fn spawn() -> Self {
        Self::build(Some(MockLeadStore::new()), Some(MockEmailProvider::new()))
    }

    pub fn with_failing_store() -> Self {
        Self::build(Some(MockLeadStore::failing()), Some(MockEmailProvider::new()))
    }

    pub fn without_store() -> Self {
        Self::build(None, Some(MockEmailProvider::new()))
    }

    pub fn with_failing_mailer() -> Self {
        Self::build(Some(MockLeadStore::new()), Some(MockEmailProvider::failing()))
    }

    /// Real SMTP provider built from a configuration with no relay settings.
    pub fn with_unconfigured_smtp() -> Self {
        Self::build(Some(MockLeadStore::new()), None)
    }

    /// Store wired the way startup wires it for `config`.
    pub async fn with_connected_store(config: LeadConfig) -> Self {
        let store = connect_store(&config).await;
        let mailer = Arc::new(MockEmailProvider::new());
        let router = build_router(AppState::new(config, store, mailer.clone()));

        TestApp {
            router,
            store: None,
            mailer: Some(mailer),
        }
    }

    fn build(store: Option<MockLeadStore>, mailer: Option<MockEmailProvider>) -> Self {
        let config = test_config(store.is_some());
        let store = store.map(Arc::new);
        let mailer = mailer.map(Arc::new);

        let email_provider: Arc<dyn EmailProvider> = match &mailer {
            Some(mock) => mock.clone(),
            None => Arc::new(
                SmtpProvider::new(&config.smtp).expect("Failed to build SMTP provider"),
            ),
        };
        let lead_store = store.clone().map(|s| s as Arc<dyn LeadStore>);

        let router = build_router(AppState::new(config, lead_store, email_provider));

        TestApp {
            router,
            store,
            mailer,
        }
    }

    pub fn store(&self) -> &MockLeadStore {
        self.store.as_deref().expect("test app has no store")
    }

    pub fn mailer(&self) -> &MockEmailProvider {
        self.mailer.as_deref().expect("test app has no mock mailer")
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_lead(&self, lead: &Value) -> (StatusCode, Value) {
        self.post_raw(&lead.to_string(), "application/json").await
    }

    pub async fn post_raw(&self, body: &str, content_type: &str) -> (StatusCode, Value) {
        let response = self
            .request(
                Request::builder()
                    .method("POST")
                    .uri("/api/leads")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        into_json(response).await
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.get(path).await;
        into_json(response).await
    }

    pub async fn get(&self, path: &str) -> Response {
        self.request(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

async fn into_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = body_text(response).await;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, body)
}
