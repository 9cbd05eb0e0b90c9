use crate::models::Sede;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::collections::HashMap;
use std::env;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_EMAIL: &str = "no-reply@localhost";
pub const DEFAULT_LEADS_TO: &str = "cursos@acropolisperu.org";
pub const DEFAULT_ORG_NAME: &str = "Nueva Acrópolis Lima";

/// Process configuration, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct LeadConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub smtp: SmtpConfig,
    pub notifications: NotificationConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

impl MongoConfig {
    pub fn is_configured(&self) -> bool {
        self.uri.is_some() && self.database.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<Secret<String>>,
    pub from_email: String,
}

impl SmtpConfig {
    /// Host, user and password are all needed before a send is attempted.
    pub fn is_complete(&self) -> bool {
        self.host.is_some() && self.user.is_some() && self.password.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Primary recipient of every lead notification.
    pub leads_to: String,
    /// Prefix of the notification subject line.
    pub org_name: String,
    /// CC address per location, only for locations that have one configured.
    pub sede_emails: HashMap<Sede, String>,
}

impl LeadConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env as a side effect, so it runs before any env lookup below.
        let common_config = core_config::Config::load()?;
        Ok(Self::from_lookup(common_config, |key| env::var(key).ok()))
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let smtp_user = get("SMTP_USER");
        let from_email = get("SMTP_FROM")
            .or_else(|| smtp_user.clone())
            .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string());

        let sede_emails = Sede::ALL
            .into_iter()
            .filter_map(|sede| get(sede.cc_env_key()).map(|address| (sede, address)))
            .collect();

        LeadConfig {
            common,
            mongodb: MongoConfig {
                uri: get("DATABASE_URL"),
                database: get("DATABASE_NAME"),
            },
            smtp: SmtpConfig {
                host: get("SMTP_HOST"),
                port: get("SMTP_PORT")
                    .and_then(|port| port.trim().parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: smtp_user,
                password: get("SMTP_PASS").map(Secret::new),
                from_email,
            },
            notifications: NotificationConfig {
                leads_to: get("LEADS_TO").unwrap_or_else(|| DEFAULT_LEADS_TO.to_string()),
                org_name: get("LEADS_ORG_NAME").unwrap_or_else(|| DEFAULT_ORG_NAME.to_string()),
                sede_emails,
            },
            otlp_endpoint: get("OTLP_ENDPOINT"),
        }
    }
}
