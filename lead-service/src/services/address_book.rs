use crate::config::NotificationConfig;
use crate::models::Sede;
use std::collections::HashMap;

/// Location name to CC address, fixed for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct NotificationAddressBook {
    addresses: HashMap<Sede, String>,
}

impl NotificationAddressBook {
    pub fn new(addresses: HashMap<Sede, String>) -> Self {
        Self { addresses }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.sede_emails.clone())
    }

    /// Address to copy for `sede`, if it is a known location with one configured.
    pub fn resolve(&self, sede: &str) -> Option<&str> {
        Sede::from_name(sede)
            .and_then(|sede| self.addresses.get(&sede))
            .map(String::as_str)
    }
}
