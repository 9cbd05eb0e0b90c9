pub mod address_book;
pub mod database;
pub mod diagnostics;
pub mod intake;
pub mod metrics;
pub mod providers;

pub use address_book::NotificationAddressBook;
pub use database::{LeadDb, LeadStore, MockLeadStore, UnavailableLeadStore, LEADS_COLLECTION};
pub use diagnostics::{diagnose, ConnectionStatus, DatabaseStatus, DiagnosticReport};
pub use intake::{IntakeReceipt, LeadIntake};
pub use metrics::{get_metrics, init_metrics, record_lead, record_notification};
pub use providers::{
    DeliveryOutcome, EmailMessage, EmailProvider, MockEmailProvider, NotDeliveredReason,
    ProviderError, SmtpProvider,
};
