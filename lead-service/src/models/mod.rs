pub mod lead;
pub mod sede;

pub use lead::{Lead, StoredLead};
pub use sede::Sede;
