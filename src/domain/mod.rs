pub mod lead;
pub mod notification;

pub use lead::{Ack, LeadPayload, LeadRecord, LeadSubmission};
pub use notification::{Notification, SheetRow};
