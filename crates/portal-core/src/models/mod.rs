pub mod booking;
pub mod catalog;
pub mod checklist;
pub mod document;
pub mod summary;

pub use booking::{Booking, BookingDirectory, BookingStatus, Milestone, MilestoneStatus};
pub use catalog::{Availability, DocumentCatalog, GeneratedDocument, GeneratedKind, InvoiceCandidate};
pub use checklist::{Checklist, ChecklistEntry, ChecklistStatus};
pub use document::{ChecklistCategory, CustomLabel, DocumentCategory, DocumentRecord, RemoteFile};
pub use summary::MilestoneSummary;
