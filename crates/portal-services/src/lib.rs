//! Portal Services Layer
//!
//! Coordinates the record store, the file service client and the local
//! file sink for one booking at a time: upload staging and batch submit,
//! the document list and checklist, and view/download of stored files.

pub mod bookings;
pub mod session;
pub mod validator;
pub mod workspace;

pub use bookings::load_bookings;
pub use session::{
    BatchReport, SessionError, SessionState, StagedFile, UploadFailure, UploadSession,
};
pub use validator::UploadValidator;
pub use workspace::BookingDocuments;
