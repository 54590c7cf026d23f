//! Portal Documents Library
//!
//! Composition of the booking PDFs (statement of accounts, allotment letter,
//! agreement to sell and milestone invoices) and the local file sink used
//! for downloads and generated output.
//!
//! Rendering is split in two stages: a renderer lays text and shapes out on
//! a [`layout::Page`] in millimetres from the top-left corner, then
//! [`writer::write_pdf`] serializes that page to a single-page A4 PDF.

pub mod compose;
pub mod layout;
pub mod metrics;
pub mod sink;
pub mod writer;

// Re-export commonly used types
pub use compose::{
    ComposeError, ComposedDocument, DocumentComposer, DocumentKind, StatementTotals,
};
pub use layout::Page;
pub use sink::{FileSink, LocalFileSink};
pub use writer::write_pdf;
