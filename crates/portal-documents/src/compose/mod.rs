//! Booking document renderers.
//!
//! Each renderer is a pure function from booking data to a laid-out `Page`.
//! `DocumentComposer` adds the file name, the clock for generated dates and
//! logging, and hands back a `ComposedDocument` ready to serialize.

mod agreement;
mod allotment;
mod invoice;
mod statement;

use std::sync::Arc;

use portal_core::format::{format_crores, format_indian};
use portal_core::{Booking, Clock, ErrorMetadata, LogLevel};
use rust_decimal::Decimal;

use crate::layout::{Page, Rgb};
use crate::writer::write_pdf;

pub use agreement::{agreement_file_name, render_agreement};
pub use allotment::{allotment_file_name, render_allotment_letter};
pub use invoice::{invoice_file_name, render_invoice};
pub use statement::{render_statement, statement_file_name, StatementTotals};

pub(crate) const BRAND_BLUE: Rgb = Rgb(59, 130, 246);
pub(crate) const PAID_GREEN: Rgb = Rgb(0, 150, 0);
pub(crate) const DUE_ORANGE: Rgb = Rgb(255, 100, 0);

pub(crate) const COMPANY_NAME: &str = "KLOUDRAC Real Estate Pvt Ltd";
const FOOTER_TEXT: &str =
    "KLOUDRAC Real Estate Pvt Ltd | Email: info@kloudrac.com | Phone: +91 22 1234 5678";

/// Stand-in for the rupee sign, which the standard PDF fonts cannot draw.
pub(crate) const RUPEE: &str = "Rs.";

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Invoice for milestone {milestone_id} is missing {field}")]
    MissingInvoiceField {
        milestone_id: u32,
        field: &'static str,
    },

    #[error("Milestone {milestone_id} not found in booking {booking_id}")]
    MilestoneNotFound {
        booking_id: String,
        milestone_id: u32,
    },

    #[error("Failed to encode PDF: {0}")]
    Encode(String),
}

impl ErrorMetadata for ComposeError {
    fn error_code(&self) -> &'static str {
        match self {
            ComposeError::MissingInvoiceField { .. } => "MISSING_INVOICE_FIELD",
            ComposeError::MilestoneNotFound { .. } => "MILESTONE_NOT_FOUND",
            ComposeError::Encode(_) => "PDF_ENCODE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            ComposeError::MissingInvoiceField { .. } => {
                Some("The invoice has not been issued yet")
            }
            ComposeError::MilestoneNotFound { .. } => Some("Check the milestone id"),
            ComposeError::Encode(_) => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ComposeError::MissingInvoiceField { .. } => {
                "The invoice for this milestone is not available yet.".to_string()
            }
            ComposeError::MilestoneNotFound { milestone_id, .. } => {
                format!("Milestone {} does not exist for this booking.", milestone_id)
            }
            ComposeError::Encode(_) => "The document could not be generated.".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ComposeError::Encode(_) => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }
}

/// Which document to compose for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    StatementOfAccounts,
    AllotmentLetter,
    AgreementToSell,
    Invoice { milestone_id: u32 },
}

/// A rendered document and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDocument {
    pub file_name: String,
    pub page: Page,
}

impl ComposedDocument {
    pub fn to_pdf(&self) -> Result<Vec<u8>, ComposeError> {
        write_pdf(&self.page)
    }
}

/// Composes booking documents. The clock is the only input besides the
/// booking itself.
#[derive(Clone)]
pub struct DocumentComposer {
    clock: Arc<dyn Clock>,
}

impl DocumentComposer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn compose(
        &self,
        booking: &Booking,
        kind: DocumentKind,
    ) -> Result<ComposedDocument, ComposeError> {
        let (file_name, page) = match kind {
            DocumentKind::StatementOfAccounts => (
                statement_file_name(booking),
                render_statement(booking, self.clock.today()),
            ),
            DocumentKind::AllotmentLetter => {
                (allotment_file_name(booking), render_allotment_letter(booking))
            }
            DocumentKind::AgreementToSell => (agreement_file_name(booking), render_agreement(booking)),
            DocumentKind::Invoice { milestone_id } => {
                let milestone =
                    booking
                        .milestone(milestone_id)
                        .ok_or_else(|| ComposeError::MilestoneNotFound {
                            booking_id: booking.booking_id.clone(),
                            milestone_id,
                        })?;
                (
                    invoice_file_name(booking, milestone)?,
                    render_invoice(booking, milestone)?,
                )
            }
        };

        if page.overflows() {
            tracing::warn!(
                booking_id = %booking.booking_id,
                file_name = %file_name,
                content_bottom_mm = page.content_bottom(),
                "Document content runs into the footer band"
            );
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            file_name = %file_name,
            elements = page.elements().count(),
            "Document composed"
        );

        Ok(ComposedDocument { file_name, page })
    }
}

/// Blue header band with the company mark.
pub(crate) fn draw_header(page: &mut Page) {
    page.chrome(|p| {
        p.set_fill_color(BRAND_BLUE);
        p.fill_rect(0.0, 0.0, 210.0, 40.0);
        p.set_text_color(Rgb::WHITE).set_font_size(24.0);
        p.text("KLOUDRAC", 20.0, 25.0);
        p.set_font_size(10.0);
        p.text("Real Estate Solutions", 20.0, 32.0);
    });
    page.set_text_color(Rgb::BLACK);
}

/// Blue footer band with contact details.
pub(crate) fn draw_footer(page: &mut Page) {
    page.chrome(|p| {
        p.set_fill_color(BRAND_BLUE);
        p.fill_rect(0.0, 280.0, 210.0, 17.0);
        p.set_text_color(Rgb::WHITE).set_font_size(8.0);
        p.text_centered(FOOTER_TEXT, 105.0, 290.0);
    });
}

/// `Rs. 7,65,000`
pub(crate) fn rupees(amount: Decimal) -> String {
    format!("{} {}", RUPEE, format_indian(amount))
}

/// `Rs. 1.70 Crores`
pub(crate) fn rupees_in_crores(amount: Decimal) -> String {
    format!("{} {} Crores", RUPEE, format_crores(amount))
}
