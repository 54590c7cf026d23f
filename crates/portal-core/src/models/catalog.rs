use chrono::NaiveDate;
use serde::Serialize;

use super::booking::{Booking, BookingStatus, Milestone};
use crate::format::format_short_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratedKind {
    StatementOfAccounts,
    AllotmentLetter,
    AgreementToSell,
    PaymentReceipts,
    ConstructionUpdates,
    PossessionLetter,
    CompletionCertificate,
    OccupancyCertificate,
}

impl GeneratedKind {
    /// Whether the portal can render this document itself.
    pub fn is_renderable(&self) -> bool {
        matches!(
            self,
            GeneratedKind::StatementOfAccounts
                | GeneratedKind::AllotmentLetter
                | GeneratedKind::AgreementToSell
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub kind: GeneratedKind,
    pub name: &'static str,
    pub description: &'static str,
    pub status: Availability,
    pub generated_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceCandidate {
    pub milestone_id: u32,
    pub milestone_name: String,
    pub invoice_number: String,
}

/// Documents the portal issues for a booking, with availability derived
/// from the booking status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCatalog {
    pub documents: Vec<GeneratedDocument>,
    pub invoices: Vec<InvoiceCandidate>,
}

impl DocumentCatalog {
    pub fn for_booking(booking: &Booking, today: NaiveDate) -> Self {
        let today = format_short_date(today);
        let active = booking.status == BookingStatus::Active;
        let completed = booking.status == BookingStatus::Completed;

        let on_completion = |kind, name, description| GeneratedDocument {
            kind,
            name,
            description,
            status: availability(completed),
            generated_date: if completed {
                booking.possession.clone()
            } else {
                "-".to_string()
            },
            info: None,
        };

        let documents = vec![
            GeneratedDocument {
                kind: GeneratedKind::StatementOfAccounts,
                name: "Statement of Accounts (SOA)",
                description: "Complete payment history and account summary",
                status: Availability::Available,
                generated_date: today.clone(),
                info: None,
            },
            GeneratedDocument {
                kind: GeneratedKind::AllotmentLetter,
                name: "Allotment Letter",
                description: "Official unit allotment confirmation letter",
                status: Availability::Available,
                generated_date: booking.booking_date.clone(),
                info: None,
            },
            GeneratedDocument {
                kind: GeneratedKind::AgreementToSell,
                name: "Agreement to Sell",
                description: "Legal agreement between buyer and seller",
                status: Availability::Available,
                generated_date: booking.booking_date.clone(),
                info: None,
            },
            GeneratedDocument {
                kind: GeneratedKind::PaymentReceipts,
                name: "Payment Receipts",
                description: "All payment receipts and invoices",
                status: Availability::Available,
                generated_date: today.clone(),
                info: Some("Available in Invoices tab"),
            },
            GeneratedDocument {
                kind: GeneratedKind::ConstructionUpdates,
                name: "Construction Updates",
                description: "Monthly construction progress reports",
                status: availability(active),
                generated_date: today,
                info: None,
            },
            on_completion(
                GeneratedKind::PossessionLetter,
                "Possession Letter",
                "Property possession confirmation",
            ),
            on_completion(
                GeneratedKind::CompletionCertificate,
                "Completion Certificate",
                "Building completion certification",
            ),
            on_completion(
                GeneratedKind::OccupancyCertificate,
                "Occupancy Certificate",
                "Legal occupancy permission certificate",
            ),
        ];

        let invoices = booking
            .milestones
            .iter()
            .filter_map(invoice_candidate)
            .collect();

        DocumentCatalog {
            documents,
            invoices,
        }
    }

    pub fn available_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status == Availability::Available)
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.documents.len() - self.available_count()
    }
}

fn availability(flag: bool) -> Availability {
    if flag {
        Availability::Available
    } else {
        Availability::Pending
    }
}

fn invoice_candidate(milestone: &Milestone) -> Option<InvoiceCandidate> {
    if !milestone.has_invoice() {
        return None;
    }
    milestone
        .invoice_number
        .as_ref()
        .map(|number| InvoiceCandidate {
            milestone_id: milestone.id,
            milestone_name: milestone.name.clone(),
            invoice_number: number.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::MilestoneStatus;
    use rust_decimal_macros::dec;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            booking_id: "BK-2024-001".to_string(),
            status,
            customer_name: "Rajesh Kumar".to_string(),
            customer_email: "rajesh@example.com".to_string(),
            customer_phone: "+91 98765 43210".to_string(),
            property_name: "Skyline Towers".to_string(),
            tower_name: None,
            unit: "A-1204".to_string(),
            unit_type: "3 BHK".to_string(),
            area: "1850 sq.ft".to_string(),
            floor_number: "12".to_string(),
            facing: None,
            parking_slots: None,
            location: "Andheri West, Mumbai".to_string(),
            price: dec!(85000000),
            booking_date: "2024-08-15".to_string(),
            possession: "Dec 2026".to_string(),
            amenities: Vec::new(),
            milestones: vec![Milestone {
                id: 1,
                name: "Booking Amount".to_string(),
                description: String::new(),
                amount: dec!(8500000),
                percentage: dec!(10),
                status: MilestoneStatus::Completed,
                due_date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                paid_date: None,
                invoice_number: Some("INV-001".to_string()),
                invoice_date: NaiveDate::from_ymd_opt(2024, 8, 15),
                gst_amount: Some(dec!(1530000)),
                total_amount: Some(dec!(10030000)),
            }],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    #[test]
    fn test_active_booking_catalog() {
        let catalog = DocumentCatalog::for_booking(&booking(BookingStatus::Active), today());

        assert_eq!(catalog.documents.len(), 8);
        assert_eq!(catalog.available_count(), 5);
        assert_eq!(catalog.pending_count(), 3);
        assert_eq!(catalog.documents[0].generated_date, "5/3/2025");
        assert_eq!(catalog.documents[1].generated_date, "2024-08-15");
        assert_eq!(catalog.documents[5].generated_date, "-");
        assert_eq!(catalog.documents[3].info, Some("Available in Invoices tab"));
    }

    #[test]
    fn test_completed_booking_catalog() {
        let catalog = DocumentCatalog::for_booking(&booking(BookingStatus::Completed), today());

        let construction = &catalog.documents[4];
        assert_eq!(construction.status, Availability::Pending);

        let possession = &catalog.documents[5];
        assert_eq!(possession.status, Availability::Available);
        assert_eq!(possession.generated_date, "Dec 2026");
        assert_eq!(catalog.available_count(), 7);
    }

    #[test]
    fn test_invoice_candidates() {
        let catalog = DocumentCatalog::for_booking(&booking(BookingStatus::Active), today());
        assert_eq!(catalog.invoices.len(), 1);
        assert_eq!(catalog.invoices[0].invoice_number, "INV-001");
    }

    #[test]
    fn test_incomplete_invoice_is_not_a_candidate() {
        let mut booking = booking(BookingStatus::Active);
        booking.milestones[0].gst_amount = None;

        assert!(!booking.milestones[0].has_invoice());
        let catalog = DocumentCatalog::for_booking(&booking, today());
        assert!(catalog.invoices.is_empty());
    }
}
