use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Completed,
    Pending,
    Upcoming,
}

impl Display for MilestoneStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MilestoneStatus::Completed => write!(f, "completed"),
            MilestoneStatus::Pending => write!(f, "pending"),
            MilestoneStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// One installment in a booking's payment plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub status: MilestoneStatus,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub gst_amount: Option<Decimal>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

impl Milestone {
    pub fn is_completed(&self) -> bool {
        self.status == MilestoneStatus::Completed
    }

    /// Whether every field a tax invoice prints is present.
    pub fn has_invoice(&self) -> bool {
        self.invoice_number.is_some()
            && self.invoice_date.is_some()
            && self.gst_amount.is_some()
            && self.total_amount.is_some()
    }
}

/// A customer's booking of one unit. Read-only input to the document
/// subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub property_name: String,
    #[serde(default)]
    pub tower_name: Option<String>,
    pub unit: String,
    #[serde(rename = "type")]
    pub unit_type: String,
    pub area: String,
    pub floor_number: String,
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub parking_slots: Option<u32>,
    pub location: String,
    pub price: Decimal,
    pub booking_date: String,
    pub possession: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Booking {
    pub fn milestone(&self, id: u32) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Sum of the amounts of completed milestones.
    pub fn paid_amount(&self) -> Decimal {
        self.milestones
            .iter()
            .filter(|m| m.is_completed())
            .map(|m| m.amount)
            .sum()
    }

    pub fn balance_due(&self) -> Decimal {
        self.price - self.paid_amount()
    }
}

/// The set of bookings visible to the portal, keyed by booking id.
#[derive(Debug, Clone, Default)]
pub struct BookingDirectory {
    bookings: Vec<Booking>,
}

impl BookingDirectory {
    pub fn new(bookings: Vec<Booking>) -> Self {
        BookingDirectory { bookings }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let bookings: Vec<Booking> = serde_json::from_str(json)?;
        Ok(BookingDirectory { bookings })
    }

    pub fn get(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.booking_id == booking_id)
    }

    pub fn all(&self) -> &[Booking] {
        &self.bookings
    }
}
