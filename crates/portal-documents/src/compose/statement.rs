use chrono::NaiveDate;
use portal_core::format::{format_crores, format_short_date};
use portal_core::Booking;
use rust_decimal::Decimal;

use super::{draw_footer, draw_header, rupees_in_crores, DUE_ORANGE, PAID_GREEN, RUPEE};
use crate::layout::{Page, Rgb};

const TABLE_TOP: f32 = 135.0;
const ROW_STEP: f32 = 10.0;
const NAME_COLUMN_WIDTH: f32 = 50.0;

/// Account position printed at the foot of the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTotals {
    pub total: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
}

impl StatementTotals {
    pub fn for_booking(booking: &Booking) -> Self {
        let paid = booking.paid_amount();
        StatementTotals {
            total: booking.price,
            paid,
            balance: booking.price - paid,
        }
    }
}

/// `SOA-{booking_id}.pdf`
pub fn statement_file_name(booking: &Booking) -> String {
    format!("SOA-{}.pdf", booking.booking_id)
}

/// Statement of accounts: every milestone in booking order, then the
/// total, paid and outstanding position.
pub fn render_statement(booking: &Booking, today: NaiveDate) -> Page {
    let mut page = Page::new();
    draw_header(&mut page);

    page.set_font_size(20.0);
    page.text_centered("STATEMENT OF ACCOUNTS", 105.0, 25.0);

    page.set_font_size(10.0);
    page.text(format!("Booking ID: {}", booking.booking_id), 20.0, 50.0);
    page.text(format!("Date: {}", format_short_date(today)), 20.0, 57.0);

    page.text("Customer Details:", 20.0, 70.0);
    page.set_font_size(9.0);
    page.text(booking.customer_name.as_str(), 20.0, 77.0);
    page.text(booking.customer_email.as_str(), 20.0, 82.0);
    page.text(booking.customer_phone.as_str(), 20.0, 87.0);

    page.set_font_size(10.0);
    page.text("Property Details:", 20.0, 100.0);
    page.set_font_size(9.0);
    page.text(
        format!("{} - Unit {}", booking.property_name, booking.unit),
        20.0,
        107.0,
    );
    page.text(format!("{}, {}", booking.unit_type, booking.area), 20.0, 112.0);
    page.text(
        format!("Total Value: {}", rupees_in_crores(booking.price)),
        20.0,
        117.0,
    );

    // Milestone table
    page.set_fill_color(Rgb::grey(240));
    page.fill_rect(20.0, TABLE_TOP, 170.0, 10.0);
    page.set_font_size(9.0).set_text_color(Rgb::BLACK);
    page.text("Milestone", 25.0, TABLE_TOP + 7.0);
    page.text("Due Date", 80.0, TABLE_TOP + 7.0);
    page.text("Amount", 120.0, TABLE_TOP + 7.0);
    page.text("Status", 160.0, TABLE_TOP + 7.0);

    let mut y = TABLE_TOP + 15.0;
    for milestone in &booking.milestones {
        page.text_wrapped(&milestone.name, 25.0, y, NAME_COLUMN_WIDTH);
        page.text(milestone.due_date.to_string(), 80.0, y);
        page.text(
            format!("{} {} Cr", RUPEE, format_crores(milestone.amount)),
            120.0,
            y,
        );
        page.text(milestone.status.to_string(), 160.0, y);
        y += ROW_STEP;
    }

    let totals = StatementTotals::for_booking(booking);

    y += 10.0;
    page.line(20.0, y, 190.0, y);
    y += 10.0;
    page.set_font_size(10.0);
    page.text("Total Property Value:", 20.0, y);
    page.text(rupees_in_crores(totals.total), 160.0, y);
    y += 7.0;
    page.set_text_color(PAID_GREEN);
    page.text("Amount Paid:", 20.0, y);
    page.text(rupees_in_crores(totals.paid), 160.0, y);
    y += 7.0;
    page.set_text_color(DUE_ORANGE);
    page.text("Balance Due:", 20.0, y);
    page.text(rupees_in_crores(totals.balance), 160.0, y);

    draw_footer(&mut page);
    page
}
