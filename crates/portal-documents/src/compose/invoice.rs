use portal_core::format::{amount_in_words, format_indian};
use portal_core::{Booking, Milestone, MilestoneStatus};
use rust_decimal::Decimal;

use super::{
    draw_footer, draw_header, rupees, ComposeError, BRAND_BLUE, COMPANY_NAME, DUE_ORANGE,
    PAID_GREEN,
};
use crate::layout::{Page, Rgb};

const TERMS: [&str; 3] = [
    "1. Payment must be made within the due date mentioned above.",
    "2. Late payment may attract interest charges as per agreement.",
    "3. All disputes are subject to Mumbai jurisdiction only.",
];

struct InvoiceFields<'a> {
    number: &'a str,
    date: String,
    gst: Decimal,
    total: Decimal,
}

fn invoice_fields(milestone: &Milestone) -> Result<InvoiceFields<'_>, ComposeError> {
    let missing = |field| ComposeError::MissingInvoiceField {
        milestone_id: milestone.id,
        field,
    };

    Ok(InvoiceFields {
        number: milestone
            .invoice_number
            .as_deref()
            .ok_or_else(|| missing("invoice_number"))?,
        date: milestone
            .invoice_date
            .ok_or_else(|| missing("invoice_date"))?
            .to_string(),
        gst: milestone.gst_amount.ok_or_else(|| missing("gst_amount"))?,
        total: milestone
            .total_amount
            .ok_or_else(|| missing("total_amount"))?,
    })
}

/// `Invoice-{invoice_number}-{booking_id}.pdf`
pub fn invoice_file_name(booking: &Booking, milestone: &Milestone) -> Result<String, ComposeError> {
    let number = milestone
        .invoice_number
        .as_deref()
        .ok_or(ComposeError::MissingInvoiceField {
            milestone_id: milestone.id,
            field: "invoice_number",
        })?;
    Ok(format!("Invoice-{}-{}.pdf", number, booking.booking_id))
}

/// Tax invoice for one milestone. CGST and SGST are each half of the
/// milestone's recorded GST amount.
pub fn render_invoice(booking: &Booking, milestone: &Milestone) -> Result<Page, ComposeError> {
    let fields = invoice_fields(milestone)?;
    let mut page = Page::new();
    draw_header(&mut page);

    page.set_font_size(20.0);
    page.text("TAX INVOICE", 150.0, 25.0);

    // Invoice details box
    page.set_font_size(10.0).set_draw_color(Rgb::grey(200));
    page.stroke_rect(140.0, 35.0, 60.0, 30.0);
    page.text(format!("Invoice No: {}", fields.number), 145.0, 42.0);
    page.text(format!("Date: {}", fields.date), 145.0, 49.0);
    page.text(format!("Due Date: {}", milestone.due_date), 145.0, 56.0);
    page.text(format!("Booking ID: {}", booking.booking_id), 145.0, 63.0);

    // Seller
    page.text("From:", 20.0, 50.0);
    page.set_font_size(9.0);
    let seller = [
        COMPANY_NAME,
        "123 Business District",
        "Mumbai, Maharashtra - 400001",
        "GSTIN: 27AABCU9603R1ZV",
        "PAN: AABCU9603R",
    ];
    for (i, line) in seller.iter().enumerate() {
        page.text(*line, 20.0, 57.0 + 5.0 * i as f32);
    }

    // Bill to
    page.set_font_size(10.0);
    page.text("Bill To:", 20.0, 90.0);
    page.set_font_size(9.0);
    page.text(booking.customer_name.as_str(), 20.0, 97.0);
    page.text(booking.customer_email.as_str(), 20.0, 102.0);
    page.text(booking.customer_phone.as_str(), 20.0, 107.0);

    // Property
    page.set_font_size(10.0);
    page.text("Property Details:", 110.0, 90.0);
    page.set_font_size(9.0);
    page.text(
        format!("{} - Unit {}", booking.property_name, booking.unit),
        110.0,
        97.0,
    );
    page.text(format!("{}, {}", booking.unit_type, booking.area), 110.0, 102.0);
    page.text(booking.location.as_str(), 110.0, 107.0);

    // Line item table
    let table_top = 125.0;
    page.set_fill_color(Rgb::grey(240));
    page.fill_rect(20.0, table_top, 170.0, 10.0);
    page.set_font_size(10.0);
    page.text("Description", 25.0, table_top + 7.0);
    page.text("Percentage", 110.0, table_top + 7.0);
    page.text(format!("Amount ({})", super::RUPEE), 160.0, table_top + 7.0);

    let mut y = table_top + 17.0;
    page.set_font_size(9.0);
    page.text(milestone.name.as_str(), 25.0, y);
    page.text(milestone.description.as_str(), 25.0, y + 5.0);
    page.text(format!("{}%", milestone.percentage.normalize()), 110.0, y);
    page.text(format_indian(milestone.amount), 160.0, y);

    // Totals
    y += 20.0;
    page.line(20.0, y, 190.0, y);
    y += 7.0;
    page.text("Subtotal:", 130.0, y);
    page.text(rupees(milestone.amount), 160.0, y);

    let half_gst = fields.gst / Decimal::TWO;
    y += 7.0;
    page.text("CGST (9%):", 130.0, y);
    page.text(rupees(half_gst), 160.0, y);
    y += 7.0;
    page.text("SGST (9%):", 130.0, y);
    page.text(rupees(half_gst), 160.0, y);

    y += 10.0;
    page.set_fill_color(BRAND_BLUE);
    page.fill_rect(130.0, y - 5.0, 60.0, 10.0);
    page.set_text_color(Rgb::WHITE).set_font_size(11.0);
    page.text("Total Amount:", 135.0, y + 2.0);
    page.text(rupees(fields.total), 160.0, y + 2.0);

    page.set_text_color(Rgb::BLACK).set_font_size(9.0);
    y += 15.0;
    page.text("Amount in words:", 20.0, y);
    page.text(amount_in_words(fields.total), 20.0, y + 5.0);

    // Payment status
    y += 15.0;
    match milestone.status {
        MilestoneStatus::Completed => {
            let paid_on = milestone
                .paid_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            page.set_text_color(PAID_GREEN).set_font_size(10.0);
            page.text(format!("PAID on {}", paid_on), 20.0, y);
        }
        MilestoneStatus::Pending => {
            page.set_text_color(DUE_ORANGE).set_font_size(10.0);
            page.text(
                format!("PAYMENT PENDING - Due on {}", milestone.due_date),
                20.0,
                y,
            );
        }
        MilestoneStatus::Upcoming => {}
    }

    y += 15.0;
    page.set_text_color(Rgb::grey(100)).set_font_size(8.0);
    page.text("Terms & Conditions:", 20.0, y);
    for (i, term) in TERMS.iter().enumerate() {
        page.text(*term, 20.0, y + 5.0 * (i + 1) as f32);
    }

    draw_footer(&mut page);
    Ok(page)
}
