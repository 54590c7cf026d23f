use portal_core::Booking;

use super::{draw_footer, draw_header, rupees_in_crores, COMPANY_NAME};
use crate::layout::Page;

/// `Agreement-{booking_id}.pdf`
pub fn agreement_file_name(booking: &Booking) -> String {
    format!("Agreement-{}.pdf", booking.booking_id)
}

pub fn render_agreement(booking: &Booking) -> Page {
    let mut page = Page::new();
    draw_header(&mut page);

    page.set_font_size(16.0);
    page.text_centered("AGREEMENT TO SELL", 105.0, 55.0);

    page.set_font_size(9.0);
    let mut y = 70.0;
    page.text(
        format!(
            "This Agreement to Sell is executed on {}",
            booking.booking_date
        ),
        20.0,
        y,
    );

    // Parties
    y += 15.0;
    page.text("BETWEEN", 20.0, y);
    y += 10.0;
    page.text(
        format!(
            "{}, a company incorporated under the Companies Act, 1956,",
            COMPANY_NAME
        ),
        20.0,
        y,
    );
    y += 7.0;
    page.text(
        "having its registered office at 123 Business District, Mumbai \
         (hereinafter called the \"Seller\")",
        20.0,
        y,
    );

    y += 15.0;
    page.text("AND", 20.0, y);
    y += 10.0;
    page.text(
        format!("{}, residing at [Address]", booking.customer_name),
        20.0,
        y,
    );
    y += 7.0;
    page.text("(hereinafter called the \"Purchaser\")", 20.0, y);

    // Recitals
    y += 15.0;
    page.text("WHEREAS:", 20.0, y);
    y += 10.0;
    page.text_wrapped(
        &format!(
            "The Seller has agreed to sell and the Purchaser has agreed to purchase \
             Unit {} in {}, {}.",
            booking.unit, booking.property_name, booking.location
        ),
        20.0,
        y,
        170.0,
    );

    y += 15.0;
    page.text("The particulars of the said unit are as follows:", 20.0, y);
    let particulars = [
        format!("- Unit Number: {}", booking.unit),
        format!("- Type: {}", booking.unit_type),
        format!("- Carpet Area: {}", booking.area),
        format!(
            "- Total Consideration: {}",
            rupees_in_crores(booking.price)
        ),
    ];
    y += 10.0;
    for (i, line) in particulars.into_iter().enumerate() {
        if i > 0 {
            y += 7.0;
        }
        page.text(line, 25.0, y);
    }

    y += 15.0;
    page.text(
        "The Purchaser shall pay the consideration as per the payment plan agreed upon.",
        20.0,
        y,
    );
    y += 10.0;
    page.text(
        format!("The expected date of possession is {}.", booking.possession),
        20.0,
        y,
    );

    // Signatures
    y += 20.0;
    page.text(format!("For {}", COMPANY_NAME), 20.0, y);
    page.text("Purchaser", 140.0, y);
    y += 15.0;
    page.text("(Authorized Signatory)", 20.0, y);
    page.text(format!("({})", booking.customer_name), 140.0, y);

    draw_footer(&mut page);
    page
}
