use portal_core::Booking;

use super::{draw_footer, draw_header, rupees_in_crores, BRAND_BLUE, COMPANY_NAME};
use crate::layout::Page;

const TEXT_WIDTH: f32 = 170.0;

/// `Allotment-Letter-{booking_id}.pdf`
pub fn allotment_file_name(booking: &Booking) -> String {
    format!("Allotment-Letter-{}.pdf", booking.booking_id)
}

pub fn render_allotment_letter(booking: &Booking) -> Page {
    let mut page = Page::new();
    draw_header(&mut page);

    page.set_font_size(18.0);
    page.text_centered("UNIT ALLOTMENT LETTER", 105.0, 55.0);

    page.set_font_size(10.0);
    page.text(format!("Ref: {}", booking.booking_id), 20.0, 70.0);
    page.text(format!("Date: {}", booking.booking_date), 20.0, 77.0);
    page.text(format!("Dear {},", booking.customer_name), 20.0, 95.0);

    let mut y = 110.0;
    page.text(
        format!("Subject: Allotment of Unit in {}", booking.property_name),
        20.0,
        y,
    );

    y += 15.0;
    page.set_font_size(9.0);
    page.text_wrapped(
        "We are pleased to inform you that based on your booking application and the \
         receipt of the booking amount, we hereby allot you the following unit:",
        20.0,
        y,
        TEXT_WIDTH,
    );

    // Unit details box
    y += 20.0;
    page.set_draw_color(BRAND_BLUE).set_line_width(0.5);
    page.stroke_rect(20.0, y, 170.0, 45.0);
    page.set_font_size(10.0);
    let details = [
        format!("Project Name: {}", booking.property_name),
        format!("Unit Number: {}", booking.unit),
        format!("Type: {}", booking.unit_type),
        format!("Carpet Area: {}", booking.area),
        format!("Floor: {}", booking.floor_number),
    ];
    y += 10.0;
    for (i, line) in details.into_iter().enumerate() {
        if i > 0 {
            y += 8.0;
        }
        page.text(line, 30.0, y);
    }

    y += 20.0;
    page.text_wrapped(
        &format!(
            "This allotment is subject to the terms and conditions mentioned in the \
             Agreement to Sell. The total consideration for the said unit is {}.",
            rupees_in_crores(booking.price)
        ),
        20.0,
        y,
        TEXT_WIDTH,
    );

    y += 20.0;
    page.text_wrapped(
        &format!(
            "The expected date of possession is {}. Please ensure timely payment of all \
             installments as per the payment plan.",
            booking.possession
        ),
        20.0,
        y,
        TEXT_WIDTH,
    );

    y += 20.0;
    page.text("Congratulations on your new home!", 20.0, y);

    y += 15.0;
    page.text("Yours sincerely,", 20.0, y);
    y += 15.0;
    page.set_font_size(11.0);
    page.text(COMPANY_NAME, 20.0, y);
    page.set_font_size(9.0);
    y += 7.0;
    page.text("Authorized Signatory", 20.0, y);

    draw_footer(&mut page);
    page
}
