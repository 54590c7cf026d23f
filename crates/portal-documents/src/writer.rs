//! PDF serialization of a laid-out page.
//!
//! Produces a single-page PDF 1.5 file using the standard Helvetica font
//! with WinAnsi encoding. The output carries no timestamps or random ids, so
//! the same page always serializes to the same bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::compose::ComposeError;
use crate::layout::{Element, Page, Rgb, TextRun, MM_TO_PT, PAGE_HEIGHT, PAGE_WIDTH};

const FONT_NAME: &str = "F1";

fn real(value: f32) -> Object {
    // Rounded so float noise never reaches the output.
    Object::Real(((value * 1000.0).round() / 1000.0).into())
}

fn x_pt(x_mm: f32) -> f32 {
    x_mm * MM_TO_PT
}

fn y_pt(y_mm: f32) -> f32 {
    (PAGE_HEIGHT - y_mm) * MM_TO_PT
}

fn color_operands(color: Rgb) -> Vec<Object> {
    [color.0, color.1, color.2]
        .iter()
        .map(|&c| real(f32::from(c) / 255.0))
        .collect()
}

/// Encode text for a WinAnsi simple font. Latin-1 characters map to their
/// code point; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

fn text_operations(run: &TextRun) -> Vec<Operation> {
    let mut ops = vec![Operation::new("rg", color_operands(run.color))];
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(FONT_NAME.as_bytes().to_vec()), real(run.size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![real(x_pt(run.left())), real(y_pt(run.y))],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn rect_operands(x: f32, y: f32, w: f32, h: f32) -> Vec<Object> {
    vec![
        real(x_pt(x)),
        real(y_pt(y + h)),
        real(w * MM_TO_PT),
        real(h * MM_TO_PT),
    ]
}

fn element_operations(element: &Element) -> Vec<Operation> {
    match element {
        Element::Text(run) => text_operations(run),
        Element::FillRect { x, y, w, h, color } => vec![
            Operation::new("rg", color_operands(*color)),
            Operation::new("re", rect_operands(*x, *y, *w, *h)),
            Operation::new("f", vec![]),
        ],
        Element::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            line_width,
        } => vec![
            Operation::new("RG", color_operands(*color)),
            Operation::new("w", vec![real(line_width * MM_TO_PT)]),
            Operation::new("re", rect_operands(*x, *y, *w, *h)),
            Operation::new("S", vec![]),
        ],
        Element::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        } => vec![
            Operation::new("RG", color_operands(*color)),
            Operation::new("w", vec![real(line_width * MM_TO_PT)]),
            Operation::new("m", vec![real(x_pt(*x1)), real(y_pt(*y1))]),
            Operation::new("l", vec![real(x_pt(*x2)), real(y_pt(*y2))]),
            Operation::new("S", vec![]),
        ],
    }
}

/// Serialize `page` as a complete PDF file.
pub fn write_pdf(page: &Page) -> Result<Vec<u8>, ComposeError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let operations: Vec<_> = page.elements().flat_map(element_operations).collect();
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| ComposeError::Encode(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            real(PAGE_WIDTH * MM_TO_PT),
            real(PAGE_HEIGHT * MM_TO_PT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ComposeError::Encode(e.to_string()))?;
    Ok(buffer)
}
