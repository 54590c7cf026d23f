//! Single-page layout model.
//!
//! Coordinates are millimetres on an A4 page with the origin at the top-left
//! corner; text `y` is the baseline. A `Page` carries drawing state (font
//! size, colours, line width) the way a pen plotter would: set the state,
//! then draw.

use crate::metrics::{split_text_to_size, text_width};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
/// Top edge of the footer band. Body content below it overflows the page.
pub const FOOTER_TOP: f32 = 280.0;

pub const PT_TO_MM: f32 = 25.4 / 72.0;
pub const MM_TO_PT: f32 = 72.0 / 25.4;

const LINE_HEIGHT_FACTOR: f32 = 1.15;
const DEFAULT_LINE_WIDTH: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub const fn grey(level: u8) -> Rgb {
        Rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Body,
    Chrome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub align: Align,
    pub text: String,
}

impl TextRun {
    /// Left edge of the run once alignment is applied.
    pub fn left(&self) -> f32 {
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x - text_width(&self.text, self.size) / 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        line_width: f32,
    },
}

impl Element {
    fn bottom(&self) -> f32 {
        match self {
            Element::Text(run) => run.y,
            Element::FillRect { y, h, .. } | Element::StrokeRect { y, h, .. } => y + h,
            Element::Line { y1, y2, .. } => y1.max(*y2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    elements: Vec<(Layer, Element)>,
    layer: Layer,
    font_size: f32,
    text_color: Rgb,
    fill_color: Rgb,
    draw_color: Rgb,
    line_width: f32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            elements: Vec::new(),
            layer: Layer::Body,
            font_size: 16.0,
            text_color: Rgb::BLACK,
            fill_color: Rgb::BLACK,
            draw_color: Rgb::BLACK,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_size(&mut self, size: f32) -> &mut Self {
        self.font_size = size;
        self
    }

    pub fn set_text_color(&mut self, color: Rgb) -> &mut Self {
        self.text_color = color;
        self
    }

    pub fn set_fill_color(&mut self, color: Rgb) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn set_draw_color(&mut self, color: Rgb) -> &mut Self {
        self.draw_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width;
        self
    }

    /// Draw `f` as page chrome (header and footer bands), which never
    /// counts as overflowing content.
    pub fn chrome(&mut self, f: impl FnOnce(&mut Page)) {
        let previous = self.layer;
        self.layer = Layer::Chrome;
        f(self);
        self.layer = previous;
    }

    fn push(&mut self, element: Element) {
        self.elements.push((self.layer, element));
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32) -> &mut Self {
        self.text_aligned(text, x, y, Align::Left)
    }

    pub fn text_centered(&mut self, text: impl Into<String>, x: f32, y: f32) -> &mut Self {
        self.text_aligned(text, x, y, Align::Center)
    }

    fn text_aligned(&mut self, text: impl Into<String>, x: f32, y: f32, align: Align) -> &mut Self {
        let run = TextRun {
            x,
            y,
            size: self.font_size,
            color: self.text_color,
            align,
            text: text.into(),
        };
        self.push(Element::Text(run));
        self
    }

    /// Distance between baselines of consecutive lines at the current size.
    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR * PT_TO_MM
    }

    /// Draw `text` wrapped to `max_width`, first baseline at `y`. Returns the
    /// number of lines drawn.
    pub fn text_wrapped(&mut self, text: &str, x: f32, y: f32, max_width: f32) -> usize {
        let lines = split_text_to_size(text, max_width, self.font_size);
        let step = self.line_height();
        for (i, line) in lines.iter().enumerate() {
            self.text(line.as_str(), x, y + step * i as f32);
        }
        lines.len()
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        let color = self.fill_color;
        self.push(Element::FillRect { x, y, w, h, color });
        self
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        let (color, line_width) = (self.draw_color, self.line_width);
        self.push(Element::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            line_width,
        });
        self
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        let (color, line_width) = (self.draw_color, self.line_width);
        self.push(Element::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        });
        self
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().map(|(_, e)| e)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements().filter_map(|e| match e {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    /// First text run whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.texts().find(|run| run.text == text)
    }

    /// Text runs whose content contains `needle`, in drawing order.
    pub fn texts_containing<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a TextRun> {
        self.texts().filter(move |run| run.text.contains(needle))
    }

    /// Lowest point reached by body content.
    pub fn content_bottom(&self) -> f32 {
        self.elements
            .iter()
            .filter(|(layer, _)| *layer == Layer::Body)
            .map(|(_, e)| e.bottom())
            .fold(0.0, f32::max)
    }

    /// Whether body content runs into the footer band.
    pub fn overflows(&self) -> bool {
        self.content_bottom() > FOOTER_TOP
    }
}
