//! Page geometry, text styles and colours for the PDF report and charts.

/// Points per inch.
pub const PT_PER_INCH: f32 = 72.0;

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

pub const BLACK: Rgb = Rgb::grey(0.0);
pub const WHITE: Rgb = Rgb::grey(1.0);

/// Font, size and spacing for one kind of text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
    pub bold: bool,
    pub centered: bool,
    pub space_before: f32,
    pub space_after: f32,
}

/// Styling for the results table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub leading: f32,
    pub header_background: Rgb,
    pub header_text: Rgb,
    pub body_background: Rgb,
    pub body_text: Rgb,
    pub grid: Rgb,
    pub grid_width: f32,
    pub padding_top: f32,
    pub header_padding_bottom: f32,
    pub body_padding_bottom: f32,
    pub padding_x: f32,
}

impl TableStyle {
    pub fn header_row_height(&self) -> f32 {
        self.padding_top + self.leading + self.header_padding_bottom
    }

    pub fn body_row_height(&self) -> f32 {
        self.padding_top + self.leading + self.body_padding_bottom
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 7.0,
            leading: 8.4,
            header_background: Rgb::grey(0.7),
            header_text: WHITE,
            body_background: Rgb::grey(0.9),
            body_text: BLACK,
            grid: BLACK,
            grid_width: 1.0,
            padding_top: 3.0,
            header_padding_bottom: 6.0,
            body_padding_bottom: 2.0,
            padding_x: 2.0,
        }
    }
}

/// Complete layout definition for the report document.
#[derive(Debug, Clone)]
pub struct DocumentStyle {
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    pub margin: f32,
    pub title: TextStyle,
    pub heading1: TextStyle,
    pub heading2: TextStyle,
    pub table: TableStyle,
    /// Resolution the chart bitmaps are placed at.
    pub image_dpi: f32,
    /// Average glyph advance as a fraction of the font size, used for wrapping
    /// and centring with the built-in Helvetica faces.
    pub avg_char_width: f32,
}

impl DocumentStyle {
    /// US legal paper (8.5 x 14 in) with one-inch margins.
    pub fn legal() -> Self {
        Self {
            page_width: 8.5 * PT_PER_INCH,
            page_height: 14.0 * PT_PER_INCH,
            margin: PT_PER_INCH,
            title: TextStyle {
                font_size: 18.0,
                leading: 22.0,
                bold: true,
                centered: true,
                space_before: 0.0,
                space_after: 6.0,
            },
            heading1: TextStyle {
                font_size: 18.0,
                leading: 22.0,
                bold: true,
                centered: false,
                space_before: 12.0,
                space_after: 6.0,
            },
            heading2: TextStyle {
                font_size: 14.0,
                leading: 18.0,
                bold: true,
                centered: false,
                space_before: 10.0,
                space_after: 6.0,
            },
            table: TableStyle::default(),
            image_dpi: 100.0,
            avg_char_width: 0.52,
        }
    }

    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Approximate rendered width of `text` at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.avg_char_width
    }

    /// How many characters fit on one line of `width` points.
    pub fn chars_per_line(&self, width: f32, font_size: f32) -> usize {
        ((width / (font_size * self.avg_char_width)).floor() as usize).max(1)
    }
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self::legal()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
