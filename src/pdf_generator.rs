use crate::error::Result;
use crate::markup::{HighlightedDocument, Rgb, Span, StyledLine};
use crate::stylesheet::StyleSheet;
use crate::text_encoding::{self, GlyphSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// --- Page orientation and layout ---

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl PageOrientation {
    /// US Letter size in points, turned for the orientation
    pub fn page_size(self) -> (f32, f32) {
        match self {
            PageOrientation::Portrait => (612.0, 792.0),
            PageOrientation::Landscape => (792.0, 612.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageLayout {
    pub fn content_top(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

// --- Fonts ---

/// Font resources every page refers to, in object order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontSlot {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Symbol,
}

impl FontSlot {
    const ALL: [FontSlot; 5] = [
        FontSlot::Regular,
        FontSlot::Bold,
        FontSlot::Italic,
        FontSlot::BoldItalic,
        FontSlot::Symbol,
    ];

    fn resource_name(self) -> &'static str {
        match self {
            FontSlot::Regular => "F1",
            FontSlot::Bold => "F2",
            FontSlot::Italic => "F3",
            FontSlot::BoldItalic => "F4",
            FontSlot::Symbol => "F5",
        }
    }

    fn for_span(span: &Span) -> Self {
        match (span.bold, span.italic) {
            (true, true) => FontSlot::BoldItalic,
            (true, false) => FontSlot::Bold,
            (false, true) => FontSlot::Italic,
            (false, false) => FontSlot::Regular,
        }
    }

    fn base_font(self, sheet: &StyleSheet) -> &str {
        match self {
            FontSlot::Regular => &sheet.fonts.regular,
            FontSlot::Bold => &sheet.fonts.bold,
            FontSlot::Italic => &sheet.fonts.italic,
            FontSlot::BoldItalic => &sheet.fonts.bold_italic,
            FontSlot::Symbol => "Symbol",
        }
    }
}

/// Size of the header and footer text
const FURNITURE_FONT_SIZE: f32 = 8.0;
const FURNITURE_GREY: f32 = 0.4;

// --- Low-level PDF object model ---

pub struct PdfGenerator {
    pub objects: Vec<PdfObj>,
    pub next_id: u32,
}

#[derive(Debug)]
pub struct PdfObj {
    pub id: u32,
    pub generation: u32,
    pub content: String,
    pub is_stream: bool,
    pub stream_data: Option<Vec<u8>>,
}

impl Default for PdfGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfGenerator {
    pub fn new() -> Self {
        PdfGenerator {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_object(&mut self, content: String) -> u32 {
        let id = self.next_id;
        self.objects.push(PdfObj {
            id,
            generation: 0,
            content,
            is_stream: false,
            stream_data: None,
        });
        self.next_id += 1;
        id
    }

    pub fn add_stream_object(&mut self, dictionary: String, data: Vec<u8>) -> u32 {
        let id = self.next_id;
        self.objects.push(PdfObj {
            id,
            generation: 0,
            content: dictionary,
            is_stream: true,
            stream_data: Some(data),
        });
        self.next_id += 1;
        id
    }

    /// Serialize all objects. `root` is the catalog, `info` the optional
    /// document information dictionary.
    pub fn generate(&self, root: u32, info: Option<u32>) -> Vec<u8> {
        let mut pdf = Vec::new();

        // PDF header
        pdf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(self.objects.len());
        for obj in &self.objects {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} {} obj\n", obj.id, obj.generation).as_bytes());
            pdf.extend_from_slice(obj.content.as_bytes());

            if obj.is_stream {
                if let Some(data) = &obj.stream_data {
                    pdf.extend_from_slice(b"stream\n");
                    pdf.extend_from_slice(data);
                    pdf.extend_from_slice(b"\nendstream\n");
                }
            }

            pdf.extend_from_slice(b"endobj\n");
        }

        // xref table
        let xref_offset = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", self.objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        // trailer
        pdf.extend_from_slice(b"trailer\n<<\n");
        pdf.extend_from_slice(format!("/Size {}\n", self.objects.len() + 1).as_bytes());
        pdf.extend_from_slice(format!("/Root {} 0 R\n", root).as_bytes());
        if let Some(info) = info {
            pdf.extend_from_slice(format!("/Info {} 0 R\n", info).as_bytes());
        }
        pdf.extend_from_slice(b">>\n");
        pdf.extend_from_slice(format!("startxref\n{}\n", xref_offset).as_bytes());
        pdf.extend_from_slice(b"%%EOF\n");

        pdf
    }
}

// --- Content stream builder (handles cursor, page breaks, font and colour switches) ---

struct Underline {
    x1: f32,
    x2: f32,
    y: f32,
    color: Rgb,
}

struct ContentStreamBuilder<'a> {
    sheet: &'a StyleSheet,
    layout: PageLayout,
    background: Option<Rgb>,
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    underlines: Vec<Underline>,
    y: f32,
    font: Option<FontSlot>,
    color: Option<Rgb>,
}

impl<'a> ContentStreamBuilder<'a> {
    fn new(sheet: &'a StyleSheet, background: Option<Rgb>) -> Self {
        let layout = sheet.layout();
        let mut b = ContentStreamBuilder {
            sheet,
            layout,
            background,
            pages: Vec::new(),
            current: Vec::new(),
            underlines: Vec::new(),
            y: 0.0,
            font: None,
            color: None,
        };
        b.begin_page();
        b
    }

    fn begin_page(&mut self) {
        self.current.clear();
        self.underlines.clear();
        self.font = None;
        self.color = None;
        self.y = self.layout.content_top() - self.sheet.font_size;

        if let Some(bg) = self.background {
            let (r, g, b) = bg.to_unit();
            self.current.extend_from_slice(
                format!(
                    "q\n{} {} {} rg\n0 0 {} {} re\nf\nQ\n",
                    r, g, b, self.layout.width, self.layout.height
                )
                .as_bytes(),
            );
        }
        self.current.extend_from_slice(b"BT\n");
    }

    fn set_font(&mut self, slot: FontSlot) {
        if self.font != Some(slot) {
            self.font = Some(slot);
            self.current.extend_from_slice(
                format!("/{} {} Tf\n", slot.resource_name(), self.sheet.font_size).as_bytes(),
            );
        }
    }

    fn set_color(&mut self, color: Rgb) {
        if self.color != Some(color) {
            self.color = Some(color);
            let (r, g, b) = color.to_unit();
            self.current
                .extend_from_slice(format!("{} {} {} rg\n", r, g, b).as_bytes());
        }
    }

    fn move_to(&mut self, column: usize) {
        let x = self.layout.margin_left + self.sheet.text_width(column);
        self.current
            .extend_from_slice(format!("1 0 0 1 {} {} Tm\n", x, self.y).as_bytes());
    }

    fn needs_page_break(&self) -> bool {
        self.y < self.layout.margin_bottom
    }

    fn new_page(&mut self) {
        self.end_page();
        self.begin_page();
    }

    fn end_page(&mut self) {
        self.current.extend_from_slice(b"ET\n");
        if !self.underlines.is_empty() {
            self.current.extend_from_slice(b"q\n0.5 w\n");
            for u in &self.underlines {
                let (r, g, b) = u.color.to_unit();
                self.current.extend_from_slice(
                    format!("{} {} {} RG\n{} {} m\n{} {} l\nS\n", r, g, b, u.x1, u.y, u.x2, u.y)
                        .as_bytes(),
                );
            }
            self.current.extend_from_slice(b"Q\n");
        }
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn emit_line(&mut self, line: &StyledLine) {
        if self.needs_page_break() {
            self.new_page();
        }

        let mut column = 0;
        self.move_to(column);
        for span in &line.spans {
            let start = column;
            for run in text_encoding::encode_runs(&span.text) {
                let slot = match run.source {
                    GlyphSource::Symbol => FontSlot::Symbol,
                    GlyphSource::Text => FontSlot::for_span(span),
                };
                self.set_font(slot);
                self.set_color(span.color);
                self.current.push(b'(');
                self.current
                    .extend_from_slice(&text_encoding::escape_pdf_bytes(&run.bytes));
                self.current.extend_from_slice(b") Tj\n");
                column += run.bytes.len();
                // Symbol glyphs are wider than the monospace cell
                if run.source == GlyphSource::Symbol {
                    self.move_to(column);
                }
            }
            if span.underline && column > start {
                self.underlines.push(Underline {
                    x1: self.layout.margin_left + self.sheet.text_width(start),
                    x2: self.layout.margin_left + self.sheet.text_width(column),
                    y: self.y - self.sheet.font_size * 0.15,
                    color: span.color,
                });
            }
        }
        self.y -= self.sheet.line_height();
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.end_page();
        self.pages
    }
}

/// Header and footer for one page
fn page_furniture(
    sheet: &StyleSheet,
    layout: &PageLayout,
    title: &str,
    page: usize,
    total: usize,
) -> Vec<u8> {
    let mut out = Vec::new();
    let mut text_at = |x: f32, y: f32, text: &str| {
        let bytes: Vec<u8> = text_encoding::encode_runs(text)
            .into_iter()
            .flat_map(|run| run.bytes)
            .collect();
        out.extend_from_slice(
            format!(
                "BT\n/F1 {} Tf\n{} {} {} rg\n1 0 0 1 {} {} Tm\n(",
                FURNITURE_FONT_SIZE, FURNITURE_GREY, FURNITURE_GREY, FURNITURE_GREY, x, y
            )
            .as_bytes(),
        );
        out.extend_from_slice(&text_encoding::escape_pdf_bytes(&bytes));
        out.extend_from_slice(b") Tj\nET\n");
    };

    if sheet.show_header && !title.is_empty() {
        let y = layout.height - layout.margin_top / 2.0;
        text_at(layout.margin_left, y, title);
    }
    if sheet.show_page_numbers {
        let label = format!("Page {} of {}", page, total);
        let width = label.chars().count() as f32 * FURNITURE_FONT_SIZE * crate::stylesheet::MONOSPACE_ADVANCE;
        let x = layout.width / 2.0 - width / 2.0;
        let y = layout.margin_bottom / 2.0;
        text_at(x, y, &label);
    }
    out
}

// --- Public API ---

/// A rendered PDF document
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Render a highlighted document into PDF bytes, one styled line per printed line.
pub fn render(document: &HighlightedDocument, sheet: &StyleSheet) -> Result<RenderedPdf> {
    sheet.validate()?;

    let widest = document.max_line_chars();
    if !sheet.fits(widest) {
        warn!(
            chars = widest,
            font_size = sheet.font_size,
            "longest line is wider than the page content area"
        );
    }

    let background = if sheet.paint_background {
        document.background
    } else {
        None
    };
    let mut builder = ContentStreamBuilder::new(sheet, background);
    for line in &document.lines {
        builder.emit_line(line);
    }
    let mut page_streams = builder.finish();

    let layout = sheet.layout();
    let total = page_streams.len();
    for (i, stream) in page_streams.iter_mut().enumerate() {
        stream.extend_from_slice(&page_furniture(sheet, &layout, &document.title, i + 1, total));
    }

    debug!(pages = total, lines = document.lines.len(), "rendered document");
    Ok(RenderedPdf {
        bytes: assemble_pdf(&page_streams, sheet, &layout, document),
        page_count: total,
    })
}

/// Assemble the final PDF from per-page content streams
fn assemble_pdf(
    page_streams: &[Vec<u8>],
    sheet: &StyleSheet,
    layout: &PageLayout,
    document: &HighlightedDocument,
) -> Vec<u8> {
    let mut generator = PdfGenerator::new();

    // Layout: shared font objects, then for each page: content stream, page.
    // Then: pages, catalog, info.
    let mut font_refs = Vec::new();
    for slot in FontSlot::ALL {
        let encoding = match slot {
            FontSlot::Symbol => "",
            _ => "/Encoding /WinAnsiEncoding\n",
        };
        let id = generator.add_object(format!(
            "<< /Type /Font\n/Subtype /Type1\n/BaseFont /{}\n{}>>\n",
            slot.base_font(sheet),
            encoding
        ));
        font_refs.push(format!("/{} {} 0 R", slot.resource_name(), id));
    }
    let fonts = font_refs.join(" ");

    let pages_obj_id = generator.next_id + (page_streams.len() as u32) * 2;

    let mut page_ids = Vec::new();
    for page_stream in page_streams {
        let content_id = generator.add_stream_object(
            format!("<< /Length {} >>\n", page_stream.len()),
            page_stream.clone(),
        );

        let page_dict = format!(
            "<< /Type /Page\n\
             /Parent {} 0 R\n\
             /MediaBox [0 0 {} {}]\n\
             /Contents {} 0 R\n\
             /Resources << /Font << {} >> >>\n\
             >>\n",
            pages_obj_id, layout.width, layout.height, content_id, fonts
        );
        page_ids.push(generator.add_object(page_dict));
    }

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    let pages_dict = format!(
        "<< /Type /Pages\n\
         /Kids [{}]\n\
         /Count {}\n\
         >>\n",
        kids.join(" "),
        page_ids.len()
    );
    let actual_pages_id = generator.add_object(pages_dict);
    debug_assert_eq!(actual_pages_id, pages_obj_id);

    let catalog_id = generator.add_object(format!(
        "<< /Type /Catalog\n\
         /Pages {} 0 R\n\
         >>\n",
        actual_pages_id
    ));

    let subject = if document.style_name.is_empty() {
        document.syntax_name.clone()
    } else {
        format!("{}, {} style", document.syntax_name, document.style_name)
    };
    let info_id = generator.add_object(format!(
        "<< /Title {}\n/Subject {}\n/Producer (codepdf {})\n>>\n",
        text_encoding::pdf_text_string(&document.title),
        text_encoding::pdf_text_string(&subject),
        env!("CARGO_PKG_VERSION")
    ));

    generator.generate(catalog_id, Some(info_id))
}
