//! PDF report rendering.
//!
//! The report is described as a flat list of blocks (paragraphs, a table, spacers),
//! laid out top to bottom on A4 pages with word wrap, then serialized by `writer`.

use std::fmt::Write;

use crate::export::{ExportError, InterviewReport, ScoreBand};

pub mod metrics;
pub mod writer;

use metrics::{Font, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const TITLE: &str = "Technical Interview Results";
const LEADING: f32 = 1.2;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 6.0;
const HEADER_FILL: f32 = 0.83;
const BULLET_INDENT: f32 = 20.0;
/// Skills table column widths, category then keywords.
const SKILL_COLUMNS: [f32; 2] = [100.0, 350.0];

// ────────────────────────────────────────────────────────────────────────────
// Styled text
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

pub const BLACK: Color = Color(0.0, 0.0, 0.0);
pub const GREEN: Color = Color(0.0, 0.5, 0.0);
pub const ORANGE: Color = Color(1.0, 0.65, 0.0);
pub const RED: Color = Color(1.0, 0.0, 0.0);

impl Color {
    pub fn for_score(score: u32) -> Self {
        match ScoreBand::from_score(score) {
            ScoreBand::Strong => GREEN,
            ScoreBand::Fair => ORANGE,
            ScoreBand::Weak => RED,
        }
    }

    fn fill_op(&self) -> String {
        format!("{:.2} {:.2} {:.2} rg", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Style {
    font: Font,
    size: f32,
    color: Color,
}

impl Style {
    fn body() -> Self {
        Self {
            font: Font::Helvetica,
            size: BODY_SIZE,
            color: BLACK,
        }
    }

    fn bold(size: f32) -> Self {
        Self {
            font: Font::HelveticaBold,
            size,
            color: BLACK,
        }
    }
}

#[derive(Debug, Clone)]
struct Span {
    text: String,
    style: Style,
}

impl Span {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone)]
enum Block {
    Paragraph {
        spans: Vec<Span>,
        indent: f32,
        space_after: f32,
    },
    Table {
        rows: Vec<Vec<String>>,
        widths: Vec<f32>,
    },
    Spacer(f32),
}

impl Block {
    fn text(text: impl Into<String>, style: Style, space_after: f32) -> Self {
        Block::Paragraph {
            spans: vec![Span::new(text, style)],
            indent: 0.0,
            space_after,
        }
    }

    /// `Label: value` with a bold label.
    fn labeled(label: &str, value: Span) -> Self {
        Block::Paragraph {
            spans: vec![Span::new(format!("{label}:"), Style::bold(BODY_SIZE)), value],
            indent: 0.0,
            space_after: 2.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report → blocks
// ────────────────────────────────────────────────────────────────────────────

fn report_blocks(report: &InterviewReport) -> Vec<Block> {
    let mut blocks = vec![
        Block::text(TITLE, Style::bold(18.0), 0.0),
        Block::Spacer(12.0),
    ];

    if let Some(name) = &report.candidate_name {
        blocks.push(Block::labeled("Candidate", Span::new(name, Style::body())));
    }
    blocks.push(Block::labeled("Date", Span::new(&report.date, Style::body())));
    blocks.push(Block::labeled(
        "Overall Score",
        Span::new(format!("{:.1}/100", report.overall_score), Style::body()),
    ));
    blocks.push(Block::labeled("Rating", Span::new(&report.rating, Style::body())));
    blocks.push(Block::Spacer(12.0));

    blocks.push(Block::text("Extracted Skills", Style::bold(14.0), 6.0));
    if report.skills.is_empty() {
        blocks.push(Block::text("No skills were identified.", Style::body(), 0.0));
    } else {
        let mut rows = vec![vec!["Category".to_string(), "Skills".to_string()]];
        rows.extend(report.skills.iter().map(|(category, keywords)| {
            vec![category.label().to_string(), keywords.join(", ")]
        }));
        blocks.push(Block::Table {
            rows,
            widths: SKILL_COLUMNS.to_vec(),
        });
    }

    blocks.push(Block::Spacer(20.0));
    blocks.push(Block::text("Interview Questions and Evaluations", Style::bold(14.0), 0.0));
    blocks.push(Block::Spacer(12.0));

    for q in &report.questions {
        blocks.push(Block::Paragraph {
            spans: vec![
                Span::new(format!("Question {}:", q.question_number), Style::bold(12.0)),
                Span::new(&q.question_text, Style::bold(12.0)),
            ],
            indent: 0.0,
            space_after: 6.0,
        });
        blocks.push(Block::labeled("Answer", Span::new(&q.answer, Style::body())));
        let score_style = Style { color: Color::for_score(q.score), ..Style::body() };
        blocks.push(Block::labeled("Score", Span::new(format!("{}/100", q.score), score_style)));
        blocks.push(Block::labeled("Feedback", Span::new(&q.feedback, Style::body())));
        if !q.missing_concepts.is_empty() {
            blocks.push(Block::text("Missing concepts:", Style::bold(BODY_SIZE), 2.0));
            for concept in &q.missing_concepts {
                blocks.push(Block::Paragraph {
                    spans: vec![Span::new(format!("• {concept}"), Style::body())],
                    indent: BULLET_INDENT,
                    space_after: 6.0,
                });
            }
        }
        blocks.push(Block::Spacer(20.0));
    }
    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Word {
    text: String,
    style: Style,
    width: f32,
}

/// Greedy word wrap. Words wider than `max_width` are split at character
/// boundaries so nothing overflows the margin.
fn wrap_spans(spans: &[Span], max_width: f32) -> Vec<Vec<Word>> {
    let mut words = Vec::new();
    for span in spans {
        for raw in span.text.split_whitespace() {
            split_word(raw, span.style, max_width, &mut words);
        }
    }

    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut width = 0.0_f32;
    for word in words {
        let space = word.style.font.measure_str(" ", word.style.size);
        if !current.is_empty() && width + space + word.width > max_width {
            lines.push(std::mem::take(&mut current));
            width = 0.0;
        }
        width += if current.is_empty() { word.width } else { space + word.width };
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word(raw: &str, style: Style, max_width: f32, out: &mut Vec<Word>) {
    let measure = |s: &str| style.font.measure_str(s, style.size);
    let width = measure(raw);
    if width <= max_width {
        out.push(Word {
            text: raw.to_string(),
            style,
            width,
        });
        return;
    }
    let mut chunk = String::new();
    for c in raw.chars() {
        let mut candidate = chunk.clone();
        candidate.push(c);
        if !chunk.is_empty() && measure(&candidate) > max_width {
            let w = measure(&chunk);
            out.push(Word {
                text: std::mem::take(&mut chunk),
                style,
                width: w,
            });
            chunk.push(c);
        } else {
            chunk = candidate;
        }
    }
    if !chunk.is_empty() {
        let w = measure(&chunk);
        out.push(Word {
            text: chunk,
            style,
            width: w,
        });
    }
}

fn line_height(line: &[Word]) -> f32 {
    line.iter().map(|w| w.style.size).fold(BODY_SIZE, f32::max) * LEADING
}

struct Layout {
    pages: Vec<String>,
    /// Top of the free area on the current page.
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![String::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn bottom() -> f32 {
        MARGIN
    }

    fn page(&mut self) -> &mut String {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(String::new());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Breaks the page unless `height` still fits. A fresh page always accepts.
    fn reserve(&mut self, height: f32) {
        let fresh = (self.y - (PAGE_HEIGHT - MARGIN)).abs() < f32::EPSILON;
        if !fresh && self.y - height < Self::bottom() {
            self.new_page();
        }
    }

    fn draw_line(&mut self, line: &[Word], x: f32, baseline: f32) {
        let mut x = x;
        let mut runs: Vec<(Style, f32, String)> = Vec::new();
        for word in line {
            let space = word.style.font.measure_str(" ", word.style.size);
            match runs.last_mut() {
                Some((style, _, text)) if *style == word.style => {
                    text.push(' ');
                    text.push_str(&word.text);
                    x += word.width + space;
                    continue;
                }
                _ => {}
            }
            runs.push((word.style, x, word.text.clone()));
            x += word.width + space;
        }
        for (style, run_x, text) in runs {
            let op = format!(
                "BT /{} {:.1} Tf {} {:.2} {:.2} Td ({}) Tj ET\n",
                style.font.resource(),
                style.size,
                style.color.fill_op(),
                run_x,
                baseline,
                writer::encode_text(&text)
            );
            self.page().push_str(&op);
        }
    }

    fn paragraph(&mut self, spans: &[Span], indent: f32, space_after: f32) {
        for line in wrap_spans(spans, CONTENT_WIDTH - indent) {
            let height = line_height(&line);
            self.reserve(height);
            let size = line.iter().map(|w| w.style.size).fold(0.0, f32::max);
            let baseline = self.y - size;
            self.draw_line(&line, MARGIN + indent, baseline);
            self.y -= height;
        }
        self.y -= space_after;
    }

    fn table(&mut self, rows: &[Vec<String>], widths: &[f32]) {
        for (index, row) in rows.iter().enumerate() {
            let header = index == 0;
            let style = if header { Style::bold(BODY_SIZE) } else { Style::body() };
            let cells: Vec<Vec<Vec<Word>>> = row
                .iter()
                .zip(widths)
                .map(|(text, width)| {
                    wrap_spans(&[Span::new(text, style)], width - 2.0 * CELL_PADDING)
                })
                .collect();
            let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let text_height = lines as f32 * BODY_SIZE * LEADING;
            let row_height = text_height + 2.0 * CELL_PADDING;
            self.reserve(row_height);

            let top = self.y;
            let row_bottom = top - row_height;
            let total: f32 = widths.iter().sum();
            if header {
                let fill = format!(
                    "{HEADER_FILL:.2} g {:.2} {:.2} {:.2} {:.2} re f 0 g\n",
                    MARGIN, row_bottom, total, row_height
                );
                self.page().push_str(&fill);
            }

            let mut x = MARGIN;
            for (cell, width) in cells.iter().zip(widths) {
                let mut line_top = top - CELL_PADDING;
                for line in cell {
                    let line_width: f32 = line.iter().map(|w| w.width).sum::<f32>()
                        + line
                            .iter()
                            .skip(1)
                            .map(|w| w.style.font.measure_str(" ", w.style.size))
                            .sum::<f32>();
                    let text_x = if header {
                        x + (width - line_width) / 2.0
                    } else {
                        x + CELL_PADDING
                    };
                    self.draw_line(line, text_x, line_top - BODY_SIZE);
                    line_top -= BODY_SIZE * LEADING;
                }
                let border = format!(
                    "0 G 1 w {:.2} {:.2} {:.2} {:.2} re S\n",
                    x, row_bottom, width, row_height
                );
                self.page().push_str(&border);
                x += width;
            }
            self.y = row_bottom;
        }
    }

    fn add_footers(&mut self) {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            let label = format!("Page {} of {}", i + 1, total);
            let width = Font::Helvetica.measure_str(&label, FOOTER_SIZE);
            let _ = writeln!(
                page,
                "BT /{} {FOOTER_SIZE:.1} Tf {} {:.2} {:.2} Td ({}) Tj ET",
                Font::Helvetica.resource(),
                BLACK.fill_op(),
                (PAGE_WIDTH - width) / 2.0,
                MARGIN / 2.0,
                writer::encode_text(&label)
            );
        }
    }
}

fn layout(blocks: &[Block]) -> Vec<String> {
    let mut layout = Layout::new();
    for block in blocks {
        match block {
            Block::Paragraph {
                spans,
                indent,
                space_after,
            } => layout.paragraph(spans, *indent, *space_after),
            Block::Table { rows, widths } => layout.table(rows, widths),
            Block::Spacer(height) => {
                layout.y -= height;
                if layout.y < Layout::bottom() {
                    layout.new_page();
                }
            }
        }
    }
    layout.add_footers();
    layout.pages
}

/// Renders the report as a paginated A4 PDF.
pub fn render_pdf(report: &InterviewReport) -> Result<Vec<u8>, ExportError> {
    let pages = layout(&report_blocks(report));
    if pages.is_empty() {
        return Err(ExportError::Render("layout produced no pages".to_string()));
    }
    let streams: Vec<Vec<u8>> = pages.into_iter().map(String::into_bytes).collect();
    Ok(writer::write_document(&streams, TITLE))
}
