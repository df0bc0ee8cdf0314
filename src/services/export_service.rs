use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, Utc};
use csv::Writer;
use log::info;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rect, Rgb,
};
use strum_macros::Display;

use crate::{
    format::{format_currency, format_date_time, format_percentage},
    models::Quote,
};

const REPORT_TITLE: &str = "ORION Market Report";
const FILE_PREFIX: &str = "orion-market-report";
const CSV_HEADER: [&str; 6] = ["Type", "Symbol", "Name", "Price", "Change", "Percent Change"];

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const BOTTOM_MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 7.0;
const PT_TO_MM: f32 = 0.3528;

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ExportFormat {
    #[strum(serialize = "PDF")]
    Pdf,
    #[strum(serialize = "CSV")]
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }
}

pub fn report_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        FILE_PREFIX,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn export_report(
    format: ExportFormat,
    indices: &[Quote],
    stocks: &[Quote],
    dir: &Path,
) -> Result<PathBuf> {
    let now = Local::now();
    // Named by the UTC date, stamped inside with local time.
    let path = dir.join(report_file_name(format, Utc::now().date_naive()));

    let write = || -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        match format {
            ExportFormat::Csv => fs::write(&path, csv_report(indices, stocks)?)?,
            ExportFormat::Pdf => fs::write(&path, pdf_report(indices, stocks, now)?)?,
        }
        Ok(())
    };

    write().with_context(|| format!("Failed to export {} report", format))?;
    info!("Exported {} report to {}", format, path.display());

    Ok(path)
}

pub fn csv_report(indices: &[Quote], stocks: &[Quote]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for index in indices {
        writer.write_record(quote_record("Index", index, String::new()))?;
    }

    for stock in stocks {
        let name = stock.name().clone().unwrap_or_default();
        writer.write_record(quote_record("Stock", stock, name))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to finish CSV report: {}", e.error()))?;

    Ok(String::from_utf8(bytes)?)
}

fn quote_record(kind: &str, quote: &Quote, name: String) -> [String; 6] {
    [
        kind.to_string(),
        quote.symbol().clone(),
        name,
        quote.price().to_string(),
        quote.change().to_string(),
        quote.change_percent().to_string(),
    ]
}

pub fn pdf_report(
    indices: &[Quote],
    stocks: &[Quote],
    generated_at: DateTime<Local>,
) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut report = PdfReport {
        doc: &doc,
        pages: vec![(page, layer)],
        y: PAGE_HEIGHT - 20.0,
        regular,
        bold,
    };

    report.centered_text(REPORT_TITLE, 20.0, true);
    report.y -= 8.0;
    report.centered_text(
        &format!("Generated: {}", format_date_time(&generated_at)),
        10.0,
        false,
    );
    report.y -= 12.0;

    report.section_title("Global Market Indices");
    let index_rows: Vec<Vec<String>> = indices
        .iter()
        .map(|index| {
            vec![
                index.symbol().clone(),
                format_currency(*index.price()),
                format_currency(*index.change()),
                format_percentage(*index.change_percent()),
            ]
        })
        .collect();
    report.table(&["Symbol", "Price", "Change", "% Change"], &index_rows);

    if !stocks.is_empty() {
        report.y -= 15.0;
        report.section_title("Stock Performance");
        let stock_rows: Vec<Vec<String>> = stocks
            .iter()
            .map(|stock| {
                vec![
                    stock.symbol().clone(),
                    stock.label().to_string(),
                    format_currency(*stock.price()),
                    format_currency(*stock.change()),
                    format_percentage(*stock.change_percent()),
                ]
            })
            .collect();
        report.table(&["Symbol", "Name", "Price", "Change", "% Change"], &stock_rows);
    }

    report.page_footers();
    drop(report);

    Ok(doc.save_to_bytes()?)
}

struct PdfReport<'a> {
    doc: &'a PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfReport<'_> {
    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.pages.len() - 1];
        self.doc.get_page(page).get_layer(layer)
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold { &self.bold } else { &self.regular }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOTTOM_MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.pages.push((page, layer));
            self.y = PAGE_HEIGHT - 20.0;
        }
    }

    fn centered_text(&self, text: &str, font_size: f32, bold: bool) {
        // Builtin fonts carry no metrics here; half an em per glyph is close
        // enough for Helvetica.
        let width = text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.layer()
            .use_text(text, font_size, Mm(x), Mm(self.y), self.font(bold));
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(ROW_HEIGHT * 3.0);
        self.layer()
            .use_text(title, 14.0, Mm(MARGIN), Mm(self.y), &self.bold);
        self.y -= 5.0;
    }

    fn table(&mut self, head: &[&str], rows: &[Vec<String>]) {
        let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / head.len() as f32;
        let head: Vec<String> = head.iter().map(|h| h.to_string()).collect();

        self.ensure_space(ROW_HEIGHT * 2.0);
        self.row(&head, column_width, Some(black()), white(), true);

        for (i, row) in rows.iter().enumerate() {
            if self.y - ROW_HEIGHT < BOTTOM_MARGIN {
                self.ensure_space(ROW_HEIGHT * 2.0);
                self.row(&head, column_width, Some(black()), white(), true);
            }
            let fill = (i % 2 == 1).then(light_grey);
            self.row(row, column_width, fill, black(), false);
        }
    }

    fn row(
        &mut self,
        cells: &[String],
        column_width: f32,
        fill: Option<Color>,
        text: Color,
        bold: bool,
    ) {
        let layer = self.layer();
        let top = self.y;
        let bottom = self.y - ROW_HEIGHT;
        let right = PAGE_WIDTH - MARGIN;

        if let Some(fill) = fill {
            layer.set_fill_color(fill);
            layer.add_rect(Rect::new(Mm(MARGIN), Mm(bottom), Mm(right), Mm(top)));
        }

        layer.set_outline_color(grid_grey());
        layer.set_outline_thickness(0.3);
        layer.add_line(horizontal_line(MARGIN, right, bottom));
        for column in 0..=cells.len() {
            let x = MARGIN + column as f32 * column_width;
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x), Mm(top)), false),
                    (Point::new(Mm(x), Mm(bottom)), false),
                ],
                is_closed: false,
            });
        }

        layer.set_fill_color(text);
        for (column, cell) in cells.iter().enumerate() {
            let x = MARGIN + column as f32 * column_width + 2.0;
            layer.use_text(cell.as_str(), 9.0, Mm(x), Mm(bottom + 2.2), self.font(bold));
        }

        self.y = bottom;
    }

    fn page_footers(&self) {
        let count = self.pages.len();
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let text = format!("Page {} of {}", i + 1, count);
            let width = text.chars().count() as f32 * 8.0 * 0.5 * PT_TO_MM;
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.set_fill_color(black());
            layer.use_text(text, 8.0, Mm((PAGE_WIDTH - width) / 2.0), Mm(10.0), &self.regular);
        }
    }
}

fn horizontal_line(from: f32, to: f32, y: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(from), Mm(y)), false),
            (Point::new(Mm(to), Mm(y)), false),
        ],
        is_closed: false,
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn light_grey() -> Color {
    Color::Rgb(Rgb::new(0.96, 0.96, 0.96, None))
}

fn grid_grey() -> Color {
    Color::Rgb(Rgb::new(0.75, 0.75, 0.75, None))
}
