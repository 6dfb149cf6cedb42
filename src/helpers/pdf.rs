use chrono::{Datelike, NaiveDate};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::helpers::layout::{self, DateRange, PageGeometry, PageLayout, RowKind};
use crate::models::oficio::OficioLetter;

const CM: f32 = 28.3465;

const SHEET_TITLE: &str = "LISTA DE ASISTENCIA";
const CONTACT_HEADING: &str = "Contacto:";
const CONTACT_EMAIL: &str = "Correo: cesa@cdguzman.tecnm.mx";
const CONTACT_PHONE: &str = "Teléfono: 33 1025 9280";
const SIGNATURE_CAPTION: &str = "Firma del Encargado";
const LETTERHEAD_LINE: &str =
    "Instituto Tecnológico de Ciudad Guzmán / Tecnológico Nacional de México";

const TITLE_FONT_SIZE: f32 = 12.0;
const META_FONT_SIZE: f32 = 10.0;
const GRID_FONT_SIZE: f32 = 8.0;
const FOOTER_FONT_SIZE: f32 = 8.0;
const BODY_FONT_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 15.0;

const FOOTER_LINE_Y: f32 = 0.8 * CM;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

struct LogoSpec {
    file: &'static str,
    fallback: &'static str,
    x: f32,
    width: f32,
    height: f32,
}

const LOGO_ZONE_TALLEST: f32 = 1.36 * CM;
const LOGO_KEYS: [&str; 3] = ["Lg0", "Lg1", "Lg2"];
static LOGOS: [LogoSpec; 3] = [
    LogoSpec {
        file: "logo_TecNM.png",
        fallback: "TecNM",
        x: 2.54 * CM,
        width: 2.57 * CM,
        height: 1.27 * CM,
    },
    LogoSpec {
        file: "logo_ITCG.jpeg",
        fallback: "ITCG",
        x: 10.22 * CM,
        width: 1.15 * CM,
        height: 1.15 * CM,
    },
    LogoSpec {
        file: "logo_CESA.png",
        fallback: "CESA",
        x: 16.78 * CM,
        width: 2.27 * CM,
        height: 1.36 * CM,
    },
];

/// Typeface used across the whole document. Resolved once at startup from
/// configuration; there is no runtime font probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetFont {
    #[default]
    Helvetica,
    Times,
}

impl SheetFont {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "times" | "times-roman" => Self::Times,
            _ => Self::Helvetica,
        }
    }

    fn regular(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::Times => "Times-Roman",
        }
    }

    fn bold(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica-Bold",
            Self::Times => "Times-Bold",
        }
    }
}

/// Header band palette. Unknown or absent names fall back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandColor {
    #[default]
    Green,
    Blue,
    Orange,
    Pink,
    Purple,
}

impl BandColor {
    pub const PALETTE: [BandColor; 5] = [
        Self::Green,
        Self::Blue,
        Self::Orange,
        Self::Pink,
        Self::Purple,
    ];

    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("verde" | "green") => Self::Green,
            Some("azul" | "blue") => Self::Blue,
            Some("naranja" | "orange") => Self::Orange,
            Some("rosa" | "pink") => Self::Pink,
            Some("morado" | "purple") => Self::Purple,
            _ => Self::default(),
        }
    }

    /// Palette entry for the `index`-th subject of a batch, advancing every
    /// `every` subjects.
    pub fn rotated(index: usize, every: usize) -> Self {
        let every = every.max(1);
        Self::PALETTE[(index / every) % Self::PALETTE.len()]
    }

    fn rgb(self) -> (f32, f32, f32) {
        match self {
            Self::Green => (0.78, 0.90, 0.79),
            Self::Blue => (0.74, 0.84, 0.93),
            Self::Orange => (0.99, 0.88, 0.70),
            Self::Pink => (0.97, 0.80, 0.86),
            Self::Purple => (0.85, 0.80, 0.92),
        }
    }
}

/// Immutable inputs for one rendering pass.
#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub assets_dir: PathBuf,
    pub font: SheetFont,
    pub geometry: PageGeometry,
}

/// One subject's attendance sheet: identity, reporting period and band color.
#[derive(Debug, Clone)]
pub struct SheetJob {
    pub control: String,
    pub nombre: String,
    pub range: DateRange,
    pub color: BandColor,
}

/// Renders one attendance sheet per job into a single document. Page
/// numbering runs continuously across all sheets and totals are stamped
/// after every page has been laid out.
pub fn render_attendance_document(jobs: &[SheetJob], config: &PdfConfig) -> Result<Vec<u8>, String> {
    if jobs.is_empty() {
        return Err("no hay becarios para generar listas".to_string());
    }

    info!("Generating attendance document for {} subject(s)", jobs.len());

    let mut builder = DocumentBuilder::new(config);
    for job in jobs {
        builder.add_sheet(job);
    }

    let bytes = builder.finish()?;
    info!("Attendance document ready, size: {} bytes", bytes.len());
    Ok(bytes)
}

/// Renders a formal oficio letter. The full oficio number is assigned by the
/// caller; this only draws the document.
pub fn render_oficio(letter: &OficioLetter, config: &PdfConfig) -> Result<Vec<u8>, String> {
    info!("Generating oficio letter {}", letter.numero);

    let mut builder = DocumentBuilder::new(config);
    builder.add_oficio(letter);

    let bytes = builder.finish()?;
    info!("Oficio letter ready, size: {} bytes", bytes.len());
    Ok(bytes)
}

/// Long-form Spanish date, e.g. `3 de octubre de 2025`.
pub fn fecha_larga(date: NaiveDate) -> String {
    const MESES: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    format!(
        "{} de {} de {}",
        date.day(),
        MESES[date.month0() as usize],
        date.year()
    )
}

struct LoadedLogo {
    key: &'static str,
    spec: &'static LogoSpec,
    xobject: Option<ObjectId>,
}

struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    geometry: PageGeometry,
    logos: Vec<LoadedLogo>,
    page_ops: Vec<Vec<Operation>>,
}

impl DocumentBuilder {
    fn new(config: &PdfConfig) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => config.font.regular(),
            "Encoding" => "WinAnsiEncoding",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => config.font.bold(),
            "Encoding" => "WinAnsiEncoding",
        });

        // Decorative assets degrade to fallback text; core content fails hard.
        let mut xobjects = dictionary! {};
        let mut any_logo = false;
        let logos: Vec<LoadedLogo> = LOGOS
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let key = LOGO_KEYS[i];
                let xobject = match load_logo(&config.assets_dir.join(spec.file), &mut doc) {
                    Ok(id) => {
                        xobjects.set(key, id);
                        any_logo = true;
                        Some(id)
                    }
                    Err(e) => {
                        warn!("Could not load logo {}: {}", spec.file, e);
                        None
                    }
                };
                LoadedLogo { key, spec, xobject }
            })
            .collect();

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => font_regular,
                FONT_BOLD => font_bold,
            },
        };
        if any_logo {
            resources.set("XObject", xobjects);
        }
        let resources_id = doc.add_object(resources);

        Self {
            doc,
            pages_id,
            resources_id,
            geometry: config.geometry,
            logos,
            page_ops: Vec::new(),
        }
    }

    fn logo_zone_bottom(&self) -> f32 {
        self.geometry.page_height - 1.27 * CM - LOGO_ZONE_TALLEST - 0.2 * CM
    }

    fn band_top(&self) -> f32 {
        self.logo_zone_bottom() - 10.0
    }

    fn grid_top(&self) -> f32 {
        self.band_top() - self.geometry.header_band_height - 42.0
    }

    fn add_sheet(&mut self, job: &SheetJob) {
        let grid = layout::build_grid(&job.range);
        let rows = layout::expand_rows(&grid, &self.geometry);

        // The header block repeats identically on every page, so the first
        // and subsequent pages get the same available height.
        let available = self.grid_top() - self.geometry.margin_bottom;
        let pages = layout::paginate(rows, available, available, self.geometry.footer_reserve);

        info!(
            "Attendance sheet for {}: {} week(s) over {} page(s)",
            job.control,
            grid.len(),
            pages.len()
        );

        let last = pages.len() - 1;
        for (i, page) in pages.iter().enumerate() {
            let mut ops = Vec::new();
            self.logo_ops(&mut ops);
            self.sheet_header_ops(&mut ops, job);
            self.grid_ops(&mut ops, page);
            if i == last {
                self.signature_ops(&mut ops);
            }
            self.footer_ops(&mut ops);
            self.page_ops.push(ops);
        }
    }

    fn add_oficio(&mut self, letter: &OficioLetter) {
        let g = self.geometry;
        let right_x = g.page_width - g.margin_right;
        let body_width = g.content_width();
        let floor = g.margin_bottom + g.footer_reserve;

        let mut ops = Vec::new();
        self.logo_ops(&mut ops);
        let mut y = self.band_top();

        for line in [
            LETTERHEAD_LINE.to_string(),
            format!("Ciudad Guzmán, Jalisco a {}", fecha_larga(letter.fecha)),
            format!("OFICIO No. {}", letter.numero),
        ] {
            show_right(&mut ops, FONT_REGULAR, BODY_FONT_SIZE, right_x, y, &line);
            y -= BODY_LEADING;
        }

        let asunto_label = "Asunto: ";
        let asunto_x = right_x
            - text_width(asunto_label, BODY_FONT_SIZE)
            - text_width(&letter.asunto, BODY_FONT_SIZE);
        show_text(&mut ops, FONT_BOLD, BODY_FONT_SIZE, asunto_x, y, asunto_label);
        show_text(
            &mut ops,
            FONT_REGULAR,
            BODY_FONT_SIZE,
            asunto_x + text_width(asunto_label, BODY_FONT_SIZE),
            y,
            &letter.asunto,
        );
        y -= 2.0 * BODY_LEADING;

        show_text(
            &mut ops,
            FONT_BOLD,
            BODY_FONT_SIZE,
            g.margin_left,
            y,
            &letter.destinatario,
        );
        y -= 2.0 * BODY_LEADING;

        for paragraph in letter.cuerpo.split('\n') {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                y -= BODY_LEADING;
                continue;
            }
            for line in wrap_text(paragraph, BODY_FONT_SIZE, body_width) {
                if y < floor {
                    self.footer_ops(&mut ops);
                    self.page_ops.push(std::mem::take(&mut ops));
                    self.logo_ops(&mut ops);
                    y = self.band_top();
                }
                show_text(&mut ops, FONT_REGULAR, BODY_FONT_SIZE, g.margin_left, y, &line);
                y -= BODY_LEADING;
            }
            y -= BODY_LEADING;
        }

        let closing = [
            ("ATENTAMENTE", 1.0),
            ("Comité Ejecutivo de la Sociedad de Alumnos", 2.0),
            (letter.firmante.as_str(), 1.0),
            (letter.cargo.as_str(), 1.0),
        ];
        if y - BODY_LEADING * (closing.len() as f32 + 2.0) < floor {
            self.footer_ops(&mut ops);
            self.page_ops.push(std::mem::take(&mut ops));
            self.logo_ops(&mut ops);
            y = self.band_top();
        }
        y -= BODY_LEADING;
        for (line, gap) in closing {
            show_text(&mut ops, FONT_BOLD, BODY_FONT_SIZE, g.margin_left, y, line);
            y -= BODY_LEADING * gap;
        }

        self.footer_ops(&mut ops);
        self.page_ops.push(ops);
    }

    fn logo_ops(&self, ops: &mut Vec<Operation>) {
        let base_y = self.logo_zone_bottom();
        for logo in &self.logos {
            let spec = logo.spec;
            let y = base_y + (LOGO_ZONE_TALLEST - spec.height) / 2.0;
            match logo.xobject {
                Some(_) => {
                    ops.push(Operation::new("q", vec![]));
                    ops.push(Operation::new(
                        "cm",
                        vec![
                            spec.width.into(),
                            0.into(),
                            0.into(),
                            spec.height.into(),
                            spec.x.into(),
                            y.into(),
                        ],
                    ));
                    ops.push(Operation::new("Do", vec![logo.key.into()]));
                    ops.push(Operation::new("Q", vec![]));
                }
                None => {
                    show_text(ops, FONT_BOLD, FOOTER_FONT_SIZE, spec.x, y, spec.fallback);
                }
            }
        }
    }

    fn sheet_header_ops(&self, ops: &mut Vec<Operation>, job: &SheetJob) {
        let g = self.geometry;
        let band_top = self.band_top();
        let band_bottom = band_top - g.header_band_height;
        let (r, gc, b) = job.color.rgb();

        ops.push(Operation::new("rg", vec![r.into(), gc.into(), b.into()]));
        ops.push(Operation::new(
            "re",
            vec![
                g.margin_left.into(),
                band_bottom.into(),
                g.content_width().into(),
                g.header_band_height.into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));

        let center_x = g.margin_left + g.content_width() / 2.0;
        show_centered(
            ops,
            FONT_BOLD,
            TITLE_FONT_SIZE,
            center_x,
            band_bottom + (g.header_band_height - TITLE_FONT_SIZE) / 2.0 + 2.0,
            SHEET_TITLE,
        );

        show_text(
            ops,
            FONT_REGULAR,
            META_FONT_SIZE,
            g.margin_left,
            band_bottom - 16.0,
            &format!("No. de Control: {}    Becario: {}", job.control, job.nombre),
        );
        show_text(
            ops,
            FONT_REGULAR,
            META_FONT_SIZE,
            g.margin_left,
            band_bottom - 30.0,
            &format!("Periodo: {}", job.range.label()),
        );
    }

    fn grid_ops(&self, ops: &mut Vec<Operation>, page: &PageLayout) {
        let g = self.geometry;
        let column_width = g.content_width() / 5.0;

        ops.push(Operation::new("w", vec![0.75.into()]));
        ops.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));

        let mut y = self.grid_top();
        for row in &page.rows {
            let bottom = y - row.height;
            for i in 0..5 {
                let x = g.margin_left + i as f32 * column_width;
                ops.push(Operation::new(
                    "re",
                    vec![
                        x.into(),
                        bottom.into(),
                        column_width.into(),
                        row.height.into(),
                    ],
                ));
            }
            ops.push(Operation::new("S", vec![]));

            if row.kind == RowKind::Date {
                for (i, cell) in row.cells.iter().enumerate() {
                    let center_x = g.margin_left + (i as f32 + 0.5) * column_width;
                    for (line_no, line) in cell.lines().enumerate() {
                        show_centered(
                            ops,
                            FONT_REGULAR,
                            GRID_FONT_SIZE,
                            center_x,
                            y - 12.0 - line_no as f32 * 11.0,
                            line,
                        );
                    }
                }
            }
            y = bottom;
        }
    }

    fn signature_ops(&self, ops: &mut Vec<Operation>) {
        let g = self.geometry;
        let y = g.margin_bottom + 18.0;
        let x0 = g.margin_left + g.content_width() * 0.25;
        let x1 = g.margin_left + g.content_width() * 0.75;

        ops.push(Operation::new("RG", vec![0.into(), 0.into(), 0.into()]));
        ops.push(Operation::new("m", vec![x0.into(), y.into()]));
        ops.push(Operation::new("l", vec![x1.into(), y.into()]));
        ops.push(Operation::new("S", vec![]));
        show_centered(
            ops,
            FONT_REGULAR,
            GRID_FONT_SIZE,
            g.margin_left + g.content_width() / 2.0,
            y - 12.0,
            SIGNATURE_CAPTION,
        );
    }

    fn footer_ops(&self, ops: &mut Vec<Operation>) {
        let g = self.geometry;
        show_text(
            ops,
            FONT_BOLD,
            FOOTER_FONT_SIZE,
            g.margin_left,
            FOOTER_LINE_Y + 20.0,
            CONTACT_HEADING,
        );
        show_text(
            ops,
            FONT_REGULAR,
            FOOTER_FONT_SIZE,
            g.margin_left,
            FOOTER_LINE_Y + 10.0,
            CONTACT_EMAIL,
        );
        show_text(
            ops,
            FONT_REGULAR,
            FOOTER_FONT_SIZE,
            g.margin_left,
            FOOTER_LINE_Y,
            CONTACT_PHONE,
        );
    }

    /// Closes the document: stamps `Página N de M` on every page now that
    /// the total is known, then assembles the page tree and serializes.
    fn finish(mut self) -> Result<Vec<u8>, String> {
        let g = self.geometry;
        let total = self.page_ops.len();
        if total == 0 {
            return Err("el documento no produjo ninguna página".to_string());
        }

        let mut kids: Vec<Object> = Vec::with_capacity(total);
        for (i, mut ops) in self.page_ops.into_iter().enumerate() {
            show_right(
                &mut ops,
                FONT_REGULAR,
                FOOTER_FONT_SIZE,
                g.page_width - g.margin_right,
                FOOTER_LINE_Y + 10.0,
                &format!("Página {} de {}", i + 1, total),
            );

            let encoded = Content { operations: ops }
                .encode()
                .map_err(|e| format!("No se pudo codificar el contenido de la página: {e}"))?;
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Resources" => self.resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    g.page_width.into(),
                    g.page_height.into(),
                ],
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| format!("No se pudo serializar el PDF: {e}"))?;
        Ok(out)
    }
}

fn load_logo(path: &Path, doc: &mut Document) -> Result<ObjectId, String> {
    let img = image::open(path).map_err(|e| e.to_string())?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 85)
        .encode(rgb.as_raw(), width, height, image::ColorType::Rgb8)
        .map_err(|e| e.to_string())?;

    Ok(doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )))
}

// Base-14 fonts carry no embedded metrics here; an average glyph factor is
// close enough for centering and right-alignment at these sizes.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let cp = c as u32;
            if cp < 256 { cp as u8 } else { b'?' }
        })
        .collect()
}

fn show_text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn show_centered(ops: &mut Vec<Operation>, font: &str, size: f32, center_x: f32, y: f32, text: &str) {
    show_text(ops, font, size, center_x - text_width(text, size) / 2.0, y, text);
}

fn show_right(ops: &mut Vec<Operation>, font: &str, size: f32, right_x: f32, y: f32, text: &str) {
    show_text(ops, font, size, right_x - text_width(text, size), y, text);
}

fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, size) > max_width && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config() -> PdfConfig {
        PdfConfig {
            // Deliberately nonexistent: logos must degrade to fallback text.
            assets_dir: PathBuf::from("no-such-assets-dir"),
            font: SheetFont::Helvetica,
            geometry: PageGeometry::default(),
        }
    }

    fn job(control: &str, start: NaiveDate, end: NaiveDate) -> SheetJob {
        SheetJob {
            control: control.to_string(),
            nombre: "María Pérez".to_string(),
            range: DateRange::new(start, end).unwrap(),
            color: BandColor::Green,
        }
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn month_sheet_fits_one_page_even_without_logo_assets() {
        let bytes = render_attendance_document(
            &[job("21290456", date(2025, 10, 1), date(2025, 10, 31))],
            &test_config(),
        )
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn semester_sheet_spills_onto_multiple_pages() {
        let bytes = render_attendance_document(
            &[job("21290456", date(2025, 1, 6), date(2025, 6, 27))],
            &test_config(),
        )
        .unwrap();

        assert!(page_count(&bytes) >= 2);
    }

    #[test]
    fn batch_concatenates_sheets_into_one_document() {
        let jobs = [
            job("101", date(2025, 10, 1), date(2025, 10, 31)),
            job("102", date(2025, 10, 1), date(2025, 10, 31)),
        ];
        let bytes = render_attendance_document(&jobs, &test_config()).unwrap();
        assert_eq!(page_count(&bytes), 2);
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(render_attendance_document(&[], &test_config()).is_err());
    }

    #[test]
    fn oficio_letter_renders_and_parses() {
        let letter = OficioLetter {
            numero: "C.E.S.A./S012/2025".to_string(),
            asunto: "Solicitud de espacio".to_string(),
            destinatario: "Mtro. Director de Servicios Escolares".to_string(),
            cuerpo: "Por medio del presente se solicita el apoyo del departamento.\n\
                     Sin más por el momento, agradecemos su atención."
                .to_string(),
            fecha: date(2025, 10, 3),
            firmante: "C. JAIRO GIOVANNI ÁLVAREZ JUÁREZ".to_string(),
            cargo: "Presidente del C.E.S.A. ITCG".to_string(),
        };

        let bytes = render_oficio(&letter, &test_config()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn band_color_parsing_accepts_both_languages_and_falls_back() {
        assert_eq!(BandColor::parse(Some("azul")), BandColor::Blue);
        assert_eq!(BandColor::parse(Some("Orange")), BandColor::Orange);
        assert_eq!(BandColor::parse(Some("fucsia")), BandColor::Green);
        assert_eq!(BandColor::parse(None), BandColor::Green);
    }

    #[test]
    fn band_color_rotation_cycles_through_palette() {
        assert_eq!(BandColor::rotated(0, 1), BandColor::Green);
        assert_eq!(BandColor::rotated(1, 1), BandColor::Blue);
        assert_eq!(BandColor::rotated(5, 1), BandColor::Green);
        // Grouped cadence: two subjects per color.
        assert_eq!(BandColor::rotated(1, 2), BandColor::Green);
        assert_eq!(BandColor::rotated(2, 2), BandColor::Blue);
    }

    #[test]
    fn fecha_larga_uses_spanish_month_names() {
        assert_eq!(fecha_larga(date(2025, 10, 3)), "3 de octubre de 2025");
    }

    #[test]
    fn wrap_text_keeps_words_within_the_measure() {
        let lines = wrap_text("uno dos tres cuatro cinco seis siete ocho", 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 60.0 || !line.contains(' '));
        }
    }
}
