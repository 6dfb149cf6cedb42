use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    helpers::{
        layout::{DateRange, LayoutError, PageGeometry},
        pdf::{self, BandColor, PdfConfig, SheetFont, SheetJob},
        roster,
    },
    models::oficio::{DEFAULT_CARGO, DEFAULT_FIRMANTE, OficioLetter, OficioRequest},
};

/// Configuration for the attendance service
#[derive(Clone)]
pub struct AttendanceConfig {
    pub roster_url: String,
    pub assets_dir: PathBuf,
    pub font: SheetFont,
    /// How many consecutive subjects share a band color in batch output.
    pub color_cycle: usize,
}

/// The main attendance service that handles roster lookups, attendance
/// sheet generation and oficio letter rendering
#[derive(Clone)]
pub struct AttendanceService {
    pub roster_client: Client,
    pub config: AttendanceConfig,
}

/// Request-level failures, each carrying its client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("parámetro requerido '{0}' ausente")]
    MissingParameter(&'static str),
    #[error("fecha inválida '{value}': se esperaba el formato YYYY-MM-DD")]
    DateParse { value: String },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("no hay becas aprobadas registradas")]
    NoApprovedScholars,
    #[error("error interno al generar el documento: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingParameter(_) | Self::DateParse { .. } | Self::Layout(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NoApprovedScholars => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

impl AttendanceService {
    /// Create a new attendance service instance
    pub fn new(roster_client: Client, config: AttendanceConfig) -> Self {
        info!("Creating new AttendanceService instance");
        Self {
            roster_client,
            config,
        }
    }

    /// Create an Axum router for the attendance service
    pub fn router(self) -> Router {
        info!("Creating attendance service router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/attendance-sheet", get(attendance_sheet))
            .route("/attendance-sheet-general", get(attendance_sheet_general))
            .route("/oficio-pdf", post(oficio_pdf))
            .route("/roster-db-info", get(roster_db_info))
            .with_state(shared_state)
    }

    fn pdf_config(&self) -> PdfConfig {
        PdfConfig {
            assets_dir: self.config.assets_dir.clone(),
            font: self.config.font,
            geometry: PageGeometry::default(),
        }
    }

    /// Process the batch variant: fetch every approved scholarship and
    /// render one sheet per subject into a single document.
    pub async fn process_general(
        &self,
        range: DateRange,
        color: Option<BandColor>,
    ) -> Result<Vec<u8>, ApiError> {
        info!(
            "Processing general attendance sheets for period {}",
            range.label()
        );

        match roster::fetch_approved_scholars(&self.roster_client, &self.config.roster_url).await {
            Ok(scholars) => {
                if scholars.is_empty() {
                    error!("No approved scholarships found for general sheets");
                    return Err(ApiError::NoApprovedScholars);
                }
                info!("Rendering sheets for {} scholar(s)", scholars.len());

                let jobs: Vec<SheetJob> = scholars
                    .iter()
                    .enumerate()
                    .map(|(i, row)| SheetJob {
                        control: row.estudiante.numero_control.to_string(),
                        nombre: row.estudiante.full_name(),
                        range,
                        color: color
                            .unwrap_or_else(|| BandColor::rotated(i, self.config.color_cycle)),
                    })
                    .collect();

                pdf::render_attendance_document(&jobs, &self.pdf_config())
                    .map_err(ApiError::Internal)
            }
            Err(e) => {
                error!("Failed to fetch approved scholarships: {:#}", e);
                Err(ApiError::Internal(format!(
                    "no se pudo consultar el padrón de becas: {e}"
                )))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SheetQuery {
    pub control: Option<String>,
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: Option<String>,
}

impl SheetQuery {
    fn validate(&self) -> Result<SheetJob, ApiError> {
        Ok(SheetJob {
            control: require(&self.control, "control")?.to_string(),
            nombre: require(&self.name, "name")?.to_string(),
            range: parse_range(&self.start, &self.end)?,
            color: BandColor::parse(self.color.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: Option<String>,
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingParameter(name)),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ApiError::DateParse {
        value: value.to_string(),
    })
}

fn parse_range(start: &Option<String>, end: &Option<String>) -> Result<DateRange, ApiError> {
    let start = parse_date(require(start, "start")?)?;
    let end = parse_date(require(end, "end")?)?;
    Ok(DateRange::new(start, end)?)
}

fn validate_oficio(request: &OficioRequest) -> Result<OficioLetter, ApiError> {
    let fecha = match request.fecha.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => parse_date(v)?,
        _ => Local::now().date_naive(),
    };

    Ok(OficioLetter {
        numero: require(&request.numero, "numero")?.to_string(),
        asunto: require(&request.asunto, "asunto")?.to_string(),
        destinatario: require(&request.destinatario, "destinatario")?.to_string(),
        cuerpo: require(&request.cuerpo, "cuerpo")?.to_string(),
        fecha,
        firmante: request
            .firmante
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_FIRMANTE)
            .to_string(),
        cargo: request
            .cargo
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CARGO)
            .to_string(),
    })
}

fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// Route handlers
async fn attendance_sheet(
    State(service): State<Arc<AttendanceService>>,
    Query(params): Query<SheetQuery>,
) -> Result<Response, ApiError> {
    info!("Received single attendance sheet request");

    let job = params.validate()?;
    let filename = format!("asistencia_{}.pdf", job.control);

    let bytes = pdf::render_attendance_document(std::slice::from_ref(&job), &service.pdf_config())
        .map_err(ApiError::Internal)?;

    info!(
        "Attendance sheet generated for {}, size: {} bytes",
        job.control,
        bytes.len()
    );
    Ok(pdf_response(bytes, &filename))
}

async fn attendance_sheet_general(
    State(service): State<Arc<AttendanceService>>,
    Query(params): Query<BatchQuery>,
) -> Result<Response, ApiError> {
    info!("Received general attendance sheet request");

    let range = parse_range(&params.start, &params.end)?;
    let color = params.color.as_deref().map(|c| BandColor::parse(Some(c)));

    let bytes = service.process_general(range, color).await?;
    Ok(pdf_response(bytes, "listas_asistencia.pdf"))
}

async fn oficio_pdf(
    State(service): State<Arc<AttendanceService>>,
    Json(payload): Json<OficioRequest>,
) -> Result<Response, ApiError> {
    info!("Received oficio letter request");

    let letter = validate_oficio(&payload)?;
    let filename = format!(
        "{}.pdf",
        letter.numero.replace([' ', '/'], "_").replace('.', "")
    );

    let bytes = pdf::render_oficio(&letter, &service.pdf_config()).map_err(ApiError::Internal)?;

    info!(
        "Oficio letter {} generated, size: {} bytes",
        letter.numero,
        bytes.len()
    );
    Ok(pdf_response(bytes, &filename))
}

async fn roster_db_info(State(service): State<Arc<AttendanceService>>) -> String {
    info!("Retrieving roster table info");

    match roster::retrieve_table_info(&service.roster_client, &service.config.roster_url).await {
        Ok(table_info) => table_info,
        Err(e) => {
            error!("Failed to retrieve roster info: {:#}", e);
            format!("Error retrieving roster info: {e}")
        }
    }
}
