use axum::Router;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use cesa_attendance_util::{
    helpers::{pdf::SheetFont, roster},
    service::{AttendanceConfig, AttendanceService},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting CESA Attendance Service example");

    // Load configuration (in a real app, you'd load from environment or config file)
    let roster_api_key = "your-roster-api-key".to_string();
    let roster_url = "https://your-project.supabase.co".to_string();

    // Initialize services
    let roster_client = roster::roster_client_init(roster_api_key)?;

    let config = AttendanceConfig {
        roster_url,
        assets_dir: PathBuf::from("assets"),
        font: SheetFont::from_name("helvetica"),
        color_cycle: 1,
    };

    // Create the attendance service
    let attendance_service = AttendanceService::new(roster_client, config);

    // Create router with the attendance service
    let app = Router::new()
        .nest("/api/attendance", attendance_service.router())
        .route("/health", axum::routing::get(|| async { "OK" }));

    // Start server
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server running on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Example usage of the service:

1. GET /api/attendance/attendance-sheet?control=21290456&name=Maria+Perez&start=2025-10-01&end=2025-10-31&color=azul
   - Streams one subject's attendance sheet PDF

2. GET /api/attendance/attendance-sheet-general?start=2025-10-01&end=2025-10-31
   - Fetches every approved scholarship from the roster database
   - Streams one document with a sheet per subject, band colors rotating

3. POST /api/attendance/oficio-pdf
   - JSON body: { "numero": "...", "asunto": "...", "destinatario": "...", "cuerpo": "..." }
   - Streams the rendered oficio letter PDF

4. GET /api/attendance/roster-db-info
   - Returns a raw sample of the scholarship table for debugging
*/
