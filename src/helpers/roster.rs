use anyhow::{Context, Result, bail};
use reqwest::{Client, header};
use tracing::{error, info};

use crate::models::roster::ScholarRow;

/// Builds the HTTP client for the scholarship database's REST interface.
/// The service key goes into both headers PostgREST expects, marked
/// sensitive so it never shows up in logs.
pub fn roster_client_init(key: String) -> Result<Client> {
    info!("Initializing roster database client");

    let mut api_key = header::HeaderValue::from_str(&key)
        .context("Failed to create apikey header value")?;
    api_key.set_sensitive(true);

    let mut bearer = header::HeaderValue::from_str(&format!("Bearer {key}"))
        .context("Failed to create Authorization header value")?;
    bearer.set_sensitive(true);

    let mut headers = header::HeaderMap::new();
    headers.insert("apikey", api_key);
    headers.insert(header::AUTHORIZATION, bearer);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build roster database client")?;

    info!("Roster database client initialized successfully");
    Ok(client)
}

/// Fetches every approved scholarship joined to its student's identity.
pub async fn fetch_approved_scholars(client: &Client, base_url: &str) -> Result<Vec<ScholarRow>> {
    let url = format!("{}/rest/v1/beca?{}", base_url, utils::scholar_query());
    info!("Fetching approved scholarships from roster database");

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to send request to roster database")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(
            "Roster database returned error status {}: {}",
            status, error_text
        );
        bail!("Roster database returned status {status}: {error_text}");
    }

    let text = response
        .text()
        .await
        .context("Failed to read roster response body")?;

    match serde_json::from_str::<Vec<ScholarRow>>(&text) {
        Ok(rows) => {
            info!("Fetched {} approved scholarship row(s)", rows.len());
            Ok(rows)
        }
        Err(e) => {
            error!("Failed to parse roster response: {}", e);
            error!("Raw response: {}", text);
            Err(e).context("Failed to parse roster response")
        }
    }
}

/// Returns the first rows of the scholarship table verbatim, for debugging.
pub async fn retrieve_table_info(client: &Client, base_url: &str) -> Result<String> {
    let url = format!("{base_url}/rest/v1/beca?select=*&limit=5");
    info!("Retrieving roster table sample from: {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to send request to roster database")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(
            "Roster database returned error status {}: {}",
            status, error_text
        );
        bail!("Roster database returned status {status}: {error_text}");
    }

    let text = response
        .text()
        .await
        .context("Failed to read roster response body")?;
    info!(
        "Retrieved roster table sample, response length: {} chars",
        text.len()
    );
    Ok(text)
}

pub mod utils {
    /// Select-and-filter query string for the approved-scholarship join,
    /// ordered by control number so batch output is stable.
    pub fn scholar_query() -> String {
        [
            "select=beca_id,tipo_beca,estatus,estudiante(numero_control,nombre,apellido)",
            "estatus=eq.Aprobada",
            "order=numero_control",
        ]
        .join("&")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn scholar_query_filters_on_approved_status() {
            let query = scholar_query();
            assert!(query.contains("estatus=eq.Aprobada"));
            assert!(query.contains("estudiante(numero_control,nombre,apellido)"));
            assert!(query.contains("order=numero_control"));
        }
    }
}
