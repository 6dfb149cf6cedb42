use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_FIRMANTE: &str = "C. JAIRO GIOVANNI ÁLVAREZ JUÁREZ";
pub const DEFAULT_CARGO: &str = "Presidente del C.E.S.A. ITCG";

/// Incoming oficio payload. The full oficio number is assigned by the
/// caller's numbering system and arrives already formatted; `fecha` defaults
/// to today and the signer block to the standing committee officers.
#[derive(Deserialize, Debug)]
pub struct OficioRequest {
    pub numero: Option<String>,
    pub asunto: Option<String>,
    pub destinatario: Option<String>,
    pub cuerpo: Option<String>,
    pub fecha: Option<String>,
    pub firmante: Option<String>,
    pub cargo: Option<String>,
}

/// A validated letter ready for rendering.
#[derive(Debug, Clone)]
pub struct OficioLetter {
    pub numero: String,
    pub asunto: String,
    pub destinatario: String,
    pub cuerpo: String,
    pub fecha: NaiveDate,
    pub firmante: String,
    pub cargo: String,
}
