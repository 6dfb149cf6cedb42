use serde::{Deserialize, Serialize};

/// One approved-scholarship row joined to its student, as returned by the
/// roster database's REST interface. Field names follow the table columns.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScholarRow {
    pub beca_id: i64,
    pub tipo_beca: String,
    pub estatus: String,
    pub estudiante: StudentRef,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StudentRef {
    pub numero_control: i64,
    pub nombre: String,
    pub apellido: String,
}

impl StudentRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_embedded_student_row() {
        let raw = r#"[{
            "beca_id": 7,
            "tipo_beca": "Alimenticia",
            "estatus": "Aprobada",
            "estudiante": {
                "numero_control": 21290456,
                "nombre": "María",
                "apellido": "Pérez"
            }
        }]"#;

        let rows: Vec<ScholarRow> = serde_json::from_str(raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].estudiante.full_name(), "María Pérez");
    }
}
