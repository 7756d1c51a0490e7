// src/dataset/records.rs

use chrono::NaiveDate;
use serde::Deserialize;

/// One row of proyectos.csv exactly as it appears in the spreadsheet export.
/// Column headers are the Spanish originals; this struct only exists to get
/// the row off disk before validation.
#[derive(Debug, Deserialize)]
pub struct RawProyecto {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Municipio")]
    pub municipio: String,
    #[serde(rename = "Departamento")]
    pub departamento: String,
    #[serde(rename = "Tipo de proyecto")]
    pub tipo_proyecto: String,
    #[serde(rename = "Comunidad beneficiaria")]
    pub comunidad: String,
    #[serde(rename = "Fecha inicio")]
    pub fecha_inicio: String,
    #[serde(rename = "Fecha fin")]
    pub fecha_fin: String,
    #[serde(rename = "Costo total ($COP)")]
    pub costo_total: f64,
    #[serde(rename = "Beneficiarios directos")]
    pub beneficiarios_directos: i64,
    #[serde(rename = "Beneficiarios indirectos")]
    pub beneficiarios_indirectos: i64,
    #[serde(rename = "Área intervenida (ha)")]
    pub area_intervenida: f64,
    #[serde(rename = "Entidad financiadora")]
    pub entidad_financiadora: String,
    #[serde(rename = "Duración del proyecto (meses)")]
    pub duracion_meses: f64,
    #[serde(rename = "Producto principal generado")]
    pub producto_principal: String,
}

/// A validated, immutable project record. Municipality and department names
/// are stored normalized so they join against the boundary files without a
/// second normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Proyecto {
    pub id: String,
    pub municipio: String,
    pub departamento: String,
    pub tipo_proyecto: String,
    pub comunidad: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub costo_total: f64,
    pub beneficiarios_directos: i64,
    pub beneficiarios_indirectos: i64,
    pub beneficiarios_totales: i64,
    pub area_intervenida: f64,
    pub entidad_financiadora: String,
    pub duracion_meses: f64,
    pub producto_principal: String,
}

impl Proyecto {
    /// Builds a clean `Proyecto` from the raw CSV row, validating the fields
    /// the pipeline depends on. The whole table must load; a bad row is an
    /// error, not a skip.
    pub fn from_raw(raw: RawProyecto) -> Result<Self, String> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err("Missing or empty ID".into());
        }

        let municipio = normalize_key(&raw.municipio);
        if municipio.is_empty() {
            return Err("Missing or empty Municipio".into());
        }

        let departamento = normalize_key(&raw.departamento);
        if departamento.is_empty() {
            return Err("Missing or empty Departamento".into());
        }

        let fecha_inicio = parse_fecha(&raw.fecha_inicio)
            .ok_or_else(|| format!("Unparseable Fecha inicio '{}'", raw.fecha_inicio))?;
        let fecha_fin = parse_fecha(&raw.fecha_fin)
            .ok_or_else(|| format!("Unparseable Fecha fin '{}'", raw.fecha_fin))?;

        if !raw.costo_total.is_finite() || raw.costo_total < 0.0 {
            return Err(format!("Invalid Costo total {}", raw.costo_total));
        }

        Ok(Proyecto {
            id,
            municipio,
            departamento,
            tipo_proyecto: raw.tipo_proyecto.trim().to_string(),
            comunidad: raw.comunidad.trim().to_string(),
            fecha_inicio,
            fecha_fin,
            costo_total: raw.costo_total,
            beneficiarios_directos: raw.beneficiarios_directos,
            beneficiarios_indirectos: raw.beneficiarios_indirectos,
            beneficiarios_totales: raw.beneficiarios_directos + raw.beneficiarios_indirectos,
            area_intervenida: raw.area_intervenida,
            entidad_financiadora: raw.entidad_financiadora.trim().to_string(),
            duracion_meses: raw.duracion_meses,
            producto_principal: raw.producto_principal.trim().to_string(),
        })
    }

    pub fn ano_inicio(&self) -> i32 {
        use chrono::Datelike;
        self.fecha_inicio.year()
    }
}

/// Uppercase/trim normalization applied to municipality and department names
/// on BOTH the project table and the geometry tables. The join silently drops
/// rows if the two sides disagree, so there is exactly one implementation.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_uppercase()
}

/// The spreadsheet export is not consistent about date formats; accept ISO
/// and the day-first form the source workbook uses.
fn parse_fecha(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawProyecto {
        RawProyecto {
            id: "P-001".into(),
            municipio: "  Bogotá ".into(),
            departamento: "cundinamarca".into(),
            tipo_proyecto: "Reforestación".into(),
            comunidad: "Campesina".into(),
            fecha_inicio: "2021-03-15".into(),
            fecha_fin: "2022-03-15".into(),
            costo_total: 200_000_000.0,
            beneficiarios_directos: 120,
            beneficiarios_indirectos: 380,
            area_intervenida: 42.5,
            entidad_financiadora: "Minambiente".into(),
            duracion_meses: 12.0,
            producto_principal: "Bosque restaurado".into(),
        }
    }

    #[test]
    fn from_raw_normalizes_and_derives() {
        let p = Proyecto::from_raw(raw()).unwrap();
        assert_eq!(p.municipio, "BOGOTÁ");
        assert_eq!(p.departamento, "CUNDINAMARCA");
        assert_eq!(p.beneficiarios_totales, 500);
        assert_eq!(p.ano_inicio(), 2021);
    }

    #[test]
    fn from_raw_accepts_day_first_dates() {
        let mut r = raw();
        r.fecha_inicio = "15/03/2021".into();
        let p = Proyecto::from_raw(r).unwrap();
        assert_eq!(p.fecha_inicio, NaiveDate::from_ymd_opt(2021, 3, 15).unwrap());
    }

    #[test]
    fn from_raw_rejects_bad_rows() {
        let mut r = raw();
        r.fecha_inicio = "pronto".into();
        assert!(Proyecto::from_raw(r).is_err());

        let mut r = raw();
        r.id = "   ".into();
        assert!(Proyecto::from_raw(r).is_err());

        let mut r = raw();
        r.costo_total = f64::NAN;
        assert!(Proyecto::from_raw(r).is_err());
    }

    #[test]
    fn normalize_key_is_shared_by_both_tables() {
        assert_eq!(normalize_key("  leticia "), "LETICIA");
        assert_eq!(normalize_key("Leticia"), normalize_key("LETICIA "));
    }
}
