// src/dataset/loader.rs

use std::collections::HashMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::dataset::geometry::{load_municipios, load_ubicaciones, MunicipioGeom, UbicacionAip};
use crate::dataset::records::{Proyecto, RawProyecto};
use crate::errors::ServerError;

/// Everything the dashboard serves, loaded once at startup and immutable
/// afterwards.
#[derive(Debug)]
pub struct Dataset {
    /// Project rows in spreadsheet order. Downstream code relies on this
    /// order for the "first project of a municipality" default.
    pub proyectos: Vec<Proyecto>,
    /// Municipality boundaries keyed by the normalized (municipio,
    /// departamento) pair.
    pub municipios: HashMap<(String, String), MunicipioGeom>,
    pub ubicaciones: Vec<UbicacionAip>,

    // Filter control options, precomputed from the table.
    pub tipos: Vec<String>,
    pub departamentos: Vec<String>,
    pub comunidades: Vec<String>,
    /// Inclusive start-year bounds across the whole table.
    pub anos: (i32, i32),
    /// Upper bound of the cost slider, in millions of COP.
    pub costo_max_millones: f64,
}

impl Dataset {
    pub fn load(data_dir: &str) -> Result<Self, ServerError> {
        let dir = Path::new(data_dir);
        let proyectos = load_proyectos_csv(&dir.join("proyectos.csv"))?;

        let municipios = load_municipios(&dir.join("municipios.geojson").to_string_lossy())?;
        let ubicaciones =
            load_ubicaciones(&dir.join("ubicaciones_aip.geojson").to_string_lossy())?;

        Ok(Self::assemble(proyectos, municipios, ubicaciones))
    }

    /// Shared by `load` and the test fixtures so both go through the same
    /// derivation of options and bounds.
    pub fn assemble(
        proyectos: Vec<Proyecto>,
        municipios: Vec<MunicipioGeom>,
        ubicaciones: Vec<UbicacionAip>,
    ) -> Self {
        let mut tipos: Vec<String> = proyectos.iter().map(|p| p.tipo_proyecto.clone()).collect();
        tipos.sort();
        tipos.dedup();

        let mut departamentos: Vec<String> =
            proyectos.iter().map(|p| p.departamento.clone()).collect();
        departamentos.sort();
        departamentos.dedup();

        let mut comunidades: Vec<String> = proyectos.iter().map(|p| p.comunidad.clone()).collect();
        comunidades.sort();
        comunidades.dedup();

        let anos = proyectos
            .iter()
            .map(|p| p.ano_inicio())
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
            .unwrap_or((2000, 2100));

        let costo_max_millones = proyectos
            .iter()
            .map(|p| p.costo_total / 1_000_000.0)
            .fold(0.0_f64, f64::max)
            .ceil();

        let municipios = municipios
            .into_iter()
            .map(|g| ((g.municipio.clone(), g.departamento.clone()), g))
            .collect();

        Dataset {
            proyectos,
            municipios,
            ubicaciones,
            tipos,
            departamentos,
            comunidades,
            anos,
            costo_max_millones,
        }
    }

    /// Boundary lookup on the normalized join key. A miss is not an error;
    /// the row stays in the aggregates and just never reaches the map.
    pub fn geometria(&self, municipio: &str, departamento: &str) -> Option<&MunicipioGeom> {
        self.municipios
            .get(&(municipio.to_string(), departamento.to_string()))
    }
}

fn load_proyectos_csv(path: &Path) -> Result<Vec<Proyecto>, ServerError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ServerError::DataError(format!("Failed to open {}: {e}", path.display())))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<RawProyecto>().enumerate() {
        let row = i + 2; // 1-based, after the header line
        let raw = result
            .map_err(|e| ServerError::DataError(format!("proyectos.csv row {row}: {e}")))?;
        let proyecto = Proyecto::from_raw(raw)
            .map_err(|e| ServerError::DataError(format!("proyectos.csv row {row}: {e}")))?;
        out.push(proyecto);
    }

    if out.is_empty() {
        return Err(ServerError::DataError(
            "proyectos.csv contains no data rows".into(),
        ));
    }
    Ok(out)
}
