// src/dashboard/map.rs
//
// Builds the GeoJSON payload the client-side map draws: one polygon feature
// per filtered project row with boundary data, the coverage-point markers,
// and a highlight overlay for the focused municipality. Rows without a
// boundary match stay out of the payload but are counted so an all-miss join
// is distinguishable from an empty filter result.

use serde_json::json;

use crate::dashboard::filter::FilteredSet;
use crate::dashboard::selection::Seleccion;
use crate::dataset::{Dataset, MapCenter, MunicipioGeom};

pub const MENSAJE_SIN_DATOS: &str = "No hay municipios que coincidan con los filtros aplicados";
pub const MENSAJE_SIN_GEOMETRIA: &str =
    "No se encontraron coincidencias geográficas para los municipios filtrados";

const COLOR_RESALTADO: &str = "#8B0000";
const COLOR_UBICACIONES: &str = "#90EE90";

// Pastel qualitative ramp, one color per project type.
const PALETA: [&str; 11] = [
    "#66C5CC", "#F6CF71", "#F89C74", "#DCB0F2", "#87C55F", "#9EB9F3", "#FE88B1", "#C9DB74",
    "#8BE0A4", "#B497E7", "#B3B3B3",
];

#[derive(Debug, Clone)]
pub struct VistaMapa {
    pub centro: MapCenter,
    /// FeatureCollection consumed by the Leaflet bootstrap.
    pub geojson: serde_json::Value,
    /// No-data annotation; `None` when there is something to draw.
    pub mensaje: Option<String>,
    /// Filtered rows that found no boundary match.
    pub sin_geometria: usize,
}

pub fn construir(
    dataset: &Dataset,
    filtrado: &FilteredSet<'_>,
    seleccion: &Seleccion,
    centro: MapCenter,
) -> VistaMapa {
    if filtrado.is_empty() {
        return VistaMapa {
            centro,
            geojson: coleccion(Vec::new()),
            mensaje: Some(MENSAJE_SIN_DATOS.to_string()),
            sin_geometria: 0,
        };
    }

    let mut con_geometria: Vec<(&crate::dataset::Proyecto, &MunicipioGeom)> = Vec::new();
    let mut sin_geometria = 0usize;
    for &p in &filtrado.rows {
        match dataset.geometria(&p.municipio, &p.departamento) {
            Some(g) => con_geometria.push((p, g)),
            None => sin_geometria += 1,
        }
    }

    if con_geometria.is_empty() {
        return VistaMapa {
            centro,
            geojson: coleccion(Vec::new()),
            mensaje: Some(format!(
                "{MENSAJE_SIN_GEOMETRIA} ({sin_geometria} proyectos sin geometría)"
            )),
            sin_geometria,
        };
    }

    let mut features = Vec::new();
    for &(p, g) in &con_geometria {
        let color = color_tipo(dataset, &p.tipo_proyecto);
        features.push(json!({
            "type": "Feature",
            "geometry": geometria_geojson(g),
            "properties": {
                "municipio": p.municipio,
                "departamento": p.departamento,
                "tipo": p.tipo_proyecto,
                "id": p.id,
                "centro": [g.centroide.0, g.centroide.1],
                "style": estilo_relleno(color, 0.8),
            }
        }));
    }

    // Coverage points are drawn regardless of the filter, like the deployed
    // dashboard does.
    for u in &dataset.ubicaciones {
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [u.lon, u.lat] },
            "properties": {
                "municipio": u.municipio,
                "departamento": u.departamento,
                "marcador": true,
                "color": COLOR_UBICACIONES,
            }
        }));
    }

    if let Some(m) = seleccion.municipio() {
        if let Some(&(_, g)) = con_geometria.iter().find(|(p, _)| p.municipio == m) {
            features.push(json!({
                "type": "Feature",
                "geometry": geometria_geojson(g),
                "properties": {
                    "municipio": g.municipio,
                    "resaltado": true,
                    "style": estilo_relleno(COLOR_RESALTADO, 0.9),
                }
            }));
        }
    }

    VistaMapa {
        centro,
        geojson: coleccion(features),
        mensaje: None,
        sin_geometria,
    }
}

fn color_tipo(dataset: &Dataset, tipo: &str) -> &'static str {
    let idx = dataset
        .tipos
        .iter()
        .position(|t| t == tipo)
        .unwrap_or(PALETA.len() - 1);
    PALETA[idx % PALETA.len()]
}

fn coleccion(features: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "type": "FeatureCollection", "features": features })
}

// Leaflet path options, applied verbatim by the bootstrap script.
fn estilo_relleno(color: &str, opacity: f64) -> serde_json::Value {
    json!({
        "fill": true,
        "fillColor": color, "fillOpacity": opacity,
        "color": color, "opacity": 1.0, "weight": 1,
    })
}

fn geometria_geojson(g: &MunicipioGeom) -> serde_json::Value {
    let coords: Vec<Vec<Vec<[f64; 2]>>> = g
        .shape
        .0
        .iter()
        .map(|poly| vec![poly.exterior().coords().map(|c| [c.x, c.y]).collect()])
        .collect();
    json!({ "type": "MultiPolygon", "coordinates": coords })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::{aplicar, Criterios};
    use crate::dataset::CENTRO_PAIS;
    use crate::tests::utils::{dataset_bogota, dataset_sin_geometria};

    fn features(v: &VistaMapa) -> &Vec<serde_json::Value> {
        v.geojson["features"].as_array().unwrap()
    }

    #[test]
    fn empty_filter_result_yields_the_no_data_message() {
        let ds = dataset_bogota();
        let mut c = Criterios::sin_restriccion(&ds);
        c.tipos = vec!["Minería".into()];
        let f = aplicar(&c, &ds);

        let v = construir(&ds, &f, &Seleccion::Ninguna, CENTRO_PAIS);
        assert_eq!(v.mensaje.as_deref(), Some(MENSAJE_SIN_DATOS));
        assert!(features(&v).is_empty());
        assert_eq!(v.sin_geometria, 0);
    }

    #[test]
    fn all_miss_join_is_reported_distinctly() {
        let ds = dataset_sin_geometria();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        assert!(!f.is_empty());

        let v = construir(&ds, &f, &Seleccion::Ninguna, CENTRO_PAIS);
        let mensaje = v.mensaje.unwrap();
        assert!(mensaje.starts_with(MENSAJE_SIN_GEOMETRIA));
        assert_eq!(v.sin_geometria, f.rows.len());
    }

    #[test]
    fn features_cover_rows_markers_and_highlight() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let sin_sel = construir(&ds, &f, &Seleccion::Ninguna, CENTRO_PAIS);
        assert_eq!(sin_sel.mensaje, None);
        let base = features(&sin_sel).len();
        assert_eq!(base, f.rows.len() + ds.ubicaciones.len());

        let con_sel = construir(
            &ds,
            &f,
            &Seleccion::Municipio("BOGOTÁ".into()),
            CENTRO_PAIS,
        );
        assert_eq!(features(&con_sel).len(), base + 1);
        let ultimo = features(&con_sel).last().unwrap();
        assert_eq!(ultimo["properties"]["resaltado"], true);
    }

    #[test]
    fn rows_of_the_same_type_share_a_color() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        let v = construir(&ds, &f, &Seleccion::Ninguna, CENTRO_PAIS);

        let colores: Vec<&str> = features(&v)
            .iter()
            .filter(|f| f["properties"]["tipo"].is_string())
            .filter(|f| f["properties"]["tipo"] == "Reforestación")
            .map(|f| f["properties"]["style"]["fillColor"].as_str().unwrap())
            .collect();
        assert!(!colores.is_empty());
        assert!(colores.windows(2).all(|w| w[0] == w[1]));
    }
}
