// src/dataset/geometry.rs
//
// Boundary files for the map: municipality polygons (MpNombre/Depto) and the
// foundation's coverage points (Municipio/Departamen). Both are GeoJSON; when
// a file declares the MAGNA-SIRGAS Bogotá planar CRS (EPSG:3116) its
// coordinates are converted to WGS84 on load so everything downstream works
// in lon/lat degrees.

use geo::{algorithm::centroid::Centroid, BoundingRect, MultiPolygon, Polygon, Rect};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use crate::dataset::records::normalize_key;
use crate::errors::ServerError;

/// Municipality boundary with the precomputed values the map needs.
#[derive(Debug, Clone)]
pub struct MunicipioGeom {
    pub municipio: String,
    pub departamento: String,
    pub shape: MultiPolygon<f64>,
    /// (lon, lat)
    pub centroide: (f64, f64),
    pub bbox: Rect<f64>,
}

/// One coverage-point marker.
#[derive(Debug, Clone)]
pub struct UbicacionAip {
    pub municipio: String,
    pub departamento: String,
    pub lon: f64,
    pub lat: f64,
}

/// Map viewport.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

/// Country-level default view (Colombia).
pub const CENTRO_PAIS: MapCenter = MapCenter {
    lat: 4.6,
    lon: -74.1,
    zoom: 4.5,
};

const BBOX_PADDING_DEG: f64 = 0.1;

/// Viewport that frames one municipality: padded bounding box, zoom from the
/// box extent. The zoom floor dominates for any real-world extent; kept to
/// match the deployed dashboard.
pub fn encuadre_municipio(geom: &MunicipioGeom) -> MapCenter {
    let minx = geom.bbox.min().x - BBOX_PADDING_DEG;
    let miny = geom.bbox.min().y - BBOX_PADDING_DEG;
    let maxx = geom.bbox.max().x + BBOX_PADDING_DEG;
    let maxy = geom.bbox.max().y + BBOX_PADDING_DEG;

    let width = maxx - minx;
    let height = maxy - miny;
    let zoom = 8.0 - width.max(height) * 5.0;

    MapCenter {
        lat: (miny + maxy) / 2.0,
        lon: (minx + maxx) / 2.0,
        zoom: zoom.max(10.0),
    }
}

pub fn load_municipios(path: &str) -> Result<Vec<MunicipioGeom>, ServerError> {
    let fc = read_feature_collection(path)?;
    let planar = declares_epsg_3116(&fc);

    let mut out = Vec::new();
    for feat in &fc.features {
        let Some(nombre) = property(feat, "MpNombre") else {
            continue;
        };
        let Some(depto) = property(feat, "Depto") else {
            continue;
        };
        let Some(geom) = feat.geometry.as_ref() else {
            continue;
        };
        let Some(mut shape) = multipolygon_from_geometry(geom) else {
            continue;
        };
        if planar {
            shape = reproject_multipolygon(&shape);
        }
        let Some(bbox) = shape.bounding_rect() else {
            continue;
        };
        let centroide = shape
            .centroid()
            .map(|p| (p.x(), p.y()))
            .unwrap_or((bbox.center().x, bbox.center().y));

        out.push(MunicipioGeom {
            municipio: normalize_key(&nombre),
            departamento: normalize_key(&depto),
            shape,
            centroide,
            bbox,
        });
    }
    Ok(out)
}

pub fn load_ubicaciones(path: &str) -> Result<Vec<UbicacionAip>, ServerError> {
    let fc = read_feature_collection(path)?;
    let planar = declares_epsg_3116(&fc);

    let mut out = Vec::new();
    for feat in &fc.features {
        let Some(municipio) = property(feat, "Municipio") else {
            continue;
        };
        let Some(departamento) = property(feat, "Departamen") else {
            continue;
        };
        let Some(Geometry {
            value: Value::Point(coords),
            ..
        }) = feat.geometry.as_ref()
        else {
            continue;
        };
        let (mut lon, mut lat) = (coords[0], coords[1]);
        if planar {
            let (la, lo) = gauss_bogota_to_wgs84(lon, lat);
            lat = la;
            lon = lo;
        }
        out.push(UbicacionAip {
            municipio: normalize_key(&municipio),
            departamento: normalize_key(&departamento),
            lon,
            lat,
        });
    }
    Ok(out)
}

fn read_feature_collection(path: &str) -> Result<FeatureCollection, ServerError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ServerError::DataError(format!("Failed to read {path}: {e}")))?;
    parse_feature_collection(&text)
        .map_err(|e| ServerError::DataError(format!("Failed to parse {path}: {e}")))
}

pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, String> {
    let gj: GeoJson = text.parse().map_err(|e| format!("{e}"))?;
    match gj {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err("GeoJSON must be a FeatureCollection".into()),
    }
}

fn property(feat: &Feature, key: &str) -> Option<String> {
    feat.properties
        .as_ref()?
        .get(key)?
        .as_str()
        .map(|s| s.to_string())
}

/// Old exports carry a legacy `crs` member naming the planar source CRS.
fn declares_epsg_3116(fc: &FeatureCollection) -> bool {
    fc.foreign_members
        .as_ref()
        .and_then(|m| m.get("crs"))
        .map(|crs| crs.to_string().contains("3116"))
        .unwrap_or(false)
}

fn multipolygon_from_geometry(g: &Geometry) -> Option<MultiPolygon<f64>> {
    match &g.value {
        Value::Polygon(coords) => Some(MultiPolygon(vec![polygon_from_rings(coords)?])),
        Value::MultiPolygon(multi) => {
            let polys: Vec<Polygon<f64>> = multi
                .iter()
                .filter_map(|rings| polygon_from_rings(rings))
                .collect();
            if polys.is_empty() {
                None
            } else {
                Some(MultiPolygon(polys))
            }
        }
        _ => None,
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let exterior: Vec<(f64, f64)> = rings.first()?.iter().map(|c| (c[0], c[1])).collect();
    if exterior.len() < 3 {
        return None;
    }
    Some(Polygon::new(exterior.into(), vec![]))
}

fn reproject_multipolygon(shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let polys = shape
        .0
        .iter()
        .map(|poly| {
            let exterior: Vec<(f64, f64)> = poly
                .exterior()
                .coords()
                .map(|c| {
                    let (lat, lon) = gauss_bogota_to_wgs84(c.x, c.y);
                    (lon, lat)
                })
                .collect();
            Polygon::new(exterior.into(), vec![])
        })
        .collect();
    MultiPolygon(polys)
}

// MAGNA-SIRGAS / Colombia Bogotá zone (EPSG:3116), GRS80 ellipsoid.
const A: f64 = 6378137.0;
const E: f64 = 0.08181919104281579;
const K0: f64 = 1.0;
const LAT0_DEG: f64 = 4.596200416666666;
const LON0_DEG: f64 = -74.07750791666666;
const FALSE_EASTING: f64 = 1_000_000.0;
const FALSE_NORTHING: f64 = 1_000_000.0;

/// Meridian arc length from the equator to `lat` (radians).
fn meridian_arc(lat: f64) -> f64 {
    let e2 = E * E;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    A * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Inverse Gauss-Krüger for the Bogotá zone: planar (este, norte) in meters
/// to (lat, lon) in degrees.
pub fn gauss_bogota_to_wgs84(este: f64, norte: f64) -> (f64, f64) {
    let e2 = E * E;
    let x = este - FALSE_EASTING;
    let m0 = meridian_arc(LAT0_DEG.to_radians());
    let m = m0 + (norte - FALSE_NORTHING) / K0;
    let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
    let j1 = 3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0;
    let j2 = 21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0;
    let j3 = 151.0 * e1.powi(3) / 96.0;
    let j4 = 1097.0 * e1.powi(4) / 512.0;
    let fp = mu
        + j1 * (2.0 * mu).sin()
        + j2 * (4.0 * mu).sin()
        + j3 * (6.0 * mu).sin()
        + j4 * (8.0 * mu).sin();

    let ep2 = e2 / (1.0 - e2);
    let c1 = ep2 * fp.cos().powi(2);
    let t1 = fp.tan().powi(2);
    let r1 = A * (1.0 - e2) / (1.0 - (E * fp.sin()).powi(2)).powf(1.5);
    let n1 = A / (1.0 - (E * fp.sin()).powi(2)).sqrt();
    let d = x / (n1 * K0);

    let lat = fp
        - (n1 * fp.tan() / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
            / 120.0)
        / fp.cos();

    (lat.to_degrees(), LON0_DEG + lon.to_degrees())
}
