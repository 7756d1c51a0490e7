// Shared fixtures: a small in-memory dataset with the shape of the real one.

use chrono::NaiveDate;
use geo::{algorithm::centroid::Centroid, BoundingRect, MultiPolygon, Polygon};

use crate::dataset::geometry::{MunicipioGeom, UbicacionAip};
use crate::dataset::records::Proyecto;
use crate::dataset::Dataset;

/// A valid project row. `costo_millones` is in millions of COP, matching how
/// the cost filter is expressed.
pub fn proyecto(
    id: &str,
    municipio: &str,
    departamento: &str,
    tipo: &str,
    ano: i32,
    costo_millones: f64,
) -> Proyecto {
    let comunidad = if departamento == "CUNDINAMARCA" {
        "Campesina"
    } else {
        "Indígena"
    };
    Proyecto {
        id: id.into(),
        municipio: municipio.into(),
        departamento: departamento.into(),
        tipo_proyecto: tipo.into(),
        comunidad: comunidad.into(),
        fecha_inicio: NaiveDate::from_ymd_opt(ano, 3, 1).unwrap(),
        fecha_fin: NaiveDate::from_ymd_opt(ano + 1, 3, 1).unwrap(),
        costo_total: costo_millones * 1_000_000.0,
        beneficiarios_directos: 120,
        beneficiarios_indirectos: 380,
        beneficiarios_totales: 500,
        area_intervenida: 42.5,
        entidad_financiadora: "Minambiente".into(),
        duracion_meses: 12.0,
        producto_principal: "Bosque restaurado".into(),
    }
}

/// Square municipality boundary with `lado` degrees of side starting at the
/// given southwest corner.
pub fn geom_cuadrado(municipio: &str, departamento: &str, x0: f64, y0: f64, lado: f64) -> MunicipioGeom {
    let shape = MultiPolygon(vec![Polygon::new(
        vec![
            (x0, y0),
            (x0 + lado, y0),
            (x0 + lado, y0 + lado),
            (x0, y0 + lado),
            (x0, y0),
        ]
        .into(),
        vec![],
    )]);
    let bbox = shape.bounding_rect().unwrap();
    let centroide = shape.centroid().map(|p| (p.x(), p.y())).unwrap();
    MunicipioGeom {
        municipio: municipio.into(),
        departamento: departamento.into(),
        shape,
        centroide,
        bbox,
    }
}

/// Three Bogotá projects at 100/200/300M COP plus one in Leticia, with
/// boundaries for both municipalities and one coverage point.
pub fn dataset_bogota() -> Dataset {
    Dataset::assemble(
        vec![
            proyecto("1", "BOGOTÁ", "CUNDINAMARCA", "Reforestación", 2019, 100.0),
            proyecto("2", "BOGOTÁ", "CUNDINAMARCA", "Apicultura", 2020, 200.0),
            proyecto("3", "BOGOTÁ", "CUNDINAMARCA", "Reforestación", 2021, 300.0),
            proyecto("4", "LETICIA", "AMAZONAS", "Apicultura", 2022, 350.0),
        ],
        vec![
            geom_cuadrado("BOGOTÁ", "CUNDINAMARCA", -74.3, 4.4, 0.3),
            geom_cuadrado("LETICIA", "AMAZONAS", -70.1, -4.3, 0.3),
        ],
        vec![UbicacionAip {
            municipio: "BOGOTÁ".into(),
            departamento: "CUNDINAMARCA".into(),
            lon: -74.15,
            lat: 4.55,
        }],
    )
}

/// Rows that match no boundary at all; distinguishes "no rows" from "rows
/// without geometry".
pub fn dataset_sin_geometria() -> Dataset {
    Dataset::assemble(
        vec![
            proyecto("1", "MITÚ", "VAUPÉS", "Reforestación", 2020, 120.0),
            proyecto("2", "MITÚ", "VAUPÉS", "Apicultura", 2021, 90.0),
        ],
        vec![],
        vec![],
    )
}
