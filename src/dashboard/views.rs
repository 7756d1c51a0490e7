// src/dashboard/views.rs
//
// Projects (FilteredSet, Seleccion) into the exact values every panel shows.
// Nothing here is cached; the whole view is rebuilt on each pass so the
// panels can never disagree with each other.

use crate::dashboard::filter::FilteredSet;
use crate::dashboard::format::{duracion, inversion_millones, miles, miles_un_decimal};
use crate::dashboard::map::{self, VistaMapa};
use crate::dashboard::photos::{self, FotoEvidencia};
use crate::dashboard::selection::Seleccion;
use crate::dataset::geometry::encuadre_municipio;
use crate::dataset::{Dataset, MapCenter, CENTRO_PAIS};

/// Top-row aggregate cards, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableroKpis {
    pub proyectos: String,
    pub inversion: String,
    pub beneficiarios: String,
    pub area: String,
}

/// Card styling is decided here and resolved by the template layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoTarjeta {
    Normal,
    Seleccionada,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarjetaMunicipio {
    pub nombre: String,
    pub proyectos: usize,
    pub estado: EstadoTarjeta,
}

/// Detail panel values; placeholders when nothing is focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDetalle {
    pub municipio: String,
    pub beneficiarios: String,
    pub financiador: String,
    pub duracion: String,
    pub area: String,
    pub producto: String,
}

impl PanelDetalle {
    pub fn vacio() -> Self {
        PanelDetalle {
            municipio: "Seleccione un municipio".into(),
            beneficiarios: "0".into(),
            financiador: "N/A".into(),
            duracion: "0".into(),
            area: "0".into(),
            producto: "N/A".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcionProyecto {
    pub etiqueta: String,
    pub id: String,
    pub elegido: bool,
}

#[derive(Debug, Clone)]
pub struct VistaDashboard {
    pub kpis: TableroKpis,
    pub tarjetas: Vec<TarjetaMunicipio>,
    pub detalle: PanelDetalle,
    pub opciones_proyecto: Vec<OpcionProyecto>,
    pub fotos: Vec<FotoEvidencia>,
    pub mapa: VistaMapa,
    /// Municipality name shown next to the map title.
    pub municipio_titulo: Option<String>,
}

pub fn proyectar(
    dataset: &Dataset,
    filtrado: &FilteredSet<'_>,
    seleccion: &Seleccion,
    centro_previo: Option<MapCenter>,
    assets_dir: &str,
) -> VistaDashboard {
    let kpis = if filtrado.is_empty() {
        TableroKpis {
            proyectos: "0".into(),
            inversion: "$0M".into(),
            beneficiarios: "0".into(),
            area: "0 ha".into(),
        }
    } else {
        TableroKpis {
            proyectos: filtrado.kpis.total_proyectos.to_string(),
            inversion: inversion_millones(filtrado.kpis.inversion_cop),
            beneficiarios: miles(filtrado.kpis.beneficiarios),
            area: format!("{} ha", miles_un_decimal(filtrado.kpis.area_ha)),
        }
    };

    let tarjetas = filtrado
        .municipios()
        .into_iter()
        .map(|nombre| TarjetaMunicipio {
            nombre: nombre.to_string(),
            proyectos: filtrado.proyectos_de(nombre).len(),
            estado: if seleccion.municipio() == Some(nombre) {
                EstadoTarjeta::Seleccionada
            } else {
                EstadoTarjeta::Normal
            },
        })
        .collect();

    let enfocado = seleccion.proyecto_enfocado(filtrado);

    let detalle = match enfocado {
        Some(p) => PanelDetalle {
            municipio: p.municipio.clone(),
            beneficiarios: miles(p.beneficiarios_totales),
            financiador: p.entidad_financiadora.clone(),
            duracion: duracion(p.duracion_meses),
            area: miles_un_decimal(p.area_intervenida),
            producto: p.producto_principal.clone(),
        },
        None => PanelDetalle::vacio(),
    };

    let opciones_proyecto = match seleccion.municipio() {
        Some(m) => filtrado
            .proyectos_de(m)
            .iter()
            .map(|p| OpcionProyecto {
                etiqueta: format!("Proyecto {} - {}", p.id, p.tipo_proyecto),
                id: p.id.clone(),
                elegido: enfocado.map(|e| e.id == p.id).unwrap_or(false),
            })
            .collect(),
        None => Vec::new(),
    };

    let fotos = match enfocado {
        Some(p) => photos::listar(assets_dir, &p.id),
        None => Vec::new(),
    };

    // Viewport: frame the focused municipality when it has a boundary;
    // otherwise keep the session's last center, falling back to the
    // country-level default. An empty result always resets to the default.
    let centro = if filtrado.is_empty() {
        CENTRO_PAIS
    } else if let Some(m) = seleccion.municipio() {
        filtrado
            .primer_proyecto_de(m)
            .and_then(|p| dataset.geometria(&p.municipio, &p.departamento))
            .map(encuadre_municipio)
            .or(centro_previo)
            .unwrap_or(CENTRO_PAIS)
    } else {
        centro_previo.unwrap_or(CENTRO_PAIS)
    };

    let mapa = map::construir(dataset, filtrado, seleccion, centro);

    VistaDashboard {
        kpis,
        tarjetas,
        detalle,
        opciones_proyecto,
        fotos,
        mapa,
        municipio_titulo: seleccion.municipio().map(|m| m.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::{aplicar, Criterios};
    use crate::tests::utils::dataset_bogota;

    const SIN_FOTOS: &str = "/nonexistent-assets";

    #[test]
    fn kpis_format_the_aggregates() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        let v = proyectar(&ds, &f, &Seleccion::Ninguna, None, SIN_FOTOS);

        assert_eq!(v.kpis.proyectos, "4");
        // 100M + 200M + 300M + 350M
        assert_eq!(v.kpis.inversion, "$950M");
    }

    #[test]
    fn empty_result_uses_the_fixed_zero_strings() {
        let ds = dataset_bogota();
        let mut c = Criterios::sin_restriccion(&ds);
        c.tipos = vec!["Minería".into()];
        let f = aplicar(&c, &ds);
        let v = proyectar(&ds, &f, &Seleccion::Ninguna, None, SIN_FOTOS);

        assert_eq!(v.kpis.proyectos, "0");
        assert_eq!(v.kpis.inversion, "$0M");
        assert_eq!(v.kpis.beneficiarios, "0");
        assert_eq!(v.kpis.area, "0 ha");
        assert!(v.tarjetas.is_empty());
        assert_eq!(v.detalle, PanelDetalle::vacio());
        assert_eq!(v.mapa.centro, CENTRO_PAIS);
    }

    #[test]
    fn cards_are_alphabetical_and_mark_the_selection() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        let v = proyectar(
            &ds,
            &f,
            &Seleccion::Municipio("LETICIA".into()),
            None,
            SIN_FOTOS,
        );

        let nombres: Vec<&str> = v.tarjetas.iter().map(|t| t.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["BOGOTÁ", "LETICIA"]);
        assert_eq!(v.tarjetas[0].estado, EstadoTarjeta::Normal);
        assert_eq!(v.tarjetas[1].estado, EstadoTarjeta::Seleccionada);
        assert_eq!(v.tarjetas[0].proyectos, 3);
    }

    #[test]
    fn detail_panel_shows_the_focused_project() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        let v = proyectar(
            &ds,
            &f,
            &Seleccion::Proyecto {
                municipio: "BOGOTÁ".into(),
                id: "2".into(),
            },
            None,
            SIN_FOTOS,
        );

        assert_eq!(v.detalle.municipio, "BOGOTÁ");
        assert_eq!(v.detalle.beneficiarios, "500");
        assert_eq!(v.detalle.duracion, "12.0");
        assert_eq!(v.municipio_titulo.as_deref(), Some("BOGOTÁ"));
    }

    #[test]
    fn picker_labels_follow_the_project_type() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);
        let v = proyectar(
            &ds,
            &f,
            &Seleccion::Municipio("BOGOTÁ".into()),
            None,
            SIN_FOTOS,
        );

        assert_eq!(v.opciones_proyecto.len(), 3);
        assert_eq!(
            v.opciones_proyecto[0].etiqueta,
            "Proyecto 1 - Reforestación"
        );
        // implicit default marks the first row as chosen
        assert!(v.opciones_proyecto[0].elegido);
        assert!(!v.opciones_proyecto[1].elegido);
    }

    #[test]
    fn selecting_a_municipality_frames_it_and_clearing_restores_the_center() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let enfocada = proyectar(
            &ds,
            &f,
            &Seleccion::Municipio("BOGOTÁ".into()),
            Some(CENTRO_PAIS),
            SIN_FOTOS,
        );
        assert_eq!(enfocada.mapa.centro.zoom, 10.0);

        let previo = enfocada.mapa.centro;
        let suelta = proyectar(&ds, &f, &Seleccion::Ninguna, Some(previo), SIN_FOTOS);
        assert_eq!(suelta.mapa.centro, previo);

        let sin_historial = proyectar(&ds, &f, &Seleccion::Ninguna, None, SIN_FOTOS);
        assert_eq!(sin_historial.mapa.centro, CENTRO_PAIS);
    }
}
