// src/dashboard/filter.rs

use crate::dataset::{Dataset, Proyecto};

/// User-selected filter criteria. Empty selection lists mean "no
/// restriction"; both ranges are inclusive. Costs travel in millions of COP,
/// matching the slider, and are compared against the raw COP column.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterios {
    pub tipos: Vec<String>,
    pub departamentos: Vec<String>,
    pub comunidades: Vec<String>,
    pub anos: (i32, i32),
    pub costos_millones: (f64, f64),
}

impl Criterios {
    /// Criteria that let every row through: full ranges, no selections.
    pub fn sin_restriccion(dataset: &Dataset) -> Self {
        Criterios {
            tipos: Vec::new(),
            departamentos: Vec::new(),
            comunidades: Vec::new(),
            anos: dataset.anos,
            costos_millones: (0.0, dataset.costo_max_millones),
        }
    }
}

/// Aggregates over the filtered rows. All zeros when nothing matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub total_proyectos: usize,
    pub inversion_cop: f64,
    pub beneficiarios: i64,
    pub area_ha: f64,
}

/// The subset of the dataset matching the current criteria, in source order,
/// plus its aggregates. Rebuilt from scratch on every interaction.
#[derive(Debug)]
pub struct FilteredSet<'a> {
    pub rows: Vec<&'a Proyecto>,
    pub kpis: Kpis,
}

pub fn aplicar<'a>(criterios: &Criterios, dataset: &'a Dataset) -> FilteredSet<'a> {
    let (ano_min, ano_max) = criterios.anos;
    let costo_min = criterios.costos_millones.0 * 1_000_000.0;
    let costo_max = criterios.costos_millones.1 * 1_000_000.0;

    let rows: Vec<&Proyecto> = dataset
        .proyectos
        .iter()
        .filter(|p| {
            let ano = p.ano_inicio();
            ano >= ano_min
                && ano <= ano_max
                && p.costo_total >= costo_min
                && p.costo_total <= costo_max
                && (criterios.tipos.is_empty() || criterios.tipos.contains(&p.tipo_proyecto))
                && (criterios.departamentos.is_empty()
                    || criterios.departamentos.contains(&p.departamento))
                && (criterios.comunidades.is_empty()
                    || criterios.comunidades.contains(&p.comunidad))
        })
        .collect();

    let kpis = Kpis {
        total_proyectos: rows.len(),
        inversion_cop: rows.iter().map(|p| p.costo_total).sum(),
        beneficiarios: rows.iter().map(|p| p.beneficiarios_totales).sum(),
        area_ha: rows.iter().map(|p| p.area_intervenida).sum(),
    };

    FilteredSet { rows, kpis }
}

impl<'a> FilteredSet<'a> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct municipality names, alphabetical, for the card list.
    pub fn municipios(&self) -> Vec<&'a str> {
        let mut out: Vec<&str> = self
            .rows
            .iter()
            .copied()
            .map(|p| p.municipio.as_str())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    pub fn contiene_municipio(&self, municipio: &str) -> bool {
        self.rows.iter().any(|p| p.municipio == municipio)
    }

    /// Rows of one municipality, preserving source order.
    pub fn proyectos_de(&self, municipio: &str) -> Vec<&'a Proyecto> {
        self.rows
            .iter()
            .copied()
            .filter(|p| p.municipio == municipio)
            .collect()
    }

    /// Default focus for a municipality: its first row in source order.
    pub fn primer_proyecto_de(&self, municipio: &str) -> Option<&'a Proyecto> {
        self.rows.iter().copied().find(|p| p.municipio == municipio)
    }

    pub fn proyecto(&self, id: &str) -> Option<&'a Proyecto> {
        self.rows.iter().copied().find(|p| p.id == id)
    }
}
