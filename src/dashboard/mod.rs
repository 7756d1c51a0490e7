// src/dashboard/mod.rs
//
// The recomputation pipeline: criteria -> filtered set -> reconciled
// selection -> projected views. One synchronous pass per user interaction.

pub mod filter;
pub mod format;
pub mod map;
pub mod photos;
pub mod selection;
pub mod views;

pub use filter::{Criterios, FilteredSet, Kpis};
pub use selection::{Evento, Seleccion};
pub use views::VistaDashboard;

use crate::dataset::Dataset;
use crate::session::EstadoSesion;

/// Runs one full pass and updates the session slot in place.
///
/// The stored selection is revalidated against the fresh filtered set before
/// the incoming event is applied, so a criteria change can never leave a
/// stale focus behind.
pub fn recalcular(
    dataset: &Dataset,
    criterios: &Criterios,
    evento: Option<Evento>,
    estado: &mut EstadoSesion,
    assets_dir: &str,
) -> VistaDashboard {
    let filtrado = filter::aplicar(criterios, dataset);

    let mut seleccion = std::mem::take(&mut estado.seleccion).revalidar(&filtrado);
    if let Some(ev) = evento {
        seleccion = seleccion.aplicar(ev, &filtrado);
    }

    let vista = views::proyectar(dataset, &filtrado, &seleccion, estado.centro_mapa, assets_dir);

    estado.seleccion = seleccion;
    estado.centro_mapa = Some(vista.mapa.centro);
    vista
}
