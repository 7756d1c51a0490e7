// src/dashboard/selection.rs
//
// Focus shared by the map, the card list, the detail panel and the photo
// viewer. Transitions are total: an event that cannot be honored leaves a
// valid state behind (usually the previous one) instead of failing.

use crate::dashboard::filter::FilteredSet;
use crate::dataset::Proyecto;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Seleccion {
    #[default]
    Ninguna,
    /// A municipality is focused; its first filtered row is the implicit
    /// default project.
    Municipio(String),
    /// A specific project was chosen from the picker.
    Proyecto { municipio: String, id: String },
}

/// One user interaction, as resolved by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evento {
    /// Card click.
    SeleccionarMunicipio(String),
    /// Map click; `None` when the clicked feature carries no municipality
    /// attribute.
    ClickMapa(Option<String>),
    /// Picker choice.
    ElegirProyecto(String),
    /// Explicit deselect.
    Reiniciar,
}

impl Seleccion {
    pub fn municipio(&self) -> Option<&str> {
        match self {
            Seleccion::Ninguna => None,
            Seleccion::Municipio(m) => Some(m),
            Seleccion::Proyecto { municipio, .. } => Some(municipio),
        }
    }

    /// The focused project under the tie-break rule: an explicit choice if
    /// one is set, otherwise the municipality's first filtered row.
    pub fn proyecto_enfocado<'a>(&self, filtrado: &FilteredSet<'a>) -> Option<&'a Proyecto> {
        match self {
            Seleccion::Ninguna => None,
            Seleccion::Municipio(m) => filtrado.primer_proyecto_de(m),
            Seleccion::Proyecto { id, .. } => filtrado.proyecto(id),
        }
    }

    pub fn aplicar(self, evento: Evento, filtrado: &FilteredSet<'_>) -> Seleccion {
        match evento {
            Evento::SeleccionarMunicipio(nombre) => {
                if filtrado.contiene_municipio(&nombre) {
                    Seleccion::Municipio(nombre)
                } else {
                    Seleccion::Ninguna
                }
            }
            // A resolvable map click behaves exactly like a card click; an
            // unresolvable one is ignored.
            Evento::ClickMapa(Some(nombre)) => {
                self.aplicar(Evento::SeleccionarMunicipio(nombre), filtrado)
            }
            Evento::ClickMapa(None) => self,
            Evento::ElegirProyecto(id) => {
                // Only valid with a focused municipality owning that project.
                let municipio = self.municipio().map(str::to_string);
                match municipio {
                    Some(m) if filtrado.proyectos_de(&m).iter().any(|p| p.id == id) => {
                        Seleccion::Proyecto { municipio: m, id }
                    }
                    _ => self,
                }
            }
            Evento::Reiniciar => Seleccion::Ninguna,
        }
    }

    /// Run after every filter change. A selection whose municipality fell out
    /// of the filtered set self-heals to `Ninguna`; an explicit project that
    /// fell out (while its municipality survived) falls back to the implicit
    /// default.
    pub fn revalidar(self, filtrado: &FilteredSet<'_>) -> Seleccion {
        match self {
            Seleccion::Ninguna => Seleccion::Ninguna,
            Seleccion::Municipio(m) => {
                if filtrado.contiene_municipio(&m) {
                    Seleccion::Municipio(m)
                } else {
                    Seleccion::Ninguna
                }
            }
            Seleccion::Proyecto { municipio, id } => {
                if !filtrado.contiene_municipio(&municipio) {
                    Seleccion::Ninguna
                } else if filtrado
                    .proyectos_de(&municipio)
                    .iter()
                    .any(|p| p.id == id)
                {
                    Seleccion::Proyecto { municipio, id }
                } else {
                    Seleccion::Municipio(municipio)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::{aplicar, Criterios};
    use crate::tests::utils::dataset_bogota;

    #[test]
    fn card_click_focuses_a_present_municipality() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let s = Seleccion::Ninguna
            .aplicar(Evento::SeleccionarMunicipio("BOGOTÁ".into()), &f);
        assert_eq!(s, Seleccion::Municipio("BOGOTÁ".into()));
        // implicit default is the first filtered row of the municipality
        assert_eq!(s.proyecto_enfocado(&f).unwrap().id, "1");
    }

    #[test]
    fn card_click_on_absent_municipality_rejects_to_none() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let s = Seleccion::Municipio("BOGOTÁ".into())
            .aplicar(Evento::SeleccionarMunicipio("MITÚ".into()), &f);
        assert_eq!(s, Seleccion::Ninguna);
    }

    #[test]
    fn map_click_resolves_like_a_card_click_or_is_ignored() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let s = Seleccion::Ninguna.aplicar(Evento::ClickMapa(Some("LETICIA".into())), &f);
        assert_eq!(s, Seleccion::Municipio("LETICIA".into()));

        let previo = Seleccion::Municipio("BOGOTÁ".into());
        assert_eq!(previo.clone().aplicar(Evento::ClickMapa(None), &f), previo);
    }

    #[test]
    fn choosing_a_project_requires_focus_and_membership() {
        let ds = dataset_bogota();
        let f = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        // no focus: no-op
        let s = Seleccion::Ninguna.aplicar(Evento::ElegirProyecto("2".into()), &f);
        assert_eq!(s, Seleccion::Ninguna);

        // project of another municipality: no-op
        let s = Seleccion::Municipio("BOGOTÁ".into())
            .aplicar(Evento::ElegirProyecto("4".into()), &f);
        assert_eq!(s, Seleccion::Municipio("BOGOTÁ".into()));

        // valid choice
        let s = Seleccion::Municipio("BOGOTÁ".into())
            .aplicar(Evento::ElegirProyecto("2".into()), &f);
        assert_eq!(
            s,
            Seleccion::Proyecto {
                municipio: "BOGOTÁ".into(),
                id: "2".into()
            }
        );
        assert_eq!(s.proyecto_enfocado(&f).unwrap().id, "2");
    }

    #[test]
    fn revalidate_clears_a_filtered_out_municipality() {
        let ds = dataset_bogota();
        let mut c = Criterios::sin_restriccion(&ds);
        c.departamentos = vec!["AMAZONAS".into()];
        let f = aplicar(&c, &ds);

        let s = Seleccion::Municipio("BOGOTÁ".into()).revalidar(&f);
        assert_eq!(s, Seleccion::Ninguna);
    }

    #[test]
    fn revalidate_downgrades_a_filtered_out_project() {
        let ds = dataset_bogota();
        let mut c = Criterios::sin_restriccion(&ds);
        // keeps Bogotá's 100M row, drops the 200M (id 2) and 300M ones
        c.costos_millones = (0.0, 150.0);
        let f_estrecho = aplicar(&c, &ds);

        let s = Seleccion::Proyecto {
            municipio: "BOGOTÁ".into(),
            id: "2".into(),
        }
        .revalidar(&f_estrecho);
        assert_eq!(s, Seleccion::Municipio("BOGOTÁ".into()));
        // the implicit default refocuses the first surviving row
        assert_eq!(s.proyecto_enfocado(&f_estrecho).unwrap().id, "1");
    }

    #[test]
    fn selection_round_trips_a_filter_change_that_keeps_it() {
        let ds = dataset_bogota();
        let todo = aplicar(&Criterios::sin_restriccion(&ds), &ds);

        let s = Seleccion::Ninguna
            .aplicar(Evento::SeleccionarMunicipio("BOGOTÁ".into()), &todo)
            .aplicar(Evento::ElegirProyecto("2".into()), &todo);

        let mut c = Criterios::sin_restriccion(&ds);
        c.departamentos = vec!["CUNDINAMARCA".into()];
        let f = aplicar(&c, &ds);

        assert_eq!(
            s.revalidar(&f),
            Seleccion::Proyecto {
                municipio: "BOGOTÁ".into(),
                id: "2".into()
            }
        );
    }
}
