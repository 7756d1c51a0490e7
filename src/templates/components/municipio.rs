use maud::{html, Markup};

use crate::dashboard::views::{EstadoTarjeta, TarjetaMunicipio};

/// One clickable municipality card. The selected variant is a different
/// class; all styling lives in the stylesheet.
pub fn municipio_card(tarjeta: &TarjetaMunicipio, href: &str) -> Markup {
    let clase = match tarjeta.estado {
        EstadoTarjeta::Seleccionada => "municipio-card seleccionada",
        EstadoTarjeta::Normal => "municipio-card",
    };
    let cuenta = if tarjeta.proyectos == 1 {
        "1 proyecto".to_string()
    } else {
        format!("{} proyectos", tarjeta.proyectos)
    };

    html! {
        a class=(clase) href=(href) {
            div class="municipio-name" { (tarjeta.nombre) }
            div class="municipio-projects" { (cuenta) }
        }
    }
}
