use chrono::Local;
use maud::{html, Markup, DOCTYPE};

/// Single-page layout: Leaflet from the CDN, local stylesheet, and the map
/// bootstrap that reads the embedded GeoJSON payload.
pub fn dashboard_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" defer {};
                script src="/static/mapa.js" defer {};
            }
            body {
                (content)
                footer {
                    p { "© 2025 Fundación AIP - Todos los derechos reservados" }
                    p { "Datos actualizados al " (Local::now().format("%d/%m/%Y")) }
                }
            }
        }
    }
}
