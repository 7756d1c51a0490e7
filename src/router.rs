use std::sync::Arc;

use astra::Request;
use url::form_urlencoded;

use crate::config::AppConfig;
use crate::dashboard::{self, photos, Criterios, Evento};
use crate::dataset::records::normalize_key;
use crate::dataset::Dataset;
use crate::errors::ServerError;
use crate::responses::{file_response, html_response, ResultResp};
use crate::session::{SessionStore, COOKIE_SESION};
use crate::spreadsheets::export_proyectos_xlsx;
use crate::templates::pages::{dashboard_page, DashboardVm};

/// Shared application state: the immutable dataset plus the per-session
/// store, cloned into the server closure.
#[derive(Clone)]
pub struct App {
    pub dataset: Arc<Dataset>,
    pub sesiones: Arc<SessionStore>,
    pub config: AppConfig,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path().to_string();

    match (method, path.as_str()) {
        ("GET", "/") => dashboard_route(&req, app),
        ("GET", "/export") => export_route(&req, app),
        ("GET", p) if p.starts_with("/static/") => {
            file_response(&app.config.static_dir, &p["/static/".len()..])
        }
        ("GET", p) if p.starts_with("/assets/") => {
            file_response(&app.config.assets_dir, &p["/assets/".len()..])
        }
        _ => Err(ServerError::NotFound),
    }
}

fn dashboard_route(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    let criterios = criterios_de_query(&params, &app.dataset);
    let evento = evento_de_query(&params);

    // Session slot: existing cookie or a fresh one on the first visit.
    let (sid, set_cookie) = match cookie_sesion(req) {
        Some(sid) => (sid, None),
        None => {
            let sid = SessionStore::nuevo_id();
            let cookie = format!("{COOKIE_SESION}={sid}; Path=/; HttpOnly");
            (sid, Some(cookie))
        }
    };

    let mut estado = app.sesiones.cargar(&sid);
    let vista = dashboard::recalcular(
        &app.dataset,
        &criterios,
        evento,
        &mut estado,
        &app.config.assets_dir,
    );
    app.sesiones.guardar(&sid, estado);

    let vm = DashboardVm {
        criterios: &criterios,
        tipos: &app.dataset.tipos,
        departamentos: &app.dataset.departamentos,
        comunidades: &app.dataset.comunidades,
        limites_anos: app.dataset.anos,
        costo_max_millones: app.dataset.costo_max_millones,
        vista: &vista,
        logo: imagen_opcional(&app.config.assets_dir, "logo.png", "image/png"),
        huella: imagen_opcional(&app.config.assets_dir, "Figura_huella_aip.png", "image/png"),
    };

    html_response(dashboard_page(&vm), set_cookie)
}

fn export_route(req: &Request, app: &App) -> ResultResp {
    let params = parse_query(req);
    let criterios = criterios_de_query(&params, &app.dataset);
    let filtrado = dashboard::filter::aplicar(&criterios, &app.dataset);
    export_proyectos_xlsx(&filtrado.rows)
}

/// Decoded query pairs, repeated keys preserved.
pub fn parse_query(req: &Request) -> Vec<(String, String)> {
    match req.uri().query() {
        Some(q) => form_urlencoded::parse(q.as_bytes()).into_owned().collect(),
        None => Vec::new(),
    }
}

fn valores(params: &[(String, String)], clave: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, v)| k == clave && !v.is_empty())
        .map(|(_, v)| v.clone())
        .collect()
}

fn valor<'a>(params: &'a [(String, String)], clave: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == clave)
        .map(|(_, v)| v.as_str())
}

/// Criteria from the query string; anything absent or unparseable falls back
/// to the unrestricted bound for that control.
pub fn criterios_de_query(params: &[(String, String)], dataset: &Dataset) -> Criterios {
    let base = Criterios::sin_restriccion(dataset);

    let ano = |clave: &str, defecto: i32| -> i32 {
        valor(params, clave)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defecto)
    };
    let costo = |clave: &str, defecto: f64| -> f64 {
        valor(params, clave)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defecto)
    };

    Criterios {
        tipos: valores(params, "tipo"),
        departamentos: valores(params, "departamento"),
        comunidades: valores(params, "comunidad"),
        anos: (ano("ano_min", base.anos.0), ano("ano_max", base.anos.1)),
        costos_millones: (
            costo("costo_min", base.costos_millones.0),
            costo("costo_max", base.costos_millones.1),
        ),
    }
}

/// At most one selection event per request. `feature` comes from a map
/// click (its value is the clicked feature's municipality attribute, empty
/// when the feature has none); `municipio` from a card click.
pub fn evento_de_query(params: &[(String, String)]) -> Option<Evento> {
    if valor(params, "reset").is_some() {
        return Some(Evento::Reiniciar);
    }
    if let Some(id) = valor(params, "proyecto") {
        if !id.is_empty() {
            return Some(Evento::ElegirProyecto(id.to_string()));
        }
    }
    if let Some(feature) = valor(params, "feature") {
        let municipio = if feature.is_empty() {
            None
        } else {
            Some(normalize_key(feature))
        };
        return Some(Evento::ClickMapa(municipio));
    }
    if let Some(m) = valor(params, "municipio") {
        if !m.is_empty() {
            return Some(Evento::SeleccionarMunicipio(normalize_key(m)));
        }
    }
    None
}

fn cookie_sesion(req: &Request) -> Option<String> {
    let header = req.headers().get("Cookie")?.to_str().ok()?;
    header.split(';').find_map(|par| {
        let (k, v) = par.trim().split_once('=')?;
        if k == COOKIE_SESION && !v.is_empty() {
            Some(v.to_string())
        } else {
            None
        }
    })
}

fn imagen_opcional(assets_dir: &str, nombre: &str, mime: &str) -> Option<String> {
    let bytes = std::fs::read(std::path::Path::new(assets_dir).join(nombre)).ok()?;
    Some(photos::data_uri(&bytes, mime))
}
