// src/config.rs

use std::env;

/// Runtime configuration. Defaults match the layout of the deployed
/// dashboard; every path can be overridden through the environment so the
/// same binary serves local development and the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    /// Directory holding proyectos.csv and the two GeoJSON boundary files.
    pub data_dir: String,
    /// Directory holding logo, huella figure and photo evidence.
    pub assets_dir: String,
    /// Directory holding the stylesheet and the map bootstrap script.
    pub static_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            data_dir: "data".into(),
            assets_dir: "assets".into(),
            static_dir: "static".into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut c = AppConfig::default();
        if let Ok(v) = env::var("BIND") {
            c.bind = v;
        }
        if let Ok(v) = env::var("DATA_DIR") {
            c.data_dir = v;
        }
        if let Ok(v) = env::var("ASSETS_DIR") {
            c.assets_dir = v;
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            c.static_dir = v;
        }
        c
    }
}
