use std::net::SocketAddr;
use std::sync::Arc;

use astra::Server;

use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::router::{handle, App};
use crate::session::SessionStore;

mod config;
mod dashboard;
mod dataset;
mod errors;
mod responses;
mod router;
mod session;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let config = AppConfig::from_env();

    // 1️⃣ Load the dataset; the dashboard cannot serve without it.
    let dataset = match Dataset::load(&config.data_dir) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            eprintln!("❌ Dataset load failed: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "✅ Datos cargados: {} proyectos, {} municipios con geometría, {} ubicaciones",
        dataset.proyectos.len(),
        dataset.municipios.len(),
        dataset.ubicaciones.len()
    );

    let app = App {
        dataset,
        sesiones: Arc::new(SessionStore::new()),
        config: config.clone(),
    };

    // 2️⃣ Start the server
    let addr: SocketAddr = config.bind.parse().unwrap();
    println!("Starting server at http://{addr}");

    let server = Server::bind(addr).max_workers(8);

    // 3️⃣ Serve requests, passing the shared state into the closure
    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => crate::responses::html_error_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
