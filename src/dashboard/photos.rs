// src/dashboard/photos.rs
//
// Photo evidence follows a fixed naming convention on disk:
// assets/fotos/Rf <n> proyecto <ID>.jpg, with n = 1 (initial) and 2 (final).
// Whatever exists is shown; absences are silently omitted.

use base64::Engine;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FotoEvidencia {
    pub numero: u8,
    pub data_uri: String,
}

pub fn listar(assets_dir: &str, proyecto_id: &str) -> Vec<FotoEvidencia> {
    (1..=2u8)
        .filter_map(|numero| {
            let ruta = Path::new(assets_dir)
                .join("fotos")
                .join(format!("Rf {numero} proyecto {proyecto_id}.jpg"));
            let bytes = std::fs::read(&ruta).ok()?;
            Some(FotoEvidencia {
                numero,
                data_uri: data_uri(&bytes, "image/jpeg"),
            })
        })
        .collect()
}

/// Inline an image so the page needs no extra request per photo.
pub fn data_uri(bytes: &[u8], mime: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}
