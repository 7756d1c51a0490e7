// src/session.rs
//
// Per-session UI state. Every browser session owns an independent slot keyed
// by a random cookie token; the dataset itself is shared read-only. The
// mutex only guards the map of slots — requests for one session are
// serialized by the browser's navigation, so there is no writer contention
// within a slot.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use base64::Engine;
use rand::{rngs::OsRng, RngCore};

use crate::dashboard::Seleccion;
use crate::dataset::MapCenter;

pub const COOKIE_SESION: &str = "sesion";

#[derive(Debug, Clone, Default)]
pub struct EstadoSesion {
    pub seleccion: Seleccion,
    /// Last viewport, restored when the selection is cleared.
    pub centro_mapa: Option<MapCenter>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sesiones: Mutex<HashMap<String, EstadoSesion>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cargar(&self, id: &str) -> EstadoSesion {
        self.sesiones
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn guardar(&self, id: &str, estado: EstadoSesion) {
        self.sesiones
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), estado);
    }

    /// URL-safe random token, fit for a cookie value without escaping.
    pub fn nuevo_id() -> String {
        let mut raw = [0u8; 16];
        OsRng.fill_bytes(&mut raw);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_loads_the_default_state() {
        let store = SessionStore::new();
        let estado = store.cargar("nadie");
        assert_eq!(estado.seleccion, Seleccion::Ninguna);
        assert!(estado.centro_mapa.is_none());
    }

    #[test]
    fn sessions_do_not_share_state() {
        let store = SessionStore::new();
        let mut a = store.cargar("a");
        a.seleccion = Seleccion::Municipio("BOGOTÁ".into());
        store.guardar("a", a);

        assert_eq!(
            store.cargar("a").seleccion,
            Seleccion::Municipio("BOGOTÁ".into())
        );
        assert_eq!(store.cargar("b").seleccion, Seleccion::Ninguna);
    }

    #[test]
    fn ids_are_cookie_safe_and_distinct() {
        let a = SessionStore::nuevo_id();
        let b = SessionStore::nuevo_id();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
