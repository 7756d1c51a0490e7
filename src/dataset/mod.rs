pub mod geometry;
pub mod loader;
pub mod records;

pub use geometry::{MapCenter, MunicipioGeom, UbicacionAip, CENTRO_PAIS};
pub use loader::Dataset;
pub use records::Proyecto;
