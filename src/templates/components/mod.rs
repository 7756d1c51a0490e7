pub mod kpi;
pub mod municipio;

pub use kpi::kpi_card;
pub use municipio::municipio_card;
