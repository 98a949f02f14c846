mod data_source;
mod normalized_volume;
pub mod parse;
mod scalar_volume;

pub use data_source::DataSource;
pub use normalized_volume::{NormalizedVolume, Trilinear};
pub use parse::from_file;
pub use scalar_volume::ScalarVolume;
