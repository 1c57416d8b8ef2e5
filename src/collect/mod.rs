pub mod exec;
pub mod series;

pub use exec::exec;
pub use series::{build_series, SeriesBuild};
