pub mod aggregate;
pub mod exec;
pub mod input;

pub use aggregate::{aggregate, discover_languages};
pub use exec::exec;
pub use input::{discover_series_files, read_series, read_series_file};

pub const OUTPUT_FILE: &str = "code_growth_total.csv";
