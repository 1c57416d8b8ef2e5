pub mod cli;
pub mod cloc;
pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod git;
pub mod model;
pub mod report;
pub mod tag;
pub mod total;
pub mod util;
