pub mod config;
pub mod logging;
pub mod report;
pub mod sheet;
pub mod wizard;
