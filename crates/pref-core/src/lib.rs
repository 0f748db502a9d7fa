#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;

pub use error::{
    ConfigurationError, IncompleteInputError, InvalidSeatError, RecordError, ResolveError,
};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "prefcount"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "prefcount");
        assert!(!AppInfo::version().is_empty());
    }
}
