pub mod bom;
pub mod config;
pub mod error;
pub mod logging;
pub mod sar;
pub mod validation;

pub use bom::*;
pub use self::config::*;
pub use error::*;
pub use logging::*;
pub use sar::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert!(config.parts_file.ends_with("CatC-partslist.json"));
    }

    #[test]
    fn test_error_handling() {
        let error = SarError::validation("test_field", "test message");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
    }
}
