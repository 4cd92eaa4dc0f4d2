//! Engine configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the session engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory accepted uploads are stored in and models are read from
    pub models_dir: PathBuf,
    /// Accepted upload extension, without the dot (matched case-insensitively)
    pub model_extension: String,
    /// Quiescence delay before a prompt refresh after a delivery burst
    pub debounce_delay: Duration,
    /// Material every order line is priced as
    pub material: String,
    /// Executor name printed on receipts
    pub executor: String,
    /// Customer name printed on receipts
    pub customer: String,
}

impl EngineConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the models directory
    #[inline]
    #[must_use]
    pub fn with_models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.models_dir = dir.into();
        self
    }

    /// Set the debounce quiescence delay
    #[inline]
    #[must_use]
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the assumed material
    #[inline]
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Set the receipt parties
    #[inline]
    #[must_use]
    pub fn with_parties(
        mut self,
        executor: impl Into<String>,
        customer: impl Into<String>,
    ) -> Self {
        self.executor = executor.into();
        self.customer = customer.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("data/models"),
            model_extension: "stl".to_string(),
            debounce_delay: Duration::from_millis(1500),
            material: "PETG".to_string(),
            executor: String::new(),
            customer: String::new(),
        }
    }
}
