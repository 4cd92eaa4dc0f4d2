//! Material rate table
//!
//! Static pricing data: per-gram rate and density for each material
//! the shop prints with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default material assumed for every order line
pub const DEFAULT_MATERIAL: &str = "PETG";

/// Pricing and physical properties of one material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRate {
    /// Price per printed gram, in currency units
    pub rate_per_gram: f64,
    /// Density in g/cm³, used for mass estimation
    pub density_g_cm3: f64,
}

impl MaterialRate {
    /// Create new material rate
    #[inline]
    #[must_use]
    pub fn new(rate_per_gram: f64, density_g_cm3: f64) -> Self {
        Self {
            rate_per_gram,
            density_g_cm3,
        }
    }
}

/// Material name → rate mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    materials: BTreeMap<String, MaterialRate>,
}

impl RateTable {
    /// Empty rate table
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            materials: BTreeMap::new(),
        }
    }

    /// Add or replace a material
    #[inline]
    #[must_use]
    pub fn with_material(mut self, name: impl Into<String>, rate: MaterialRate) -> Self {
        self.materials.insert(name.into(), rate);
        self
    }

    /// Look up a material by name
    #[inline]
    #[must_use]
    pub fn rate(&self, material: &str) -> Option<&MaterialRate> {
        self.materials.get(material)
    }

    /// Known material names, sorted
    #[inline]
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}

impl Default for RateTable {
    /// The shop's standard filaments
    fn default() -> Self {
        Self::empty()
            .with_material("PETG", MaterialRate::new(3.0, 1.27))
            .with_material("PLA", MaterialRate::new(5.0, 1.24))
    }
}
