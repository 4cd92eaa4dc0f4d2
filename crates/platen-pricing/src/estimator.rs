//! Mass estimation seam
//!
//! The pricing engine asks a [`MassEstimator`] for grams-per-unit of a
//! named item. The production implementation resolves the item's model
//! file in the models directory and computes mass from its geometry.

use platen_mesh::{MeshError, TriangleMesh};
use std::path::{Path, PathBuf};

/// Errors produced while estimating an item's mass
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    /// No model file exists for the item
    #[error("no model found for item '{item}'")]
    ModelNotFound {
        /// Item name as ordered
        item: String,
    },

    /// The model file exists but cannot be read as a mesh
    #[error("model for item '{item}' is malformed: {reason}")]
    MalformedModel {
        /// Item name as ordered
        item: String,
        /// What went wrong while reading the mesh
        reason: String,
    },
}

/// Estimates grams-per-unit for a named item
///
/// Implementations must be pure from the caller's perspective: the
/// same item and density always yield the same mass within one
/// pricing pass.
pub trait MassEstimator: Send + Sync {
    /// Mass of one unit of `item` in grams, at the given density
    ///
    /// # Errors
    /// - [`EstimationError::ModelNotFound`] if the item has no model
    /// - [`EstimationError::MalformedModel`] if the model cannot be read
    fn unit_mass_grams(&self, item: &str, density_g_cm3: f64) -> Result<f64, EstimationError>;
}

/// STL-backed estimator resolving `<models_dir>/<item>.<extension>`
#[derive(Debug, Clone)]
pub struct StlMassEstimator {
    models_dir: PathBuf,
    extension: String,
}

impl StlMassEstimator {
    /// Create estimator over a models directory
    #[inline]
    #[must_use]
    pub fn new(models_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            extension: extension.into(),
        }
    }

    /// Path an item's model resolves to
    #[inline]
    #[must_use]
    pub fn model_path(&self, item: &str) -> PathBuf {
        self.models_dir
            .join(format!("{item}.{ext}", ext = self.extension))
    }

    /// Models directory this estimator reads from
    #[inline]
    #[must_use]
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}

impl MassEstimator for StlMassEstimator {
    fn unit_mass_grams(&self, item: &str, density_g_cm3: f64) -> Result<f64, EstimationError> {
        let path = self.model_path(item);
        let mesh = TriangleMesh::from_stl_file(&path).map_err(|e| match e {
            MeshError::FileNotFound { .. } => EstimationError::ModelNotFound {
                item: item.to_string(),
            },
            other => EstimationError::MalformedModel {
                item: item.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(mesh.mass_grams(density_g_cm3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Binary STL for a cube of the given side, built inline so the
    /// estimator tests do not depend on mesh test internals.
    fn cube_stl(side: f32) -> Vec<u8> {
        let s = side;
        let quads: [[[f32; 3]; 4]; 6] = [
            [[0.0, 0.0, 0.0], [0.0, s, 0.0], [s, s, 0.0], [s, 0.0, 0.0]],
            [[0.0, 0.0, s], [s, 0.0, s], [s, s, s], [0.0, s, s]],
            [[0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, 0.0, s], [0.0, 0.0, s]],
            [[0.0, s, 0.0], [0.0, s, s], [s, s, s], [s, s, 0.0]],
            [[0.0, 0.0, 0.0], [0.0, 0.0, s], [0.0, s, s], [0.0, s, 0.0]],
            [[s, 0.0, 0.0], [s, s, 0.0], [s, s, s], [s, 0.0, s]],
        ];
        let mut triangles: Vec<[[f32; 3]; 3]> = Vec::new();
        for q in quads {
            triangles.push([q[0], q[1], q[2]]);
            triangles.push([q[0], q[2], q[3]]);
        }

        let mut out = vec![0u8; 80];
        out.extend_from_slice(&u32::try_from(triangles.len()).unwrap().to_le_bytes());
        for t in &triangles {
            out.extend_from_slice(&[0u8; 12]);
            for v in t {
                for c in v {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            out.extend_from_slice(&[0u8; 2]);
        }
        out
    }

    #[test]
    fn estimates_mass_from_model_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bracket.stl"), cube_stl(10.0)).unwrap();

        let estimator = StlMassEstimator::new(dir.path(), "stl");
        // 1 cm³ at 1.27 g/cm³
        let grams = estimator.unit_mass_grams("bracket", 1.27).unwrap();
        assert!((grams - 1.27).abs() < 1e-3);
    }

    #[test]
    fn missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let estimator = StlMassEstimator::new(dir.path(), "stl");
        let err = estimator.unit_mass_grams("ghost", 1.27).unwrap_err();
        assert!(matches!(err, EstimationError::ModelNotFound { .. }));
    }

    #[test]
    fn unreadable_model_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.stl"), b"definitely not stl").unwrap();

        let estimator = StlMassEstimator::new(dir.path(), "stl");
        let err = estimator.unit_mass_grams("junk", 1.27).unwrap_err();
        assert!(matches!(err, EstimationError::MalformedModel { .. }));
    }

    #[test]
    fn model_path_uses_configured_extension() {
        let estimator = StlMassEstimator::new("/models", "stl");
        assert_eq!(
            estimator.model_path("bracket"),
            PathBuf::from("/models/bracket.stl")
        );
    }
}
