//! Triangle mesh and mass properties

use crate::error::MeshError;
use crate::stl;
use std::path::Path;

/// One triangle, three vertices in model units (mm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices as `[x, y, z]` triples
    pub vertices: [[f32; 3]; 3],
}

/// Triangle soup read from an STL file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
}

impl TriangleMesh {
    /// Build a mesh from a triangle list
    #[inline]
    #[must_use]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Parse STL bytes, auto-detecting binary vs ASCII format
    ///
    /// # Errors
    /// Returns [`MeshError::Malformed`] if the bytes fit neither format.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self, MeshError> {
        stl::parse(bytes).map(Self::new)
    }

    /// Read and parse an STL file
    ///
    /// # Errors
    /// - [`MeshError::FileNotFound`] if the path does not exist
    /// - [`MeshError::Io`] for other read failures
    /// - [`MeshError::Malformed`] if the content is not STL
    pub fn from_stl_file(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MeshError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                MeshError::Io(e)
            }
        })?;
        Self::from_stl_bytes(&bytes)
    }

    /// Triangles in the mesh
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Signed volume in mm³ (sum of signed tetrahedra)
    ///
    /// Negative for meshes whose facets wind inward.
    #[must_use]
    pub fn signed_volume_mm3(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices;
                let a = [f64::from(a[0]), f64::from(a[1]), f64::from(a[2])];
                let b = [f64::from(b[0]), f64::from(b[1]), f64::from(b[2])];
                let c = [f64::from(c[0]), f64::from(c[1]), f64::from(c[2])];
                // a · (b × c) / 6
                let cross = [
                    b[1] * c[2] - b[2] * c[1],
                    b[2] * c[0] - b[0] * c[2],
                    b[0] * c[1] - b[1] * c[0],
                ];
                (a[0] * cross[0] + a[1] * cross[1] + a[2] * cross[2]) / 6.0
            })
            .sum()
    }

    /// Volume in mm³, independent of facet orientation
    #[inline]
    #[must_use]
    pub fn volume_mm3(&self) -> f64 {
        self.signed_volume_mm3().abs()
    }

    /// Mass in grams for a material density in g/cm³
    ///
    /// Converts mm³ → cm³ (÷ 1000) before applying the density.
    #[inline]
    #[must_use]
    pub fn mass_grams(&self, density_g_cm3: f64) -> f64 {
        self.volume_mm3() / 1000.0 * density_g_cm3
    }
}
