//! STL parsing (binary and ASCII)
//!
//! Format detection is structural: a buffer is binary STL iff it is
//! long enough for the 84-byte preamble and its declared triangle
//! count matches the byte length exactly. Everything else is tried as
//! ASCII. The size check runs first because binary exports from some
//! tools also start with the bytes `solid`.

use crate::error::MeshError;
use crate::mesh::Triangle;

/// Binary STL: 80-byte header + u32 triangle count
const BINARY_PREAMBLE_LEN: usize = 84;
/// Binary STL: normal (12) + 3 vertices (36) + attribute count (2)
const BINARY_RECORD_LEN: usize = 50;

/// Parse STL bytes into a triangle list, auto-detecting the format
pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<Triangle>, MeshError> {
    if let Some(count) = binary_triangle_count(bytes) {
        return parse_binary(bytes, count);
    }
    parse_ascii(bytes)
}

/// Declared triangle count, if the buffer is structurally binary STL
fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < BINARY_PREAMBLE_LEN {
        return None;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let expected = BINARY_PREAMBLE_LEN + count.checked_mul(BINARY_RECORD_LEN)?;
    (bytes.len() == expected).then_some(count)
}

fn parse_binary(bytes: &[u8], count: usize) -> Result<Vec<Triangle>, MeshError> {
    let mut triangles = Vec::with_capacity(count);

    for i in 0..count {
        let record = &bytes[BINARY_PREAMBLE_LEN + i * BINARY_RECORD_LEN..];
        // Skip the 12-byte facet normal; the volume computation derives
        // orientation from vertex winding instead.
        let mut vertices = [[0.0f32; 3]; 3];
        for (v, vertex) in vertices.iter_mut().enumerate() {
            for (c, coord) in vertex.iter_mut().enumerate() {
                let off = 12 + v * 12 + c * 4;
                *coord = f32::from_le_bytes([
                    record[off],
                    record[off + 1],
                    record[off + 2],
                    record[off + 3],
                ]);
            }
        }
        triangles.push(Triangle { vertices });
    }

    Ok(triangles)
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<Triangle>, MeshError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| MeshError::Malformed("not utf-8 and not binary STL".to_string()))?;

    if !text.trim_start().starts_with("solid") {
        return Err(MeshError::Malformed(
            "missing 'solid' header".to_string(),
        ));
    }

    let mut vertices: Vec<[f32; 3]> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("vertex") else {
            continue;
        };
        let mut coords = rest.split_whitespace().map(str::parse::<f32>);
        let vertex = [
            next_coord(&mut coords, line)?,
            next_coord(&mut coords, line)?,
            next_coord(&mut coords, line)?,
        ];
        if coords.next().is_some() {
            return Err(MeshError::Malformed(format!(
                "vertex line has more than 3 coordinates: '{line}'"
            )));
        }
        vertices.push(vertex);
    }

    if vertices.len() % 3 != 0 {
        return Err(MeshError::Malformed(format!(
            "vertex count {} is not a multiple of 3",
            vertices.len()
        )));
    }

    Ok(vertices
        .chunks_exact(3)
        .map(|v| Triangle {
            vertices: [v[0], v[1], v[2]],
        })
        .collect())
}

fn next_coord(
    coords: &mut impl Iterator<Item = Result<f32, std::num::ParseFloatError>>,
    line: &str,
) -> Result<f32, MeshError> {
    coords
        .next()
        .transpose()
        .map_err(|_| MeshError::Malformed(format!("bad vertex coordinate: '{line}'")))?
        .ok_or_else(|| MeshError::Malformed(format!("vertex line too short: '{line}'")))
}
