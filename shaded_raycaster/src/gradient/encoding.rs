use nalgebra::{vector, Vector3};

/// Resolution of the octahedral grid, per axis.
/// Odd, so the axes fall exactly on grid cells
const GRID: usize = 63;

/// Index of the zero normal (flat neighbourhood)
pub const ZERO_NORMAL: u16 = (GRID * GRID) as u16;

/// Number of distinct encoded normals including the zero normal
pub const ENCODED_NORMAL_COUNT: usize = GRID * GRID + 1;

/// Maps unit normals to `u16` indices and back.
///
/// Normals are projected onto an octahedron and the octahedron is unfolded
/// into a `GRID x GRID` square.
#[derive(Debug, Clone)]
pub struct NormalEncoder {
    decode_table: Vec<Vector3<f32>>,
}

impl Default for NormalEncoder {
    fn default() -> Self {
        NormalEncoder::new()
    }
}

impl NormalEncoder {
    pub fn new() -> NormalEncoder {
        let mut decode_table: Vec<_> = (0..GRID * GRID).map(decode_index).collect();
        decode_table.push(Vector3::zeros());
        NormalEncoder { decode_table }
    }

    pub fn encode(&self, normal: Vector3<f32>) -> u16 {
        let l1 = normal.x.abs() + normal.y.abs() + normal.z.abs();
        if l1 < 1e-6 {
            return ZERO_NORMAL;
        }

        let mut u = normal.x / l1;
        let mut v = normal.y / l1;
        if normal.z < 0.0 {
            let (fu, fv) = fold(u, v);
            u = fu;
            v = fv;
        }

        let to_cell = |c: f32| (((c + 1.0) * 0.5 * (GRID - 1) as f32).round() as usize).min(GRID - 1);
        (to_cell(u) * GRID + to_cell(v)) as u16
    }

    /// Unit normal of `index`, zero vector for [`ZERO_NORMAL`]
    pub fn decode(&self, index: u16) -> Vector3<f32> {
        self.decode_table[index as usize]
    }

    /// All decoded normals, indexed by encoded value
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.decode_table
    }
}

fn sign(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

fn fold(u: f32, v: f32) -> (f32, f32) {
    ((1.0 - v.abs()) * sign(u), (1.0 - u.abs()) * sign(v))
}

fn decode_index(index: usize) -> Vector3<f32> {
    let from_cell = |c: usize| c as f32 / (GRID - 1) as f32 * 2.0 - 1.0;
    let mut u = from_cell(index / GRID);
    let mut v = from_cell(index % GRID);
    let z = 1.0 - u.abs() - v.abs();
    if z < 0.0 {
        let (fu, fv) = fold(u, v);
        u = fu;
        v = fv;
    }
    vector![u, v, z].normalize()
}

/// Per voxel normals produced by a gradient estimator.
#[derive(Debug, Clone)]
pub struct EncodedNormals {
    pub indices: Vec<u16>,
    pub magnitudes: Vec<f32>,
}

impl EncodedNormals {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest gradient magnitude
    pub fn max_magnitude(&self) -> f32 {
        self.magnitudes.iter().copied().fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn axes_survive_encoding() {
        let encoder = NormalEncoder::new();
        let axes = [
            vector![1.0, 0.0, 0.0],
            vector![0.0, -1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            vector![0.0, 0.0, -1.0],
        ];
        for axis in axes {
            let decoded = encoder.decode(encoder.encode(axis));
            assert!((decoded - axis).norm() < 1e-3, "{axis:?} decoded as {decoded:?}");
        }
    }

    #[test]
    fn encoding_error_is_small() {
        let encoder = NormalEncoder::new();
        let normal = vector![0.3, -0.5, -0.8].normalize();
        let decoded = encoder.decode(encoder.encode(normal));
        assert!(normal.dot(&decoded) > 0.995);
    }

    #[test]
    fn zero_normal() {
        let encoder = NormalEncoder::new();
        assert_eq!(encoder.encode(Vector3::zeros()), ZERO_NORMAL);
        assert_eq!(encoder.decode(ZERO_NORMAL), Vector3::zeros());
        assert_eq!(encoder.normals().len(), ENCODED_NORMAL_COUNT);
    }
}
