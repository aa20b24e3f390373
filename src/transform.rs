use crate::codes;

/// Transform that takes a data array's coordinates from one space into
/// another.
///
/// Spaces are NIfTI transform codes (see [`codes::xform_name`]).
///
/// ```
/// use gifti::{codes, CoordinateSystem};
///
/// let coord = CoordinateSystem::default();
/// assert_eq!(coord.dataspace, codes::XFORM_UNKNOWN);
/// assert!(coord.is_identity());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CoordinateSystem {
    pub dataspace: i32,
    pub xformspace: i32,
    pub matrix: [[f64; 4]; 4],
}

pub(crate) const IDENTITY: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl CoordinateSystem {
    pub fn new(dataspace: i32, xformspace: i32, matrix: [[f64; 4]; 4]) -> Self {
        CoordinateSystem {
            dataspace,
            xformspace,
            matrix,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == IDENTITY
    }

    /// Name of the data space, `None` for codes outside the table
    pub fn dataspace_name(&self) -> Option<&'static str> {
        codes::xform_name(self.dataspace)
    }

    /// Name of the transformed space, `None` for codes outside the table
    pub fn xformspace_name(&self) -> Option<&'static str> {
        codes::xform_name(self.xformspace)
    }

    /// Apply the transform to a point
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mut out = [0.0; 3];
        for (i, row) in m.iter().take(3).enumerate() {
            out[i] = row[0] * point[0] + row[1] * point[1] + row[2] * point[2] + row[3];
        }
        out
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::new(codes::XFORM_UNKNOWN, codes::XFORM_UNKNOWN, IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let coord = CoordinateSystem::new(codes::XFORM_TALAIRACH, 42, IDENTITY);
        assert_eq!(coord.dataspace_name(), Some("NIFTI_XFORM_TALAIRACH"));
        assert_eq!(coord.xformspace_name(), None);
    }

    #[test]
    fn test_apply() {
        let mut matrix = IDENTITY;
        matrix[0][3] = 10.0;
        matrix[1][1] = 2.0;
        let coord = CoordinateSystem::new(1, 3, matrix);
        assert!(!coord.is_identity());
        assert_eq!(coord.apply([1.0, 2.0, 3.0]), [11.0, 4.0, 3.0]);
    }
}
