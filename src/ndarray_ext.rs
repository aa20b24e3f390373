//! ndarray integration for data arrays
//!
//! Inline data arrays convert to and from n-dimensional `ndarray` arrays with
//! the data array's dimensions as the shape. Buffers are row-major, so the
//! conversion never depends on the array's declared index order.
//!
//! Enable with the `ndarray` feature flag.

use crate::{Buffer, DataArray, DataType, Element};
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// Error type for ndarray conversions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdarrayError {
    /// Requested element type differs from the array's data type
    DataTypeMismatch { expected: DataType, actual: DataType },
    /// Dimensions don't match the element count
    ShapeMismatch { dims: Vec<usize>, len: usize },
    /// The data array refers to an external file and holds no elements
    External,
}

impl std::fmt::Display for NdarrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdarrayError::DataTypeMismatch { expected, actual } => {
                write!(f, "data type mismatch: expected {}, got {}", expected, actual)
            }
            NdarrayError::ShapeMismatch { dims, len } => {
                write!(f, "dimensions {:?} don't match element count {}", dims, len)
            }
            NdarrayError::External => {
                write!(f, "data array is stored in an external file")
            }
        }
    }
}

impl std::error::Error for NdarrayError {}

impl DataArray {
    /// Create a data array from an ndarray array of any memory layout.
    ///
    /// A zero dimensional array becomes a one element, one dimensional data
    /// array.
    pub fn from_ndarray<T>(arr: ArrayD<T>) -> Result<Self, NdarrayError>
    where
        T: Element,
        Buffer: From<Vec<T>>,
    {
        let mut dims = arr.shape().to_vec();
        if dims.is_empty() {
            dims.push(1);
        }

        // iteration is in logical row-major order regardless of strides
        let data: Vec<T> = arr.iter().copied().collect();
        let len = data.len();
        DataArray::new(data, dims.clone()).map_err(|_| NdarrayError::ShapeMismatch { dims, len })
    }

    fn typed<T: Element>(&self) -> Result<&[T], NdarrayError> {
        let buffer = self.buffer().ok_or(NdarrayError::External)?;
        buffer
            .as_slice::<T>()
            .ok_or(NdarrayError::DataTypeMismatch {
                expected: T::DATA_TYPE,
                actual: buffer.data_type(),
            })
    }

    /// Copy the elements into an ndarray array shaped by the dimensions
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>, NdarrayError> {
        let data = self.typed::<T>()?;
        ArrayD::from_shape_vec(IxDyn(self.dims()), data.to_vec()).map_err(|_| {
            NdarrayError::ShapeMismatch {
                dims: self.dims().to_vec(),
                len: data.len(),
            }
        })
    }

    /// Borrow the elements as an ndarray view shaped by the dimensions
    pub fn as_ndarray<T: Element>(&self) -> Result<ArrayViewD<'_, T>, NdarrayError> {
        let data = self.typed::<T>()?;
        ArrayViewD::from_shape(IxDyn(self.dims()), data).map_err(|_| NdarrayError::ShapeMismatch {
            dims: self.dims().to_vec(),
            len: data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExternalFile;
    use ndarray::array;

    #[test]
    fn roundtrip_2d_f32() {
        let arr = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let expected = arr.clone();
        let data = DataArray::from_ndarray(arr).unwrap();

        assert_eq!(data.data_type(), DataType::Float32);
        assert_eq!(data.dims(), &[2, 3]);
        assert_eq!(data.values::<f32>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let back: ArrayD<f32> = data.to_ndarray().unwrap();
        assert_eq!(expected, back);
    }

    #[test]
    fn transposed_input_is_copied_in_logical_order() {
        let arr = array![[1i32, 2, 3], [4, 5, 6]].reversed_axes().into_dyn();
        let data = DataArray::from_ndarray(arr).unwrap();
        assert_eq!(data.dims(), &[3, 2]);
        assert_eq!(data.values::<i32>().unwrap(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn view_matches_copy() {
        let data = DataArray::new(vec![1u16, 2, 3, 4], vec![2, 2]).unwrap();
        let view = data.as_ndarray::<u16>().unwrap();
        assert_eq!(view[[1, 0]], 3);
        assert_eq!(view.to_owned(), data.to_ndarray::<u16>().unwrap());
    }

    #[test]
    fn data_type_mismatch_error() {
        let data = DataArray::new(vec![1.0f32, 2.0], vec![2]).unwrap();
        let result: Result<ArrayD<f64>, _> = data.to_ndarray();
        assert_eq!(
            result.unwrap_err(),
            NdarrayError::DataTypeMismatch {
                expected: DataType::Float64,
                actual: DataType::Float32
            }
        );
    }

    #[test]
    fn external_error() {
        let file = ExternalFile {
            name: String::from("x.bin"),
            offset: 0,
        };
        let data = DataArray::external(file, DataType::Int8, vec![4]).unwrap();
        assert_eq!(data.to_ndarray::<i8>().unwrap_err(), NdarrayError::External);
    }
}
