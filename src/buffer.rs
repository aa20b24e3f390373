use crate::scalar::{Scalar, ScalarError};
use crate::DataType;
use byteorder::ByteOrder;

/// Decoded contents of a data array.
///
/// Elements are stored as native values in row-major order (the last axis
/// varies fastest) no matter how the payload was laid out on disk.
///
/// ```
/// use gifti::{Buffer, DataType};
///
/// let buffer = Buffer::from(vec![1.5f32, 2.5, 3.5]);
/// assert_eq!(buffer.data_type(), DataType::Float32);
/// assert_eq!(buffer.as_slice::<f32>(), Some(&[1.5f32, 2.5, 3.5][..]));
/// assert_eq!(buffer.as_slice::<i32>(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Buffer {
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
    UInt16(Vec<u16>),
    Int16(Vec<i16>),
    UInt32(Vec<u32>),
    Int32(Vec<i32>),
    UInt64(Vec<u64>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Evaluate an expression against the vector held by any buffer variant
macro_rules! visit {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            Buffer::UInt8($v) => $body,
            Buffer::Int8($v) => $body,
            Buffer::UInt16($v) => $body,
            Buffer::Int16($v) => $body,
            Buffer::UInt32($v) => $body,
            Buffer::Int32($v) => $body,
            Buffer::UInt64($v) => $body,
            Buffer::Int64($v) => $body,
            Buffer::Float32($v) => $body,
            Buffer::Float64($v) => $body,
        }
    };
}

pub(crate) use visit;

impl Buffer {
    /// Element type of the buffer
    pub fn data_type(&self) -> DataType {
        match self {
            Buffer::UInt8(_) => DataType::UInt8,
            Buffer::Int8(_) => DataType::Int8,
            Buffer::UInt16(_) => DataType::UInt16,
            Buffer::Int16(_) => DataType::Int16,
            Buffer::UInt32(_) => DataType::UInt32,
            Buffer::Int32(_) => DataType::Int32,
            Buffer::UInt64(_) => DataType::UInt64,
            Buffer::Int64(_) => DataType::Int64,
            Buffer::Float32(_) => DataType::Float32,
            Buffer::Float64(_) => DataType::Float64,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        visit!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the elements as a typed slice, `None` if `T` is not the element type
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::view(self)
    }

    /// Consume the buffer returning the typed elements, or the buffer itself
    /// when `T` is not the element type
    pub fn into_vec<T: Element>(self) -> Result<Vec<T>, Buffer> {
        T::unwrap(self)
    }

    /// Element at `index` widened to f64 (64 bit integers may lose precision)
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        visit!(self, v => v.get(index).map(|x| x.to_f64()))
    }

    /// Every element widened to f64 (64 bit integers may lose precision)
    pub fn to_f64_vec(&self) -> Vec<f64> {
        visit!(self, v => v.iter().map(|x| x.to_f64()).collect())
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for Buffer {
                fn from(data: Vec<$ty>) -> Self {
                    Buffer::$variant(data)
                }
            }
        )*
    };
}

impl_from_vec!(
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

mod private {
    pub trait Sealed {}
}

/// A numeric type that a data array can hold
pub trait Element: Copy + Default + PartialEq + std::fmt::Debug + private::Sealed + 'static {
    /// The data type tag for this element
    const DATA_TYPE: DataType;

    #[doc(hidden)]
    fn view(buffer: &Buffer) -> Option<&[Self]>;

    #[doc(hidden)]
    fn unwrap(buffer: Buffer) -> Result<Vec<Self>, Buffer>;

    #[doc(hidden)]
    fn parse(scalar: Scalar) -> Result<Self, ScalarError>;

    #[doc(hidden)]
    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]);

    #[doc(hidden)]
    fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]);

    #[doc(hidden)]
    fn write_ascii(self, out: &mut String);

    #[doc(hidden)]
    fn to_f64(self) -> f64;
}

#[cfg(feature = "faster_writer")]
macro_rules! write_integer {
    ($val:expr, $out:expr) => {{
        let mut buf = itoa::Buffer::new();
        $out.push_str(buf.format($val));
    }};
}

#[cfg(not(feature = "faster_writer"))]
macro_rules! write_integer {
    ($val:expr, $out:expr) => {{
        use std::fmt::Write;
        let _ = write!($out, "{}", $val);
    }};
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident, $parse:ident, $read:ident, $write:ident) => {
        impl private::Sealed for $ty {}

        impl Element for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn view(buffer: &Buffer) -> Option<&[Self]> {
                match buffer {
                    Buffer::$variant(x) => Some(x.as_slice()),
                    _ => None,
                }
            }

            fn unwrap(buffer: Buffer) -> Result<Vec<Self>, Buffer> {
                match buffer {
                    Buffer::$variant(x) => Ok(x),
                    x => Err(x),
                }
            }

            fn parse(scalar: Scalar) -> Result<Self, ScalarError> {
                scalar.$parse()
            }

            fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
                B::$read(src, dst)
            }

            fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]) {
                B::$write(src, dst)
            }

            fn write_ascii(self, out: &mut String) {
                write_integer!(self, out)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_element!(u16, UInt16, to_uint, read_u16_into, write_u16_into);
impl_element!(i16, Int16, to_int, read_i16_into, write_i16_into);
impl_element!(u32, UInt32, to_uint, read_u32_into, write_u32_into);
impl_element!(i32, Int32, to_int, read_i32_into, write_i32_into);
impl_element!(u64, UInt64, to_u64, read_u64_into, write_u64_into);
impl_element!(i64, Int64, to_i64, read_i64_into, write_i64_into);

impl private::Sealed for u8 {}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::UInt8;

    fn view(buffer: &Buffer) -> Option<&[Self]> {
        match buffer {
            Buffer::UInt8(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    fn unwrap(buffer: Buffer) -> Result<Vec<Self>, Buffer> {
        match buffer {
            Buffer::UInt8(x) => Ok(x),
            x => Err(x),
        }
    }

    fn parse(scalar: Scalar) -> Result<Self, ScalarError> {
        scalar.to_uint()
    }

    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
        dst.copy_from_slice(src)
    }

    fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]) {
        dst.copy_from_slice(src)
    }

    fn write_ascii(self, out: &mut String) {
        write_integer!(self, out)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl private::Sealed for i8 {}

impl Element for i8 {
    const DATA_TYPE: DataType = DataType::Int8;

    fn view(buffer: &Buffer) -> Option<&[Self]> {
        match buffer {
            Buffer::Int8(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    fn unwrap(buffer: Buffer) -> Result<Vec<Self>, Buffer> {
        match buffer {
            Buffer::Int8(x) => Ok(x),
            x => Err(x),
        }
    }

    fn parse(scalar: Scalar) -> Result<Self, ScalarError> {
        scalar.to_int()
    }

    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s as i8;
        }
    }

    fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s as u8;
        }
    }

    fn write_ascii(self, out: &mut String) {
        write_integer!(self, out)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

macro_rules! impl_float_element {
    ($ty:ty, $variant:ident, $parse:ident, $read:ident, $write:ident) => {
        impl private::Sealed for $ty {}

        impl Element for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn view(buffer: &Buffer) -> Option<&[Self]> {
                match buffer {
                    Buffer::$variant(x) => Some(x.as_slice()),
                    _ => None,
                }
            }

            fn unwrap(buffer: Buffer) -> Result<Vec<Self>, Buffer> {
                match buffer {
                    Buffer::$variant(x) => Ok(x),
                    x => Err(x),
                }
            }

            fn parse(scalar: Scalar) -> Result<Self, ScalarError> {
                scalar.$parse()
            }

            fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
                B::$read(src, dst)
            }

            fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]) {
                B::$write(src, dst)
            }

            // Display prints the shortest text that parses back to the same value
            fn write_ascii(self, out: &mut String) {
                use std::fmt::Write;
                let _ = write!(out, "{}", self);
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_float_element!(f32, Float32, to_f32, read_f32_into, write_f32_into);
impl_float_element!(f64, Float64, to_f64, read_f64_into, write_f64_into);

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_buffer_accessors() {
        let buffer = Buffer::from(vec![6402i32, 17923, 25602]);
        assert_eq!(buffer.data_type(), DataType::Int32);
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.get_f64(1), Some(17923.0));
        assert_eq!(buffer.get_f64(3), None);
        assert_eq!(buffer.to_f64_vec(), vec![6402.0, 17923.0, 25602.0]);
        assert_eq!(buffer.clone().into_vec::<i32>(), Ok(vec![6402, 17923, 25602]));
        assert_eq!(buffer.clone().into_vec::<u32>(), Err(buffer));
    }

    #[test]
    fn test_ascii_writing() {
        let mut out = String::new();
        (-16.07201f32).write_ascii(&mut out);
        out.push(' ');
        9182740i32.write_ascii(&mut out);
        out.push(' ');
        (-3i8).write_ascii(&mut out);
        assert_eq!(out, "-16.07201 9182740 -3");
    }

    #[test]
    fn test_byte_order_reads() {
        let mut little = [0f32; 1];
        let mut big = [0f32; 1];
        f32::read_into::<LittleEndian>(&1.5f32.to_le_bytes(), &mut little);
        f32::read_into::<BigEndian>(&1.5f32.to_be_bytes(), &mut big);
        assert_eq!(little, big);

        let mut signed = [0i8; 2];
        i8::read_into::<BigEndian>(&[0xff, 0x01], &mut signed);
        assert_eq!(signed, [-1, 1]);
    }

    #[quickcheck]
    fn f32_ascii_roundtrip(x: f32) -> bool {
        let mut out = String::new();
        x.write_ascii(&mut out);
        let back = f32::parse(Scalar::new(out.as_bytes())).unwrap();
        back == x || (back.is_nan() && x.is_nan())
    }

    #[quickcheck]
    fn i16_ascii_roundtrip(x: i16) -> bool {
        let mut out = String::new();
        x.write_ascii(&mut out);
        i16::parse(Scalar::new(out.as_bytes())) == Ok(x)
    }
}
