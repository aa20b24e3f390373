//! Conversion between data array payload text and typed buffers.
//!
//! A payload is the character data of a `<Data>` element. Depending on the
//! array's encoding it is either whitespace separated literals, base64 of the
//! raw element bytes, or base64 of zlib compressed element bytes. Decoding
//! always produces a row-major [`Buffer`] of native values; encoding lays the
//! buffer back out in the array's declared index order and byte order.

use crate::buffer::{visit, Buffer, Element};
use crate::data::{is_whitespace, tokens};
use crate::scalar::Scalar;
use crate::util::element_count;
use crate::{
    ArrayHeader, DataType, DecodeError, DecodeErrorKind, Encoding, Endian, Error, IndexOrder,
    Vocabulary,
};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use byteorder::{BigEndian, LittleEndian};
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::trace;
use std::borrow::Cow;
use std::io::{Read, Write};

/// Producers disagree on trailing padding, so accept it either way and always
/// emit it.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Bind `$T` to the rust type of a data type and evaluate `$body`
macro_rules! with_element {
    ($dtype:expr, $T:ident => $body:expr) => {
        match $dtype {
            DataType::UInt8 => {
                type $T = u8;
                $body
            }
            DataType::Int8 => {
                type $T = i8;
                $body
            }
            DataType::UInt16 => {
                type $T = u16;
                $body
            }
            DataType::Int16 => {
                type $T = i16;
                $body
            }
            DataType::UInt32 => {
                type $T = u32;
                $body
            }
            DataType::Int32 => {
                type $T = i32;
                $body
            }
            DataType::UInt64 => {
                type $T = u64;
                $body
            }
            DataType::Int64 => {
                type $T = i64;
                $body
            }
            DataType::Float32 => {
                type $T = f32;
                $body
            }
            DataType::Float64 => {
                type $T = f64;
                $body
            }
        }
    };
}

/// Decode the text of a `<Data>` element into a row-major buffer.
///
/// ```
/// use gifti::{codec, ArrayHeader, DataType, Encoding};
///
/// let header = ArrayHeader::new(DataType::Int32, vec![2, 2]).with_encoding(Encoding::Base64);
/// let buffer = codec::decode_payload(&header, "AQAAAAIAAAAD\nAAAABAAAAA==").unwrap();
/// assert_eq!(buffer.as_slice::<i32>(), Some(&[1, 2, 3, 4][..]));
/// ```
pub fn decode_payload(header: &ArrayHeader, text: &str) -> Result<Buffer, DecodeErrorKind> {
    let width = header.data_type.element_size();
    let expected = element_count(&header.dims).ok_or_else(|| dims_overflow(header))?;
    let expected_bytes = expected
        .checked_mul(width)
        .ok_or_else(|| dims_overflow(header))?;

    let buffer = match header.encoding {
        Encoding::Ascii => decode_ascii(text.as_bytes(), header.data_type, expected)?,
        Encoding::Base64 => {
            let bytes = decode_base64(text.as_bytes())?;
            decode_binary(&bytes, header.data_type, header.endian)?
        }
        Encoding::GzipBase64 => {
            // one element past the declared size is enough to report the mismatch
            let compressed = decode_base64(text.as_bytes())?;
            let bytes = inflate(&compressed, expected_bytes.saturating_add(width))?;
            decode_binary(&bytes, header.data_type, header.endian)?
        }
        Encoding::External => return Err(DecodeErrorKind::MissingData),
    };

    if buffer.len() != expected {
        return Err(DecodeErrorKind::ShapeMismatch {
            expected,
            actual: buffer.len(),
        });
    }

    trace!(
        "decoded {} {} elements from {} payload",
        expected,
        header.data_type,
        header.encoding.canonical_token()
    );

    Ok(match header.index_order {
        IndexOrder::RowMajor => buffer,
        IndexOrder::ColumnMajor => reorder_buffer(&buffer, &header.dims, IndexOrder::RowMajor),
    })
}

/// Render a row-major buffer as the text of a `<Data>` element using the
/// header's encoding, byte order, and index order. Base64 output never
/// contains line breaks.
///
/// ```
/// use gifti::{codec, ArrayHeader, Buffer, DataType, Encoding};
///
/// let header = ArrayHeader::new(DataType::Int32, vec![2, 2]).with_encoding(Encoding::Base64);
/// let buffer = Buffer::from(vec![1i32, 2, 3, 4]);
/// assert_eq!(codec::encode_payload(&buffer, &header).unwrap(), "AQAAAAIAAAADAAAABAAAAA==");
/// ```
pub fn encode_payload(buffer: &Buffer, header: &ArrayHeader) -> Result<String, Error> {
    if buffer.data_type() != header.data_type {
        let kind = DecodeErrorKind::TypeMismatch {
            expected: header.data_type,
            actual: buffer.data_type(),
        };
        return Err(Error::from(DecodeError::new(None, kind)));
    }

    let ordered = match header.index_order {
        IndexOrder::RowMajor => Cow::Borrowed(buffer),
        IndexOrder::ColumnMajor => {
            Cow::Owned(reorder_buffer(buffer, &header.dims, IndexOrder::ColumnMajor))
        }
    };

    let text = match header.encoding {
        Encoding::Ascii => encode_ascii(&ordered, &header.dims, header.index_order),
        Encoding::Base64 => BASE64.encode(to_bytes(&ordered, header.endian)),
        Encoding::GzipBase64 => {
            let raw = to_bytes(&ordered, header.endian);
            let sink = Vec::with_capacity(raw.len() / 2);
            let mut encoder = ZlibEncoder::new(sink, Compression::default());
            encoder.write_all(&raw)?;
            BASE64.encode(encoder.finish()?)
        }
        Encoding::External => String::new(),
    };

    trace!(
        "encoded {} {} elements as {} payload of {} bytes",
        buffer.len(),
        header.data_type,
        header.encoding.canonical_token(),
        text.len()
    );

    Ok(text)
}

fn dims_overflow(header: &ArrayHeader) -> DecodeErrorKind {
    DecodeErrorKind::InvalidAttribute {
        element: "DataArray",
        attribute: String::from("Dim"),
        value: format!("{:?}", header.dims),
    }
}

fn decode_ascii(data: &[u8], dtype: DataType, expected: usize) -> Result<Buffer, DecodeErrorKind> {
    with_element!(dtype, T => {
        // every literal takes at least one byte
        let mut out: Vec<T> = Vec::with_capacity(expected.min(data.len()));
        for token in tokens(data) {
            out.push(T::parse(Scalar::new(token))?);
        }
        Ok(Buffer::from(out))
    })
}

/// Base64 decode after removing any whitespace, as producers may hard wrap
/// the text
fn decode_base64(data: &[u8]) -> Result<Vec<u8>, DecodeErrorKind> {
    let compact = strip_whitespace(data);
    BASE64.decode(compact.as_ref()).map_err(DecodeErrorKind::Base64)
}

pub(crate) fn strip_whitespace(data: &[u8]) -> Cow<[u8]> {
    if data.iter().any(|&x| is_whitespace(x)) {
        Cow::Owned(data.iter().copied().filter(|&x| !is_whitespace(x)).collect())
    } else {
        Cow::Borrowed(data)
    }
}

/// Decompress a zlib stream, or a gzip member when the gzip magic is present.
/// At most `limit` bytes are inflated.
fn inflate(data: &[u8], limit: usize) -> Result<Vec<u8>, DecodeErrorKind> {
    let mut out = Vec::with_capacity(limit.min(data.len().saturating_mul(4)));
    let limit = u64::try_from(limit).unwrap_or(u64::MAX);
    let res = if data.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(data).take(limit).read_to_end(&mut out)
    } else {
        ZlibDecoder::new(data).take(limit).read_to_end(&mut out)
    };

    res.map(|_| out).map_err(DecodeErrorKind::Inflate)
}

fn decode_binary(bytes: &[u8], dtype: DataType, endian: Endian) -> Result<Buffer, DecodeErrorKind> {
    with_element!(dtype, T => read_elements::<T>(bytes, endian).map(Buffer::from))
}

fn read_elements<T: Element>(bytes: &[u8], endian: Endian) -> Result<Vec<T>, DecodeErrorKind> {
    let width = T::DATA_TYPE.element_size();
    if bytes.len() % width != 0 {
        return Err(DecodeErrorKind::InvalidLength {
            len: bytes.len(),
            width,
        });
    }

    let mut out = vec![T::default(); bytes.len() / width];
    match endian {
        Endian::Little => T::read_into::<LittleEndian>(bytes, &mut out),
        Endian::Big => T::read_into::<BigEndian>(bytes, &mut out),
    }
    Ok(out)
}

fn to_bytes(buffer: &Buffer, endian: Endian) -> Vec<u8> {
    visit!(buffer, v => write_elements(v, endian))
}

fn write_elements<T: Element>(data: &[T], endian: Endian) -> Vec<u8> {
    let mut out = vec![0u8; data.len() * T::DATA_TYPE.element_size()];
    match endian {
        Endian::Little => T::write_into::<LittleEndian>(data, &mut out),
        Endian::Big => T::write_into::<BigEndian>(data, &mut out),
    }
    out
}

/// One line per row, where a row is the run of elements along the fastest
/// varying axis. One dimensional arrays get one value per line.
fn encode_ascii(buffer: &Buffer, dims: &[usize], order: IndexOrder) -> String {
    let row = match (dims.len(), order) {
        (0 | 1, _) => 1,
        (_, IndexOrder::RowMajor) => dims[dims.len() - 1],
        (_, IndexOrder::ColumnMajor) => dims[0],
    }
    .max(1);

    visit!(buffer, v => {
        let mut out = String::with_capacity(v.len() * 8);
        for (i, x) in v.iter().enumerate() {
            if i != 0 {
                out.push(if i % row == 0 { '\n' } else { ' ' });
            }
            x.write_ascii(&mut out);
        }
        out
    })
}

fn reorder_buffer(buffer: &Buffer, dims: &[usize], to: IndexOrder) -> Buffer {
    visit!(buffer, v => Buffer::from(reorder(v, dims, to)))
}

/// Reorder flattened elements between column-major and row-major layouts.
///
/// `to` names the layout of the output; the input is assumed to be in the
/// other layout.
pub(crate) fn reorder<T: Copy>(data: &[T], dims: &[usize], to: IndexOrder) -> Vec<T> {
    let mut out = data.to_vec();
    if dims.iter().filter(|&&d| d > 1).count() <= 1 {
        return out;
    }

    let mut strides = Vec::with_capacity(dims.len());
    let mut acc = 1;
    for &d in dims {
        strides.push(acc);
        acc *= d;
    }

    // walk every position in row-major order, tracking its column-major offset
    let mut index = vec![0usize; dims.len()];
    for i in 0..data.len() {
        let f: usize = index.iter().zip(&strides).map(|(a, b)| a * b).sum();
        match to {
            IndexOrder::RowMajor => out[i] = data[f],
            IndexOrder::ColumnMajor => out[f] = data[i],
        }

        for axis in (0..dims.len()).rev() {
            index[axis] += 1;
            if index[axis] < dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }

    out
}
