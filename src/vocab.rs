//! The fixed vocabulary of a GIFTI data array header.
//!
//! Every enumerated header attribute (`Encoding`, `Endian`, `DataType`,
//! `ArrayIndexingOrder`) is normalized through a [`Vocabulary`] table. A table
//! lists the canonical spelling of each value first followed by any deprecated
//! spellings that older writers produced. Lookups accept every spelling while
//! [`Vocabulary::canonical_token`] only ever yields the canonical one, so
//! documents written by this crate never contain the deprecated forms.
//!
//! ```
//! use gifti::{normalize, Encoding, Endian, Vocabulary};
//!
//! let enc: Encoding = normalize("GIFTI_ENCODING_B64GZ").unwrap();
//! assert_eq!(enc, Encoding::GzipBase64);
//! assert_eq!(enc.canonical_token(), "GZipBase64Binary");
//!
//! let endian: Endian = normalize("GIFTI_ENDIAN_LITTLE").unwrap();
//! assert_eq!(endian.canonical_token(), "LittleEndian");
//! ```

use crate::DecodeErrorKind;
use std::fmt;

/// The kind of header attribute a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Encoding,
    Endian,
    DataType,
    IndexOrder,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Encoding => "encoding",
            Category::Endian => "endian",
            Category::DataType => "data type",
            Category::IndexOrder => "array indexing order",
        };
        f.write_str(name)
    }
}

/// A closed set of header values with textual spellings
pub trait Vocabulary: Copy + PartialEq + Sized + 'static {
    /// The attribute these values belong to
    const CATEGORY: Category;

    /// Every accepted spelling. The first spelling listed for a value is its
    /// canonical one.
    const TOKENS: &'static [(&'static str, Self)];

    /// The canonical spelling of this value
    fn canonical_token(self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(token, _)| *token)
            .unwrap_or_default()
    }

    /// Returns true if `token` is an accepted but deprecated spelling
    fn is_deprecated(token: &str) -> bool {
        match normalize::<Self>(token) {
            Ok(value) => value.canonical_token() != token.trim(),
            Err(_) => false,
        }
    }
}

/// Convert any accepted spelling of a header value into its canonical value.
///
/// Leading and trailing whitespace is ignored.
///
/// ```
/// use gifti::{normalize, DataType};
/// assert_eq!(normalize::<DataType>(" NIFTI_TYPE_INT32 ").unwrap(), DataType::Int32);
/// assert!(normalize::<DataType>("NIFTI_TYPE_COMPLEX64").is_err());
/// ```
pub fn normalize<T: Vocabulary>(raw: &str) -> Result<T, DecodeErrorKind> {
    let token = raw.trim();
    T::TOKENS
        .iter()
        .find(|(spelling, _)| *spelling == token)
        .map(|(_, value)| *value)
        .ok_or_else(|| DecodeErrorKind::UnknownToken {
            category: T::CATEGORY,
            token: token.to_string(),
        })
}

/// A canonical value of any category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalValue {
    Encoding(Encoding),
    Endian(Endian),
    DataType(DataType),
    IndexOrder(IndexOrder),
}

impl CanonicalValue {
    /// The category this value belongs to
    pub fn category(&self) -> Category {
        match self {
            CanonicalValue::Encoding(_) => Category::Encoding,
            CanonicalValue::Endian(_) => Category::Endian,
            CanonicalValue::DataType(_) => Category::DataType,
            CanonicalValue::IndexOrder(_) => Category::IndexOrder,
        }
    }

    /// The canonical spelling of this value
    pub fn token(self) -> &'static str {
        match self {
            CanonicalValue::Encoding(x) => x.canonical_token(),
            CanonicalValue::Endian(x) => x.canonical_token(),
            CanonicalValue::DataType(x) => x.canonical_token(),
            CanonicalValue::IndexOrder(x) => x.canonical_token(),
        }
    }
}

/// Normalize a token when its category is only known at runtime
///
/// ```
/// use gifti::{normalize_token, CanonicalValue, Category, Endian};
/// let value = normalize_token("GIFTI_ENDIAN_BIG", Category::Endian).unwrap();
/// assert_eq!(value, CanonicalValue::Endian(Endian::Big));
/// assert_eq!(value.token(), "BigEndian");
/// ```
pub fn normalize_token(raw: &str, category: Category) -> Result<CanonicalValue, DecodeErrorKind> {
    match category {
        Category::Encoding => normalize(raw).map(CanonicalValue::Encoding),
        Category::Endian => normalize(raw).map(CanonicalValue::Endian),
        Category::DataType => normalize(raw).map(CanonicalValue::DataType),
        Category::IndexOrder => normalize(raw).map(CanonicalValue::IndexOrder),
    }
}

/// How a data array payload is represented in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Encoding {
    /// Whitespace separated literals
    Ascii,
    /// Base64 of the raw element bytes
    Base64,
    /// Base64 of the zlib compressed element bytes
    GzipBase64,
    /// Raw element bytes stored in a separate file
    External,
}

impl Encoding {
    /// The integer code for this encoding
    pub fn code(self) -> u8 {
        match self {
            Encoding::Ascii => 1,
            Encoding::Base64 => 2,
            Encoding::GzipBase64 => 3,
            Encoding::External => 4,
        }
    }

    /// Returns true if the payload is stored inside the document
    pub fn is_inline(self) -> bool {
        self != Encoding::External
    }
}

impl Vocabulary for Encoding {
    const CATEGORY: Category = Category::Encoding;
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("ASCII", Encoding::Ascii),
        ("Base64Binary", Encoding::Base64),
        ("GZipBase64Binary", Encoding::GzipBase64),
        ("ExternalFileBinary", Encoding::External),
        ("GIFTI_ENCODING_ASCII", Encoding::Ascii),
        ("GIFTI_ENCODING_B64BIN", Encoding::Base64),
        ("GIFTI_ENCODING_B64GZ", Encoding::GzipBase64),
        ("GIFTI_ENCODING_EXTBIN", Encoding::External),
    ];
}

/// Byte order of binary payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    /// The integer code for this byte order (big is 1, little is 2)
    pub fn code(self) -> u8 {
        match self {
            Endian::Big => 1,
            Endian::Little => 2,
        }
    }

    /// Byte order of the running machine
    pub fn native() -> Endian {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

impl Vocabulary for Endian {
    const CATEGORY: Category = Category::Endian;
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("BigEndian", Endian::Big),
        ("LittleEndian", Endian::Little),
        ("GIFTI_ENDIAN_BIG", Endian::Big),
        ("GIFTI_ENDIAN_LITTLE", Endian::Little),
    ];
}

/// Which axis varies fastest in a flattened payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndexOrder {
    /// The last axis varies fastest (C order)
    RowMajor,
    /// The first axis varies fastest (Fortran order)
    ColumnMajor,
}

impl IndexOrder {
    pub fn code(self) -> u8 {
        match self {
            IndexOrder::RowMajor => 1,
            IndexOrder::ColumnMajor => 2,
        }
    }
}

impl Vocabulary for IndexOrder {
    const CATEGORY: Category = Category::IndexOrder;
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("RowMajorOrder", IndexOrder::RowMajor),
        ("ColumnMajorOrder", IndexOrder::ColumnMajor),
    ];
}

/// Element type of a data array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DataType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
}

impl DataType {
    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 => 1,
            DataType::UInt16 | DataType::Int16 => 2,
            DataType::UInt32 | DataType::Int32 | DataType::Float32 => 4,
            DataType::UInt64 | DataType::Int64 | DataType::Float64 => 8,
        }
    }

    /// The NIfTI code for this data type
    pub fn code(self) -> i16 {
        match self {
            DataType::UInt8 => 2,
            DataType::Int16 => 4,
            DataType::Int32 => 8,
            DataType::Float32 => 16,
            DataType::Float64 => 64,
            DataType::Int8 => 256,
            DataType::UInt16 => 512,
            DataType::UInt32 => 768,
            DataType::Int64 => 1024,
            DataType::UInt64 => 1280,
        }
    }

    /// Look up a data type from its NIfTI code
    pub fn from_code(code: i16) -> Option<DataType> {
        match code {
            2 => Some(DataType::UInt8),
            4 => Some(DataType::Int16),
            8 => Some(DataType::Int32),
            16 => Some(DataType::Float32),
            64 => Some(DataType::Float64),
            256 => Some(DataType::Int8),
            512 => Some(DataType::UInt16),
            768 => Some(DataType::UInt32),
            1024 => Some(DataType::Int64),
            1280 => Some(DataType::UInt64),
            _ => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_token())
    }
}

impl Vocabulary for DataType {
    const CATEGORY: Category = Category::DataType;
    const TOKENS: &'static [(&'static str, Self)] = &[
        ("NIFTI_TYPE_UINT8", DataType::UInt8),
        ("NIFTI_TYPE_INT8", DataType::Int8),
        ("NIFTI_TYPE_UINT16", DataType::UInt16),
        ("NIFTI_TYPE_INT16", DataType::Int16),
        ("NIFTI_TYPE_UINT32", DataType::UInt32),
        ("NIFTI_TYPE_INT32", DataType::Int32),
        ("NIFTI_TYPE_UINT64", DataType::UInt64),
        ("NIFTI_TYPE_INT64", DataType::Int64),
        ("NIFTI_TYPE_FLOAT32", DataType::Float32),
        ("NIFTI_TYPE_FLOAT64", DataType::Float64),
        // nifti1.h names
        ("DT_UNSIGNED_CHAR", DataType::UInt8),
        ("DT_SIGNED_SHORT", DataType::Int16),
        ("DT_SIGNED_INT", DataType::Int32),
        ("DT_FLOAT", DataType::Float32),
        ("DT_DOUBLE", DataType::Float64),
        ("DT_UINT8", DataType::UInt8),
        ("DT_INT16", DataType::Int16),
        ("DT_INT32", DataType::Int32),
        ("DT_FLOAT32", DataType::Float32),
        ("DT_FLOAT64", DataType::Float64),
        ("DT_INT8", DataType::Int8),
        ("DT_UINT16", DataType::UInt16),
        ("DT_UINT32", DataType::UInt32),
        ("DT_INT64", DataType::Int64),
        ("DT_UINT64", DataType::UInt64),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("ASCII", Encoding::Ascii)]
    #[case("Base64Binary", Encoding::Base64)]
    #[case("GZipBase64Binary", Encoding::GzipBase64)]
    #[case("ExternalFileBinary", Encoding::External)]
    #[case("GIFTI_ENCODING_ASCII", Encoding::Ascii)]
    #[case("GIFTI_ENCODING_B64BIN", Encoding::Base64)]
    #[case("GIFTI_ENCODING_B64GZ", Encoding::GzipBase64)]
    #[case("GIFTI_ENCODING_EXTBIN", Encoding::External)]
    #[case("\n  Base64Binary\t", Encoding::Base64)]
    fn test_encoding_tokens(#[case] token: &str, #[case] expected: Encoding) {
        assert_eq!(normalize::<Encoding>(token).unwrap(), expected);
    }

    #[rstest]
    #[case("LittleEndian", Endian::Little)]
    #[case("BigEndian", Endian::Big)]
    #[case("GIFTI_ENDIAN_LITTLE", Endian::Little)]
    #[case("GIFTI_ENDIAN_BIG", Endian::Big)]
    fn test_endian_tokens(#[case] token: &str, #[case] expected: Endian) {
        assert_eq!(normalize::<Endian>(token).unwrap(), expected);
    }

    #[test]
    fn test_canonical_tokens_are_current() {
        assert_eq!(Encoding::Base64.canonical_token(), "Base64Binary");
        assert_eq!(Encoding::GzipBase64.canonical_token(), "GZipBase64Binary");
        assert_eq!(Endian::Little.canonical_token(), "LittleEndian");
        assert_eq!(Endian::Big.canonical_token(), "BigEndian");
        assert_eq!(DataType::Float32.canonical_token(), "NIFTI_TYPE_FLOAT32");
        assert_eq!(IndexOrder::ColumnMajor.canonical_token(), "ColumnMajorOrder");
    }

    #[test]
    fn test_every_spelling_maps_back_to_a_canonical_spelling() {
        fn check<T: Vocabulary + fmt::Debug>() {
            for (token, value) in T::TOKENS {
                let canonical = value.canonical_token();
                assert!(!canonical.starts_with("GIFTI_"), "{:?}", value);
                assert!(!canonical.starts_with("DT_"), "{:?}", value);
                assert_eq!(normalize::<T>(token).unwrap(), *value);
                assert_eq!(normalize::<T>(canonical).unwrap(), *value);
            }
        }

        check::<Encoding>();
        check::<Endian>();
        check::<DataType>();
        check::<IndexOrder>();
    }

    #[test]
    fn test_deprecated_detection() {
        assert!(Encoding::is_deprecated("GIFTI_ENCODING_B64BIN"));
        assert!(!Encoding::is_deprecated("Base64Binary"));
        assert!(Endian::is_deprecated("GIFTI_ENDIAN_LITTLE"));
        assert!(!Endian::is_deprecated("Unknown"));
    }

    #[test]
    fn test_unknown_token() {
        match normalize::<Endian>("MiddleEndian") {
            Err(DecodeErrorKind::UnknownToken { category, token }) => {
                assert_eq!(category, Category::Endian);
                assert_eq!(token, "MiddleEndian");
            }
            x => panic!("unexpected result: {:?}", x),
        }
    }

    #[test]
    fn test_dynamic_normalize() {
        let value = normalize_token("GIFTI_ENCODING_B64GZ", Category::Encoding).unwrap();
        assert_eq!(value, CanonicalValue::Encoding(Encoding::GzipBase64));
        assert_eq!(value.category(), Category::Encoding);
        assert_eq!(value.token(), "GZipBase64Binary");
        assert!(normalize_token("LittleEndian", Category::Encoding).is_err());
    }

    #[test]
    fn test_data_type_codes() {
        for (_, dtype) in DataType::TOKENS {
            assert_eq!(DataType::from_code(dtype.code()), Some(*dtype));
        }
        assert_eq!(DataType::from_code(2), Some(DataType::UInt8));
        assert_eq!(DataType::from_code(3), None);
    }
}
