use crate::buffer::{Buffer, Element};
use crate::codes;
use crate::util::element_count;
use crate::{
    CoordinateSystem, DataType, DecodeError, DecodeErrorKind, Encoding, Endian, Error, IndexOrder,
    MetaData,
};

/// Attributes of a `<DataArray>` element that describe how its payload is
/// typed, shaped, and encoded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayHeader {
    /// Semantic tag such as `NIFTI_INTENT_POINTSET`
    pub intent: String,
    pub data_type: DataType,
    pub dims: Vec<usize>,
    pub index_order: IndexOrder,
    pub encoding: Encoding,
    pub endian: Endian,
}

impl ArrayHeader {
    /// A row-major, little endian, gzip compressed header with no intent
    pub fn new(data_type: DataType, dims: Vec<usize>) -> Self {
        ArrayHeader {
            intent: String::from(codes::INTENT_NONE),
            data_type,
            dims,
            index_order: IndexOrder::RowMajor,
            encoding: Encoding::GzipBase64,
            endian: Endian::Little,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = intent.into();
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn with_index_order(mut self, index_order: IndexOrder) -> Self {
        self.index_order = index_order;
        self
    }

    /// Product of the dimensions
    pub fn element_count(&self) -> Option<usize> {
        element_count(&self.dims)
    }
}

/// Location of a data array payload stored outside of the document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExternalFile {
    pub name: String,
    pub offset: u64,
}

/// Where the elements of a data array live
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Payload {
    Inline(Buffer),
    External(ExternalFile),
}

/// A typed, shaped numeric array with its metadata and coordinate system.
///
/// ```
/// use gifti::{codes, DataArray, Encoding};
///
/// let points = vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let array = DataArray::new(points, vec![3, 3])
///     .unwrap()
///     .with_intent(codes::INTENT_POINTSET)
///     .with_encoding(Encoding::Base64);
///
/// assert_eq!(array.dims(), &[3, 3]);
/// assert_eq!(array.values::<f32>().map(|x| x[3]), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataArray {
    header: ArrayHeader,
    payload: Payload,
    metadata: MetaData,
    coordinate_system: CoordinateSystem,
}

impl DataArray {
    /// Create an array holding `data` in row-major order. Fails when the
    /// element count disagrees with `dims`.
    pub fn new(data: impl Into<Buffer>, dims: Vec<usize>) -> Result<Self, Error> {
        let buffer = data.into();
        let header = ArrayHeader::new(buffer.data_type(), dims);
        DataArray::from_parts(header, buffer)
    }

    /// Create an array from an already decoded header and buffer
    pub fn from_parts(header: ArrayHeader, buffer: Buffer) -> Result<Self, Error> {
        check_buffer(&header, &buffer).map_err(|kind| Error::from(DecodeError::new(None, kind)))?;
        Ok(DataArray {
            header,
            payload: Payload::Inline(buffer),
            metadata: MetaData::new(),
            coordinate_system: CoordinateSystem::default(),
        })
    }

    /// Create an array that refers to elements stored in another file. Every
    /// axis must have a nonzero length.
    pub fn external(
        file: ExternalFile,
        data_type: DataType,
        dims: Vec<usize>,
    ) -> Result<Self, Error> {
        check_dims(&dims).map_err(|kind| Error::from(DecodeError::new(None, kind)))?;
        let header = ArrayHeader::new(data_type, dims).with_encoding(Encoding::External);
        Ok(DataArray {
            header,
            payload: Payload::External(file),
            metadata: MetaData::new(),
            coordinate_system: CoordinateSystem::default(),
        })
    }

    pub(crate) fn assemble(
        header: ArrayHeader,
        payload: Payload,
        metadata: MetaData,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        DataArray {
            header,
            payload,
            metadata,
            coordinate_system,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.header.intent = intent.into();
        self
    }

    /// Encoding used when the array is written. Ignored for external arrays.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        if self.is_inline() && encoding.is_inline() {
            self.header.encoding = encoding;
        }
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.header.endian = endian;
        self
    }

    /// Index order used when the array is written. The buffer stays
    /// row-major.
    pub fn with_index_order(mut self, index_order: IndexOrder) -> Self {
        self.header.index_order = index_order;
        self
    }

    pub fn with_metadata(mut self, metadata: MetaData) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_coordinate_system(mut self, coordinate_system: CoordinateSystem) -> Self {
        self.coordinate_system = coordinate_system;
        self
    }

    pub fn header(&self) -> &ArrayHeader {
        &self.header
    }

    pub fn intent(&self) -> &str {
        &self.header.intent
    }

    /// Integer code of the intent, `None` for non-standard intents
    pub fn intent_code(&self) -> Option<i32> {
        codes::intent_code(&self.header.intent)
    }

    pub fn data_type(&self) -> DataType {
        self.header.data_type
    }

    pub fn dims(&self) -> &[usize] {
        &self.header.dims
    }

    pub fn index_order(&self) -> IndexOrder {
        self.header.index_order
    }

    pub fn encoding(&self) -> Encoding {
        self.header.encoding
    }

    pub fn endian(&self) -> Endian {
        self.header.endian
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.payload, Payload::Inline(_))
    }

    /// The decoded elements (row-major), `None` for external arrays
    pub fn buffer(&self) -> Option<&Buffer> {
        match &self.payload {
            Payload::Inline(x) => Some(x),
            Payload::External(_) => None,
        }
    }

    pub fn external_file(&self) -> Option<&ExternalFile> {
        match &self.payload {
            Payload::Inline(_) => None,
            Payload::External(x) => Some(x),
        }
    }

    /// The elements as a typed slice, `None` if `T` is not the element type
    /// or the array is external
    pub fn values<T: Element>(&self) -> Option<&[T]> {
        self.buffer().and_then(|x| x.as_slice())
    }

    /// Replace the inline elements, keeping the rest of the header. The new
    /// buffer must agree with the declared shape and data type.
    pub fn set_buffer(&mut self, buffer: Buffer) -> Result<(), Error> {
        check_buffer(&self.header, &buffer).map_err(|kind| Error::from(DecodeError::new(None, kind)))?;
        if !self.is_inline() {
            self.header.encoding = Encoding::GzipBase64;
        }
        self.payload = Payload::Inline(buffer);
        Ok(())
    }

    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Substitute the metadata wholesale
    pub fn set_metadata(&mut self, metadata: MetaData) {
        self.metadata = metadata;
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn set_coordinate_system(&mut self, coordinate_system: CoordinateSystem) {
        self.coordinate_system = coordinate_system;
    }
}

/// An array has at least one axis and no empty axes
pub(crate) fn check_dims(dims: &[usize]) -> Result<(), DecodeErrorKind> {
    if dims.is_empty() {
        return Err(DecodeErrorKind::InvalidAttribute {
            element: "DataArray",
            attribute: String::from("Dimensionality"),
            value: dims.len().to_string(),
        });
    }

    match dims.iter().position(|&x| x == 0) {
        Some(i) => Err(DecodeErrorKind::InvalidAttribute {
            element: "DataArray",
            attribute: format!("Dim{}", i),
            value: String::from("0"),
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_buffer(header: &ArrayHeader, buffer: &Buffer) -> Result<(), DecodeErrorKind> {
    check_dims(&header.dims)?;
    if buffer.data_type() != header.data_type {
        return Err(DecodeErrorKind::TypeMismatch {
            expected: header.data_type,
            actual: buffer.data_type(),
        });
    }

    let expected = header.element_count().unwrap_or(usize::MAX);
    if expected != buffer.len() {
        return Err(DecodeErrorKind::ShapeMismatch {
            expected,
            actual: buffer.len(),
        });
    }

    Ok(())
}
