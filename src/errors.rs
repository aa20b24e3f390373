use crate::vocab::Category;
use crate::ScalarError;
use std::fmt;

/// An error that can occur when reading or writing a GIFTI document
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error, returning the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset in the XML input that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }

    /// Returns true if the input was not well formed or its elements were
    /// arranged in a way the format does not allow
    pub fn is_parse(&self) -> bool {
        matches!(
            *self.0,
            ErrorKind::Xml { .. }
                | ErrorKind::UnmatchedClose { .. }
                | ErrorKind::UnexpectedElement { .. }
                | ErrorKind::Eof
                | ErrorKind::MissingRoot
        )
    }

    /// Returns true if an array header or payload could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(*self.0, ErrorKind::Decode(_))
    }

    /// Returns true if the error happened while writing out a document
    pub fn is_write(&self) -> bool {
        matches!(*self.0, ErrorKind::Io(_) | ErrorKind::ExternalWrite { .. })
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The XML tokenizer rejected the input
    Xml { message: String, offset: usize },

    /// A close tag was encountered that does not match the open element
    /// (`expected` is `None` when no element was open)
    UnmatchedClose {
        name: String,
        expected: Option<String>,
        offset: usize,
    },

    /// An element appeared where the format does not allow it
    UnexpectedElement {
        name: String,
        parent: Option<String>,
        offset: usize,
    },

    /// Input ended while elements were still open
    Eof,

    /// The input did not contain a `GIFTI` root element
    MissingRoot,

    /// An array header or payload could not be decoded
    Decode(DecodeError),

    /// An inline array was requested to be written as an external file reference
    ExternalWrite { array: usize },

    /// The destination could not be written
    Io(std::io::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::Xml { offset, .. } => Some(offset),
            ErrorKind::UnmatchedClose { offset, .. } => Some(offset),
            ErrorKind::UnexpectedElement { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Decode(ref err) => Some(err),
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Xml {
                ref message,
                offset,
            } => write!(f, "malformed xml (offset: {}): {}", offset, message),
            ErrorKind::UnmatchedClose {
                ref name,
                expected: Some(ref expected),
                offset,
            } => write!(
                f,
                "close tag </{}> does not match open element <{}> (offset: {})",
                name, expected, offset
            ),
            ErrorKind::UnmatchedClose {
                ref name,
                expected: None,
                offset,
            } => write!(
                f,
                "close tag </{}> encountered with no open element (offset: {})",
                name, offset
            ),
            ErrorKind::UnexpectedElement {
                ref name,
                parent: Some(ref parent),
                offset,
            } => write!(
                f,
                "element <{}> is not allowed inside <{}> (offset: {})",
                name, parent, offset
            ),
            ErrorKind::UnexpectedElement {
                ref name,
                parent: None,
                offset,
            } => write!(
                f,
                "element <{}> is not allowed at the top level (offset: {})",
                name, offset
            ),
            ErrorKind::Eof => write!(f, "unexpected end of file, elements left open"),
            ErrorKind::MissingRoot => write!(f, "no GIFTI root element found"),
            ErrorKind::Decode(ref err) => write!(f, "decode error: {}", err),
            ErrorKind::ExternalWrite { array } => write!(
                f,
                "data array {} holds inline data and cannot be written as an external file",
                array
            ),
            ErrorKind::Io(ref err) => write!(f, "io error: {}", err),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Error::new(ErrorKind::Decode(error))
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

/// A data array could not be decoded
#[derive(Debug)]
pub struct DecodeError {
    pub(crate) array: Option<usize>,
    pub(crate) kind: DecodeErrorKind,
}

impl DecodeError {
    pub(crate) fn new(array: Option<usize>, kind: DecodeErrorKind) -> Self {
        DecodeError { array, kind }
    }

    /// Zero based position of the data array that failed (if the failure
    /// belongs to an array)
    pub fn array(&self) -> Option<usize> {
        self.array
    }

    /// Return the underlying error kind.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

/// The type of a decode error.
#[derive(Debug)]
pub enum DecodeErrorKind {
    /// A vocabulary token was not recognized
    UnknownToken { category: Category, token: String },

    /// A required attribute was absent
    MissingAttribute {
        element: &'static str,
        attribute: String,
    },

    /// An attribute held a value that could not be interpreted
    InvalidAttribute {
        element: &'static str,
        attribute: String,
        value: String,
    },

    /// An ASCII literal could not be converted to the declared type
    InvalidLiteral(ScalarError),

    /// The payload was not valid base64
    Base64(base64::DecodeError),

    /// The base64 decoded payload could not be decompressed
    Inflate(std::io::Error),

    /// The decoded byte count is not a multiple of the element width
    InvalidLength { len: usize, width: usize },

    /// The decoded element count disagrees with the declared dimensions
    ShapeMismatch { expected: usize, actual: usize },

    /// A buffer's element type disagrees with the declared data type
    TypeMismatch {
        expected: crate::DataType,
        actual: crate::DataType,
    },

    /// A data array ended without its payload
    MissingData,
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            DecodeErrorKind::InvalidLiteral(ref err) => Some(err),
            DecodeErrorKind::Base64(ref err) => Some(err),
            DecodeErrorKind::Inflate(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(array) = self.array {
            write!(f, "data array {}: ", array)?;
        }

        match self.kind {
            DecodeErrorKind::UnknownToken {
                category,
                ref token,
            } => write!(f, "unrecognized {} token: {:?}", category, token),
            DecodeErrorKind::MissingAttribute {
                element,
                ref attribute,
            } => write!(f, "<{}> is missing the {} attribute", element, attribute),
            DecodeErrorKind::InvalidAttribute {
                element,
                ref attribute,
                ref value,
            } => write!(
                f,
                "<{}> has an invalid {} attribute: {:?}",
                element, attribute, value
            ),
            DecodeErrorKind::InvalidLiteral(ref e) => write!(f, "invalid literal: {}", e),
            DecodeErrorKind::Base64(ref e) => write!(f, "invalid base64 payload: {}", e),
            DecodeErrorKind::Inflate(ref e) => write!(f, "unable to inflate payload: {}", e),
            DecodeErrorKind::InvalidLength { len, width } => write!(
                f,
                "payload of {} bytes is not a multiple of the {} byte element width",
                len, width
            ),
            DecodeErrorKind::ShapeMismatch { expected, actual } => write!(
                f,
                "dimensions declare {} elements but the payload holds {}",
                expected, actual
            ),
            DecodeErrorKind::TypeMismatch { expected, actual } => write!(
                f,
                "declared data type {} but the buffer holds {}",
                expected, actual
            ),
            DecodeErrorKind::MissingData => write!(f, "no Data element found"),
        }
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError::new(None, kind)
    }
}

impl From<ScalarError> for DecodeErrorKind {
    fn from(error: ScalarError) -> Self {
        DecodeErrorKind::InvalidLiteral(error)
    }
}
