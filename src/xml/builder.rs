use super::events::{Attributes, EventHandler};
use crate::array::{check_buffer, check_dims, Payload};
use crate::codec::decode_payload;
use crate::scalar::Scalar;
use crate::transform::IDENTITY;
use crate::{
    codes, normalize, ArrayHeader, CoordinateSystem, DataArray, DataType, DecodeError,
    DecodeErrorKind, Document, Encoding, Endian, Error, ErrorKind, ExternalFile, IndexOrder, Label,
    LabelTable, MetaData, Vocabulary,
};
use log::{debug, warn};

/// Raw attributes of a `<DataArray>` start tag, validated once the payload
/// is reached
#[derive(Debug, Clone, Default)]
pub struct ArrayHeaderBuilder {
    attributes: Attributes,
}

const DATA_ARRAY: &str = "DataArray";

impl ArrayHeaderBuilder {
    pub fn new(attributes: Attributes) -> Self {
        ArrayHeaderBuilder { attributes }
    }

    fn required(&self, name: &str) -> Result<&str, DecodeErrorKind> {
        self.attributes
            .get(name)
            .ok_or_else(|| DecodeErrorKind::MissingAttribute {
                element: DATA_ARRAY,
                attribute: String::from(name),
            })
    }

    fn token<T: Vocabulary>(&self, name: &str, default: Option<T>) -> Result<T, DecodeErrorKind> {
        let raw = match (self.attributes.get(name), default) {
            (Some(raw), _) => raw,
            (None, Some(default)) => return Ok(default),
            (None, None) => self.required(name)?,
        };

        let value = normalize::<T>(raw)?;
        if T::is_deprecated(raw) {
            debug!(
                "accepted deprecated {} token {:?} as {}",
                T::CATEGORY,
                raw.trim(),
                value.canonical_token()
            );
        }
        Ok(value)
    }

    fn dims(&self) -> Result<Vec<usize>, DecodeErrorKind> {
        let raw = self.required("Dimensionality")?;
        let dimensionality = parse_attribute::<usize>(DATA_ARRAY, "Dimensionality", raw)?;
        if dimensionality == 0 {
            return Err(DecodeErrorKind::InvalidAttribute {
                element: DATA_ARRAY,
                attribute: String::from("Dimensionality"),
                value: String::from("0"),
            });
        }

        let dims = (0..dimensionality)
            .map(|i| {
                let name = format!("Dim{}", i);
                let raw = self.required(&name)?;
                parse_attribute::<usize>(DATA_ARRAY, &name, raw)
            })
            .collect::<Result<Vec<_>, _>>()?;
        check_dims(&dims)?;
        Ok(dims)
    }

    /// Validate the collected attributes
    pub fn build(&self) -> Result<ArrayHeader, DecodeErrorKind> {
        let data_type: DataType = self.token("DataType", None)?;
        let encoding: Encoding = self.token("Encoding", None)?;
        let endian: Endian = self.token("Endian", Some(Endian::Little))?;
        let index_order: IndexOrder =
            self.token("ArrayIndexingOrder", Some(IndexOrder::RowMajor))?;
        let dims = self.dims()?;
        let intent = self
            .attributes
            .get("Intent")
            .map(|x| x.trim())
            .unwrap_or(codes::INTENT_NONE);

        Ok(ArrayHeader {
            intent: String::from(intent),
            data_type,
            dims,
            index_order,
            encoding,
            endian,
        })
    }

    /// The external file reference declared by the attributes
    pub fn external_file(&self) -> Result<ExternalFile, DecodeErrorKind> {
        let name = self.required("ExternalFileName")?.trim();
        let offset = match self.attributes.get("ExternalFileOffset").map(|x| x.trim()) {
            None | Some("") => 0,
            Some(raw) => parse_attribute::<u64>(DATA_ARRAY, "ExternalFileOffset", raw)?,
        };

        Ok(ExternalFile {
            name: String::from(name),
            offset,
        })
    }
}

fn parse_attribute<T: std::str::FromStr>(
    element: &'static str,
    attribute: &str,
    raw: &str,
) -> Result<T, DecodeErrorKind> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DecodeErrorKind::InvalidAttribute {
            element,
            attribute: String::from(attribute),
            value: String::from(raw),
        })
}

#[derive(Debug)]
struct ArrayFrame {
    index: usize,
    header: ArrayHeaderBuilder,
    payload: Option<(ArrayHeader, Payload)>,
    metadata: MetaData,
    coordinate_system: Option<CoordinateSystem>,
}

#[derive(Debug, Default)]
struct TransformFrame {
    dataspace: Option<i32>,
    xformspace: Option<i32>,
    matrix: Option<[[f64; 4]; 4]>,
}

#[derive(Debug)]
enum Frame {
    Root {
        version: String,
        declared: Option<usize>,
        metadata: MetaData,
        label_table: Option<LabelTable>,
        arrays: Vec<DataArray>,
    },
    MetaData(MetaData),
    Md {
        name: Option<String>,
        value: Option<String>,
    },
    Name,
    Value,
    LabelTable(LabelTable),
    Label(Attributes),
    DataArray(Box<ArrayFrame>),
    Transform(TransformFrame),
    DataSpace,
    TransformedSpace,
    MatrixData,
    Data,
    Unknown(String),
}

impl Frame {
    fn tag(&self) -> &str {
        match self {
            Frame::Root { .. } => "GIFTI",
            Frame::MetaData(_) => "MetaData",
            Frame::Md { .. } => "MD",
            Frame::Name => "Name",
            Frame::Value => "Value",
            Frame::LabelTable(_) => "LabelTable",
            Frame::Label(_) => "Label",
            Frame::DataArray(_) => DATA_ARRAY,
            Frame::Transform(_) => "CoordinateSystemTransformMatrix",
            Frame::DataSpace => "DataSpace",
            Frame::TransformedSpace => "TransformedSpace",
            Frame::MatrixData => "MatrixData",
            Frame::Data => "Data",
            Frame::Unknown(name) => name.as_str(),
        }
    }

    /// Leaf elements whose character data is collected
    fn is_leaf(&self) -> bool {
        matches!(
            self,
            Frame::Name
                | Frame::Value
                | Frame::Label(_)
                | Frame::DataSpace
                | Frame::TransformedSpace
                | Frame::MatrixData
                | Frame::Data
        )
    }
}

static KNOWN_ELEMENTS: &[&str] = &[
    "GIFTI",
    "MetaData",
    "MD",
    "Name",
    "Value",
    "LabelTable",
    "Label",
    "DataArray",
    "CoordinateSystemTransformMatrix",
    "DataSpace",
    "TransformedSpace",
    "MatrixData",
    "Data",
];

/// Assembles a [`Document`] from XML events.
///
/// A builder holds the state of a single parse and is consumed by
/// [`DocumentBuilder::finish`].
///
/// ```
/// use gifti::xml::{DocumentBuilder, EventSource};
///
/// let data = br#"<GIFTI Version="1.0" NumberOfDataArrays="1">
///   <DataArray Intent="NIFTI_INTENT_SHAPE" DataType="NIFTI_TYPE_INT32"
///     Dimensionality="1" Dim0="3" Encoding="ASCII">
///     <Data>1 2 3</Data>
///   </DataArray>
/// </GIFTI>"#;
///
/// let mut builder = DocumentBuilder::new();
/// EventSource::from_reader(&data[..]).run(&mut builder).unwrap();
/// let doc = builder.finish().unwrap();
/// assert_eq!(doc.arrays()[0].values::<i32>(), Some(&[1, 2, 3][..]));
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    stack: Vec<Frame>,
    text: String,
    document: Option<Document>,
    arrays_started: usize,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder::default()
    }

    /// Complete the build. Fails when elements are still open or no `GIFTI`
    /// element was seen.
    pub fn finish(self) -> Result<Document, Error> {
        if !self.stack.is_empty() {
            return Err(Error::new(ErrorKind::Eof));
        }

        self.document.ok_or_else(|| Error::new(ErrorKind::MissingRoot))
    }

    fn array_index(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|x| match x {
            Frame::DataArray(arr) => Some(arr.index),
            _ => None,
        })
    }

    fn decode_error(&self, kind: DecodeErrorKind) -> Error {
        Error::from(DecodeError::new(self.array_index(), kind))
    }

    fn open(&mut self, name: &str, attributes: &Attributes, offset: usize) -> Result<Frame, Error> {
        let parent = match self.stack.last() {
            Some(parent) => parent,
            None if self.document.is_none() && name == "GIFTI" => return Ok(self.root(attributes)),
            None => {
                return Err(Error::new(ErrorKind::UnexpectedElement {
                    name: String::from(name),
                    parent: None,
                    offset,
                }))
            }
        };

        let frame = match (parent, name) {
            (Frame::Unknown(_), _) => Frame::Unknown(String::from(name)),
            (Frame::Root { .. }, "MetaData") | (Frame::DataArray(_), "MetaData") => {
                Frame::MetaData(MetaData::new())
            }
            (Frame::Root { .. }, "LabelTable") => Frame::LabelTable(LabelTable::new()),
            (Frame::Root { .. }, "DataArray") => {
                let frame = ArrayFrame {
                    index: self.arrays_started,
                    header: ArrayHeaderBuilder::new(attributes.clone()),
                    payload: None,
                    metadata: MetaData::new(),
                    coordinate_system: None,
                };
                Frame::DataArray(Box::new(frame))
            }
            (Frame::MetaData(_), "MD") => Frame::Md {
                name: None,
                value: None,
            },
            (Frame::Md { .. }, "Name") => Frame::Name,
            (Frame::Md { .. }, "Value") => Frame::Value,
            (Frame::LabelTable(_), "Label") => Frame::Label(attributes.clone()),
            (Frame::DataArray(_), "CoordinateSystemTransformMatrix") => {
                Frame::Transform(TransformFrame::default())
            }
            (Frame::DataArray(_), "Data") => Frame::Data,
            (Frame::Transform(_), "DataSpace") => Frame::DataSpace,
            (Frame::Transform(_), "TransformedSpace") => Frame::TransformedSpace,
            (Frame::Transform(_), "MatrixData") => Frame::MatrixData,
            (parent, name) if KNOWN_ELEMENTS.contains(&name) => {
                return Err(Error::new(ErrorKind::UnexpectedElement {
                    name: String::from(name),
                    parent: Some(String::from(parent.tag())),
                    offset,
                }))
            }
            (parent, name) => {
                debug!("skipping unrecognized element <{}> inside <{}>", name, parent.tag());
                Frame::Unknown(String::from(name))
            }
        };

        if let Frame::DataArray(_) = frame {
            self.arrays_started += 1;
        }

        Ok(frame)
    }

    fn root(&self, attributes: &Attributes) -> Frame {
        let version = attributes
            .get("Version")
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .unwrap_or(crate::document::DEFAULT_VERSION);

        let declared = attributes.get("NumberOfDataArrays").and_then(|raw| {
            let parsed = raw.trim().parse::<usize>().ok();
            if parsed.is_none() {
                warn!("ignoring unparseable NumberOfDataArrays: {:?}", raw);
            }
            parsed
        });

        Frame::Root {
            version: String::from(version),
            declared,
            metadata: MetaData::new(),
            label_table: None,
            arrays: Vec::new(),
        }
    }

    /// Convert a completed frame and attach the result to its parent
    fn close(&mut self, frame: Frame) -> Result<(), Error> {
        // an unknown child of a leaf must not consume the leaf's text
        let text = if frame.is_leaf() {
            std::mem::take(&mut self.text)
        } else {
            String::new()
        };
        match frame {
            Frame::Root {
                version,
                declared,
                metadata,
                label_table,
                arrays,
            } => {
                if let Some(declared) = declared.filter(|&x| x != arrays.len()) {
                    warn!(
                        "document declares {} data arrays but contains {}",
                        declared,
                        arrays.len()
                    );
                }

                debug!("finished document with {} data arrays", arrays.len());
                self.document = Some(Document::assemble(version, metadata, label_table, arrays));
            }
            Frame::MetaData(meta) => match self.stack.last_mut() {
                Some(Frame::Root { metadata, .. }) => *metadata = meta,
                Some(Frame::DataArray(arr)) => arr.metadata = meta,
                _ => {}
            },
            Frame::Md { name, value } => {
                let name = name.ok_or_else(|| {
                    self.decode_error(DecodeErrorKind::MissingAttribute {
                        element: "MD",
                        attribute: String::from("Name"),
                    })
                })?;

                if let Some(Frame::MetaData(meta)) = self.stack.last_mut() {
                    meta.push(name, value.unwrap_or_default());
                }
            }
            Frame::Name => {
                if let Some(Frame::Md { name, .. }) = self.stack.last_mut() {
                    *name = Some(String::from(text.trim()));
                }
            }
            Frame::Value => {
                if let Some(Frame::Md { value, .. }) = self.stack.last_mut() {
                    *value = Some(String::from(text.trim()));
                }
            }
            Frame::LabelTable(table) => {
                if let Some(Frame::Root { label_table, .. }) = self.stack.last_mut() {
                    *label_table = Some(table);
                }
            }
            Frame::Label(attributes) => {
                let label = build_label(&attributes, text.trim())
                    .map_err(|kind| Error::from(DecodeError::new(None, kind)))?;
                if let Some(Frame::LabelTable(table)) = self.stack.last_mut() {
                    table.push(label);
                }
            }
            Frame::DataArray(arr) => {
                let array = self.build_array(*arr)?;
                if let Some(Frame::Root { arrays, .. }) = self.stack.last_mut() {
                    arrays.push(array);
                }
            }
            Frame::Transform(transform) => {
                let coord = CoordinateSystem::new(
                    transform.dataspace.unwrap_or(codes::XFORM_UNKNOWN),
                    transform.xformspace.unwrap_or(codes::XFORM_UNKNOWN),
                    transform.matrix.unwrap_or(IDENTITY),
                );

                if let Some(Frame::DataArray(arr)) = self.stack.last_mut() {
                    arr.coordinate_system = Some(coord);
                }
            }
            Frame::DataSpace => {
                let code = space_code(&text);
                if let Some(Frame::Transform(transform)) = self.stack.last_mut() {
                    transform.dataspace = Some(code);
                }
            }
            Frame::TransformedSpace => {
                let code = space_code(&text);
                if let Some(Frame::Transform(transform)) = self.stack.last_mut() {
                    transform.xformspace = Some(code);
                }
            }
            Frame::MatrixData => {
                let matrix = parse_matrix(&text).map_err(|kind| self.decode_error(kind))?;
                if let Some(Frame::Transform(transform)) = self.stack.last_mut() {
                    transform.matrix = Some(matrix);
                }
            }
            Frame::Data => {
                let index = self.array_index();
                let arr = match self.stack.last_mut() {
                    Some(Frame::DataArray(arr)) => arr,
                    _ => return Ok(()),
                };

                let decoded = decode_array(&arr.header, &text)
                    .map_err(|kind| Error::from(DecodeError::new(index, kind)))?;
                arr.payload = Some(decoded);
            }
            Frame::Unknown(_) => {}
        }

        Ok(())
    }

    fn build_array(&self, arr: ArrayFrame) -> Result<DataArray, Error> {
        let to_error = |kind| Error::from(DecodeError::new(Some(arr.index), kind));
        let (header, payload) = match arr.payload {
            Some(x) => x,
            None => {
                // an external array may omit its empty Data element
                let header = arr.header.build().map_err(to_error)?;
                if header.encoding.is_inline() {
                    return Err(to_error(DecodeErrorKind::MissingData));
                }
                let file = arr.header.external_file().map_err(to_error)?;
                (header, Payload::External(file))
            }
        };

        Ok(DataArray::assemble(
            header,
            payload,
            arr.metadata,
            arr.coordinate_system.unwrap_or_default(),
        ))
    }
}

fn decode_array(
    builder: &ArrayHeaderBuilder,
    text: &str,
) -> Result<(ArrayHeader, Payload), DecodeErrorKind> {
    let header = builder.build()?;
    if !header.encoding.is_inline() {
        return Ok((header, Payload::External(builder.external_file()?)));
    }

    let buffer = decode_payload(&header, text)?;
    check_buffer(&header, &buffer)?;
    Ok((header, Payload::Inline(buffer)))
}

fn build_label(attributes: &Attributes, name: &str) -> Result<Label, DecodeErrorKind> {
    let (attribute, raw) = match (attributes.get("Key"), attributes.get("Index")) {
        (Some(raw), _) => ("Key", raw),
        (None, Some(raw)) => ("Index", raw),
        (None, None) => {
            return Err(DecodeErrorKind::MissingAttribute {
                element: "Label",
                attribute: String::from("Key"),
            })
        }
    };

    let key = parse_attribute::<i32>("Label", attribute, raw)?;
    let colour = |attribute: &str, default: f32| match attributes.get(attribute) {
        Some(raw) => parse_attribute::<f32>("Label", attribute, raw),
        None => Ok(default),
    };

    Ok(Label {
        key,
        name: String::from(name),
        red: colour("Red", 0.0)?,
        green: colour("Green", 0.0)?,
        blue: colour("Blue", 0.0)?,
        alpha: colour("Alpha", 1.0)?,
    })
}

/// Transform space code from its name, also accepting a bare integer code
fn space_code(text: &str) -> i32 {
    let name = text.trim();
    codes::xform_code(name)
        .or_else(|| name.parse::<i32>().ok())
        .unwrap_or_else(|| {
            warn!("unrecognized transform space {:?}, treating as unknown", name);
            codes::XFORM_UNKNOWN
        })
}

fn parse_matrix(text: &str) -> Result<[[f64; 4]; 4], DecodeErrorKind> {
    let mut matrix = [[0.0; 4]; 4];
    let mut count = 0;
    for token in crate::data::tokens(text.as_bytes()) {
        let value = Scalar::new(token).to_f64()?;
        if count < 16 {
            matrix[count / 4][count % 4] = value;
        }
        count += 1;
    }

    if count != 16 {
        return Err(DecodeErrorKind::ShapeMismatch {
            expected: 16,
            actual: count,
        });
    }

    Ok(matrix)
}

impl EventHandler for DocumentBuilder {
    fn on_start(&mut self, name: &str, attributes: &Attributes, offset: usize) -> Result<(), Error> {
        let frame = self.open(name, attributes, offset)?;
        if frame.is_leaf() {
            self.text.clear();
        }
        self.stack.push(frame);
        Ok(())
    }

    fn on_end(&mut self, name: &str, offset: usize) -> Result<(), Error> {
        let expected = match self.stack.last() {
            Some(frame) => frame.tag(),
            None => {
                return Err(Error::new(ErrorKind::UnmatchedClose {
                    name: String::from(name),
                    expected: None,
                    offset,
                }))
            }
        };

        if expected != name {
            return Err(Error::new(ErrorKind::UnmatchedClose {
                name: String::from(name),
                expected: Some(String::from(expected)),
                offset,
            }));
        }

        match self.stack.pop() {
            Some(frame) => self.close(frame),
            None => Ok(()),
        }
    }

    fn on_text(&mut self, text: &str) -> Result<(), Error> {
        if self.stack.last().map_or(false, |x| x.is_leaf()) {
            self.text.push_str(text);
        }
        Ok(())
    }
}
