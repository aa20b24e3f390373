use crate::codec::encode_payload;
use crate::{
    codes, CoordinateSystem, DataArray, Document, Encoding, Endian, Error, ErrorKind, LabelTable,
    MetaData, Payload, Vocabulary,
};
use log::trace;
use std::io::Write;
use std::ops::Deref;

const DOCTYPE: &str =
    r#"<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">"#;

/// Write documents as GIFTI XML.
///
/// Instantiated via `GiftiWriterBuilder`
#[derive(Debug)]
pub struct GiftiWriter<W> {
    writer: W,
    scratch: Vec<u8>,
    depth: usize,
    encoding: Option<Encoding>,
    endian: Option<Endian>,
    indent_char: u8,
    indent_factor: u8,
}

/// Construct a customized GIFTI writer
///
/// ```
/// use gifti::{DataArray, Document, Encoding, GiftiWriterBuilder};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut doc = Document::new();
/// doc.add_array(DataArray::new(vec![1i32, 2, 3], vec![3])?);
///
/// let mut out: Vec<u8> = Vec::new();
/// let mut writer = GiftiWriterBuilder::new()
///     .encoding(Encoding::Ascii)
///     .indent_factor(1)
///     .from_writer(&mut out);
/// writer.write_document(&doc)?;
///
/// let text = std::str::from_utf8(&out)?;
/// assert!(text.contains(r#"Encoding="ASCII""#));
/// assert!(text.contains("<Data>1\n2\n3</Data>"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GiftiWriterBuilder {
    encoding: Option<Encoding>,
    endian: Option<Endian>,
    indent_char: u8,
    indent_factor: u8,
}

impl<W> GiftiWriter<W>
where
    W: Write,
{
    /// Get inner writer, keeping ownership
    pub fn inner(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes this Writer, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write out an entire document, including the XML declaration
    pub fn write_document(&mut self, doc: &Document) -> Result<(), Error> {
        self.writer
            .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
        self.writer.write_all(DOCTYPE.as_bytes())?;
        self.writer.write_all(b"\n<GIFTI")?;
        self.write_attribute("Version", doc.version())?;
        self.write_attribute("NumberOfDataArrays", &doc.number_of_data_arrays().to_string())?;
        self.writer.write_all(b">\n")?;

        self.depth += 1;
        self.write_metadata(doc.metadata())?;
        if let Some(table) = doc.label_table() {
            self.write_label_table(table)?;
        }

        for (i, array) in doc.arrays().iter().enumerate() {
            self.write_array(i, array)?;
        }
        self.depth -= 1;

        self.writer.write_all(b"</GIFTI>\n")?;
        Ok(())
    }

    fn write_indent(&mut self) -> Result<(), Error> {
        for _ in 0..(self.depth * usize::from(self.indent_factor)) {
            self.writer.write_all(&[self.indent_char])?;
        }
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let esc = escape(value.as_bytes(), std::mem::take(&mut self.scratch));
        self.writer.write_all(b" ")?;
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b"=\"")?;
        self.writer.write_all(&esc)?;
        self.writer.write_all(b"\"")?;
        self.scratch = esc.buffer();
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), Error> {
        let esc = escape(text.as_bytes(), std::mem::take(&mut self.scratch));
        self.writer.write_all(&esc)?;
        self.scratch = esc.buffer();
        Ok(())
    }

    /// A leaf element on its own line
    fn write_leaf(&mut self, name: &str, text: &str) -> Result<(), Error> {
        self.write_indent()?;
        write!(self.writer, "<{}>", name)?;
        self.write_text(text)?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn write_open(&mut self, name: &str) -> Result<(), Error> {
        self.write_indent()?;
        writeln!(self.writer, "<{}>", name)?;
        self.depth += 1;
        Ok(())
    }

    fn write_close(&mut self, name: &str) -> Result<(), Error> {
        self.depth -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn write_metadata(&mut self, meta: &MetaData) -> Result<(), Error> {
        if meta.is_empty() {
            self.write_indent()?;
            self.writer.write_all(b"<MetaData/>\n")?;
            return Ok(());
        }

        self.write_open("MetaData")?;
        for (name, value) in meta.iter() {
            self.write_open("MD")?;
            self.write_leaf("Name", name)?;
            self.write_leaf("Value", value)?;
            self.write_close("MD")?;
        }
        self.write_close("MetaData")
    }

    fn write_label_table(&mut self, table: &LabelTable) -> Result<(), Error> {
        self.write_open("LabelTable")?;
        for label in table.labels() {
            self.write_indent()?;
            self.writer.write_all(b"<Label")?;
            self.write_attribute("Key", &label.key.to_string())?;
            self.write_attribute("Red", &label.red.to_string())?;
            self.write_attribute("Green", &label.green.to_string())?;
            self.write_attribute("Blue", &label.blue.to_string())?;
            self.write_attribute("Alpha", &label.alpha.to_string())?;
            self.writer.write_all(b">")?;
            self.write_text(&label.name)?;
            self.writer.write_all(b"</Label>\n")?;
        }
        self.write_close("LabelTable")
    }

    fn write_coordinate_system(&mut self, coord: &CoordinateSystem) -> Result<(), Error> {
        let space = |code: i32| match codes::xform_name(code) {
            Some(name) => String::from(name),
            None => code.to_string(),
        };

        self.write_open("CoordinateSystemTransformMatrix")?;
        self.write_leaf("DataSpace", &space(coord.dataspace))?;
        self.write_leaf("TransformedSpace", &space(coord.xformspace))?;

        let rows: Vec<String> = coord
            .matrix
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
                cells.join(" ")
            })
            .collect();

        self.write_indent()?;
        write!(self.writer, "<MatrixData>\n{}\n", rows.join("\n"))?;
        self.write_indent()?;
        self.writer.write_all(b"</MatrixData>\n")?;
        self.write_close("CoordinateSystemTransformMatrix")
    }

    fn write_array(&mut self, index: usize, array: &DataArray) -> Result<(), Error> {
        let mut header = array.header().clone();
        let payload = match array.payload() {
            Payload::Inline(buffer) => {
                header.encoding = self.encoding.unwrap_or(header.encoding);
                header.endian = self.endian.unwrap_or(header.endian);
                if !header.encoding.is_inline() {
                    return Err(Error::new(ErrorKind::ExternalWrite { array: index }));
                }
                Some(encode_payload(buffer, &header)?)
            }
            Payload::External(_) => {
                header.encoding = Encoding::External;
                None
            }
        };

        self.write_indent()?;
        self.writer.write_all(b"<DataArray")?;
        self.write_attribute("Intent", &header.intent)?;
        self.write_attribute("DataType", header.data_type.canonical_token())?;
        self.write_attribute("ArrayIndexingOrder", header.index_order.canonical_token())?;
        self.write_attribute("Dimensionality", &header.dims.len().to_string())?;
        for (i, dim) in header.dims.iter().enumerate() {
            self.write_attribute(&format!("Dim{}", i), &dim.to_string())?;
        }
        self.write_attribute("Encoding", header.encoding.canonical_token())?;
        self.write_attribute("Endian", header.endian.canonical_token())?;
        if let Some(file) = array.external_file() {
            self.write_attribute("ExternalFileName", &file.name)?;
            self.write_attribute("ExternalFileOffset", &file.offset.to_string())?;
        }
        self.writer.write_all(b">\n")?;
        self.depth += 1;

        self.write_metadata(array.metadata())?;
        self.write_coordinate_system(array.coordinate_system())?;

        self.write_indent()?;
        match payload {
            Some(text) => {
                trace!("writing data array {} as {}", index, header.encoding.canonical_token());
                self.writer.write_all(b"<Data>")?;
                self.writer.write_all(text.as_bytes())?;
                self.writer.write_all(b"</Data>\n")?;
            }
            None => self.writer.write_all(b"<Data/>\n")?,
        }

        self.write_close("DataArray")
    }
}

impl GiftiWriterBuilder {
    /// Construct a new GiftiWriterBuilder with default values
    pub fn new() -> GiftiWriterBuilder {
        GiftiWriterBuilder::default()
    }

    /// Encoding applied to every inline data array, overriding the encoding
    /// recorded on the array.
    ///
    /// The default keeps each array's own encoding.
    pub fn encoding(&mut self, encoding: Encoding) -> &mut GiftiWriterBuilder {
        self.encoding = Some(encoding);
        self
    }

    /// Byte order applied to every inline data array, overriding the byte
    /// order recorded on the array.
    pub fn endian(&mut self, endian: Endian) -> &mut GiftiWriterBuilder {
        self.endian = Some(endian);
        self
    }

    /// The character to indent line.
    ///
    /// The default is a space.
    pub fn indent_char(&mut self, indent_char: u8) -> &mut GiftiWriterBuilder {
        self.indent_char = indent_char;
        self
    }

    /// The number of indents per increased depth
    ///
    /// The default is 2
    pub fn indent_factor(&mut self, indent_factor: u8) -> &mut GiftiWriterBuilder {
        self.indent_factor = indent_factor;
        self
    }

    /// Construct a GIFTI writer from a builder and a writer.
    pub fn from_writer<R>(&self, writer: R) -> GiftiWriter<R>
    where
        R: Write,
    {
        GiftiWriter {
            writer,
            scratch: Vec::new(),
            depth: 0,
            encoding: self.encoding,
            endian: self.endian,
            indent_char: self.indent_char,
            indent_factor: self.indent_factor,
        }
    }
}

impl Default for GiftiWriterBuilder {
    fn default() -> Self {
        GiftiWriterBuilder {
            encoding: None,
            endian: None,
            indent_char: b' ',
            indent_factor: 2,
        }
    }
}

/// A cow that let's us reuse allocations
enum ReuseVec<'a> {
    Owned(Vec<u8>),
    Borrowed((&'a [u8], Vec<u8>)),
}

impl<'a> ReuseVec<'a> {
    fn buffer(self) -> Vec<u8> {
        match self {
            ReuseVec::Owned(x) => x,
            ReuseVec::Borrowed((_, x)) => x,
        }
    }
}

impl<'a> Deref for ReuseVec<'a> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        match self {
            ReuseVec::Owned(x) => x.as_slice(),
            ReuseVec::Borrowed((a, _)) => a,
        }
    }
}

#[inline]
fn entity(x: u8) -> Option<&'static [u8]> {
    match x {
        b'&' => Some(b"&amp;"),
        b'<' => Some(b"&lt;"),
        b'>' => Some(b"&gt;"),
        b'"' => Some(b"&quot;"),
        _ => None,
    }
}

#[inline]
fn escape(data: &[u8], mut buffer: Vec<u8>) -> ReuseVec {
    match data.iter().position(|&x| entity(x).is_some()) {
        None => ReuseVec::Borrowed((data, buffer)),
        Some(i) => {
            buffer.clear();
            buffer.extend_from_slice(&data[..i]);
            for &x in &data[i..] {
                match entity(x) {
                    Some(replacement) => buffer.extend_from_slice(replacement),
                    None => buffer.push(x),
                }
            }
            ReuseVec::Owned(buffer)
        }
    }
}
