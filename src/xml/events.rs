use crate::{Error, ErrorKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Attributes of a start tag with their values unescaped, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// The value of the first attribute named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn clear(&mut self) {
        self.pairs.clear();
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attributes {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Receiver of the element level events of an XML document.
///
/// Self closing tags are reported as a start immediately followed by an end.
/// Character data (including CDATA sections) may be split across several
/// `on_text` calls. Offsets are byte positions in the input.
pub trait EventHandler {
    fn on_start(&mut self, name: &str, attributes: &Attributes, offset: usize) -> Result<(), Error>;

    fn on_end(&mut self, name: &str, offset: usize) -> Result<(), Error>;

    fn on_text(&mut self, text: &str) -> Result<(), Error>;
}

/// Drives an [`EventHandler`] from an XML byte stream.
///
/// Declarations, doctypes, comments, and processing instructions are not
/// reported. Close tags are not checked against open tags here; that is up
/// to the handler.
///
/// ```
/// use gifti::xml::{Attributes, EventHandler, EventSource};
/// use gifti::Error;
///
/// #[derive(Default)]
/// struct Names(Vec<String>);
///
/// impl EventHandler for Names {
///     fn on_start(&mut self, name: &str, _: &Attributes, _: usize) -> Result<(), Error> {
///         self.0.push(name.to_string());
///         Ok(())
///     }
///     fn on_end(&mut self, _: &str, _: usize) -> Result<(), Error> { Ok(()) }
///     fn on_text(&mut self, _: &str) -> Result<(), Error> { Ok(()) }
/// }
///
/// let mut names = Names::default();
/// EventSource::from_reader(&b"<GIFTI><MetaData/></GIFTI>"[..]).run(&mut names).unwrap();
/// assert_eq!(names.0, vec!["GIFTI", "MetaData"]);
/// ```
pub struct EventSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    attributes: Attributes,
}

impl<R: BufRead> EventSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(false);
        reader.check_end_names(false);
        EventSource {
            reader,
            buf: Vec::with_capacity(1024),
            attributes: Attributes::new(),
        }
    }

    /// Feed every event of the input to `handler`, stopping at the first
    /// error from either the tokenizer or the handler
    pub fn run<H: EventHandler>(mut self, handler: &mut H) -> Result<(), Error> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => return Err(xml_error(&e, self.reader.buffer_position())),
            };

            let offset = self.reader.buffer_position();
            match event {
                Event::Start(ref e) => {
                    let name = element_name(e, offset)?;
                    collect_attributes(e, &mut self.attributes, offset)?;
                    handler.on_start(&name, &self.attributes, offset)?;
                }
                Event::Empty(ref e) => {
                    let name = element_name(e, offset)?;
                    collect_attributes(e, &mut self.attributes, offset)?;
                    handler.on_start(&name, &self.attributes, offset)?;
                    handler.on_end(&name, offset)?;
                }
                Event::End(ref e) => {
                    let name = utf8(e.name().into_inner(), offset)?;
                    handler.on_end(name, offset)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|x| xml_error(&x, offset))?;
                    handler.on_text(&text)?;
                }
                Event::CData(e) => {
                    let data = e.into_inner();
                    handler.on_text(utf8(&data, offset)?)?;
                }
                Event::Eof => return Ok(()),
                _ => {}
            }
        }
    }
}

fn xml_error(err: &dyn std::fmt::Display, offset: usize) -> Error {
    Error::new(ErrorKind::Xml {
        message: err.to_string(),
        offset,
    })
}

fn utf8(data: &[u8], offset: usize) -> Result<&str, Error> {
    std::str::from_utf8(data).map_err(|e| xml_error(&e, offset))
}

fn element_name(e: &BytesStart, offset: usize) -> Result<String, Error> {
    utf8(e.name().as_ref(), offset).map(String::from)
}

fn collect_attributes(e: &BytesStart, out: &mut Attributes, offset: usize) -> Result<(), Error> {
    out.clear();
    for attr in e.attributes() {
        let attr = attr.map_err(|x| xml_error(&x, offset))?;
        let key = utf8(attr.key.as_ref(), offset)?;
        let value = attr.unescape_value().map_err(|x| xml_error(&x, offset))?;
        out.push(key, value.into_owned());
    }
    Ok(())
}
