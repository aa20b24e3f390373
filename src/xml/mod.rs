//! Types for reading and writing GIFTI XML
//!
//! Reading is split in two: an [`EventSource`] tokenizes the XML and feeds
//! element events to an [`EventHandler`], and the [`DocumentBuilder`] handler
//! assembles those events into a [`Document`](crate::Document). Most callers
//! only need the crate level [`from_slice`](crate::from_slice) and
//! [`write`](crate::write) functions.
mod builder;
mod events;
mod writer;

pub use self::builder::{ArrayHeaderBuilder, DocumentBuilder};
pub use self::events::{Attributes, EventHandler, EventSource};
pub use self::writer::{GiftiWriter, GiftiWriterBuilder};

use crate::{Document, Error};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn parse<R: BufRead>(reader: R) -> Result<Document, Error> {
    let mut builder = DocumentBuilder::new();
    EventSource::from_reader(reader).run(&mut builder)?;
    builder.finish()
}

/// Decode a document held in memory
pub fn from_slice(data: &[u8]) -> Result<Document, Error> {
    parse(data)
}

/// Decode a document from a reader
pub fn from_reader<R: Read>(reader: R) -> Result<Document, Error> {
    parse(BufReader::new(reader))
}

/// Decode the document stored at `path`
pub fn read<P: AsRef<Path>>(path: P) -> Result<Document, Error> {
    let file = File::open(path)?;
    from_reader(file)
}

/// Encode a document with the default writer settings
pub fn to_vec(doc: &Document) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    GiftiWriterBuilder::new()
        .from_writer(&mut out)
        .write_document(doc)?;
    Ok(out)
}

/// Encode a document to the file at `path`, creating or truncating it.
///
/// The output is flushed before returning so that a failed flush is reported
/// rather than lost when the file is dropped.
pub fn write<P: AsRef<Path>>(doc: &Document, path: P) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = GiftiWriterBuilder::new().from_writer(BufWriter::new(file));
    writer.write_document(doc)?;
    writer.inner().flush()?;
    Ok(())
}
