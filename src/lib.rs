/*!

A reader and writer for [GIFTI](https://www.nitrc.org/projects/gifti/) surface
data files.

A GIFTI file is an XML document holding one or more numeric data arrays
(vertex coordinates, triangle indices, per-vertex shape or label values)
along with metadata, a coordinate transform per array, and an optional label
table. Array payloads may be written as ASCII text, base64 of the raw bytes,
or base64 of zlib compressed bytes, in either byte order and either index
order.

## Features

- ✔ Complete: every inline encoding, byte order, index order, and all ten
  NIfTI numeric types
- ✔ Forgiving: deprecated vocabulary (`GIFTI_ENCODING_B64GZ`,
  `GIFTI_ENDIAN_LITTLE`, `DT_FLOAT32`, ...) is accepted on read
- ✔ Canonical: only current vocabulary is ever written
- ✔ Typed: decoded payloads are `Vec<T>` of the declared element type, in
  row-major order

## Quick Start

```rust
use gifti::{codes, Encoding};

let data = br#"<?xml version="1.0" encoding="UTF-8"?>
<GIFTI Version="1.0" NumberOfDataArrays="1">
  <DataArray Intent="NIFTI_INTENT_POINTSET" DataType="NIFTI_TYPE_FLOAT32"
    ArrayIndexingOrder="RowMajorOrder" Dimensionality="2" Dim0="2" Dim1="3"
    Encoding="ASCII" Endian="LittleEndian">
    <MetaData>
      <MD><Name>AnatomicalStructurePrimary</Name><Value>CortexLeft</Value></MD>
    </MetaData>
    <Data>
      0.5 1.5 2.5
      3.5 4.5 5.5
    </Data>
  </DataArray>
</GIFTI>"#;

let doc = gifti::from_slice(&data[..]).unwrap();
let points = doc.arrays_matching_intent(codes::INTENT_POINTSET)[0];
assert_eq!(points.dims(), &[2, 3]);
assert_eq!(points.values::<f32>().unwrap()[4], 4.5);
assert_eq!(points.metadata().get("AnatomicalStructurePrimary"), Some("CortexLeft"));

// re-encode with compressed payloads
let mut writer = gifti::GiftiWriterBuilder::new()
    .encoding(Encoding::GzipBase64)
    .from_writer(Vec::new());
writer.write_document(&doc).unwrap();
let text = String::from_utf8(writer.into_inner()).unwrap();
assert!(text.contains(r#"Encoding="GZipBase64Binary""#));
```

## Writing

Documents are written with [`to_vec`], [`write`], or a customized
[`GiftiWriter`]. The writer always emits the XML declaration and the GIFTI
doctype, the current spelling of every vocabulary token, and attributes in a
fixed order, so writing a freshly read document produces a canonical form of
the input.

```rust
use gifti::{codes, DataArray, Document, MetaData};

let mut doc = Document::new();
doc.set_metadata(MetaData::from([("UserName", "surfer")]));
doc.add_array(
    DataArray::new(vec![0i32, 1, 2], vec![1, 3])
        .unwrap()
        .with_intent(codes::INTENT_TRIANGLE),
);

let bytes = gifti::to_vec(&doc).unwrap();
let back = gifti::from_slice(&bytes).unwrap();
assert_eq!(back, doc);
```

## One Level Lower

The [`xml`] module exposes the event source and the document builder that
[`from_slice`] is built from, and [`codec`] exposes payload decoding and
encoding on its own.

*/

mod array;
mod buffer;
pub mod codec;
pub mod codes;
mod data;
mod document;
mod errors;
mod label;
mod meta;
#[cfg(feature = "ndarray")]
mod ndarray_ext;
mod scalar;
mod transform;
pub(crate) mod util;
pub mod vocab;
pub mod xml;

pub use self::array::{ArrayHeader, DataArray, ExternalFile, Payload};
pub use self::buffer::{Buffer, Element};
pub use self::document::Document;
pub use self::errors::*;
pub use self::label::{Label, LabelTable};
pub use self::meta::{MetaData, MetaEntry};
#[cfg(feature = "ndarray")]
pub use self::ndarray_ext::NdarrayError;
pub use self::scalar::{Scalar, ScalarError};
pub use self::transform::CoordinateSystem;
pub use self::vocab::{
    normalize, normalize_token, CanonicalValue, Category, DataType, Encoding, Endian, IndexOrder,
    Vocabulary,
};
pub use self::xml::{from_reader, from_slice, read, to_vec, write, GiftiWriter, GiftiWriterBuilder};
