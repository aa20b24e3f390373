use gifti::{
    codes, CoordinateSystem, DataArray, DataType, Document, Encoding, Endian, ExternalFile,
    GiftiWriterBuilder, IndexOrder, Label, LabelTable, MetaData,
};
use rstest::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_with(doc: &Document, builder: &GiftiWriterBuilder) -> String {
    let mut writer = builder.from_writer(Vec::new());
    writer.write_document(doc).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

#[rstest]
#[case("ascii.gii")]
#[case("gzipbase64.gii")]
#[case("label.gii")]
#[case("rh.shape.curv.gii")]
#[case("base64bin.gii")]
#[case("rh.aparc.annot.gii")]
fn test_read_write_read(#[case] name: &str) {
    let doc = gifti::read(fixture(name)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    gifti::write(&doc, &path).unwrap();

    let back = gifti::read(&path).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_writing_is_stable() {
    let doc = gifti::read(fixture("rh.aparc.annot.gii")).unwrap();
    let first = gifti::to_vec(&doc).unwrap();
    let second = gifti::to_vec(&gifti::from_slice(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_base64_written() {
    let raw = std::fs::read_to_string(fixture("base64bin.gii")).unwrap();
    assert!(raw.contains("GIFTI_ENCODING_B64BIN"));
    assert!(raw.contains("GIFTI_ENDIAN_LITTLE"));
    assert!(!raw.contains("Base64Binary"));
    assert!(!raw.contains("LittleEndian"));

    let doc = gifti::from_slice(raw.as_bytes()).unwrap();
    let written = String::from_utf8(gifti::to_vec(&doc).unwrap()).unwrap();
    assert!(!written.contains("GIFTI_ENCODING_B64BIN"));
    assert!(!written.contains("GIFTI_ENDIAN_LITTLE"));
    assert!(written.contains("Base64Binary"));
    assert!(written.contains("LittleEndian"));
}

#[test]
fn test_header_prelude() {
    let doc = gifti::read(fixture("ascii.gii")).unwrap();
    let written = String::from_utf8(gifti::to_vec(&doc).unwrap()).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some(r#"<?xml version="1.0" encoding="UTF-8"?>"#)
    );
    assert!(lines.next().unwrap().starts_with("<!DOCTYPE GIFTI"));
    assert_eq!(
        lines.next(),
        Some(r#"<GIFTI Version="1.0" NumberOfDataArrays="2">"#)
    );
    assert!(written.contains("<DataSpace>NIFTI_XFORM_TALAIRACH</DataSpace>"));
}

#[rstest]
#[case(Encoding::Ascii, Endian::Little)]
#[case(Encoding::Base64, Endian::Little)]
#[case(Encoding::Base64, Endian::Big)]
#[case(Encoding::GzipBase64, Endian::Little)]
#[case(Encoding::GzipBase64, Endian::Big)]
fn test_writer_overrides(#[case] encoding: Encoding, #[case] endian: Endian) {
    let doc = gifti::read(fixture("base64bin.gii")).unwrap();
    let written = write_with(
        &doc,
        GiftiWriterBuilder::new().encoding(encoding).endian(endian),
    );

    let back = gifti::from_slice(written.as_bytes()).unwrap();
    for (before, after) in doc.arrays().iter().zip(back.arrays()) {
        assert_eq!(after.encoding(), encoding);
        assert_eq!(after.endian(), endian);
        assert_eq!(after.dims(), before.dims());
        assert_eq!(after.buffer(), before.buffer());
    }
}

#[test]
fn test_column_major_roundtrip() {
    let data: Vec<f64> = (0..24).map(f64::from).collect();
    let array = DataArray::new(data.clone(), vec![2, 3, 4])
        .unwrap()
        .with_index_order(IndexOrder::ColumnMajor)
        .with_encoding(Encoding::Base64)
        .with_endian(Endian::Big);

    let mut doc = Document::new();
    doc.add_array(array);
    let bytes = gifti::to_vec(&doc).unwrap();
    let back = gifti::from_slice(&bytes).unwrap();

    let array = back.array(0).unwrap();
    assert_eq!(array.index_order(), IndexOrder::ColumnMajor);
    assert_eq!(array.endian(), Endian::Big);
    assert_eq!(array.values::<f64>().unwrap(), &data[..]);
}

#[test]
fn test_every_data_type() {
    let mut doc = Document::new();
    doc.add_array(DataArray::new(vec![0u8, 255], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![i8::MIN, i8::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![i16::MIN, i16::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![0u16, u16::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![i32::MIN, i32::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![0u32, u32::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![i64::MIN, i64::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![0u64, u64::MAX], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![f32::MIN, 0.1f32], vec![2]).unwrap());
    doc.add_array(DataArray::new(vec![f64::MAX, -0.1f64], vec![2]).unwrap());

    for encoding in [Encoding::Ascii, Encoding::Base64, Encoding::GzipBase64] {
        let written = write_with(&doc, GiftiWriterBuilder::new().encoding(encoding));
        let back = gifti::from_slice(written.as_bytes()).unwrap();
        assert_eq!(back.number_of_data_arrays(), 10);
        for (before, after) in doc.arrays().iter().zip(back.arrays()) {
            assert_eq!(after.buffer(), before.buffer(), "{:?}", encoding);
        }
    }

    let types: Vec<DataType> = doc.arrays().iter().map(|x| x.data_type()).collect();
    assert_eq!(types[0], DataType::UInt8);
    assert_eq!(types[9], DataType::Float64);
}

#[test]
fn test_new_metadata_replaces() {
    let mut doc = gifti::read(fixture("ascii.gii")).unwrap();
    doc.set_metadata(MetaData::from([("key", "value")]));

    let back = gifti::from_slice(&gifti::to_vec(&doc).unwrap()).unwrap();
    assert_eq!(back.metadata().len(), 1);
    assert_eq!(back.metadata().get("key"), Some("value"));
    assert_eq!(back.metadata().get("UserName"), None);
}

#[test]
fn test_label_table_and_transform_survive() {
    let mut table = LabelTable::new();
    table.push(Label::new(0, "unknown"));
    table.push(Label::new(7, "a < b & c").with_rgba([0.25, 0.5, 0.75, 0.5]));

    let transform = CoordinateSystem::new(
        codes::XFORM_SCANNER_ANAT,
        codes::XFORM_MNI_152,
        [
            [1.0, 0.0, 0.0, -90.5],
            [0.0, 1.0, 0.0, 126.0],
            [0.0, 0.0, 1.0, -72.25],
            [0.0, 0.0, 0.0, 1.0],
        ],
    );

    let mut doc = Document::new();
    doc.set_label_table(Some(table));
    doc.add_array(
        DataArray::new(vec![0i32, 7, 7, 0], vec![4])
            .unwrap()
            .with_intent(codes::INTENT_LABEL)
            .with_coordinate_system(transform)
            .with_metadata(MetaData::from([("Name", "\"quoted\"")])),
    );

    let back = gifti::from_slice(&gifti::to_vec(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
    assert_eq!(back.label_table().unwrap().name_of(7), Some("a < b & c"));
    assert_eq!(back.array(0).unwrap().coordinate_system().matrix[0][3], -90.5);
}

#[test]
fn test_external_reference_written() {
    let file = ExternalFile {
        name: String::from("lh.coords.bin"),
        offset: 1024,
    };
    let mut doc = Document::new();
    doc.add_array(DataArray::external(file.clone(), DataType::Float32, vec![100, 3]).unwrap());

    let written = String::from_utf8(gifti::to_vec(&doc).unwrap()).unwrap();
    assert!(written.contains(r#"Encoding="ExternalFileBinary""#));
    assert!(written.contains(r#"ExternalFileName="lh.coords.bin""#));
    assert!(written.contains(r#"ExternalFileOffset="1024""#));

    let back = gifti::from_slice(written.as_bytes()).unwrap();
    assert_eq!(back.array(0).unwrap().external_file(), Some(&file));
    assert!(!back.array(0).unwrap().is_inline());
}

#[test]
fn test_external_override_rejected() {
    let mut doc = Document::new();
    doc.add_array(DataArray::new(vec![1.0f32], vec![1]).unwrap());

    let mut writer = GiftiWriterBuilder::new()
        .encoding(Encoding::External)
        .from_writer(Vec::new());
    let err = writer.write_document(&doc).unwrap_err();
    assert!(err.is_write());
}

#[test]
fn test_tab_indentation() {
    let mut doc = Document::new();
    doc.add_array(DataArray::new(vec![1u8], vec![1]).unwrap());
    let written = write_with(
        &doc,
        GiftiWriterBuilder::new().indent_char(b'\t').indent_factor(1),
    );
    assert!(written.contains("\n\t<DataArray"));
    assert!(written.contains("\n\t\t<Data>"));
}
