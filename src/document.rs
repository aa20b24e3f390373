use crate::{DataArray, LabelTable, MetaData, Vocabulary};
use std::fmt;

/// Version written when a document does not carry one
pub const DEFAULT_VERSION: &str = "1.0";

/// A decoded GIFTI file: data arrays plus document level metadata and an
/// optional label table.
///
/// ```
/// use gifti::{codes, DataArray, Document};
///
/// let mut doc = Document::new();
/// doc.add_array(DataArray::new(vec![0i32, 1, 2], vec![1, 3]).unwrap().with_intent(codes::INTENT_TRIANGLE));
/// assert_eq!(doc.number_of_data_arrays(), 1);
/// assert_eq!(doc.arrays_matching_intent(codes::INTENT_TRIANGLE).len(), 1);
/// assert!(doc.arrays_matching_intent(codes::INTENT_POINTSET).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    version: String,
    metadata: MetaData,
    label_table: Option<LabelTable>,
    arrays: Vec<DataArray>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            version: String::from(DEFAULT_VERSION),
            metadata: MetaData::new(),
            label_table: None,
            arrays: Vec::new(),
        }
    }

    pub(crate) fn assemble(
        version: String,
        metadata: MetaData,
        label_table: Option<LabelTable>,
        arrays: Vec<DataArray>,
    ) -> Self {
        Document {
            version,
            metadata,
            label_table,
            arrays,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Always the length of [`Document::arrays`]
    pub fn number_of_data_arrays(&self) -> usize {
        self.arrays.len()
    }

    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    pub fn arrays_mut(&mut self) -> &mut [DataArray] {
        &mut self.arrays
    }

    pub fn array(&self, index: usize) -> Option<&DataArray> {
        self.arrays.get(index)
    }

    /// Arrays whose intent token equals `intent`, in document order
    pub fn arrays_matching_intent(&self, intent: &str) -> Vec<&DataArray> {
        self.arrays.iter().filter(|x| x.intent() == intent).collect()
    }

    pub fn add_array(&mut self, array: DataArray) {
        self.arrays.push(array);
    }

    /// Remove and return the array at `index`, `None` when out of bounds
    pub fn remove_array(&mut self, index: usize) -> Option<DataArray> {
        if index < self.arrays.len() {
            Some(self.arrays.remove(index))
        } else {
            None
        }
    }

    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Substitute the document metadata wholesale
    pub fn set_metadata(&mut self, metadata: MetaData) {
        self.metadata = metadata;
    }

    pub fn label_table(&self) -> Option<&LabelTable> {
        self.label_table.as_ref()
    }

    pub fn set_label_table(&mut self, label_table: Option<LabelTable>) {
        self.label_table = label_table;
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

/// Human readable overview of the document and each of its arrays
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GIFTI version {}", self.version)?;
        writeln!(f, "metadata entries: {}", self.metadata.len())?;
        for (name, value) in self.metadata.iter() {
            writeln!(f, "  {}: {}", name, value)?;
        }

        match &self.label_table {
            Some(table) => writeln!(f, "labels: {}", table.len())?,
            None => writeln!(f, "labels: none")?,
        }

        writeln!(f, "data arrays: {}", self.arrays.len())?;
        for (i, array) in self.arrays.iter().enumerate() {
            let dims: Vec<String> = array.dims().iter().map(|x| x.to_string()).collect();
            writeln!(
                f,
                "  [{}] {} {} ({}) {} {} {}",
                i,
                array.intent(),
                array.data_type(),
                dims.join("x"),
                array.index_order().canonical_token(),
                array.encoding().canonical_token(),
                array.endian().canonical_token(),
            )?;

            for (name, value) in array.metadata().iter() {
                writeln!(f, "      {}: {}", name, value)?;
            }

            let coord = array.coordinate_system();
            if !coord.is_identity() || coord.dataspace != 0 || coord.xformspace != 0 {
                writeln!(
                    f,
                    "      transform: {} -> {}",
                    coord.dataspace_name().unwrap_or("unknown"),
                    coord.xformspace_name().unwrap_or("unknown"),
                )?;
            }

            if let Some(file) = array.external_file() {
                writeln!(f, "      external: {} at offset {}", file.name, file.offset)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codes, Label};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_array(
            DataArray::new(vec![0f32; 9], vec![3, 3])
                .unwrap()
                .with_intent(codes::INTENT_POINTSET),
        );
        doc.add_array(
            DataArray::new(vec![0i32, 1, 2], vec![3])
                .unwrap()
                .with_intent(codes::INTENT_TRIANGLE),
        );
        doc
    }

    #[test]
    fn test_count_tracks_arrays() {
        let mut doc = sample();
        assert_eq!(doc.number_of_data_arrays(), 2);
        let removed = doc.remove_array(0).unwrap();
        assert_eq!(removed.intent(), codes::INTENT_POINTSET);
        assert_eq!(doc.number_of_data_arrays(), 1);
        assert!(doc.remove_array(5).is_none());
    }

    #[test]
    fn test_matching_intent() {
        let doc = sample();
        let tris = doc.arrays_matching_intent(codes::INTENT_TRIANGLE);
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].dims(), &[3]);
        assert!(doc.arrays_matching_intent("NIFTI_INTENT_NODE_INDEX").is_empty());
        assert!(doc.arrays_matching_intent("").is_empty());
    }

    #[test]
    fn test_set_metadata_replaces() {
        let mut doc = Document::new();
        doc.set_metadata(MetaData::from([("UserName", "someone"), ("Date", "today")]));
        doc.set_metadata(MetaData::from([("Date", "tomorrow")]));
        assert_eq!(doc.metadata().len(), 1);
        assert_eq!(doc.metadata().get("UserName"), None);
    }

    #[test]
    fn test_summary() {
        let mut doc = sample();
        doc.set_label_table(Some(vec![Label::new(0, "unknown")].into_iter().collect()));
        let summary = doc.to_string();
        assert!(summary.contains("GIFTI version 1.0"));
        assert!(summary.contains("labels: 1"));
        assert!(summary.contains("[1] NIFTI_INTENT_TRIANGLE NIFTI_TYPE_INT32 (3)"));
    }
}
