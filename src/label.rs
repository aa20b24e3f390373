use std::collections::HashMap;

/// A single entry of a label table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Label {
    pub key: i32,
    pub name: String,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Label {
    /// A label drawn in opaque black
    pub fn new(key: i32, name: impl Into<String>) -> Self {
        Label {
            key,
            name: name.into(),
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            alpha: 1.0,
        }
    }

    pub fn with_rgba(mut self, rgba: [f32; 4]) -> Self {
        let [red, green, blue, alpha] = rgba;
        self.red = red;
        self.green = green;
        self.blue = blue;
        self.alpha = alpha;
        self
    }

    pub fn rgba(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

/// Mapping from integer label values found in data arrays to names and
/// display colours.
///
/// ```
/// use gifti::{Label, LabelTable};
///
/// let table: LabelTable = vec![Label::new(0, "unknown"), Label::new(660700, "entorhinal")]
///     .into_iter()
///     .collect();
/// assert_eq!(table.name_of(660700), Some("entorhinal"));
/// assert_eq!(table.labels_as_map().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LabelTable {
    labels: Vec<Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable::default()
    }

    pub fn push(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Labels in document order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The last label declared with `key`
    pub fn get(&self, key: i32) -> Option<&Label> {
        self.labels.iter().rev().find(|x| x.key == key)
    }

    pub fn name_of(&self, key: i32) -> Option<&str> {
        self.get(key).map(|x| x.name.as_str())
    }

    /// Key to name map, where later labels overwrite earlier ones with the
    /// same key
    pub fn labels_as_map(&self) -> HashMap<i32, &str> {
        self.labels.iter().map(|x| (x.key, x.name.as_str())).collect()
    }
}

impl FromIterator<Label> for LabelTable {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        LabelTable {
            labels: iter.into_iter().collect(),
        }
    }
}
