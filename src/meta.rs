use std::collections::HashMap;

/// A single name/value entry of a metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MetaEntry {
    pub name: String,
    pub value: String,
}

/// Ordered name/value pairs attached to a document or a data array.
///
/// Documents may repeat a name. Every entry is kept in document order, while
/// lookups resolve to the last entry of a given name.
///
/// ```
/// use gifti::MetaData;
///
/// let mut meta = MetaData::new();
/// meta.insert("AnatomicalStructurePrimary", "CortexLeft");
/// meta.insert("AnatomicalStructureSecondary", "Pial");
/// assert_eq!(meta.get("AnatomicalStructurePrimary"), Some("CortexLeft"));
/// assert_eq!(meta.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MetaData {
    entries: Vec<MetaEntry>,
}

impl MetaData {
    pub fn new() -> Self {
        MetaData::default()
    }

    /// Set the value of `name`. An existing entry is updated in place (the
    /// last one when the name repeats), otherwise a new entry is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().rev().find(|x| x.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(MetaEntry { name, value }),
        }
    }

    /// Append an entry without checking for an existing name
    pub(crate) fn push(&mut self, name: String, value: String) {
        self.entries.push(MetaEntry { name, value });
    }

    /// Value of the last entry named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|x| x.name == name)
            .map(|x| x.value.as_str())
    }

    /// Remove every entry named `name`, returning the value that `get` would
    /// have returned
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().rposition(|x| x.name == name)?;
        let removed = self.entries.remove(pos);
        self.entries.retain(|x| x.name != name);
        Some(removed.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|x| (x.name.as_str(), x.value.as_str()))
    }

    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    /// Name to value map, where later entries overwrite earlier ones
    pub fn to_map(&self) -> HashMap<&str, &str> {
        self.iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for MetaData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(name, value)| MetaEntry {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        MetaData { entries }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for MetaData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_are_last_wins() {
        let meta = MetaData::from([("Name", "first"), ("Other", "x"), ("Name", "second")]);
        assert_eq!(meta.len(), 3);
        assert_eq!(meta.get("Name"), Some("second"));
        assert_eq!(meta.to_map().get("Name"), Some(&"second"));
        assert_eq!(meta.to_map().len(), 2);

        let names: Vec<_> = meta.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Name", "Other", "Name"]);
    }

    #[test]
    fn test_insert_updates_in_place() {
        let mut meta = MetaData::from([("a", "1"), ("b", "2")]);
        meta.insert("a", "3");
        meta.insert("c", "4");
        let pairs: Vec<_> = meta.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2"), ("c", "4")]);
    }

    #[test]
    fn test_remove() {
        let mut meta = MetaData::from([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(meta.remove("a"), Some(String::from("3")));
        assert_eq!(meta.remove("a"), None);
        assert_eq!(meta.len(), 1);
        assert!(meta.get("a").is_none());
    }

    #[test]
    fn test_empty() {
        let meta = MetaData::new();
        assert!(meta.is_empty());
        assert_eq!(meta.get("anything"), None);
        assert!(meta.to_map().is_empty());
    }
}
