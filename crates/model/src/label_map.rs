//! Class-code to label mapping artifacts.
//!
//! A label map is a JSON object whose keys are class codes:
//!
//! ```json
//! { "0": "B", "1": "M" }
//! ```

use hdp_types::ClassCode;
use std::collections::BTreeMap;
use std::path::Path;

use crate::{ModelError, ModelResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap(BTreeMap<ClassCode, String>);

impl LabelMap {
    /// Read a label map from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read and [`ModelError::LabelMap`] if
    /// it is not an object of integer keys to non-empty strings.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(json: &str) -> ModelResult<Self> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(json).map_err(|e| ModelError::LabelMap(e.to_string()))?;

        let mut map = BTreeMap::new();
        for (key, label) in raw {
            let code: ClassCode = key
                .trim()
                .parse()
                .map_err(|_| ModelError::LabelMap(format!("key {key:?} is not a class code")))?;
            if label.trim().is_empty() {
                return Err(ModelError::LabelMap(format!(
                    "label for class {code} is empty"
                )));
            }
            if map.insert(code, label).is_some() {
                return Err(ModelError::LabelMap(format!("class {code} is mapped twice")));
            }
        }
        Ok(Self(map))
    }

    pub fn get(&self, code: ClassCode) -> Option<&str> {
        self.0.get(&code).map(String::as_str)
    }

    pub fn codes(&self) -> impl Iterator<Item = ClassCode> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_label_map() {
        let map = LabelMap::parse(r#"{ "0": "B", "1": "M" }"#).unwrap();
        assert_eq!(map.get(0), Some("B"));
        assert_eq!(map.get(1), Some("M"));
        assert_eq!(map.get(2), None);
        assert_eq!(map.codes().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_parse_label_map_rejects_non_integer_keys() {
        let err = LabelMap::parse(r#"{ "benign": "B" }"#).expect_err("should reject");
        assert!(matches!(err, ModelError::LabelMap(msg) if msg.contains("not a class code")));
    }

    #[test]
    fn test_parse_label_map_rejects_keys_colliding_after_trim() {
        let err = LabelMap::parse(r#"{ "1": "M", " 1": "X" }"#).expect_err("should reject");
        assert!(matches!(err, ModelError::LabelMap(msg) if msg.contains("mapped twice")));
    }

    #[test]
    fn test_load_label_map_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelMap::load(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_load_label_map_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0": "Benign", "1": "Malignant"}}"#).unwrap();

        let map = LabelMap::load(file.path()).unwrap();
        assert_eq!(map.codes().count(), 2);
        assert_eq!(map.get(1), Some("Malignant"));
    }
}
