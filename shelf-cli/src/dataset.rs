//! JSON dataset files
//!
//! A dataset is a JSON array of records in their wire shape, or an object with
//! the array under `data` (so a saved page can be fed back in).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum Dataset<T> {
    Records(Vec<T>),
    Wrapped { data: Vec<T> },
}

/// Read every record from a dataset file, in file order
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    let dataset: Dataset<T> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

    let records = match dataset {
        Dataset::Records(records) | Dataset::Wrapped { data: records } => records,
    };
    tracing::debug!(path = %path.display(), records = records.len(), "Loaded dataset");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_query::catalog::Category;
    use std::io::Write;

    fn write_dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_array() {
        let file = write_dataset(r#"[{"id":2,"label":"Poetry"},{"id":1,"label":"Fantasy"}]"#);
        let records: Vec<Category> = load(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Poetry");
    }

    #[test]
    fn test_load_wrapped_page() {
        let file = write_dataset(r#"{"data":[{"id":1,"label":"Fantasy"}],"pageIndex":0}"#);
        let records: Vec<Category> = load(file.path()).unwrap();
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load::<Category>(Path::new("/nonexistent/shelf.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }

    #[test]
    fn test_wrong_shape() {
        let file = write_dataset(r#"[{"id":"one"}]"#);
        let err = load::<Category>(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse dataset"));
    }
}
