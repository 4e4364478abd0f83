//! Сохранение и загрузка обученных объектов

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    object: T,
}

/// Сохраняет объект в JSON, создавая каталоги и перезаписывая файл
pub fn save_object<T: Serialize>(path: impl AsRef<Path>, object: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PreprocessError::io(parent, e))?;
    }

    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        saved_at: Utc::now(),
        object,
    };

    let file = File::create(path).map_err(|e| PreprocessError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &envelope)?;
    writer.flush().map_err(|e| PreprocessError::io(path, e))?;

    tracing::debug!("Saved object to {}", path.display());
    Ok(())
}

pub fn load_object<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PreprocessError::io(path, e))?;
    let envelope: Envelope<T> = serde_json::from_reader(BufReader::new(file))?;

    if envelope.format_version != FORMAT_VERSION {
        return Err(PreprocessError::Serialization(format!(
            "unsupported format version {} in {}",
            envelope.format_version,
            path.display()
        )));
    }

    Ok(envelope.object)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stats {
        median: f64,
        categories: Vec<String>,
    }

    #[test]
    fn test_save_creates_dirs_and_overwrites() -> TestResult {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("artifacts").join("stats.json");

        let first = Stats {
            median: 1.5,
            categories: vec!["a".into()],
        };
        save_object(&path, &first)?;

        let second = Stats {
            median: 2.5,
            categories: vec!["b".into(), "c".into()],
        };
        save_object(&path, &second)?;

        let loaded: Stats = load_object(&path)?;
        assert_eq!(loaded, second);
        Ok(())
    }

    #[test]
    fn test_load_garbage_is_serialization_error() -> TestResult {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "not json")?;

        let err = load_object::<Stats>(&path).unwrap_err();
        assert!(matches!(err, PreprocessError::Serialization(_)));
        Ok(())
    }

    #[test]
    fn test_other_format_version_is_rejected() -> TestResult {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("stats.json");
        let stale = Envelope {
            format_version: FORMAT_VERSION + 1,
            saved_at: Utc::now(),
            object: Stats {
                median: 1.0,
                categories: Vec::new(),
            },
        };
        std::fs::write(&path, serde_json::to_string(&stale)?)?;

        let err = load_object::<Stats>(&path).unwrap_err();
        assert!(matches!(err, PreprocessError::Serialization(_)));
        assert!(err.to_string().contains("format version"));
        Ok(())
    }
}
