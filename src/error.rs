//! Ошибки предобработки данных

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreprocessError>;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: column '{column}' not found in {dataset}")]
    Schema { column: String, dataset: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Preprocessor not fitted")]
    NotFitted,

    #[error("Preprocessor already fitted")]
    AlreadyFitted,
}

impl PreprocessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PreprocessError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_column(column: impl Into<String>, dataset: impl Into<String>) -> Self {
        PreprocessError::Schema {
            column: column.into(),
            dataset: dataset.into(),
        }
    }

    /// Оборачивает ошибку в контекст операции
    pub fn during(self, operation: &'static str) -> TransformationError {
        TransformationError {
            operation,
            source: self,
        }
    }
}

impl From<serde_json::Error> for PreprocessError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PreprocessError {
    fn from(err: ndarray::ShapeError) -> Self {
        PreprocessError::Validation(format!("invalid shape: {}", err))
    }
}

/// Единая ошибка, которую видит вызывающий код `DataTransformation::run`.
///
/// `operation` указывает шаг, на котором произошёл сбой; исходная причина
/// доступна через `source()`.
#[derive(Error, Debug)]
#[error("data transformation failed during '{operation}': {source}")]
pub struct TransformationError {
    pub operation: &'static str,
    #[source]
    pub source: PreprocessError,
}

impl TransformationError {
    pub fn kind(&self) -> &PreprocessError {
        &self.source
    }
}

/// Расширение для `Result`, добавляющее контекст операции
pub trait OperationContext<T> {
    fn during(self, operation: &'static str) -> std::result::Result<T, TransformationError>;
}

impl<T> OperationContext<T> for Result<T> {
    fn during(self, operation: &'static str) -> std::result::Result<T, TransformationError> {
        self.map_err(|e| e.during(operation))
    }
}
