//! carprice-ml - предобработка данных для модели цены автомобилей

pub mod config;
pub mod dataset;
pub mod error;
pub mod persistence;
pub mod preprocessing;
pub mod transformation;
pub mod types;

pub use config::DataTransformationConfig;
pub use error::{PreprocessError, TransformationError};
pub use preprocessing::*;
pub use transformation::{DataTransformation, TransformationOutput};
pub use types::*;
