/// Модуль предобработки данных

pub mod column_transformer;
pub mod encoder;
pub mod imputer;
pub mod normalization;

pub use column_transformer::{CategoricalPipeline, NumericPipeline, Preprocessor};
pub use encoder::{HandleUnknown, OneHotEncoder};
pub use imputer::{ImputeStrategy, SimpleImputer};
pub use normalization::StandardScaler;
