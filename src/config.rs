/// Настройки шага преобразования данных

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::preprocessing::HandleUnknown;
use crate::types::FeatureSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationConfig {
    #[serde(default = "default_preprocessor_path")]
    pub preprocessor_obj_file_path: PathBuf,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    #[serde(default)]
    pub schema: FeatureSchema,
}

fn default_preprocessor_path() -> PathBuf {
    PathBuf::from("artifacts").join("preprocessed.json")
}

impl DataTransformationConfig {
    pub fn with_preprocessor_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preprocessor_obj_file_path = path.into();
        self
    }

    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }
}

impl Default for DataTransformationConfig {
    fn default() -> Self {
        Self {
            preprocessor_obj_file_path: default_preprocessor_path(),
            handle_unknown: HandleUnknown::default(),
            schema: FeatureSchema::default(),
        }
    }
}
