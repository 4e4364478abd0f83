//! Преобразование данных: импутация, one-hot кодирование, стандартизация

use std::path::{Path, PathBuf};

use crate::config::DataTransformationConfig;
use crate::dataset::load_csv;
use crate::error::{OperationContext, PreprocessError, Result, TransformationError};
use crate::preprocessing::Preprocessor;
use crate::types::{Dataset, TransformedDataset};

#[derive(Debug, Clone)]
pub struct TransformationOutput {
    pub train: TransformedDataset,
    pub test: TransformedDataset,
    pub preprocessor_path: PathBuf,
}

pub struct DataTransformation {
    config: DataTransformationConfig,
}

impl DataTransformation {
    pub fn new() -> Self {
        Self::with_config(DataTransformationConfig::default())
    }

    pub fn with_config(config: DataTransformationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataTransformationConfig {
        &self.config
    }

    /// Необученный преобразователь по схеме признаков
    pub fn build_transformer(&self) -> Result<Preprocessor> {
        let preprocessor =
            Preprocessor::new(self.config.schema.clone(), self.config.handle_unknown)?;
        tracing::info!("Numerical & Categorical pipelines created");
        Ok(preprocessor)
    }

    pub fn run(
        &self,
        train_path: impl AsRef<Path>,
        test_path: impl AsRef<Path>,
    ) -> std::result::Result<TransformationOutput, TransformationError> {
        let schema = &self.config.schema;

        let train_df = load_csv(train_path, schema).during("load train data")?;
        let test_df = load_csv(test_path, schema).during("load test data")?;
        tracing::info!("Train and Test data imported");

        // Проверяем обе таблицы до обучения и записи
        schema.check_dataset(&train_df).during("validate train schema")?;
        schema.check_dataset(&test_df).during("validate test schema")?;

        tracing::info!("Starting Preprocessing");
        let mut preprocessor = self.build_transformer().during("build transformer")?;

        let (train_features, train_target) = train_df
            .split_target(&schema.target_column)
            .during("split train target")?;
        let (test_features, test_target) = test_df
            .split_target(&schema.target_column)
            .during("split test target")?;

        tracing::info!("Applying preprocessing object on training df and testing df");
        let train_arr = preprocessor
            .fit_transform(&train_features)
            .during("fit preprocessor")?;
        let test_arr = preprocessor
            .transform(&test_features)
            .during("transform test data")?;

        let feature_names = preprocessor.feature_names();
        let train = TransformedDataset {
            feature_names: feature_names.clone(),
            features: train_arr,
            target_name: schema.target_column.clone(),
            target: train_target,
        };
        let test = TransformedDataset {
            feature_names,
            features: test_arr,
            target_name: schema.target_column.clone(),
            target: test_target,
        };

        let preprocessor_path = self.config.preprocessor_obj_file_path.clone();
        preprocessor
            .save(&preprocessor_path)
            .during("save preprocessor")?;
        tracing::info!("Saved preprocessing object to {}", preprocessor_path.display());

        Ok(TransformationOutput {
            train,
            test,
            preprocessor_path,
        })
    }
}

impl Default for DataTransformation {
    fn default() -> Self {
        Self::new()
    }
}

/// Применяет сохранённый преобразователь к таблице с целевой колонкой
pub fn apply_saved(
    preprocessor_path: impl AsRef<Path>,
    dataset: &Dataset,
) -> Result<TransformedDataset> {
    let preprocessor = Preprocessor::load(preprocessor_path)?;
    let target_name = preprocessor.schema().target_column.clone();

    let (features, target) = dataset.split_target(&target_name)?;
    let transformed = preprocessor.transform(&features)?;
    if transformed.nrows() != target.len() {
        return Err(PreprocessError::Validation(
            "row count changed during transform".to_string(),
        ));
    }

    Ok(TransformedDataset {
        feature_names: preprocessor.feature_names(),
        features: transformed,
        target_name,
        target,
    })
}
