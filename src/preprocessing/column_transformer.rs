//! Объединение числового и категориального конвейеров

#![allow(non_snake_case)]

use std::path::Path;

use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};
use crate::persistence::{load_object, save_object};
use crate::preprocessing::encoder::{HandleUnknown, OneHotEncoder};
use crate::preprocessing::imputer::{ImputeStrategy, SimpleImputer};
use crate::preprocessing::normalization::StandardScaler;
use crate::types::{Dataset, FeatureSchema};

/// Медиана → стандартизация
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericPipeline {
    pub imputer: SimpleImputer<f64>,
    pub scaler: StandardScaler,
}

impl NumericPipeline {
    pub fn new() -> Self {
        Self {
            imputer: SimpleImputer::new(ImputeStrategy::Median),
            scaler: StandardScaler::new(),
        }
    }

    fn impute(&self, dataset: &Dataset, columns: &[String]) -> Result<Array2<f64>> {
        let raw = columns
            .iter()
            .map(|name| dataset.numeric_column(name))
            .collect::<Result<Vec<_>>>()?;
        let filled = self.imputer.transform(&raw)?;
        Ok(to_matrix(&filled, dataset.n_rows()))
    }

    fn fit(&mut self, dataset: &Dataset, columns: &[String]) -> Result<()> {
        let mut raw = Vec::with_capacity(columns.len());
        for name in columns {
            raw.push((name.as_str(), dataset.numeric_column(name)?));
        }
        self.imputer.fit(&raw)?;

        let X = self.impute(dataset, columns)?;
        self.scaler.fit(&X)
    }

    fn transform(&self, dataset: &Dataset, columns: &[String]) -> Result<Array2<f64>> {
        let X = self.impute(dataset, columns)?;
        self.scaler.transform(&X)
    }
}

impl Default for NumericPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Самое частое значение → one-hot → масштабирование без центрирования
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalPipeline {
    pub imputer: SimpleImputer<String>,
    pub encoder: OneHotEncoder,
    pub scaler: StandardScaler,
}

impl CategoricalPipeline {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            imputer: SimpleImputer::new(ImputeStrategy::MostFrequent),
            encoder: OneHotEncoder::new(handle_unknown),
            scaler: StandardScaler::without_mean(),
        }
    }

    fn raw_columns(dataset: &Dataset, columns: &[String]) -> Result<Vec<Vec<Option<String>>>> {
        columns
            .iter()
            .map(|name| dataset.categorical_column(name))
            .collect()
    }

    fn encode(&self, raw: &[Vec<Option<String>>], columns: &[String]) -> Result<Array2<f64>> {
        let views: Vec<&[Option<String>]> = raw.iter().map(Vec::as_slice).collect();
        let filled = self.imputer.transform(&views)?;
        self.encoder.transform(&filled, columns)
    }

    fn fit(&mut self, dataset: &Dataset, columns: &[String]) -> Result<()> {
        let raw = Self::raw_columns(dataset, columns)?;

        let named: Vec<(&str, &[Option<String>])> = columns
            .iter()
            .map(String::as_str)
            .zip(raw.iter().map(Vec::as_slice))
            .collect();
        self.imputer.fit(&named)?;

        let views: Vec<&[Option<String>]> = raw.iter().map(Vec::as_slice).collect();
        let filled = self.imputer.transform(&views)?;
        self.encoder.fit(&filled)?;

        let encoded = self.encoder.transform(&filled, columns)?;
        self.scaler.fit(&encoded)
    }

    fn transform(&self, dataset: &Dataset, columns: &[String]) -> Result<Array2<f64>> {
        let raw = Self::raw_columns(dataset, columns)?;
        let encoded = self.encode(&raw, columns)?;
        self.scaler.transform(&encoded)
    }
}

/// Состояние преобразователя: параметры, полученные на обучающей выборке.
///
/// Обучается ровно один раз; после этого используется только для чтения.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    schema: FeatureSchema,
    numeric: NumericPipeline,
    categorical: CategoricalPipeline,
    is_fitted: bool,
}

impl Preprocessor {
    pub fn new(schema: FeatureSchema, handle_unknown: HandleUnknown) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            schema,
            numeric: NumericPipeline::new(),
            categorical: CategoricalPipeline::new(handle_unknown),
            is_fitted: false,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub fn numeric_pipeline(&self) -> &NumericPipeline {
        &self.numeric
    }

    pub fn categorical_pipeline(&self) -> &CategoricalPipeline {
        &self.categorical
    }

    pub fn fit(&mut self, features: &Dataset) -> Result<()> {
        if self.is_fitted {
            return Err(PreprocessError::AlreadyFitted);
        }
        self.check_columns(features)?;

        if !self.schema.numeric_columns.is_empty() {
            self.numeric.fit(features, &self.schema.numeric_columns)?;
        }
        if !self.schema.categorical_columns.is_empty() {
            self.categorical
                .fit(features, &self.schema.categorical_columns)?;
        }

        self.is_fitted = true;
        tracing::debug!(
            "Preprocessor fitted on {} rows, {} output features",
            features.n_rows(),
            self.n_features_out()
        );
        Ok(())
    }

    /// Числовые колонки, затем индикаторы категорий; прочие колонки отбрасываются
    pub fn transform(&self, features: &Dataset) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }
        self.check_columns(features)?;

        let n_rows = features.n_rows();
        let numeric = if self.schema.numeric_columns.is_empty() {
            Array2::zeros((n_rows, 0))
        } else {
            self.numeric
                .transform(features, &self.schema.numeric_columns)?
        };
        let categorical = if self.schema.categorical_columns.is_empty() {
            Array2::zeros((n_rows, 0))
        } else {
            self.categorical
                .transform(features, &self.schema.categorical_columns)?
        };

        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    pub fn fit_transform(&mut self, features: &Dataset) -> Result<Array2<f64>> {
        self.fit(features)?;
        self.transform(features)
    }

    pub fn n_features_out(&self) -> usize {
        self.schema.numeric_columns.len() + self.categorical.encoder.n_features_out()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.schema.numeric_columns.clone();
        names.extend(
            self.categorical
                .encoder
                .get_feature_names_out(&self.schema.categorical_columns),
        );
        names
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }
        save_object(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let preprocessor: Self = load_object(path)?;
        preprocessor.schema.validate()?;
        Ok(preprocessor)
    }

    fn check_columns(&self, features: &Dataset) -> Result<()> {
        for name in self.schema.feature_columns() {
            features.column(name)?;
        }
        Ok(())
    }
}

/// Колонки одинаковой длины → матрица (строки × колонки)
fn to_matrix(columns: &[Vec<f64>], n_rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j][i])
}
