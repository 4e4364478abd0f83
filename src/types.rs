/// Типы данных для предобработки

use std::collections::HashSet;

use ndarray::{Array1, Array2, Ix1};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }
}

/// Таблица с именованными колонками одинаковой длины
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Откуда загружены данные (для сообщений об ошибках)
    pub label: String,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(label: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let label = label.into();
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if column.data.len() != n_rows {
                return Err(PreprocessError::Validation(format!(
                    "column '{}' in {} has {} rows, expected {}",
                    column.name,
                    label,
                    column.data.len(),
                    n_rows
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(PreprocessError::Validation(format!(
                    "duplicate column '{}' in {}",
                    column.name, label
                )));
            }
        }

        Ok(Self {
            label,
            columns,
            n_rows,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PreprocessError::missing_column(name, self.label.clone()))
    }

    pub fn numeric_column(&self, name: &str) -> Result<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(values) => Ok(values.as_slice()),
            ColumnData::Categorical(_) => Err(PreprocessError::Validation(format!(
                "column '{}' in {} is not numeric",
                name, self.label
            ))),
        }
    }

    /// Категориальное представление колонки; числовые значения переводятся в строки
    pub fn categorical_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        match &self.column(name)?.data {
            ColumnData::Categorical(values) => Ok(values.clone()),
            ColumnData::Numeric(values) => Ok(values
                .iter()
                .map(|v| v.map(|x| x.to_string()))
                .collect()),
        }
    }

    /// Разделение на признаки и целевую переменную
    pub fn split_target(&self, target: &str) -> Result<(Dataset, Array1<f64>)> {
        let target_values = self.numeric_column(target)?;
        let targets: Array1<f64> = target_values
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();

        let features = Dataset {
            label: self.label.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| c.name != target)
                .cloned()
                .collect(),
            n_rows: self.n_rows,
        };

        Ok((features, targets))
    }
}

/// Разбиение колонок на числовые и категориальные + целевая колонка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub target_column: String,
}

impl FeatureSchema {
    pub fn new<N, C>(numeric: N, categorical: C, target: impl Into<String>) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            numeric_columns: numeric.into_iter().map(Into::into).collect(),
            categorical_columns: categorical.into_iter().map(Into::into).collect(),
            target_column: target.into(),
        }
    }

    pub fn feature_columns(&self) -> impl Iterator<Item = &str> {
        self.numeric_columns
            .iter()
            .chain(self.categorical_columns.iter())
            .map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            return Err(PreprocessError::Configuration(
                "schema references no feature columns".to_string(),
            ));
        }
        if self.target_column.is_empty() {
            return Err(PreprocessError::Configuration(
                "target column name is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in self.feature_columns() {
            if name == self.target_column {
                return Err(PreprocessError::Configuration(format!(
                    "target column '{}' listed among features",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(PreprocessError::Configuration(format!(
                    "column '{}' listed twice",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Проверка, что в таблице есть все колонки схемы и целевая колонка
    pub fn check_dataset(&self, dataset: &Dataset) -> Result<()> {
        for name in self
            .feature_columns()
            .chain(std::iter::once(self.target_column.as_str()))
        {
            dataset.column(name)?;
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(
            ["HorsePower", "kilometer"],
            [
                "Seller",
                "offerType",
                "abtest",
                "vehicleType",
                "gearbox",
                "fuelType",
                "NotRepaired/Damaged",
                "Risk_Level",
            ],
            "Price",
        )
    }
}

/// Результат преобразования: признаки + целевая колонка в конце
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedDataset {
    pub feature_names: Vec<String>,
    pub features: Array2<f64>,
    pub target_name: String,
    pub target: Array1<f64>,
}

impl TransformedDataset {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Имена всех колонок, целевая последней
    pub fn column_names(&self) -> Vec<&str> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.target_name.as_str()))
            .collect()
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        let mut row = self.features.row(i).to_vec();
        row.push(self.target[i]);
        row
    }

    pub fn feature(&self, name: &str) -> Option<Array1<f64>> {
        let idx = self.feature_names.iter().position(|n| n == name)?;
        Some(self.features.column(idx).to_owned())
    }

    /// Датасет для обучения моделей на linfa
    pub fn to_linfa(&self) -> linfa::Dataset<f64, f64, Ix1> {
        linfa::Dataset::new(self.features.clone(), self.target.clone())
            .with_feature_names(self.feature_names.clone())
    }
}
