//! One-hot кодирование категориальных признаков

use std::cmp::Ordering;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Что делать с категорией, не встречавшейся при обучении
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Все индикаторы колонки равны нулю
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    handle_unknown: HandleUnknown,
    /// Словарь категорий для каждой входной колонки
    categories: Vec<Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new(handle_unknown: HandleUnknown) -> Self {
        Self {
            handle_unknown,
            categories: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    pub fn n_features_out(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn fit(&mut self, columns: &[Vec<String>]) -> Result<()> {
        self.categories = columns
            .iter()
            .map(|values| {
                let mut unique = values.clone();
                unique.sort_by(|a, b| compare_categories(a, b));
                unique.dedup();
                unique
            })
            .collect();
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, columns: &[Vec<String>], names: &[String]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }
        if columns.len() != self.categories.len() {
            return Err(PreprocessError::Validation(format!(
                "encoder fitted on {} columns, got {}",
                self.categories.len(),
                columns.len()
            )));
        }

        let n_rows = columns.first().map(Vec::len).unwrap_or(0);
        let mut encoded = Array2::zeros((n_rows, self.n_features_out()));

        let mut offset = 0;
        for (col_idx, (values, vocabulary)) in columns.iter().zip(&self.categories).enumerate() {
            for (row, value) in values.iter().enumerate() {
                match vocabulary.binary_search_by(|c| compare_categories(c, value)) {
                    Ok(pos) => encoded[[row, offset + pos]] = 1.0,
                    Err(_) => {
                        if self.handle_unknown == HandleUnknown::Error {
                            let name = names.get(col_idx).map(String::as_str).unwrap_or("?");
                            return Err(PreprocessError::Validation(format!(
                                "unknown category '{}' in column '{}' at row {}",
                                value,
                                name,
                                row + 1
                            )));
                        }
                    }
                }
            }
            offset += vocabulary.len();
        }

        Ok(encoded)
    }

    /// Имена выходных колонок: `<колонка>_<категория>`
    pub fn get_feature_names_out(&self, input_names: &[String]) -> Vec<String> {
        input_names
            .iter()
            .zip(&self.categories)
            .flat_map(|(name, vocabulary)| {
                vocabulary
                    .iter()
                    .map(move |category| format!("{}_{}", name, category))
            })
            .collect()
    }
}

/// Числовые категории идут первыми и сравниваются как числа,
/// остальные лексикографически
pub(crate) fn compare_categories(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
