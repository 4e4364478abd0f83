//! Заполнение пропусков

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};
use crate::preprocessing::encoder::compare_categories;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Медиана (только числовые колонки)
    Median,
    /// Самое частое значение; при равенстве берётся наименьшее
    MostFrequent,
}

/// Тип значения, для которого можно считать статистику заполнения
pub trait Imputable: Clone + PartialOrd {
    /// Порядок сортировки; при равных частотах побеждает меньшее значение
    fn compare(a: &Self, b: &Self) -> Ordering {
        a.partial_cmp(b).unwrap_or(Ordering::Equal)
    }

    fn median(_sorted: &[Self]) -> Option<Self> {
        None
    }
}

impl Imputable for f64 {
    fn median(sorted: &[Self]) -> Option<Self> {
        let n = sorted.len();
        if n == 0 {
            return None;
        }
        if n % 2 == 1 {
            Some(sorted[n / 2])
        } else {
            Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
        }
    }
}

/// Тот же порядок, что и у словаря one-hot: числа первыми
impl Imputable for String {
    fn compare(a: &Self, b: &Self) -> Ordering {
        compare_categories(a, b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleImputer<T> {
    strategy: ImputeStrategy,
    statistics: Vec<T>,
    is_fitted: bool,
}

impl<T: Imputable> SimpleImputer<T> {
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            statistics: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    /// Значения заполнения по колонкам, в порядке `fit`
    pub fn statistics(&self) -> &[T] {
        &self.statistics
    }

    pub fn fit(&mut self, columns: &[(&str, &[Option<T>])]) -> Result<()> {
        let mut statistics = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            let mut present: Vec<T> = values.iter().flatten().cloned().collect();
            if present.is_empty() {
                return Err(PreprocessError::Validation(format!(
                    "column '{}' has no observed values to impute from",
                    name
                )));
            }
            present.sort_by(T::compare);

            let fill = match self.strategy {
                ImputeStrategy::Median => T::median(&present).ok_or_else(|| {
                    PreprocessError::Configuration(format!(
                        "median strategy is not supported for column '{}'",
                        name
                    ))
                })?,
                ImputeStrategy::MostFrequent => most_frequent(&present),
            };
            statistics.push(fill);
        }

        self.statistics = statistics;
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, columns: &[&[Option<T>]]) -> Result<Vec<Vec<T>>> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }
        if columns.len() != self.statistics.len() {
            return Err(PreprocessError::Validation(format!(
                "imputer fitted on {} columns, got {}",
                self.statistics.len(),
                columns.len()
            )));
        }

        Ok(columns
            .iter()
            .zip(&self.statistics)
            .map(|(values, fill)| {
                values
                    .iter()
                    .map(|v| v.clone().unwrap_or_else(|| fill.clone()))
                    .collect()
            })
            .collect())
    }
}

/// Мода отсортированной последовательности
fn most_frequent<T: Clone + PartialOrd>(sorted: &[T]) -> T {
    let mut best = &sorted[0];
    let mut best_count = 0;
    let mut i = 0;

    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        // строгое сравнение: при равенстве остаётся меньшее значение
        if j - i > best_count {
            best_count = j - i;
            best = &sorted[i];
        }
        i = j;
    }

    best.clone()
}
