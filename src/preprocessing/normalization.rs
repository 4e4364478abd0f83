//! Стандартизация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    with_mean: bool,
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            with_mean: true,
            mean: None,
            std: None,
            is_fitted: false,
        }
    }

    /// Масштабирование без центрирования (для разреженных one-hot колонок)
    pub fn without_mean() -> Self {
        Self {
            with_mean: false,
            ..Self::new()
        }
    }

    pub fn with_mean(&self) -> bool {
        self.with_mean
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.std.as_ref()
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PreprocessError::Validation("Empty dataset".to_string()));
        }

        // Среднее и стандартное отклонение (ddof = 0) по каждому признаку
        self.mean = Some(
            X.mean_axis(Axis(0))
                .ok_or_else(|| PreprocessError::Validation("Failed to compute mean".to_string()))?,
        );
        self.std = Some(X.std_axis(Axis(0), 0.0));

        // Избегаем деления на ноль
        if let Some(ref mut std) = self.std {
            for val in std.iter_mut() {
                if *val < 1e-10 {
                    *val = 1.0;
                }
            }
        }

        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PreprocessError::NotFitted);
        }

        let mean = self.mean.as_ref().ok_or(PreprocessError::NotFitted)?;
        let std = self.std.as_ref().ok_or(PreprocessError::NotFitted)?;

        if X.ncols() != std.len() {
            return Err(PreprocessError::Validation(format!(
                "scaler fitted on {} features, got {}",
                std.len(),
                X.ncols()
            )));
        }

        // (X - mean) / std, либо X / std без центрирования
        let mut scaled = X.clone();
        for mut row in scaled.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                if self.with_mean {
                    *val -= mean[i];
                }
                *val /= std[i];
            }
        }

        Ok(scaled)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}
