//! Загрузка и сохранение табличных данных

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{PreprocessError, Result};
use crate::types::{Column, Dataset, FeatureSchema, TransformedDataset};

/// Значения, которые считаются пропусками
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw.trim())
}

/// Загрузка CSV с заголовком.
///
/// Числовые колонки схемы и целевая колонка разбираются как `f64`,
/// категориальные остаются строками. Тип остальных колонок определяется по
/// содержимому.
pub fn load_csv(path: impl AsRef<Path>, schema: &FeatureSchema) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PreprocessError::io(path, e))?;
    let label = path.display().to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(PreprocessError::Validation(format!(
            "{} has no header row",
            label
        )));
    }

    // Сырые значения по колонкам
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            raw[i].push(field.to_string());
        }
    }

    let n_rows = raw.first().map(Vec::len).unwrap_or(0);
    if n_rows == 0 {
        return Err(PreprocessError::Validation(format!("{} has no rows", label)));
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (name, values) in headers.into_iter().zip(raw) {
        let column = if schema.categorical_columns.contains(&name) {
            parse_categorical(name, values)
        } else if schema.numeric_columns.contains(&name) || name == schema.target_column {
            parse_numeric(name, &values, &label)?
        } else {
            infer_column(name, values, &label)?
        };
        columns.push(column);
    }

    let dataset = Dataset::new(label, columns)?;
    tracing::debug!(
        "Loaded {}: {} rows, {} columns",
        dataset.label,
        dataset.n_rows(),
        dataset.n_columns()
    );
    Ok(dataset)
}

fn parse_numeric(name: String, values: &[String], label: &str) -> Result<Column> {
    let mut parsed = Vec::with_capacity(values.len());
    for (row, raw) in values.iter().enumerate() {
        if is_missing(raw) {
            parsed.push(None);
            continue;
        }
        let value = raw.trim().parse::<f64>().map_err(|_| {
            PreprocessError::Validation(format!(
                "column '{}' in {}: row {} has non-numeric value '{}'",
                name,
                label,
                row + 1,
                raw
            ))
        })?;
        if !value.is_finite() {
            return Err(PreprocessError::Validation(format!(
                "column '{}' in {}: row {} has non-finite value '{}'",
                name,
                label,
                row + 1,
                raw
            )));
        }
        parsed.push(Some(value));
    }
    Ok(Column::numeric(name, parsed))
}

fn parse_categorical(name: String, values: Vec<String>) -> Column {
    let parsed = values
        .into_iter()
        .map(|v| if is_missing(&v) { None } else { Some(v) })
        .collect();
    Column::categorical(name, parsed)
}

fn infer_column(name: String, values: Vec<String>, label: &str) -> Result<Column> {
    let all_numeric = values
        .iter()
        .filter(|v| !is_missing(v))
        .all(|v| v.trim().parse::<f64>().map_or(false, f64::is_finite));

    if all_numeric {
        parse_numeric(name, &values, label)
    } else {
        Ok(parse_categorical(name, values))
    }
}

/// Запись преобразованной таблицы в CSV (целевая колонка последней)
pub fn write_csv(path: impl AsRef<Path>, dataset: &TransformedDataset) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PreprocessError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PreprocessError::io(path, e))?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record(dataset.column_names())?;
    for i in 0..dataset.n_rows() {
        let row: Vec<String> = dataset.row(i).iter().map(|v| v.to_string()).collect();
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .map_err(|e| PreprocessError::io(path, e))?;

    Ok(())
}
