/// Запуск шага преобразования данных на артефактах этапа загрузки

use std::path::Path;

use anyhow::Context;
use tracing_subscriber;

use carprice_ml::{dataset::write_csv, DataTransformation};

const ARTIFACTS_DIR: &str = "artifacts";

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let artifacts = Path::new(ARTIFACTS_DIR);
    let transformation = DataTransformation::new();

    let output = transformation
        .run(artifacts.join("train.csv"), artifacts.join("test.csv"))
        .context("data transformation step")?;

    write_csv(artifacts.join("train_transformed.csv"), &output.train)
        .context("writing transformed train data")?;
    write_csv(artifacts.join("test_transformed.csv"), &output.test)
        .context("writing transformed test data")?;

    tracing::info!(
        "Transformed {} train rows and {} test rows into {} features; preprocessor at {}",
        output.train.n_rows(),
        output.test.n_rows(),
        output.train.feature_names.len(),
        output.preprocessor_path.display()
    );

    Ok(())
}
