//! Integration test: шаг преобразования данных целиком

use std::io::Write;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use carprice_ml::{
    dataset::load_csv, transformation::apply_saved, DataTransformation,
    DataTransformationConfig, FeatureSchema, HandleUnknown, PreprocessError, Preprocessor,
};

const HEADER: &str = "HorsePower,kilometer,Seller,offerType,abtest,vehicleType,gearbox,fuelType,NotRepaired/Damaged,Risk_Level,Price";

const TRAIN_ROWS: &[&str] = &[
    "100,50000,private,offer,test,limousine,manual,petrol,no,1,5000",
    "150,125000,private,offer,control,suv,automatic,diesel,yes,2,8000",
    ",150000,private,offer,test,kombi,manual,petrol,,3,1200",
    "75,20000,private,offer,control,limousine,manual,,no,1,3500",
    "220,90000,private,offer,test,suv,automatic,diesel,no,2,15000",
];

const TEST_ROWS: &[&str] = &[
    "90,60000,private,offer,control,kombi,manual,petrol,no,1,4000",
    "300,10000,private,offer,test,suv,automatic,diesel,yes,3,30000",
];

fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    path
}

struct Fixture {
    dir: tempfile::TempDir,
    train: PathBuf,
    test: PathBuf,
}

impl Fixture {
    fn new(test_rows: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let train = write_csv(dir.path(), "train.csv", HEADER, TRAIN_ROWS);
        let test = write_csv(dir.path(), "test.csv", HEADER, test_rows);
        Self { dir, train, test }
    }

    fn artifact(&self) -> PathBuf {
        self.dir.path().join("artifacts").join("preprocessed.json")
    }

    fn transformation(&self) -> DataTransformation {
        DataTransformation::with_config(
            DataTransformationConfig::default().with_preprocessor_path(self.artifact()),
        )
    }
}

#[test]
fn test_run_preserves_rows_and_layout() {
    let fx = Fixture::new(TEST_ROWS);
    let output = fx.transformation().run(&fx.train, &fx.test).unwrap();

    assert_eq!(output.train.n_rows(), TRAIN_ROWS.len());
    assert_eq!(output.test.n_rows(), TEST_ROWS.len());
    assert_eq!(output.preprocessor_path, fx.artifact());
    assert!(fx.artifact().exists());

    let columns = output.train.column_names();
    assert_eq!(columns[0], "HorsePower");
    assert_eq!(columns[1], "kilometer");
    assert_eq!(*columns.last().unwrap(), "Price");
    assert!(columns.contains(&"Seller_private"));
    assert!(columns.contains(&"NotRepaired/Damaged_yes"));
    assert!(columns.contains(&"Risk_Level_3"));
    assert_eq!(output.train.column_names(), output.test.column_names());
}

#[test]
fn test_first_row_example() {
    let fx = Fixture::new(TEST_ROWS);
    let output = fx.transformation().run(&fx.train, &fx.test).unwrap();

    let row = output.train.row(0);
    assert_eq!(*row.last().unwrap(), 5000.0);
    assert!(row.iter().all(|v| v.is_finite()));

    let gearbox_manual = output.train.feature("gearbox_manual").unwrap();
    let gearbox_automatic = output.train.feature("gearbox_automatic").unwrap();
    assert!(gearbox_manual[0] > 0.0);
    assert_eq!(gearbox_automatic[0], 0.0);

    // одна категория Seller: std = 0 заменяется на 1, индикатор остаётся 1
    let seller = output.train.feature("Seller_private").unwrap();
    assert!(seller.iter().all(|v| *v == 1.0));
}

#[test]
fn test_numeric_columns_are_standardized() {
    let fx = Fixture::new(TEST_ROWS);
    let output = fx.transformation().run(&fx.train, &fx.test).unwrap();

    let km = output.train.feature("kilometer").unwrap();
    assert_abs_diff_eq!(km.mean().unwrap(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(km.std(0.0), 1.0, epsilon = 1e-9);

    // пропуск HorsePower заполнен медианой [75, 100, 150, 220] = 125
    let pre = Preprocessor::load(fx.artifact()).unwrap();
    assert_eq!(pre.numeric_pipeline().imputer.statistics()[0], 125.0);
}

#[test]
fn test_test_data_does_not_leak_into_fit() {
    let calm = Fixture::new(TEST_ROWS);
    let skewed = Fixture::new(&[
        "9999,1,private,offer,control,kombi,manual,petrol,no,1,1",
        "9999,1,private,offer,control,kombi,manual,petrol,no,1,1",
        "9999,1,private,offer,control,kombi,manual,petrol,no,1,1",
    ]);

    let a = calm.transformation().run(&calm.train, &calm.test).unwrap();
    let b = skewed.transformation().run(&skewed.train, &skewed.test).unwrap();

    assert_eq!(a.train, b.train);

    let pre_a = Preprocessor::load(calm.artifact()).unwrap();
    let pre_b = Preprocessor::load(skewed.artifact()).unwrap();
    assert_eq!(
        pre_a.numeric_pipeline().scaler.mean(),
        pre_b.numeric_pipeline().scaler.mean()
    );
    assert_eq!(
        pre_a.categorical_pipeline().encoder.categories(),
        pre_b.categorical_pipeline().encoder.categories()
    );
}

#[test]
fn test_reloaded_preprocessor_reproduces_train_output() {
    let fx = Fixture::new(TEST_ROWS);
    let output = fx.transformation().run(&fx.train, &fx.test).unwrap();

    let train_df = load_csv(&fx.train, &FeatureSchema::default()).unwrap();
    let again = apply_saved(fx.artifact(), &train_df).unwrap();

    assert_eq!(again.feature_names, output.train.feature_names);
    assert_eq!(again.features, output.train.features);
    assert_eq!(again.target, output.train.target);
}

#[test]
fn test_missing_column_fails_before_write() {
    let fx = Fixture::new(TEST_ROWS);
    let header_without_gearbox = HEADER.replace(",gearbox", "");
    let rows: Vec<String> = TEST_ROWS
        .iter()
        .map(|r| {
            let mut fields: Vec<&str> = r.split(',').collect();
            fields.remove(6);
            fields.join(",")
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let test = write_csv(fx.dir.path(), "test_broken.csv", &header_without_gearbox, &rows);

    let err = fx.transformation().run(&fx.train, &test).unwrap_err();
    assert_eq!(err.operation, "validate test schema");
    assert!(matches!(
        err.kind(),
        PreprocessError::Schema { column, .. } if column == "gearbox"
    ));
    assert!(!fx.artifact().exists());
}

#[test]
fn test_missing_train_column_fails_before_write() {
    let dir = tempfile::tempdir().unwrap();
    let header_without_km = HEADER.replace(",kilometer", "");
    let rows: Vec<String> = TRAIN_ROWS
        .iter()
        .map(|r| {
            let mut fields: Vec<&str> = r.split(',').collect();
            fields.remove(1);
            fields.join(",")
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let train = write_csv(dir.path(), "train.csv", &header_without_km, &rows);
    let test = write_csv(dir.path(), "test.csv", HEADER, TEST_ROWS);
    let artifact = dir.path().join("artifacts").join("preprocessed.json");

    let err = DataTransformation::with_config(
        DataTransformationConfig::default().with_preprocessor_path(&artifact),
    )
    .run(&train, &test)
    .unwrap_err();

    assert_eq!(err.operation, "validate train schema");
    assert!(matches!(
        err.kind(),
        PreprocessError::Schema { column, .. } if column == "kilometer"
    ));
    assert!(!artifact.exists());
}

#[test]
fn test_empty_train_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let train = write_csv(dir.path(), "train.csv", HEADER, &[]);
    let test = write_csv(dir.path(), "test.csv", HEADER, TEST_ROWS);

    let err = DataTransformation::with_config(
        DataTransformationConfig::default()
            .with_preprocessor_path(dir.path().join("preprocessed.json")),
    )
    .run(&train, &test)
    .unwrap_err();

    assert_eq!(err.operation, "load train data");
    assert!(matches!(err.kind(), PreprocessError::Validation(_)));
}

#[test]
fn test_unknown_category_policy() {
    let rows = &["90,60000,private,offer,control,cabrio,manual,petrol,no,1,4000"];

    let strict = Fixture::new(rows);
    let err = strict.transformation().run(&strict.train, &strict.test).unwrap_err();
    assert_eq!(err.operation, "transform test data");
    assert!(!strict.artifact().exists());

    let lenient = Fixture::new(rows);
    let output = DataTransformation::with_config(
        DataTransformationConfig::default()
            .with_preprocessor_path(lenient.artifact())
            .with_handle_unknown(HandleUnknown::Ignore),
    )
    .run(&lenient.train, &lenient.test)
    .unwrap();

    for name in ["vehicleType_kombi", "vehicleType_limousine", "vehicleType_suv"] {
        assert_eq!(output.test.feature(name).unwrap()[0], 0.0);
    }
}

#[test]
fn test_existing_artifact_is_overwritten() {
    let fx = Fixture::new(TEST_ROWS);
    std::fs::create_dir_all(fx.artifact().parent().unwrap()).unwrap();
    std::fs::write(fx.artifact(), "stale").unwrap();

    fx.transformation().run(&fx.train, &fx.test).unwrap();
    assert!(Preprocessor::load(fx.artifact()).unwrap().is_fitted());
}
