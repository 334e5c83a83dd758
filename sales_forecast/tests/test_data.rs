use chrono::NaiveDate;
use sales_forecast::data::{ColumnMapping, DataLoader};
use sales_forecast::utils::DEFAULT_DATE_FORMATS;
use sales_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn walmart_columns() -> ColumnMapping {
    ColumnMapping {
        date: "Date".to_string(),
        sales: "Weekly_Sales".to_string(),
        store: "Store".to_string(),
    }
}

#[test]
fn test_data_loader_from_csv() {
    let file = write_csv(&[
        "Store, Date ,Weekly_Sales,Holiday_Flag,Temperature,Fuel_Price,CPI,Unemployment",
        "1,05-02-2010,1643690.90,0,42.31,2.572,211.0963582,8.106",
        "1,12-02-2010,1641957.44,1,38.51,2.548,211.2421698,8.106",
        "2,05-02-2010,2136989.46,0,40.19,2.572,210.7526053,8.324",
        "1,19-02-2010,1611968.17,0,39.93,2.514,211.2891429,8.106",
    ]);

    let data = DataLoader::from_csv(file.path(), &walmart_columns(), &DEFAULT_DATE_FORMATS).unwrap();

    assert_eq!(data.len(), 4);
    assert!(!data.is_empty());
    assert_eq!(data.entity_ids(), vec!["1", "2"]);

    let store_1 = &data.series()[0];
    assert_eq!(store_1.len(), 3);
    assert_eq!(
        store_1.observations()[0].date,
        NaiveDate::from_ymd_opt(2010, 2, 5).unwrap()
    );
    assert_eq!(
        store_1.last().unwrap().date,
        NaiveDate::from_ymd_opt(2010, 2, 19).unwrap()
    );
    assert_eq!(store_1.observations()[1].covariates.holiday_flag, 1.0);
    assert_eq!(store_1.observations()[1].covariates.temperature, 38.51);
    assert_eq!(store_1.observations()[2].covariates.unemployment, 8.106);
}

#[test]
fn test_missing_covariates_default_to_zero() {
    let file = write_csv(&[
        "Date,Sales,Store,Temperature",
        "2023-01-02,100.0,A,31.5",
        "2023-01-09,110.0,A,29.0",
    ]);

    let data =
        DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS).unwrap();
    let covariates = data.series()[0].observations()[1].covariates;

    assert_eq!(covariates.temperature, 29.0);
    assert_eq!(covariates.holiday_flag, 0.0);
    assert_eq!(covariates.fuel_price, 0.0);
    assert_eq!(covariates.cpi, 0.0);
    assert_eq!(covariates.unemployment, 0.0);
}

#[test]
fn test_numeric_store_ids_sort_numerically() {
    let file = write_csv(&[
        "Date,Sales,Store",
        "02/01/2023,1.0,10",
        "02/01/2023,2.0,9",
        "02/01/2023,3.0,1",
    ]);

    let data =
        DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS).unwrap();

    assert_eq!(data.entity_ids(), vec!["1", "9", "10"]);
}

#[test]
fn test_two_digit_years_read_as_this_century() {
    let file = write_csv(&[
        "Date,Sales,Store",
        "05-02-10,100.0,1",
        "12/02/10,110.0,1",
    ]);

    let data =
        DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS).unwrap();
    let observations = data.series()[0].observations();

    assert_eq!(observations[0].date, NaiveDate::from_ymd_opt(2010, 2, 5).unwrap());
    assert_eq!(observations[1].date, NaiveDate::from_ymd_opt(2010, 2, 12).unwrap());

    // A four-digit-only layout refuses the short year instead of reading year 10
    let err = DataLoader::from_csv(file.path(), &ColumnMapping::default(), &["%d-%m-%Y"])
        .unwrap_err();
    assert!(matches!(err, ForecastError::DataError(_)));
    assert!(err.to_string().contains("Row 1"));
}

#[test]
fn test_decimal_store_ids_sort_numerically() {
    let file = write_csv(&[
        "Date,Sales,Store",
        "2023-01-02,1.0,2.5",
        "2023-01-02,2.0,10.5",
        "2023-01-02,3.0,1.5",
    ]);

    let data =
        DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS).unwrap();

    assert_eq!(data.entity_ids(), vec!["1.5", "2.5", "10.5"]);
}

#[test]
fn test_data_loader_error_handling() {
    // Non-existent file
    let result = DataLoader::from_csv(
        "nonexistent_file.csv",
        &ColumnMapping::default(),
        &DEFAULT_DATE_FORMATS,
    );
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    // Mapped column absent
    let file = write_csv(&["when,amount,shop", "2023-01-02,1.0,1"]);
    let result =
        DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS);
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    // Unparseable date
    let file = write_csv(&["Date,Sales,Store", "someday,1.0,1"]);
    let err = DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS)
        .unwrap_err();
    assert!(err.to_string().contains("Row 1"));

    // Non-numeric sales
    let file = write_csv(&[
        "Date,Sales,Store",
        "2023-01-02,1.0,1",
        "2023-01-09,n/a,1",
    ]);
    let err = DataLoader::from_csv(file.path(), &ColumnMapping::default(), &DEFAULT_DATE_FORMATS)
        .unwrap_err();
    assert!(err.to_string().contains("Row 2"));
}
