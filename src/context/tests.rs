use super::*;
use ndarray::array;
use serial_test::serial;

const KEYS: [&str; 8] = [
    "CONGESTION_TABLE_PATH",
    "WEATHER_TABLE_PATH",
    "CRASH_TABLE_PATH",
    "REGIONS_PATH",
    "COMMUTE_MODEL_PATH",
    "SEGMENT_MODEL_PATH",
    "STAND_IN_NOISE_MINUTES",
    "HEATMAP_DESTINATION_LAT",
];

fn reset() {
    for key in KEYS {
        config::unset(key);
    }
}

#[test]
#[serial]
fn test_load_with_missing_data_uses_empty_tables_and_stand_in() {
    let missing = std::env::temp_dir().join("commute_forecast_missing");
    config::set(
        "CONGESTION_TABLE_PATH",
        &missing.join("congestion.csv").display().to_string(),
    );
    config::set("WEATHER_TABLE_PATH", &missing.join("weather.csv").display().to_string());
    config::set("CRASH_TABLE_PATH", &missing.join("crashes.csv").display().to_string());
    config::set("REGIONS_PATH", "");
    config::set("COMMUTE_MODEL_PATH", "");
    config::set("SEGMENT_MODEL_PATH", "");
    config::set("STAND_IN_NOISE_MINUTES", "0");
    config::set("HEATMAP_DESTINATION_LAT", "41.5");

    let ctx = PredictionContext::load();
    reset();
    let ctx = ctx.unwrap();

    assert!(ctx.tables.congestion.is_empty());
    assert!(ctx.tables.weather.is_empty());
    assert!(ctx.tables.crashes.is_empty());
    assert!(ctx.regions.is_empty());
    assert_eq!(ctx.commute_model.width(), COMMUTE_WIDTH);
    assert_eq!(ctx.segment_model.width(), SEGMENT_WIDTH);
    assert_eq!(ctx.heatmap_destination.lat, 41.5);

    let segment_row = array![[0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]];
    assert_eq!(ctx.segment_model.predict(segment_row.view()).unwrap(), vec![8.0]);
}

#[test]
#[serial]
fn test_load_fails_on_bad_model_artifact() {
    let missing = std::env::temp_dir().join("commute_forecast_missing");
    config::set(
        "CONGESTION_TABLE_PATH",
        &missing.join("congestion.csv").display().to_string(),
    );
    config::set("WEATHER_TABLE_PATH", &missing.join("weather.csv").display().to_string());
    config::set("CRASH_TABLE_PATH", &missing.join("crashes.csv").display().to_string());
    config::set("REGIONS_PATH", "");
    config::set(
        "COMMUTE_MODEL_PATH",
        &missing.join("commute.json").display().to_string(),
    );

    let result = PredictionContext::load();
    reset();
    assert!(result.is_err());
}
