use super::*;
use assertables::*;
use ndarray::{Array2, array};
use std::io::Write;

const COLUMNS: [&str; 3] = ["distance", "speed", "hour"];

fn artifact_json(columns: &[&str], coefficients: &[f64]) -> String {
    serde_json::json!({
        "feature_columns": columns,
        "intercept": 1.5,
        "coefficients": coefficients,
    })
    .to_string()
}

#[test]
fn test_linear_model_evaluates_rows_in_order() {
    let model =
        LinearModel::from_json_str(&artifact_json(&COLUMNS, &[2.0, -0.1, 0.5]), &COLUMNS).unwrap();
    assert_eq!(model.width(), 3);

    let rows = array![[10.0, 30.0, 8.0], [0.0, 0.0, 0.0], [1.0, 10.0, 2.0]];
    let predictions = predict_rows(&model, rows.view()).unwrap();
    assert_eq!(predictions.len(), 3);
    assert_in_delta!(predictions[0], 1.5 + 20.0 - 3.0 + 4.0, 1e-9);
    assert_in_delta!(predictions[1], 1.5, 1e-9);
    assert_in_delta!(predictions[2], 1.5 + 2.0 - 1.0 + 1.0, 1e-9);
}

#[test]
fn test_linear_model_rejects_reordered_columns() {
    let result = LinearModel::from_json_str(
        &artifact_json(&["speed", "distance", "hour"], &[1.0, 1.0, 1.0]),
        &COLUMNS,
    );
    let err = result.unwrap_err().to_string();
    assert_contains!(err, "column order mismatch");
}

#[test]
fn test_linear_model_rejects_missing_column() {
    let result = LinearModel::from_json_str(&artifact_json(&COLUMNS[..2], &[1.0, 1.0]), &COLUMNS);
    assert!(result.is_err());
}

#[test]
fn test_linear_model_rejects_coefficient_count() {
    let result = LinearModel::from_json_str(&artifact_json(&COLUMNS, &[1.0, 1.0]), &COLUMNS);
    let err = result.unwrap_err().to_string();
    assert_contains!(err, "2 coefficients for 3 columns");
}

#[test]
fn test_linear_model_rejects_malformed_json() {
    assert!(LinearModel::from_json_str("{not json", &COLUMNS).is_err());
}

#[test]
fn test_linear_model_load_from_file() {
    let path = std::env::temp_dir().join(format!("linear_model_{}.json", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(artifact_json(&COLUMNS, &[1.0, 0.0, 0.0]).as_bytes())
            .unwrap();
    }
    let model = LinearModel::load(&path, &COLUMNS);
    std::fs::remove_file(&path).unwrap();

    let predictions = predict_rows(&model.unwrap(), array![[4.0, 9.0, 9.0]].view()).unwrap();
    assert_eq!(predictions, vec![5.5]);
}

#[test]
fn test_linear_model_load_missing_file() {
    let path = std::env::temp_dir().join("does_not_exist_linear_model.json");
    let err = LinearModel::load(&path, &COLUMNS).unwrap_err();
    assert_contains!(format!("{err:#}"), "failed to read model artifact");
}

#[test]
fn test_predict_rows_checks_width() {
    let model = LinearModel::new(0.0, vec![1.0, 1.0, 1.0]);
    let rows = Array2::<f64>::zeros((2, 4));
    assert_eq!(
        predict_rows(&model, rows.view()),
        Err(ModelError::ColumnCount {
            expected: 3,
            actual: 4
        })
    );
}

/// 出力件数を誤って返すモデル
struct ShortModel;

impl TravelTimeModel for ShortModel {
    fn width(&self) -> usize {
        1
    }

    fn predict(&self, _rows: ArrayView2<'_, f64>) -> std::result::Result<Vec<f64>, ModelError> {
        Ok(vec![1.0])
    }
}

#[test]
fn test_predict_rows_checks_output_length() {
    let rows = Array2::<f64>::zeros((3, 1));
    assert_eq!(
        predict_rows(&ShortModel, rows.view()),
        Err(ModelError::OutputLength {
            expected: 3,
            actual: 1
        })
    );
}

#[test]
fn test_stand_in_without_noise_is_deterministic() {
    let model = StandInModel::new(3, 0, 0.0);
    let rows = array![[4.0, 1.0, 1.0], [0.5, 7.0, 7.0]];
    let first = predict_rows(&model, rows.view()).unwrap();
    let second = predict_rows(&model, rows.view()).unwrap();
    assert_eq!(first, vec![8.0, 1.0]);
    assert_eq!(first, second);
}

#[test]
fn test_stand_in_noise_is_bounded() {
    let model = StandInModel::new(2, 1, 3.0);
    let rows = Array2::from_shape_fn((200, 2), |(i, j)| if j == 1 { i as f64 } else { -1.0 });
    let predictions = predict_rows(&model, rows.view()).unwrap();
    for (i, prediction) in predictions.into_iter().enumerate() {
        assert_in_delta!(prediction, 2.0 * i as f64, 3.0 + 1e-9);
    }
}

#[test]
fn test_stand_in_distance_column_out_of_range() {
    let model = StandInModel::new(2, 5, 0.0);
    let rows = Array2::<f64>::zeros((1, 2));
    assert!(matches!(
        predict_rows(&model, rows.view()),
        Err(ModelError::ColumnCount { .. })
    ));
}

#[test]
fn test_load_model_without_path_uses_stand_in() {
    let model = load_model("commute", None, &COLUMNS, 0, 0.0).unwrap();
    assert_eq!(model.width(), 3);
    let predictions = predict_rows(model.as_ref(), array![[2.5, 0.0, 0.0]].view()).unwrap();
    assert_eq!(predictions, vec![5.0]);
}

#[test]
fn test_model_error_messages() {
    assert_eq!(
        ModelError::ColumnCount {
            expected: 15,
            actual: 12
        }
        .to_string(),
        "feature matrix has 12 columns but the model expects 15"
    );
    assert_eq!(
        ModelError::Unavailable("not loaded".into()).to_string(),
        "model unavailable: not loaded"
    );
}
