//! 学習済みモデルとの境界

pub mod linear;
pub mod stand_in;

#[cfg(test)]
mod tests;

use crate::Result;
use crate::logging::*;
use ndarray::ArrayView2;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub use linear::LinearModel;
pub use stand_in::StandInModel;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature matrix has {actual} columns but the model expects {expected}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("model returned {actual} predictions for {expected} rows")]
    OutputLength { expected: usize, actual: usize },

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// 所要時間 (分) を返すモデル
///
/// 1 行 1 予測、入力と同じ順序で返すこと。
pub trait TravelTimeModel: Send + Sync {
    /// 期待する列数
    fn width(&self) -> usize;

    fn predict(&self, rows: ArrayView2<'_, f64>) -> std::result::Result<Vec<f64>, ModelError>;
}

/// 形状を検証してからモデルを一度だけ呼ぶ
pub fn predict_rows(
    model: &dyn TravelTimeModel,
    rows: ArrayView2<'_, f64>,
) -> std::result::Result<Vec<f64>, ModelError> {
    if rows.ncols() != model.width() {
        return Err(ModelError::ColumnCount {
            expected: model.width(),
            actual: rows.ncols(),
        });
    }
    let predictions = model.predict(rows)?;
    if predictions.len() != rows.nrows() {
        return Err(ModelError::OutputLength {
            expected: rows.nrows(),
            actual: predictions.len(),
        });
    }
    Ok(predictions)
}

/// 成果物パスがあれば線形モデルを読み込み、無ければスタンドインを使う
pub fn load_model(
    name: &str,
    path: Option<&Path>,
    columns: &[&str],
    distance_column: usize,
    stand_in_noise: f64,
) -> Result<Arc<dyn TravelTimeModel>> {
    let log = DEFAULT.new(o!(
        "function" => "model::load_model",
        "model" => name.to_owned(),
    ));
    match path {
        Some(path) => {
            let model = LinearModel::load(path, columns)?;
            info!(log, "model artifact loaded";
                "path" => %path.display(),
                "columns" => model.width(),
            );
            Ok(Arc::new(model))
        }
        None => {
            warn!(log, "no model artifact configured, using stand-in model";
                "noise_minutes" => stand_in_noise,
            );
            Ok(Arc::new(StandInModel::new(
                columns.len(),
                distance_column,
                stand_in_noise,
            )))
        }
    }
}
