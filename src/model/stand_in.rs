use super::{ModelError, TravelTimeModel};
use ndarray::ArrayView2;
use rand::Rng;

/// 学習済みモデルが無い環境向けの代用品
///
/// 距離列の 2 倍に ±noise 分の一様ノイズを加えた値を返す。
#[derive(Debug, Clone)]
pub struct StandInModel {
    width: usize,
    distance_column: usize,
    noise: f64,
}

impl StandInModel {
    pub fn new(width: usize, distance_column: usize, noise: f64) -> Self {
        Self {
            width,
            distance_column,
            noise: noise.abs(),
        }
    }
}

impl TravelTimeModel for StandInModel {
    fn width(&self) -> usize {
        self.width
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<f64>, ModelError> {
        if self.distance_column >= rows.ncols() {
            return Err(ModelError::ColumnCount {
                expected: self.width,
                actual: rows.ncols(),
            });
        }
        let mut rng = rand::rng();
        let predictions = rows
            .rows()
            .into_iter()
            .map(|row| {
                let base = row[self.distance_column] * 2.0;
                if self.noise > 0.0 {
                    base + rng.random_range(-self.noise..=self.noise)
                } else {
                    base
                }
            })
            .collect();
        Ok(predictions)
    }
}
