use super::{ModelError, TravelTimeModel};
use crate::Result;
use anyhow::{Context, bail};
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 線形回帰の成果物 (JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub feature_columns: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    coefficients: Array1<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients: Array1::from(coefficients),
        }
    }

    /// 成果物の列順がこちらのスキーマと完全一致することを確認する
    pub fn from_artifact(artifact: LinearArtifact, columns: &[&str]) -> Result<Self> {
        if artifact.feature_columns.len() != columns.len()
            || artifact
                .feature_columns
                .iter()
                .zip(columns)
                .any(|(a, b)| a != b)
        {
            bail!(
                "model column order mismatch: artifact {:?}, expected {:?}",
                artifact.feature_columns,
                columns
            );
        }
        if artifact.coefficients.len() != columns.len() {
            bail!(
                "model has {} coefficients for {} columns",
                artifact.coefficients.len(),
                columns.len()
            );
        }
        Ok(Self::new(artifact.intercept, artifact.coefficients))
    }

    pub fn from_json_str(text: &str, columns: &[&str]) -> Result<Self> {
        let artifact: LinearArtifact =
            serde_json::from_str(text).context("failed to parse model artifact")?;
        Self::from_artifact(artifact, columns)
    }

    pub fn load(path: &Path, columns: &[&str]) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        Self::from_json_str(&text, columns)
            .with_context(|| format!("invalid model artifact {}", path.display()))
    }
}

impl TravelTimeModel for LinearModel {
    fn width(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> std::result::Result<Vec<f64>, ModelError> {
        if rows.ncols() != self.width() {
            return Err(ModelError::ColumnCount {
                expected: self.width(),
                actual: rows.ncols(),
            });
        }
        let predictions = rows.dot(&self.coefficients) + self.intercept;
        Ok(predictions.to_vec())
    }
}
