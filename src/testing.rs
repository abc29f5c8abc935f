//! テスト用のモデルとコンテキスト

use crate::context::PredictionContext;
use crate::features::{COMMUTE_WIDTH, SEGMENT_WIDTH};
use crate::lookup::LookupTables;
use crate::model::{ModelError, TravelTimeModel};
use crate::spatial::{Coordinate, RegionMap};
use ndarray::ArrayView2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const LOOP: Coordinate = Coordinate::new(41.8781, -87.6298);

/// 常に同じ値を返す
pub struct FixedModel {
    pub width: usize,
    pub value: f64,
}

impl TravelTimeModel for FixedModel {
    fn width(&self) -> usize {
        self.width
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<f64>, ModelError> {
        Ok(vec![self.value; rows.nrows()])
    }
}

/// 指定列の 2 倍を返し、呼び出し回数とバッチサイズを記録する
pub struct RecordingModel {
    pub width: usize,
    pub column: usize,
    pub calls: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl RecordingModel {
    pub fn new(width: usize, column: usize) -> Self {
        Self {
            width,
            column,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

impl TravelTimeModel for RecordingModel {
    fn width(&self) -> usize {
        self.width
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<f64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(rows.nrows());
        Ok(rows.column(self.column).iter().map(|v| v * 2.0).collect())
    }
}

pub struct FailingModel {
    pub width: usize,
}

impl TravelTimeModel for FailingModel {
    fn width(&self) -> usize {
        self.width
    }

    fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::Unavailable("test failure".to_string()))
    }
}

pub fn context_with(
    commute_model: Arc<dyn TravelTimeModel>,
    segment_model: Arc<dyn TravelTimeModel>,
) -> PredictionContext {
    PredictionContext::new(
        commute_model,
        segment_model,
        LookupTables::default(),
        RegionMap::empty(),
        LOOP,
    )
}

pub fn fixed_context(commute_value: f64, segment_value: f64) -> PredictionContext {
    context_with(
        Arc::new(FixedModel {
            width: COMMUTE_WIDTH,
            value: commute_value,
        }),
        Arc::new(FixedModel {
            width: SEGMENT_WIDTH,
            value: segment_value,
        }),
    )
}

pub fn failing_context() -> PredictionContext {
    context_with(
        Arc::new(FailingModel {
            width: COMMUTE_WIDTH,
        }),
        Arc::new(FailingModel {
            width: SEGMENT_WIDTH,
        }),
    )
}
