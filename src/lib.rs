//! 通勤所要時間・遅延の予測サービス

pub mod calendar;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod heatmap;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod predict;
pub mod spatial;
pub mod trip;
pub mod web;

#[cfg(test)]
mod testing;

pub type Result<T> = anyhow::Result<T>;
