//! 時刻・リージョンで引く集計テーブル (渋滞・気象・事故)
//!
//! 起動時に一度だけ読み込み、以後は読み取り専用。

pub mod load;


use crate::calendar::floor_to_bucket;
use crate::spatial::RegionId;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};

/// 渋滞データが無いときの平均速度
pub const DEFAULT_MEAN_SPEED: f64 = 30.0;
/// 渋滞データが無いときの平均渋滞度
pub const DEFAULT_MEAN_CONGESTION: f64 = 0.5;
/// 気象データが無いときの気温 (華氏)
pub const DEFAULT_TEMP_F: f64 = 50.0;
/// 気象データが無いときの降雨強度
pub const DEFAULT_RAIN_INTENSITY: f64 = 0.0;
/// 気象データが無いときの湿度
pub const DEFAULT_HUMIDITY: f64 = 0.5;
/// 事故件数が無いとき (= 既知の事故なし)
pub const DEFAULT_CRASH_COUNT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionRecord {
    pub mean_speed: f64,
    pub mean_congestion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRecord {
    pub temp_f: f64,
    pub rain_intensity: f64,
    pub humidity: f64,
}

impl Default for WeatherRecord {
    fn default() -> Self {
        Self {
            temp_f: DEFAULT_TEMP_F,
            rain_intensity: DEFAULT_RAIN_INTENSITY,
            humidity: DEFAULT_HUMIDITY,
        }
    }
}

/// (リージョン, バケット) → 渋滞集計
///
/// リージョンごとに時刻順の索引を持ち、直前レコードを O(log n) で探す。
#[derive(Debug, Clone, Default)]
pub struct CongestionTable {
    by_region: HashMap<RegionId, BTreeMap<NaiveDateTime, CongestionRecord>>,
}

impl CongestionTable {
    pub fn insert(&mut self, region: RegionId, ts: NaiveDateTime, record: CongestionRecord) {
        self.by_region
            .entry(region)
            .or_default()
            .insert(floor_to_bucket(ts), record);
    }

    /// 同じリージョンでバケット以前の最新レコード (完全一致を含む)
    pub fn lookup(&self, region: RegionId, bucket: NaiveDateTime) -> Option<CongestionRecord> {
        self.by_region
            .get(&region)?
            .range(..=bucket)
            .next_back()
            .map(|(_, record)| *record)
    }

    pub fn len(&self) -> usize {
        self.by_region.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// バケット → 気象 (リージョン非依存)
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    by_time: BTreeMap<NaiveDateTime, WeatherRecord>,
}

impl WeatherTable {
    pub fn insert(&mut self, ts: NaiveDateTime, record: WeatherRecord) {
        self.by_time.insert(floor_to_bucket(ts), record);
    }

    /// バケット以前の最新レコード
    pub fn lookup(&self, bucket: NaiveDateTime) -> Option<WeatherRecord> {
        self.by_time
            .range(..=bucket)
            .next_back()
            .map(|(_, record)| *record)
    }

    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }
}

/// (リージョン, バケット) → 直前 60 分の事故件数
///
/// 完全一致のみ。欠損は「既知の事故なし」。
#[derive(Debug, Clone, Default)]
pub struct CrashTable {
    counts: HashMap<(RegionId, NaiveDateTime), u32>,
}

impl CrashTable {
    pub fn insert(&mut self, region: RegionId, ts: NaiveDateTime, count: u32) {
        self.counts.insert((region, floor_to_bucket(ts)), count);
    }

    pub fn count(&self, region: RegionId, bucket: NaiveDateTime) -> u32 {
        self.counts
            .get(&(region, bucket))
            .copied()
            .unwrap_or(DEFAULT_CRASH_COUNT)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub congestion: CongestionTable,
    pub weather: WeatherTable,
    pub crashes: CrashTable,
}
