use super::{
    CongestionRecord, CongestionTable, CrashTable, LookupTables, WeatherRecord, WeatherTable,
};
use crate::Result;
use crate::calendar::parse_timestamp;
use crate::logging::*;
use crate::spatial::RegionId;
use anyhow::Context;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CongestionRow {
    region_id: u32,
    ts5: String,
    speed_mean: f64,
    cong_mean: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherRow {
    ts5: String,
    #[serde(default)]
    temp_f: Option<f64>,
    #[serde(default)]
    rain_intensity: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CrashRow {
    region_id: u32,
    ts5: String,
    crash_count_60min: u32,
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// `region_id,ts5,speed_mean,cong_mean`
pub fn read_congestion<R: io::Read>(reader: R) -> Result<CongestionTable> {
    let mut table = CongestionTable::default();
    for (index, row) in csv_reader(reader).deserialize::<CongestionRow>().enumerate() {
        let row = row.with_context(|| format!("congestion row {}", index + 1))?;
        let ts = parse_timestamp(&row.ts5).with_context(|| format!("congestion row {}", index + 1))?;
        table.insert(
            RegionId(row.region_id),
            ts,
            CongestionRecord {
                mean_speed: row.speed_mean,
                mean_congestion: row.cong_mean,
            },
        );
    }
    Ok(table)
}

/// `ts5,temp_f,rain_intensity,humidity` (空欄は各指標の既定値)
pub fn read_weather<R: io::Read>(reader: R) -> Result<WeatherTable> {
    let mut table = WeatherTable::default();
    for (index, row) in csv_reader(reader).deserialize::<WeatherRow>().enumerate() {
        let row = row.with_context(|| format!("weather row {}", index + 1))?;
        let ts = parse_timestamp(&row.ts5).with_context(|| format!("weather row {}", index + 1))?;
        let defaults = WeatherRecord::default();
        table.insert(
            ts,
            WeatherRecord {
                temp_f: row.temp_f.unwrap_or(defaults.temp_f),
                rain_intensity: row.rain_intensity.unwrap_or(defaults.rain_intensity),
                humidity: row.humidity.unwrap_or(defaults.humidity),
            },
        );
    }
    Ok(table)
}

/// `region_id,ts5,crash_count_60min`
pub fn read_crashes<R: io::Read>(reader: R) -> Result<CrashTable> {
    let mut table = CrashTable::default();
    for (index, row) in csv_reader(reader).deserialize::<CrashRow>().enumerate() {
        let row = row.with_context(|| format!("crash row {}", index + 1))?;
        let ts = parse_timestamp(&row.ts5).with_context(|| format!("crash row {}", index + 1))?;
        table.insert(RegionId(row.region_id), ts, row.crash_count_60min);
    }
    Ok(table)
}

/// ファイルが無ければ空テーブル、壊れていればエラー
fn load_optional<T, F>(log: &Logger, name: &str, path: &Path, read: F) -> Result<T>
where
    T: Default,
    F: FnOnce(File) -> Result<T>,
{
    match File::open(path) {
        Ok(file) => read(file).with_context(|| format!("failed to load {}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(log, "lookup table not found, using empty table";
                "table" => name,
                "path" => %path.display(),
            );
            Ok(T::default())
        }
        Err(err) => Err(err).with_context(|| format!("failed to open {}", path.display())),
    }
}

pub fn load_tables(congestion: &Path, weather: &Path, crashes: &Path) -> Result<LookupTables> {
    let log = DEFAULT.new(o!("function" => "lookup::load_tables"));

    let tables = LookupTables {
        congestion: load_optional(&log, "congestion", congestion, read_congestion)?,
        weather: load_optional(&log, "weather", weather, read_weather)?,
        crashes: load_optional(&log, "crashes", crashes, read_crashes)?,
    };
    info!(log, "lookup tables loaded";
        "congestion" => tables.congestion.len(),
        "weather" => tables.weather.len(),
        "crashes" => tables.crashes.len(),
    );
    Ok(tables)
}
