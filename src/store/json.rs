//! JSON-file store: one document per recordset day.

use super::{
    recordset_date, ChannelSpec, GpsPoint, RecordsetId, SensorKind, SensorStore, SeriesData, Unit,
};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum SeriesValues {
    F32(Vec<f32>),
    Geodetic(Vec<GpsPoint>),
}

/// One `write_series` call as it lands in the document.
#[derive(Debug, Clone, Serialize)]
struct SeriesDoc {
    channel: &'static str,
    sensor: SensorKind,
    unit: Unit,
    times: Vec<f64>,
    values: SeriesValues,
}

/// Top-level document written per day.
#[derive(Debug, Serialize)]
struct RecordsetDoc<'a> {
    date: String,
    device: &'a str,
    sample_rate: u32,
    start_time: i64,
    end_time: i64,
    series: &'a [SeriesDoc],
}

#[derive(Debug)]
struct RecordsetState {
    date: NaiveDate,
    start: i64,
    end: i64,
    series: Vec<SeriesDoc>,
    dirty: bool,
}

/// [`SensorStore`] that writes one `YYYY-MM-DD.json` file per recordset day
/// under a root directory.
///
/// Writes are buffered per recordset; `commit` rewrites every file touched
/// since the last commit. Repeated ingest of the same file into a fresh
/// directory therefore produces identical documents.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    device: String,
    sample_rate: u32,
    recordsets: Vec<RecordsetState>,
    date_index: HashMap<NaiveDate, usize>,
}

impl JsonStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            device: String::new(),
            sample_rate: 0,
            recordsets: Vec::new(),
            date_index: HashMap::new(),
        })
    }

    /// File path a recordset day is written to.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("{}.json", date.format("%Y-%m-%d")))
    }
}

impl SensorStore for JsonStore {
    fn register_channels(&mut self, device_name: &str, sample_rate: u32) -> Result<()> {
        self.device = device_name.to_string();
        self.sample_rate = sample_rate;
        Ok(())
    }

    fn recordset_for(&mut self, start: i64, end: i64) -> Result<RecordsetId> {
        let date = recordset_date(start)?;
        match self.date_index.get(&date) {
            Some(&i) => {
                let rs = &mut self.recordsets[i];
                rs.start = rs.start.min(start);
                rs.end = rs.end.max(end);
                rs.dirty = true;
                Ok(RecordsetId(i as u32))
            }
            None => {
                let i = self.recordsets.len();
                self.date_index.insert(date, i);
                self.recordsets.push(RecordsetState {
                    date,
                    start,
                    end,
                    series: Vec::new(),
                    dirty: true,
                });
                log::debug!("new recordset for {date}");
                Ok(RecordsetId(i as u32))
            }
        }
    }

    fn write_series(
        &mut self,
        recordset: RecordsetId,
        channel: &ChannelSpec,
        times: &[f64],
        values: SeriesData<'_>,
    ) -> Result<()> {
        let rs = &mut self.recordsets[recordset.0 as usize];
        let values = match values {
            SeriesData::F32(v) => SeriesValues::F32(v.to_vec()),
            SeriesData::Geodetic(v) => SeriesValues::Geodetic(v.to_vec()),
        };
        rs.series.push(SeriesDoc {
            channel: channel.name,
            sensor: channel.sensor,
            unit: channel.unit,
            times: times.to_vec(),
            values,
        });
        rs.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        for rs in self.recordsets.iter_mut().filter(|rs| rs.dirty) {
            let date = rs.date.format("%Y-%m-%d").to_string();
            let json = serde_json::to_string_pretty(&RecordsetDoc {
                date: date.clone(),
                device: &self.device,
                sample_rate: self.sample_rate,
                start_time: rs.start,
                end_time: rs.end,
                series: &rs.series,
            })?;
            let path = self.root.join(format!("{date}.json"));
            fs::write(&path, json)?;
            rs.dirty = false;
            log::debug!("wrote {}", path.display());
        }
        Ok(())
    }
}
