//! In-memory store for tests and dry runs.

use super::{recordset_date, ChannelSpec, GpsPoint, RecordsetId, SensorStore, SeriesData};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Values captured from one `write_series` call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValues {
    F32(Vec<f32>),
    Geodetic(Vec<GpsPoint>),
}

impl StoredValues {
    pub fn len(&self) -> usize {
        match self {
            StoredValues::F32(v) => v.len(),
            StoredValues::Geodetic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One recorded series write.
#[derive(Debug, Clone)]
pub struct StoredSeries {
    pub recordset: RecordsetId,
    pub channel: ChannelSpec,
    pub times: Vec<f64>,
    pub values: StoredValues,
}

/// One recordset's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordsetInfo {
    pub id: RecordsetId,
    pub date: NaiveDate,
    pub start: i64,
    pub end: i64,
}

/// [`SensorStore`] that records every call, for asserting importer behavior.
///
/// Doubles as a failure injector: channel names marked with
/// [`fail_channel`](MemoryStore::fail_channel) make `write_series` fail, to
/// exercise per-group error isolation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    device_name: Option<String>,
    sample_rate: u32,
    recordsets: Vec<RecordsetInfo>,
    date_index: HashMap<NaiveDate, usize>,
    series: Vec<StoredSeries>,
    commits: u64,
    fail_channels: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `write_series` fail for this channel name.
    pub fn fail_channel(&mut self, name: &str) {
        self.fail_channels.push(name.to_string());
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn recordsets(&self) -> &[RecordsetInfo] {
        &self.recordsets
    }

    pub fn series(&self) -> &[StoredSeries] {
        &self.series
    }

    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// All series written for one channel name, in write order.
    pub fn series_for(&self, name: &str) -> Vec<&StoredSeries> {
        self.series
            .iter()
            .filter(|s| s.channel.name == name)
            .collect()
    }
}

impl SensorStore for MemoryStore {
    fn register_channels(&mut self, device_name: &str, sample_rate: u32) -> Result<()> {
        self.device_name = Some(device_name.to_string());
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
                Ok(rs.id)
            }
            None => {
                let id = RecordsetId(self.recordsets.len() as u32);
                self.date_index.insert(date, self.recordsets.len());
                self.recordsets.push(RecordsetInfo {
                    id,
                    date,
                    start,
                    end,
                });
                Ok(id)
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
        if self.fail_channels.iter().any(|c| c == channel.name) {
            return Err(Error::Store(format!(
                "injected failure for channel {}",
                channel.name
            )));
        }
        let values = match values {
            SeriesData::F32(v) => StoredValues::F32(v.to_vec()),
            SeriesData::Geodetic(v) => StoredValues::Geodetic(v.to_vec()),
        };
        self.series.push(StoredSeries {
            recordset,
            channel: *channel,
            times: times.to_vec(),
            values,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }
}
