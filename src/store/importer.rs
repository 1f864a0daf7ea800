//! Walks a finished timeline and drives a [`SensorStore`].

use super::{channels, GpsPoint, SensorStore, SeriesData};
use crate::error::Result;
use crate::format::chunk::{BaroSample, GpsSample, ImuSample, PowerSample};
use crate::timeline::{HourBucket, SampleGroup, Timeline};

/// Outcome of one timeline import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Non-empty groups fully persisted
    pub groups_imported: u64,
    /// Non-empty groups that failed; their siblings were still attempted
    pub groups_failed: u64,
    /// Samples handed to the store, after filtering
    pub samples_written: u64,
}

/// Imports reconstructed series, one sensor group at a time.
///
/// Each non-empty group becomes one batch: recordset lookup, per-channel
/// series writes, commit. A failing group is logged and counted while its
/// sibling groups and the remaining buckets are still attempted, since
/// everything in the timeline already survived decoding.
pub struct TimelineImporter<'a, S: SensorStore> {
    store: &'a mut S,
}

impl<'a, S: SensorStore> TimelineImporter<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Register channels, then import every non-empty group of every bucket.
    pub fn import(
        &mut self,
        timeline: &Timeline,
        device_name: &str,
        sample_rate: u32,
    ) -> Result<ImportReport> {
        self.store.register_channels(device_name, sample_rate)?;
        let mut report = ImportReport::default();
        for bucket in timeline.iter() {
            self.import_bucket(bucket, &mut report);
        }
        log::info!(
            "import done: {} groups written, {} failed, {} samples",
            report.groups_imported,
            report.groups_failed,
            report.samples_written
        );
        Ok(report)
    }

    fn import_bucket(&mut self, bucket: &HourBucket, report: &mut ImportReport) {
        if !bucket.imu.is_empty() {
            let result = self.import_imu(&bucket.imu);
            Self::record(report, bucket.hour, "imu", result);
        }
        if !bucket.power.is_empty() {
            let result = self.import_power(&bucket.power);
            Self::record(report, bucket.hour, "power", result);
        }
        if !bucket.gps.is_empty() {
            let result = self.import_gps(&bucket.gps);
            Self::record(report, bucket.hour, "gps", result);
        }
        if !bucket.baro.is_empty() {
            let result = self.import_baro(&bucket.baro);
            Self::record(report, bucket.hour, "baro", result);
        }
    }

    fn record(report: &mut ImportReport, hour: i64, kind: &str, result: Result<u64>) {
        match result {
            Ok(samples) => {
                report.groups_imported += 1;
                report.samples_written += samples;
            }
            Err(e) => {
                report.groups_failed += 1;
                log::error!("{kind} import failed for hour {hour}: {e}");
            }
        }
    }

    fn import_imu(&mut self, group: &SampleGroup<ImuSample>) -> Result<u64> {
        let rs = self
            .store
            .recordset_for(group.start_time(), group.end_time())?;
        let times = group.sample_times();
        let samples = group.samples();

        // One column buffer reused across all nine channels.
        let mut column = vec![0f32; samples.len()];
        for (axis, channel) in channels::ACCEL.iter().enumerate() {
            for (row, s) in samples.iter().enumerate() {
                column[row] = s.accel[axis];
            }
            self.store
                .write_series(rs, channel, &times, SeriesData::F32(&column))?;
        }
        for (axis, channel) in channels::GYRO.iter().enumerate() {
            for (row, s) in samples.iter().enumerate() {
                column[row] = s.gyro[axis];
            }
            self.store
                .write_series(rs, channel, &times, SeriesData::F32(&column))?;
        }
        for (axis, channel) in channels::MAG.iter().enumerate() {
            for (row, s) in samples.iter().enumerate() {
                column[row] = s.mag[axis];
            }
            self.store
                .write_series(rs, channel, &times, SeriesData::F32(&column))?;
        }
        self.store.commit()?;
        Ok(samples.len() as u64)
    }

    fn import_power(&mut self, group: &SampleGroup<PowerSample>) -> Result<u64> {
        let rs = self
            .store
            .recordset_for(group.start_time(), group.end_time())?;
        let times = group.sample_times();
        let battery: Vec<f32> = group.samples().iter().map(|s| s.battery).collect();
        let current: Vec<f32> = group.samples().iter().map(|s| s.current).collect();
        self.store
            .write_series(rs, &channels::BATTERY, &times, SeriesData::F32(&battery))?;
        self.store
            .write_series(rs, &channels::CURRENT, &times, SeriesData::F32(&current))?;
        self.store.commit()?;
        Ok(group.len() as u64)
    }

    fn import_gps(&mut self, group: &SampleGroup<GpsSample>) -> Result<u64> {
        let rs = self
            .store
            .recordset_for(group.start_time(), group.end_time())?;
        let times = group.sample_times();
        let mut kept_times = Vec::with_capacity(group.len());
        let mut points = Vec::with_capacity(group.len());
        for (s, t) in group.samples().iter().zip(&times) {
            // Fixes without coordinates carry nothing worth persisting.
            if s.latitude.is_nan() || s.longitude.is_nan() {
                continue;
            }
            kept_times.push(*t);
            points.push(GpsPoint {
                latitude_e7: (f64::from(s.latitude) * 1e7) as i32,
                longitude_e7: (f64::from(s.longitude) * 1e7) as i32,
            });
        }
        if !points.is_empty() {
            self.store.write_series(
                rs,
                &channels::GPS,
                &kept_times,
                SeriesData::Geodetic(&points),
            )?;
        }
        self.store.commit()?;
        Ok(points.len() as u64)
    }

    fn import_baro(&mut self, group: &SampleGroup<BaroSample>) -> Result<u64> {
        let rs = self
            .store
            .recordset_for(group.start_time(), group.end_time())?;
        let times = group.sample_times();
        // Only the pressure field is a registered channel.
        let pressure: Vec<f32> = group.samples().iter().map(|s| s.pressure).collect();
        self.store
            .write_series(rs, &channels::PRESSURE, &times, SeriesData::F32(&pressure))?;
        self.store.commit()?;
        Ok(group.len() as u64)
    }
}
