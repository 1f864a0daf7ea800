//! Hour buckets and per-sensor sample groups.

use crate::format::chunk::{BaroSample, GpsSample, ImuSample, PowerSample, SensorSample};
use crate::timeline::reconstruct;
use std::collections::HashMap;

pub const HOUR_SECS: i64 = 3600;

/// Start of the UTC hour containing `t`. Euclidean division keeps the floor
/// exact for pre-epoch timestamps.
pub fn hour_floor(t: i64) -> i64 {
    t.div_euclid(HOUR_SECS) * HOUR_SECS
}

/// Ordered samples of one sensor kind within one hour bucket, plus the
/// `[start_time, end_time)` window they were observed over.
#[derive(Debug, Clone)]
pub struct SampleGroup<T> {
    samples: Vec<T>,
    start_time: i64,
    end_time: i64,
}

impl<T> SampleGroup<T> {
    /// Placeholder created when the bucket's hour is first seen. Both times
    /// equal the creating marker until a sample arrives.
    fn placeholder(t: i64) -> Self {
        Self {
            samples: Vec::new(),
            start_time: t,
            end_time: t,
        }
    }

    /// Append one sample decoded while `timestamp` was in effect.
    pub fn push(&mut self, timestamp: i64, sample: T) {
        if self.samples.is_empty() {
            self.start_time = timestamp;
            self.end_time = timestamp + 1;
        } else {
            // The window only ever widens, even when the marker clock
            // stepped backwards mid-hour.
            self.end_time = self.end_time.max(timestamp + 1);
        }
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Reconstructed per-sample times, evenly spaced over the window.
    pub fn sample_times(&self) -> Vec<f64> {
        reconstruct::evenly_spaced(self.start_time, self.end_time, self.samples.len())
    }
}

/// One hour's worth of decoded samples, one group per sensor kind.
///
/// The shape is fixed: all four groups exist from the moment the bucket is
/// created, empty ones staying at their placeholder window.
#[derive(Debug, Clone)]
pub struct HourBucket {
    pub hour: i64,
    pub imu: SampleGroup<ImuSample>,
    pub gps: SampleGroup<GpsSample>,
    pub power: SampleGroup<PowerSample>,
    pub baro: SampleGroup<BaroSample>,
}

impl HourBucket {
    fn new(hour: i64, t: i64) -> Self {
        Self {
            hour,
            imu: SampleGroup::placeholder(t),
            gps: SampleGroup::placeholder(t),
            power: SampleGroup::placeholder(t),
            baro: SampleGroup::placeholder(t),
        }
    }

    /// Total samples across the four groups.
    pub fn sample_count(&self) -> usize {
        self.imu.len() + self.gps.len() + self.power.len() + self.baro.len()
    }
}

/// All hour buckets of one ingest pass, iterable in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    buckets: Vec<HourBucket>,
    index: HashMap<i64, usize>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the bucket for `hour`. On creation the marker timestamp
    /// `t` seeds all four placeholder groups; an existing bucket is returned
    /// untouched so a later revisit of the hour never resets its windows.
    pub fn bucket_for_marker(&mut self, hour: i64, t: i64) -> &mut HourBucket {
        let idx = match self.index.get(&hour) {
            Some(&i) => i,
            None => {
                self.buckets.push(HourBucket::new(hour, t));
                let i = self.buckets.len() - 1;
                self.index.insert(hour, i);
                i
            }
        };
        &mut self.buckets[idx]
    }

    /// Route one sample to its group within `hour`'s bucket. The ingest loop
    /// only calls this for hours a marker has already created; anything else
    /// is dropped.
    pub fn append(&mut self, hour: i64, timestamp: i64, sample: SensorSample) {
        if let Some(bucket) = self.bucket_mut(hour) {
            match sample {
                SensorSample::Imu(s) => bucket.imu.push(timestamp, s),
                SensorSample::Gps(s) => bucket.gps.push(timestamp, s),
                SensorSample::Power(s) => bucket.power.push(timestamp, s),
                SensorSample::Baro(s) => bucket.baro.push(timestamp, s),
            }
        }
    }

    pub fn bucket(&self, hour: i64) -> Option<&HourBucket> {
        self.index.get(&hour).map(|&i| &self.buckets[i])
    }

    pub fn bucket_mut(&mut self, hour: i64) -> Option<&mut HourBucket> {
        match self.index.get(&hour) {
            Some(&i) => Some(&mut self.buckets[i]),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in the order their hours first appeared in the stream.
    pub fn iter(&self) -> impl Iterator<Item = &HourBucket> {
        self.buckets.iter()
    }

    pub fn hours(&self) -> impl Iterator<Item = i64> + '_ {
        self.buckets.iter().map(|b| b.hour)
    }

    /// Total samples across all buckets.
    pub fn sample_count(&self) -> usize {
        self.buckets.iter().map(|b| b.sample_count()).sum()
    }
}
