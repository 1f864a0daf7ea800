//! Storage collaborator contract and channel registry.
//!
//! Persisting decoded series is not the decoder's job. The [`SensorStore`]
//! trait is the seam: an implementation owns channel metadata, picks one
//! recordset per calendar day, accepts `(times, values)` series and decides
//! its own commit granularity. [`importer::TimelineImporter`] walks a
//! finished timeline and drives whichever store it is given.

pub mod importer;
pub mod json;
pub mod memory;

pub use importer::{ImportReport, TimelineImporter};
pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// Sensor kinds the logger registers channels for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorKind {
    Accelerometer,
    Gyrometer,
    Magnetometer,
    Battery,
    Current,
    Gps,
    Barometer,
}

/// Measurement unit of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    GravityG,
    DegPerSec,
    MicroTesla,
    Volts,
    Amperes,
    Kilopascals,
    Unitless,
}

/// On-store value format of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataFormat {
    Float32,
    Geodetic,
}

/// One registered channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelSpec {
    pub sensor: SensorKind,
    pub name: &'static str,
    pub unit: Unit,
    pub format: DataFormat,
}

/// The fixed channel registry for OpenIMU hardware: one channel per axis of
/// the inertial sensors, one per scalar sensor, one geodetic GPS channel.
pub mod channels {
    use super::{ChannelSpec, DataFormat, SensorKind, Unit};

    pub const ACCEL: [ChannelSpec; 3] = [
        ChannelSpec {
            sensor: SensorKind::Accelerometer,
            name: "Accelerometer_X",
            unit: Unit::GravityG,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Accelerometer,
            name: "Accelerometer_Y",
            unit: Unit::GravityG,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Accelerometer,
            name: "Accelerometer_Z",
            unit: Unit::GravityG,
            format: DataFormat::Float32,
        },
    ];

    pub const GYRO: [ChannelSpec; 3] = [
        ChannelSpec {
            sensor: SensorKind::Gyrometer,
            name: "Gyro_X",
            unit: Unit::DegPerSec,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Gyrometer,
            name: "Gyro_Y",
            unit: Unit::DegPerSec,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Gyrometer,
            name: "Gyro_Z",
            unit: Unit::DegPerSec,
            format: DataFormat::Float32,
        },
    ];

    pub const MAG: [ChannelSpec; 3] = [
        ChannelSpec {
            sensor: SensorKind::Magnetometer,
            name: "Mag_X",
            unit: Unit::MicroTesla,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Magnetometer,
            name: "Mag_Y",
            unit: Unit::MicroTesla,
            format: DataFormat::Float32,
        },
        ChannelSpec {
            sensor: SensorKind::Magnetometer,
            name: "Mag_Z",
            unit: Unit::MicroTesla,
            format: DataFormat::Float32,
        },
    ];

    pub const BATTERY: ChannelSpec = ChannelSpec {
        sensor: SensorKind::Battery,
        name: "Voltage",
        unit: Unit::Volts,
        format: DataFormat::Float32,
    };

    pub const CURRENT: ChannelSpec = ChannelSpec {
        sensor: SensorKind::Current,
        name: "Current",
        unit: Unit::Amperes,
        format: DataFormat::Float32,
    };

    pub const GPS: ChannelSpec = ChannelSpec {
        sensor: SensorKind::Gps,
        name: "GPS_Position",
        unit: Unit::Unitless,
        format: DataFormat::Geodetic,
    };

    pub const PRESSURE: ChannelSpec = ChannelSpec {
        sensor: SensorKind::Barometer,
        name: "Pressure",
        unit: Unit::Kilopascals,
        format: DataFormat::Float32,
    };
}

/// Geodetic point scaled the way the store persists GPS (degrees x 1e7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpsPoint {
    pub latitude_e7: i32,
    pub longitude_e7: i32,
}

/// Column of values handed to the store alongside its time vector.
#[derive(Debug, Clone, Copy)]
pub enum SeriesData<'a> {
    F32(&'a [f32]),
    Geodetic(&'a [GpsPoint]),
}

impl SeriesData<'_> {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::F32(v) => v.len(),
            SeriesData::Geodetic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opaque handle to a destination recordset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecordsetId(pub u32);

/// UTC calendar date of an epoch-seconds timestamp. Recordsets are keyed by
/// this, so every group starting on the same day shares one.
pub fn recordset_date(start: i64) -> Result<NaiveDate> {
    DateTime::from_timestamp(start, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| Error::Store(format!("timestamp {start} out of calendar range")))
}

/// Storage collaborator contract.
///
/// A failed call never touches the in-memory timeline; the importer logs it
/// and moves on to the next group.
pub trait SensorStore {
    /// Register the device and its channels. Called once before any write.
    fn register_channels(&mut self, device_name: &str, sample_rate: u32) -> Result<()>;

    /// Recordset covering the calendar day of `start`, created on first use
    /// and with its `[start, end]` cover widened on every revisit.
    fn recordset_for(&mut self, start: i64, end: i64) -> Result<RecordsetId>;

    /// Persist one channel's series into `recordset`. `times` and `values`
    /// are index-aligned and equally long.
    fn write_series(
        &mut self,
        recordset: RecordsetId,
        channel: &ChannelSpec,
        times: &[f64],
        values: SeriesData<'_>,
    ) -> Result<()>;

    /// Flush everything written since the last commit.
    fn commit(&mut self) -> Result<()>;
}
