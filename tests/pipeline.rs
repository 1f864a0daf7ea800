//! End-to-end ingest pipeline tests.
//!
//! Synthesizes logger files on disk, runs the full decode -> bucket ->
//! reconstruct -> import path and checks what reaches the store:
//! - multi-hour, multi-sensor sessions land in the right buckets
//! - corrupted or truncated files keep everything decoded before the fault
//! - the same file ingested twice produces identical results
//! - day-spanning sessions split into one recordset per calendar day
//!
//! Run with: `cargo test --test pipeline`

use approx::assert_relative_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use openimu_ingest::format::{BaroSample, GpsReading, ImuSample, LogWriter, PowerSample};
use openimu_ingest::ingest::{ingest_file, HaltReason, IngestOutcome};
use openimu_ingest::store::{JsonStore, MemoryStore, TimelineImporter};

// ============================================================================
// Fixture helpers
// ============================================================================

fn flat_imu(seed: f32) -> ImuSample {
    ImuSample {
        accel: [0.0, 0.0, 1.0 + seed],
        gyro: [seed, -seed, 0.0],
        mag: [20.0, -5.0, 43.0],
    }
}

/// Build a two-hour session: markers every 30 minutes, a burst of imu
/// samples after each marker, power and baro once per hour, one GPS fix.
fn two_hour_session() -> Vec<u8> {
    let mut writer = LogWriter::new(Vec::new());
    writer.write_stream_header().unwrap();

    let base: i32 = 1_700_000_000; // 2023-11-14 22:13:20 UTC
    for half_hour in 0..4 {
        let t = base + half_hour * 1800;
        writer.write_timestamp(t).unwrap();
        for k in 0..5 {
            writer.write_imu(&flat_imu(k as f32 * 0.01)).unwrap();
        }
        if half_hour % 2 == 0 {
            writer
                .write_power(&PowerSample {
                    battery: 4.1 - half_hour as f32 * 0.05,
                    current: 0.12,
                })
                .unwrap();
            writer
                .write_baro(&BaroSample {
                    aux: 26.0,
                    pressure: 101.2,
                })
                .unwrap();
        }
    }
    writer
        .write_gps(&GpsReading {
            fix_valid: true,
            latitude: 45.508,
            longitude: -73.561,
            extra: 0.0,
        })
        .unwrap();
    writer.into_inner()
}

fn write_log(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn ingest_bytes(bytes: &[u8]) -> IngestOutcome {
    let dir = TempDir::new().unwrap();
    let path = write_log(&dir, "session.oimu", bytes);
    ingest_file(&path).unwrap()
}

// ============================================================================
// Decode and bucketing
// ============================================================================

#[test]
fn two_hour_session_fills_two_buckets() {
    let outcome = ingest_bytes(&two_hour_session());
    assert!(outcome.stats.halt.is_none());
    assert_eq!(outcome.stats.headers, 1);
    assert_eq!(outcome.stats.markers, 4);
    assert_eq!(outcome.stats.imu, 20);
    assert_eq!(outcome.stats.orphans, 0);

    // The base timestamp sits 800s into its hour.
    let first_hour = 1_700_000_000i64 / 3600 * 3600;
    assert_eq!(outcome.timeline.len(), 2);
    let hours: Vec<i64> = outcome.timeline.hours().collect();
    assert_eq!(hours, vec![first_hour, first_hour + 3600]);

    // Each hour saw two marker windows of five samples each.
    let first = outcome.timeline.bucket(first_hour).unwrap();
    assert_eq!(first.imu.len(), 10);
    assert_eq!(first.power.len(), 1);
    assert_eq!(first.baro.len(), 1);
    assert_eq!(first.gps.len(), 0);

    let second = outcome.timeline.bucket(first_hour + 3600).unwrap();
    assert_eq!(second.imu.len(), 10);
    assert_eq!(second.power.len(), 1);
    assert_eq!(second.baro.len(), 1);
    assert_eq!(second.gps.len(), 1);
}

#[test]
fn reconstructed_times_cover_each_marker_window() {
    let outcome = ingest_bytes(&two_hour_session());
    let first_hour = 1_700_000_000i64 / 3600 * 3600;
    let bucket = outcome.timeline.bucket(first_hour).unwrap();

    let times = bucket.imu.sample_times();
    assert_eq!(times.len(), 10);
    assert_relative_eq!(times[0], bucket.imu.start_time() as f64);
    let end = bucket.imu.end_time() as f64;
    assert!(times.iter().all(|&t| t < end));
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // Window spans from the first marker to one past the second.
    assert_eq!(bucket.imu.start_time(), 1_700_000_000);
    assert_eq!(bucket.imu.end_time(), 1_700_001_801);
}

#[test]
fn ingest_is_deterministic_across_runs() {
    let bytes = two_hour_session();
    let a = ingest_bytes(&bytes);
    let b = ingest_bytes(&bytes);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.timeline.len(), b.timeline.len());
    for (ba, bb) in a.timeline.iter().zip(b.timeline.iter()) {
        assert_eq!(ba.hour, bb.hour);
        assert_eq!(ba.imu.sample_times(), bb.imu.sample_times());
        assert_eq!(ba.imu.samples(), bb.imu.samples());
    }
}

// ============================================================================
// Fault handling
// ============================================================================

#[test]
fn truncated_file_keeps_leading_chunks() {
    let full = two_hour_session();
    // Chop the file mid-way through the final GPS chunk.
    let cut = &full[..full.len() - 6];
    let outcome = ingest_bytes(cut);

    assert!(matches!(
        outcome.stats.halt,
        Some(HaltReason::TruncatedPayload { .. })
    ));
    // Both hours of imu data survived; only the cut GPS fix is missing.
    assert_eq!(outcome.stats.imu, 20);
    assert_eq!(outcome.timeline.len(), 2);
    assert_eq!(outcome.timeline.sample_count(), 24);
}

#[test]
fn corrupt_tail_keeps_leading_chunks_and_imports() {
    let mut bytes = two_hour_session();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    let outcome = ingest_bytes(&bytes);

    match outcome.stats.halt {
        Some(HaltReason::UnrecognizedTag { tag, offset }) => {
            assert_eq!(tag, 0xDE);
            assert_eq!(offset, (bytes.len() - 2) as u64);
        }
        other => panic!("expected unrecognized tag halt, got {other:?}"),
    }

    // Partial results are still importable.
    let mut store = MemoryStore::new();
    let report = TimelineImporter::new(&mut store)
        .import(&outcome.timeline, "OpenIMU-HW", 50)
        .unwrap();
    assert_eq!(report.groups_failed, 0);
    assert!(report.samples_written > 0);
}

// ============================================================================
// Import and persistence
// ============================================================================

#[test]
fn session_imports_into_memory_store() {
    let outcome = ingest_bytes(&two_hour_session());
    let mut store = MemoryStore::new();
    let report = TimelineImporter::new(&mut store)
        .import(&outcome.timeline, "OpenIMU-HW", 50)
        .unwrap();

    // hour 1: imu + power + baro, hour 2: imu + power + gps + baro.
    assert_eq!(report.groups_imported, 7);
    assert_eq!(report.groups_failed, 0);
    assert_eq!(store.device_name(), Some("OpenIMU-HW"));

    // Same day throughout, so one recordset covering the whole session.
    assert_eq!(store.recordsets().len(), 1);
    let info = store.recordsets()[0];
    assert_eq!(info.start, 1_700_000_000);
    assert!(info.end > info.start);

    // One series per channel per bucket that held samples for it.
    assert_eq!(store.series_for("Accelerometer_Z").len(), 2);
    assert_eq!(store.series_for("Voltage").len(), 2);
    assert_eq!(store.series_for("Pressure").len(), 2);
    assert_eq!(store.series_for("GPS_Position").len(), 1);

    let accel_z = &store.series_for("Accelerometer_Z")[0];
    assert_eq!(accel_z.times.len(), 10);
    assert_relative_eq!(accel_z.times[0], 1_700_000_000.0);
}

#[test]
fn json_store_writes_one_document_per_day() {
    let session_dir = TempDir::new().unwrap();
    let store_dir = TempDir::new().unwrap();
    let path = write_log(&session_dir, "session.oimu", &two_hour_session());

    let outcome = ingest_file(&path).unwrap();
    let mut store = JsonStore::new(store_dir.path()).unwrap();
    TimelineImporter::new(&mut store)
        .import(&outcome.timeline, "OpenIMU-HW", 50)
        .unwrap();

    let day_file = store_dir.path().join("2023-11-14.json");
    assert!(day_file.is_file());
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&day_file).unwrap()).unwrap();
    assert_eq!(doc["device"], "OpenIMU-HW");
    assert_eq!(doc["date"], "2023-11-14");
    let series = doc["series"].as_array().unwrap();
    // Per hour: 9 imu + Voltage + Current + Pressure, plus one GPS series.
    assert_eq!(series.len(), 25);
    assert!(series.iter().any(|s| s["channel"] == "GPS_Position"));
}

#[test]
fn midnight_spanning_session_splits_recordsets() {
    let mut writer = LogWriter::new(Vec::new());
    // 1970-01-01 23:59:00 and 1970-01-02 00:01:00.
    writer.write_timestamp(86_340).unwrap();
    writer.write_imu(&flat_imu(0.0)).unwrap();
    writer.write_timestamp(86_460).unwrap();
    writer.write_imu(&flat_imu(0.1)).unwrap();
    let bytes = writer.into_inner();

    let outcome = ingest_bytes(&bytes);
    assert_eq!(outcome.timeline.len(), 2);

    let mut store = MemoryStore::new();
    TimelineImporter::new(&mut store)
        .import(&outcome.timeline, "dev", 50)
        .unwrap();
    assert_eq!(store.recordsets().len(), 2);
    assert_ne!(store.recordsets()[0].date, store.recordsets()[1].date);
}

#[test]
fn reimport_into_fresh_store_matches() {
    let outcome = ingest_bytes(&two_hour_session());
    let mut first = MemoryStore::new();
    let mut second = MemoryStore::new();
    TimelineImporter::new(&mut first)
        .import(&outcome.timeline, "dev", 50)
        .unwrap();
    TimelineImporter::new(&mut second)
        .import(&outcome.timeline, "dev", 50)
        .unwrap();

    assert_eq!(first.series().len(), second.series().len());
    for (a, b) in first.series().iter().zip(second.series().iter()) {
        assert_eq!(a.channel.name, b.channel.name);
        assert_eq!(a.times, b.times);
        assert_eq!(a.values, b.values);
    }
}
