//! OpenIMU log ingest tool.
//!
//! Decodes one or more logger files, reports what they contain and
//! optionally persists the reconstructed series: `--out-dir` imports into a
//! JSON-per-day store, `--json` dumps everything into a single document.

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use openimu_ingest::config::AppConfig;
use openimu_ingest::error::Result;
use openimu_ingest::format::chunk::{BaroSample, GpsSample, ImuSample, PowerSample};
use openimu_ingest::ingest::{ingest_file, IngestOutcome};
use openimu_ingest::store::{JsonStore, TimelineImporter};
use openimu_ingest::timeline::SampleGroup;

#[derive(Parser)]
#[command(name = "openimu-ingest")]
#[command(about = "Decode OpenIMU logger files into per-sensor time series")]
#[command(version)]
struct Cli {
    /// Log files to ingest, processed in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Import decoded series into a JSON-per-day store under this directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Write one JSON document with every decoded series to this path
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct GroupDump<T> {
    start_time: i64,
    end_time: i64,
    times: Vec<f64>,
    values: Vec<T>,
}

impl<T: Clone> GroupDump<T> {
    fn from_group(group: &SampleGroup<T>) -> Self {
        Self {
            start_time: group.start_time(),
            end_time: group.end_time(),
            times: group.sample_times(),
            values: group.samples().to_vec(),
        }
    }
}

#[derive(Serialize)]
struct HourDump {
    hour: i64,
    imu: GroupDump<ImuSample>,
    gps: GroupDump<GpsSample>,
    power: GroupDump<PowerSample>,
    baro: GroupDump<BaroSample>,
}

#[derive(Serialize)]
struct FileDump {
    file: String,
    chunks: u64,
    orphans: u64,
    halted: bool,
    hours: Vec<HourDump>,
}

fn dump_outcome(path: &Path, outcome: &IngestOutcome) -> FileDump {
    FileDump {
        file: path.display().to_string(),
        chunks: outcome.stats.chunks(),
        orphans: outcome.stats.orphans,
        halted: outcome.stats.halt.is_some(),
        hours: outcome
            .timeline
            .iter()
            .map(|bucket| HourDump {
                hour: bucket.hour,
                imu: GroupDump::from_group(&bucket.imu),
                gps: GroupDump::from_group(&bucket.gps),
                power: GroupDump::from_group(&bucket.power),
                baro: GroupDump::from_group(&bucket.baro),
            })
            .collect(),
    }
}

fn log_summary(path: &Path, outcome: &IngestOutcome) {
    let stats = &outcome.stats;
    log::info!(
        "{}: {} bytes, {} chunks ({} markers, {} imu, {} gps, {} power, {} baro)",
        path.display(),
        stats.bytes_read,
        stats.chunks(),
        stats.markers,
        stats.imu,
        stats.gps,
        stats.power,
        stats.baro
    );
    for bucket in outcome.timeline.iter() {
        log::info!(
            "  hour {}: {} imu, {} gps, {} power, {} baro",
            bucket.hour,
            bucket.imu.len(),
            bucket.gps.len(),
            bucket.power.len(),
            bucket.baro.len()
        );
    }
    if stats.orphans > 0 {
        log::warn!(
            "{}: dropped {} samples seen before any timestamp marker",
            path.display(),
            stats.orphans
        );
    }
    if let Some(halt) = &stats.halt {
        log::warn!("{}: decoding stopped early: {:?}", path.display(), halt);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("openimu-ingest v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            log::info!("using config: {}", path.display());
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };

    let mut store = match &cli.out_dir {
        Some(dir) => Some(JsonStore::new(dir)?),
        None => None,
    };

    let mut dumps = Vec::new();
    for path in &cli.files {
        log::info!("loading {}", path.display());
        let outcome = ingest_file(path)?;
        log_summary(path, &outcome);

        if let Some(store) = store.as_mut() {
            let report = TimelineImporter::new(store).import(
                &outcome.timeline,
                &config.device.name,
                config.device.sample_rate,
            )?;
            if report.groups_failed > 0 {
                log::warn!(
                    "{}: {} sensor groups failed to import",
                    path.display(),
                    report.groups_failed
                );
            }
        }
        if cli.json.is_some() {
            dumps.push(dump_outcome(path, &outcome));
        }
    }

    if let Some(json_path) = &cli.json {
        fs::write(json_path, serde_json::to_string_pretty(&dumps)?)?;
        log::info!("wrote series dump to {}", json_path.display());
    }

    Ok(())
}
