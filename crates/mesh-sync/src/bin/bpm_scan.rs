//! bpm-scan - offline tempo estimate for a WAV file
//!
//! ```text
//! bpm-scan <file.wav> [--json] [--config <sync-config.yaml>]
//! ```
//!
//! Multi-channel audio is downmixed to mono before analysis. Alongside the
//! whole-track estimate, the live detector reports what it hears in the
//! final window. Tempo settings come from the sync config (default location
//! inside the mesh collection).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use mesh_sync::config::{default_config_path, load_config, SyncConfig, SYNC_CONFIG_FILENAME};
use mesh_sync::{analyze_tempo, LiveTempoDetector, Sample, TempoEstimate, TempoReading};

struct Args {
    input: PathBuf,
    json: bool,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut json = false;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument: {}", arg),
        }
    }

    let input = input.context("Usage: bpm-scan <file.wav> [--json] [--config <path>]")?;
    Ok(Args { input, json, config })
}

/// Decode a WAV file to mono f32 samples
fn read_mono(path: &Path) -> Result<(Vec<Sample>, u32)> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<Sample> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("Failed to decode float samples")?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .context("Failed to decode integer samples")?
        }
    };

    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<Sample>() / frame.len() as Sample)
        .collect();
    Ok((mono, spec.sample_rate))
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a Path,
    sample_rate: u32,
    duration_seconds: f64,
    #[serde(flatten)]
    estimate: TempoEstimate,
    /// Live detector reading over the last window, if it found a tempo
    live: Option<TempoReading>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = parse_args()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(SYNC_CONFIG_FILENAME));
    let config: SyncConfig = load_config(&config_path);

    let (samples, sample_rate) = read_mono(&args.input)?;
    log::info!(
        "bpm-scan: {:?} decoded ({} samples @ {} Hz)",
        args.input,
        samples.len(),
        sample_rate
    );

    let estimate = analyze_tempo(&samples, sample_rate, &config.tempo);
    let mut detector = LiveTempoDetector::from_config(sample_rate, &config.tempo);
    let live = Some(detector.analyze(&samples)).filter(|reading| reading.bpm > 0.0);

    let report = Report {
        file: &args.input,
        sample_rate,
        duration_seconds: samples.len() as f64 / sample_rate.max(1) as f64,
        estimate,
        live,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let note = if estimate.is_fallback { " (fallback)" } else { "" };
        println!(
            "{}: {:.0} BPM{} [{} onsets, {:.1}s]",
            args.input.display(),
            estimate.bpm,
            note,
            estimate.onset_count,
            report.duration_seconds
        );
        if let Some(reading) = live {
            println!(
                "  last {} samples: {:.0} BPM (confidence {:.1})",
                detector.window_size(),
                reading.bpm,
                reading.confidence
            );
        }
    }
    Ok(())
}
