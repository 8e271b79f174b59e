mod audio;
mod cli;
mod config;
mod error;
mod export;
mod pipeline;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use audio::decode::{self, SpooledInput};
use cli::Cli;
use config::{MarkerColor, ProcessConfig, Sensitivity};
use store::{FsStore, ProcessRecord, Store};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect beatmark.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("beatmark.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("beatmark").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("beatmark").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.fps == 30 {
                cli.fps = cfg.markers.fps;
            }
            if cli.sensitivity == "low" {
                cli.sensitivity = cfg.detection.sensitivity;
            }
            if cli.loudness == 70 {
                cli.loudness = cfg.detection.loudness;
            }
            if cli.min_gap == 0.5 {
                cli.min_gap = cfg.detection.min_gap;
            }
            if !cli.beats_only {
                cli.beats_only = cfg.detection.beats_only;
            }
            if cli.snap == 0.08 {
                cli.snap = cfg.detection.snap_threshold;
            }
            if cli.marker_color == "red" {
                cli.marker_color = cfg.markers.color;
            }
            if cli.marker_name == "Beat" {
                cli.marker_name = cfg.markers.name;
            }
            if !cli.no_timestamps && !cfg.markers.include_timestamps {
                cli.no_timestamps = true;
            }
            if cli.store_dir.is_none() {
                cli.store_dir = cfg.store.dir;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let store_root = cli.store_dir.clone().unwrap_or_else(FsStore::default_root);
    let store = FsStore::new(&store_root)?;

    // History mode
    if cli.history {
        return print_history(&store, &cli.user);
    }

    // Delete mode
    if let Some(ref id) = cli.delete {
        return delete_run(&store, &cli.user, id);
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;

    // "-" spools stdin to a temporary file removed on every exit path
    let spool;
    let input_path: &Path = if input == Path::new("-") {
        let mut stdin = std::io::stdin().lock();
        spool = SpooledInput::from_reader(&mut stdin)?;
        spool.path()
    } else {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
        input
    };

    let cfg = ProcessConfig {
        fps: cli.fps,
        sensitivity: Sensitivity::from_name(&cli.sensitivity),
        loudness_percentile: cli.loudness,
        min_gap: cli.min_gap,
        beats_only: cli.beats_only,
        snap_threshold: cli.snap,
        marker_color: MarkerColor::from_name(&cli.marker_color),
        marker_name: cli.marker_name.clone(),
        include_timestamps: !cli.no_timestamps,
    }
    .sanitized();

    log::info!("beatmark - beat/onset marker generator");
    log::info!("Input: {}", input.display());
    log::info!("Store: {}", store_root.display());

    let audio = decode::decode_audio(input_path)?;
    let duration = audio.duration();

    let outcome = pipeline::process(&audio, &cfg)?;

    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("input")
        .to_string();

    let mut record = ProcessRecord::new(&cli.user, &file_name, cfg, &outcome.stats, duration);
    record.beats_url = store.upload(&record.beats_key(), outcome.beats_text.as_bytes())?;
    record.markers_url = store.upload(&record.markers_key(), outcome.edl_text.as_bytes())?;
    store.insert(&record)?;

    log::info!(
        "Done: {} markers (avg spacing {:.3}s, min {:.3}s, max {:.3}s)",
        outcome.stats.count,
        outcome.stats.avg_spacing,
        outcome.stats.min_spacing,
        outcome.stats.max_spacing
    );
    println!("{}", record.beats_url);
    println!("{}", record.markers_url);
    Ok(())
}

fn print_history(store: &dyn Store, user: &str) -> Result<()> {
    let records = store.query(user)?;
    if records.is_empty() {
        println!("No processing history for {}", user);
        return Ok(());
    }
    for r in &records {
        println!(
            "{}  {}  {:>4} markers  {:>7.1}s  {}",
            r.created_at, r.id, r.beats_count, r.duration_seconds, r.file_name
        );
    }
    Ok(())
}

fn delete_run(store: &dyn Store, user: &str, id: &str) -> Result<()> {
    if !store.remove_record(user, id)? {
        anyhow::bail!("Record not found or access denied: {}", id);
    }
    // artifact removal failures only warn; the record is already gone
    store.delete(&[
        format!("{}/{}_beats.txt", user, id),
        format!("{}/{}_markers.edl", user, id),
    ])?;
    log::info!("Deleted run {}", id);
    Ok(())
}
