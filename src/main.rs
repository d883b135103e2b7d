//! Strike once and print what happened.
//!
//! Usage: `thunderclap [config.json]`
//!
//! Set `RUST_LOG=debug` for per-stage detail.

use std::process::ExitCode;
use thunderclap::{Storm, ThunderConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> thunderclap::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading {}", path);
            ThunderConfig::load(path)?
        }
        None => ThunderConfig::default(),
    };

    let mut storm = Storm::new(config);
    let audio = storm.strike()?;

    let rate = storm.config().sample_rate_hz;
    log::info!(
        "bolt: {} segments, {:.0} m of channel",
        storm.bolt().segments().len(),
        storm.bolt().channel_length()
    );
    log::info!(
        "thunder: {} frames x {} channels ({:.2} s), onset after {:.2} s, raw peak {:e}",
        audio.frames(),
        audio.channels(),
        audio.frames() as f64 / rate as f64,
        storm.thunder().onset_delay().unwrap_or(0.0),
        audio.peak()
    );

    println!("# segments: index ax ay az bx by bz");
    for (i, s) in storm.bolt().segments().iter().enumerate() {
        println!(
            "{} {:.3} {:.3} {:.3} {:.3} {:.3} {:.3}",
            i, s.a.x, s.a.y, s.a.z, s.b.x, s.b.y, s.b.z
        );
    }

    let thunder = storm.thunder();
    for (ear, pos) in thunder.ears().iter().enumerate() {
        println!("# ear {} at ({:.3}, {:.3}, {:.3}): near far", ear, pos.x, pos.y, pos.z);
        for pair in thunder.segments(ear) {
            println!("{:.3} {:.3}", pair.near(), pair.far());
        }
    }
    Ok(())
}
