#![warn(clippy::pedantic)]

pub mod export;
pub mod preferences;
pub mod script;

use anyhow::{Context, Result as AnyResult};

const USAGE: &str = "usage: pixgrid <script.toml> [out.png] | pixgrid --write-preferences";

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let mut args = std::env::args_os().skip(1);
    let first = args.next().context(USAGE)?;
    if first == "--write-preferences" {
        // Round-trip through load so an existing, valid file is kept as-is.
        return preferences::Preferences::load().save();
    }
    let script_path = std::path::PathBuf::from(first);
    let out_path = args.next().map_or_else(
        || script_path.with_extension("png"),
        std::path::PathBuf::from,
    );

    let preferences = preferences::Preferences::load();
    log::debug!("Using {preferences:?}");

    let source = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading {}", script_path.display()))?;
    let script = script::Script::from_toml(&source)
        .with_context(|| format!("parsing {}", script_path.display()))?;

    let mut replayer = script::Replayer::new(
        &script,
        preferences.grid_size,
        preferences.history_capacity,
    )?;
    replayer.run(&script)?;

    let session = replayer.session();
    log::info!(
        "Replayed {} steps: {} layers, {} history entries",
        script.steps.len(),
        session.document().layers().len(),
        session.history().len()
    );
    log::debug!("Final tool color {}", replayer.color());

    export::save_png(&session.composite(), preferences.export_scale, &out_path)
        .with_context(|| format!("exporting {}", out_path.display()))?;
    Ok(())
}
