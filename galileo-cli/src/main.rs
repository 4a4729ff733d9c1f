//! Command line tool to determine Galileo availability
//! from recorded GNSS satellite status.
//! Refer to --help for command line arguments.
//! Homepage: <https://github.com/georust/rinex>

mod cli; // command line interface
mod replay;

use cli::Cli;
use replay::{load_snapshots, ReplaySource, TerminalSink};

use galileo_relevance::prelude::{
    AvailabilityOutcome, FileStore, SessionController, SnapshotConsumer, Verification,
};

use env_logger::{Builder, Target};

#[macro_use]
extern crate log;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    StdioError(#[from] std::io::Error),
    #[error("snapshots parsing error")]
    JsonError(#[from] serde_json::Error),
    #[error("galileo relevance error")]
    GalileoError(#[from] galileo_relevance::Error),
}

pub fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let quiet = cli.quiet();

    let store_path = cli.store_path();
    if cli.reset() && store_path.exists() {
        std::fs::remove_file(store_path)?;
        info!("previous decision \"{}\" removed", store_path.display());
    }

    let snapshots = load_snapshots(cli.snapshots_path())?;
    info!("{} recorded snapshots", snapshots.len());

    let session = SessionController::new(
        ReplaySource::new(cli.capabilities()),
        FileStore::new(store_path),
        TerminalSink::new(quiet),
        cli.session_config(),
    );

    match session.verify_availability()? {
        Verification::Cached(outcome) => {
            if !quiet {
                println!("{} (cached)", outcome);
            }
            return Ok(());
        },
        Verification::Determined(outcome) => {
            debug!("determined without listening: {}", outcome);
            return Ok(());
        },
        Verification::Listening => {},
    }

    for (index, snapshot) in snapshots.iter().enumerate() {
        if let Some(outcome) = session.on_snapshot(snapshot)? {
            info!("snapshot #{}: {}", index, outcome);
            break;
        }
    }

    if session.outcome()? == AvailabilityOutcome::Unknown {
        warn!(
            "no determination after {} snapshots: record a longer session",
            snapshots.len()
        );
    }

    session.stop();
    Ok(())
}
