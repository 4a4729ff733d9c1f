//! Recorded snapshots replay
use galileo_relevance::prelude::{
    Capabilities, Error, Notification, NotificationSink, SatelliteReport, SignalSource,
};
use std::{fs::File, io::BufReader, path::Path};

/// Loads recorded snapshots
pub fn load_snapshots(path: &Path) -> Result<Vec<Vec<SatelliteReport>>, crate::Error> {
    let fd = File::open(path)?;
    let snapshots = serde_json::from_reader(BufReader::new(fd))?;
    Ok(snapshots)
}

/// [SignalSource] standing for the GNSS engine while we replay
pub struct ReplaySource {
    capabilities: Capabilities,
}

impl ReplaySource {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }
}

impl SignalSource for ReplaySource {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
    fn start(&mut self) -> Result<(), Error> {
        info!("replay started");
        Ok(())
    }
    fn stop(&mut self) {
        info!("replay stopped");
    }
}

/// [NotificationSink] printing to the terminal
pub struct TerminalSink {
    quiet: bool,
}

impl TerminalSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl NotificationSink for TerminalSink {
    fn notify(&mut self, notification: Notification) {
        if !self.quiet {
            println!("{}", notification);
        }
    }
}
