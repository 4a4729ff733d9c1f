//! Test toolkit: report builders and scripted collaborators
use crate::prelude::*;

use std::{cell::RefCell, rc::Rc};

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

pub const E1_HZ: f64 = 1_575_420_000.0;
pub const E5_HZ: f64 = 1_191_795_000.0;
pub const E5A_HZ: f64 = 1_176_450_000.0;
pub const E5B_HZ: f64 = 1_207_140_000.0;
pub const E6_HZ: f64 = 1_278_750_000.0;
pub const L1_HZ: f64 = 1_575_420_000.0;
pub const L5_HZ: f64 = 1_176_450_000.0;

pub const GPS: i32 = 1;
pub const SBAS: i32 = 2;
pub const GLONASS: i32 = 3;
pub const QZSS: i32 = 4;
pub const BEIDOU: i32 = 5;
pub const GALILEO: i32 = 6;
pub const IRNSS: i32 = 7;

/// Builds a report, with carrier frequency when provided
pub fn report(constellation_raw: i32, svid: i32, carrier_hz: Option<f64>) -> SatelliteReport {
    let report = SatelliteReport::new(constellation_raw, svid)
        .with_cn0_dbhz(35.0)
        .with_elevation_azimuth(45.0, 180.0)
        .with_flags(ReportFlags::ALMANAC | ReportFlags::EPHEMERIS);
    match carrier_hz {
        Some(hz) => report.with_carrier_frequency_hz(hz),
        None => report,
    }
}

pub fn galileo(svid: i32, carrier_hz: Option<f64>) -> SatelliteReport {
    report(GALILEO, svid, carrier_hz)
}

pub fn gps(svid: i32, carrier_hz: Option<f64>) -> SatelliteReport {
    report(GPS, svid, carrier_hz)
}

/// Typical snapshot without any Galileo vehicle
pub fn gps_glonass_snapshot() -> Vec<SatelliteReport> {
    vec![
        gps(3, Some(L1_HZ)),
        gps(7, Some(L5_HZ)),
        report(GLONASS, 12, Some(1_602_562_500.0)),
        report(SBAS, 133, Some(L1_HZ)),
    ]
}

/// [SignalSource] lifecycle, as observed by tests
#[derive(Debug, Default)]
pub struct SourceState {
    pub starts: usize,
    pub stops: usize,
    pub running: bool,
}

/// [SignalSource] with scripted capabilities
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub capabilities: Capabilities,
    pub fail_on_start: bool,
    pub state: Arc<Mutex<SourceState>>,
}

impl ScriptedSource {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }
    pub fn starts(&self) -> usize {
        self.state.lock().unwrap().starts
    }
    pub fn stops(&self) -> usize {
        self.state.lock().unwrap().stops
    }
    pub fn running(&self) -> bool {
        self.state.lock().unwrap().running
    }
}

impl SignalSource for ScriptedSource {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
    fn start(&mut self) -> Result<(), Error> {
        if self.fail_on_start {
            return Err(Error::SignalSource("location provider disabled".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.starts += 1;
        state.running = true;
        Ok(())
    }
    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.stops += 1;
        state.running = false;
    }
}

/// [NotificationSink] that records everything
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// [NotificationSink] forwarding to a closure
#[derive(Clone, Default)]
pub struct CallbackSink {
    callback: Rc<RefCell<Option<Box<dyn FnMut(Notification)>>>>,
}

impl CallbackSink {
    pub fn set(&self, callback: impl FnMut(Notification) + 'static) {
        *self.callback.borrow_mut() = Some(Box::new(callback));
    }
}

impl NotificationSink for CallbackSink {
    fn notify(&mut self, notification: Notification) {
        if let Some(callback) = self.callback.borrow_mut().as_mut() {
            callback(notification);
        }
    }
}

/// [KeyValueStore] counting writes, possibly failing them
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: Arc<AtomicUsize>,
    pub fail_writes: Arc<AtomicBool>,
}

impl CountingStore {
    /// Store that rejects all writes, until [Self::set_fail_writes]
    pub fn failing() -> Self {
        let s = Self::default();
        s.set_fail_writes(true);
        s
    }
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, Error> {
        self.inner.get_int(key)
    }
    fn put_ints(&mut self, entries: &[(&str, i64)]) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read only storage",
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put_ints(entries)
    }
}
