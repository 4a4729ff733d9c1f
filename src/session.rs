//! Session orchestration: signal source lifecycle, decision gating
//! and user notification
use crate::{
    availability::{AvailabilityOutcome, Evaluator, FrequencyClass},
    cache::{DecisionCache, KeyValueStore},
    config::SessionConfig,
    report::SatelliteReport,
    Error,
};

use hifitime::{Duration, Epoch};
use num_traits::FromPrimitive;

use std::{
    borrow::Cow,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// What the platform is able to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Per satellite status is obtainable
    pub satellite_status: bool,
    /// Carrier frequencies are attached to satellite status
    pub carrier_frequency: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            satellite_status: true,
            carrier_frequency: true,
        }
    }
}

/// Hardware side of a session: the GNSS engine delivering snapshots.
///
/// [SignalSource::start] and [SignalSource::stop] run while the
/// [SessionController] state is locked: they must not call back into it.
pub trait SignalSource {
    /// Capability probe
    fn capabilities(&self) -> Capabilities;
    /// Starts delivering snapshots
    fn start(&mut self) -> Result<(), Error>;
    /// Stops delivering snapshots
    fn stop(&mut self);
}

/// User facing notification, one per determined outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    NotAvailable,
    SingleFrequency,
    DualFrequency,
}

impl Notification {
    /// Notification for a determined outcome
    pub fn from_outcome(outcome: AvailabilityOutcome) -> Option<Self> {
        match outcome {
            AvailabilityOutcome::Unknown => None,
            AvailabilityOutcome::NotAvailable => Some(Self::NotAvailable),
            AvailabilityOutcome::Available(FrequencyClass::Single) => Some(Self::SingleFrequency),
            AvailabilityOutcome::Available(FrequencyClass::Dual) => Some(Self::DualFrequency),
        }
    }
    /// Human readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotAvailable => {
                "Limited navigation performance, consider upgrading to Galileo for an optimal experience"
            },
            Self::SingleFrequency => {
                "Good navigation performance, consider upgrading to dual frequency"
            },
            Self::DualFrequency => "You have the best navigation performance",
        }
    }
    pub fn outcome(&self) -> AvailabilityOutcome {
        match self {
            Self::NotAvailable => AvailabilityOutcome::NotAvailable,
            Self::SingleFrequency => AvailabilityOutcome::Available(FrequencyClass::Single),
            Self::DualFrequency => AvailabilityOutcome::Available(FrequencyClass::Dual),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives the [Notification], at most once per device.
/// It is notified once the [SessionController] state is released,
/// so it may query the controller.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Consumes snapshots, however the host delivers them
pub trait SnapshotConsumer {
    /// Returns the outcome when this snapshot led to a new determination
    fn on_snapshot(
        &self,
        snapshot: &[SatelliteReport],
    ) -> Result<Option<AvailabilityOutcome>, Error>;
}

/// Result of [SessionController::verify_availability]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Determined in a previous session: nothing to do
    Cached(AvailabilityOutcome),
    /// Waiting for snapshots
    Listening,
    /// Determined right away
    Determined(AvailabilityOutcome),
}

/// GNSS measurements status, from the platform code
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum MeasurementStatus {
    NotSupported = 0,
    Ready = 1,
    LocationDisabled = 2,
    Unknown = -1,
}

impl MeasurementStatus {
    pub fn from_raw(raw: i32) -> Self {
        Self::from_i32(raw).unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotSupported => write!(f, "measurements not supported"),
            Self::Ready => write!(f, "measurements ready"),
            Self::LocationDisabled => write!(f, "location disabled"),
            Self::Unknown => write!(f, "unknown status"),
        }
    }
}

/// Other GNSS engine callbacks. They are traced, but never
/// take part in the determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GnssEvent {
    Started,
    Stopped,
    /// Time to first fix
    FirstFix(Duration),
    MeasurementStatus(MeasurementStatus),
    Location {
        latitude_ddeg: f64,
        longitude_ddeg: f64,
        accuracy_m: f64,
    },
}

struct Inner<S, K: KeyValueStore> {
    source: S,
    cache: DecisionCache<K>,
    listening: bool,
    galileo_free: u32,
    started_at: Option<Epoch>,
}

/// [SessionController] owns the signal source lifecycle, feeds
/// snapshots to the [Evaluator] and notifies the user once.
///
/// Reading the cache, evaluating and persisting happen within one
/// critical section, so concurrent snapshot deliveries cannot both
/// observe an undetermined cache and persist twice. The notification
/// follows, outside of that critical section.
pub struct SessionController<S: SignalSource, K: KeyValueStore, N: NotificationSink> {
    cfg: SessionConfig,
    evaluator: Evaluator,
    inner: Mutex<Inner<S, K>>,
    sink: Mutex<N>,
}

impl<S: SignalSource, K: KeyValueStore, N: NotificationSink> SessionController<S, K, N> {
    /// Builds a new [SessionController]. Nothing starts until
    /// [Self::verify_availability] is invoked.
    pub fn new(source: S, store: K, sink: N, cfg: SessionConfig) -> Self {
        Self {
            cfg,
            evaluator: Evaluator::default(),
            inner: Mutex::new(Inner {
                source,
                cache: DecisionCache::new(store),
                listening: false,
                galileo_free: 0,
                started_at: None,
            }),
            sink: Mutex::new(sink),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S, K>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the persisted outcome
    pub fn outcome(&self) -> Result<AvailabilityOutcome, Error> {
        self.lock().cache.read()
    }

    /// Returns true while we're listening to the signal source
    pub fn is_listening(&self) -> bool {
        self.lock().listening
    }

    /// Session entry point. Returns the cached outcome if any, otherwise
    /// starts listening to the signal source, unless the platform cannot
    /// report satellite status, in which case Galileo is not available.
    pub fn verify_availability(&self) -> Result<Verification, Error> {
        let mut inner = self.lock();

        let cached = inner.cache.read()?;
        if cached.is_determined() {
            info!("cached decision: {}", cached);
            return Ok(Verification::Cached(cached));
        }

        if inner.listening {
            return Ok(Verification::Listening);
        }

        let capabilities = inner.source.capabilities();
        if !capabilities.satellite_status {
            warn!("satellite status is not supported: galileo cannot be detected");
            let outcome = AvailabilityOutcome::NotAvailable;
            self.decide(&mut inner, outcome)?;
            drop(inner);
            self.notify(outcome);
            return Ok(Verification::Determined(outcome));
        }
        if !capabilities.carrier_frequency {
            warn!("carrier frequencies are not supported: dual frequency cannot be detected");
        }

        inner.source.start()?;
        inner.listening = true;
        inner.galileo_free = 0;
        inner.started_at = Epoch::now().ok();
        info!("listening to satellite status");
        Ok(Verification::Listening)
    }

    /// Stops listening to the signal source
    pub fn stop(&self) {
        let mut inner = self.lock();
        Self::stop_listening(&mut inner);
    }

    fn stop_listening(inner: &mut Inner<S, K>) {
        if inner.listening {
            inner.source.stop();
            inner.listening = false;
            debug!("stopped listening");
        }
    }

    /// Traces other GNSS engine callbacks
    pub fn on_event(&self, event: GnssEvent) {
        match event {
            GnssEvent::Started => debug!("gnss engine started"),
            GnssEvent::Stopped => debug!("gnss engine stopped"),
            GnssEvent::FirstFix(ttff) => info!("first fix: {}", ttff),
            GnssEvent::MeasurementStatus(status) => debug!("{}", status),
            GnssEvent::Location {
                latitude_ddeg,
                longitude_ddeg,
                accuracy_m,
            } => trace!(
                "location: lat={}, lng={}, acc={}",
                latitude_ddeg,
                longitude_ddeg,
                accuracy_m
            ),
        }
    }

    /*
     * Persists a determined outcome. Caller holds the lock,
     * and notifies once it is released.
     */
    fn decide(&self, inner: &mut Inner<S, K>, outcome: AvailabilityOutcome) -> Result<(), Error> {
        inner.cache.write(outcome)?;

        if let Some(t0) = inner.started_at.take() {
            if let Ok(now) = Epoch::now() {
                info!("{} determined in {}", outcome, now - t0);
            }
        }

        if self.cfg.stop_on_decision {
            Self::stop_listening(inner);
        }
        Ok(())
    }

    fn notify(&self, outcome: AvailabilityOutcome) {
        if let Some(notification) = Notification::from_outcome(outcome) {
            self.sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .notify(notification);
        }
    }
}

impl<S: SignalSource, K: KeyValueStore, N: NotificationSink> SnapshotConsumer
    for SessionController<S, K, N>
{
    fn on_snapshot(
        &self,
        snapshot: &[SatelliteReport],
    ) -> Result<Option<AvailabilityOutcome>, Error> {
        let mut inner = self.lock();

        if !inner.listening {
            trace!("not listening: snapshot dropped");
            return Ok(None);
        }

        if inner.cache.read()?.is_determined() {
            return Ok(None);
        }

        let snapshot = if inner.source.capabilities().carrier_frequency {
            Cow::Borrowed(snapshot)
        } else {
            Cow::Owned(
                snapshot
                    .iter()
                    .map(|report| report.without_carrier_frequency())
                    .collect::<Vec<_>>(),
            )
        };

        let outcome = self.evaluator.evaluate(&snapshot);

        if outcome == AvailabilityOutcome::NotAvailable {
            inner.galileo_free += 1;
            let threshold = self.cfg.galileo_free_snapshots.max(1);
            if inner.galileo_free < threshold {
                debug!(
                    "no galileo vehicle ({}/{} snapshots)",
                    inner.galileo_free, threshold
                );
                return Ok(None);
            }
        } else {
            // only consecutive galileo free snapshots count
            inner.galileo_free = 0;
        }

        self.decide(&mut inner, outcome)?;
        drop(inner);
        self.notify(outcome);
        Ok(Some(outcome))
    }
}

impl<S: SignalSource, K: KeyValueStore, N: NotificationSink> Drop for SessionController<S, K, N> {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        Self::stop_listening(inner);
    }
}
