use crate::prelude::*;
use crate::tests::toolkit::*;
use std::{cell::RefCell, rc::Rc, sync::Arc};

type Controller = SessionController<ScriptedSource, CountingStore, RecordingSink>;

fn controller(
    capabilities: Capabilities,
    cfg: SessionConfig,
) -> (Controller, ScriptedSource, CountingStore, RecordingSink) {
    let source = ScriptedSource::new(capabilities);
    let store = CountingStore::default();
    let sink = RecordingSink::default();
    let controller = SessionController::new(source.clone(), store.clone(), sink.clone(), cfg);
    (controller, source, store, sink)
}

#[test]
fn galileo_dual_frequency_session() {
    let (controller, source, store, sink) =
        controller(Capabilities::default(), SessionConfig::default());

    assert_eq!(controller.verify_availability().unwrap(), Verification::Listening);
    assert!(controller.is_listening());
    assert!(source.running());

    let snapshot = vec![galileo(11, Some(E1_HZ)), galileo(11, Some(E5A_HZ))];
    let outcome = controller.on_snapshot(&snapshot).unwrap();
    assert_eq!(
        outcome,
        Some(AvailabilityOutcome::Available(FrequencyClass::Dual))
    );

    assert_eq!(store.writes(), 1);
    assert_eq!(sink.notifications(), vec![Notification::DualFrequency]);
    assert!(!source.running(), "source should be stopped once determined");
    assert!(!controller.is_listening());
    assert_eq!(
        controller.outcome().unwrap(),
        AvailabilityOutcome::Available(FrequencyClass::Dual)
    );
}

#[test]
fn determination_is_written_once() {
    let cfg = SessionConfig::default().with_stop_on_decision(false);
    let (controller, source, store, sink) = controller(Capabilities::default(), cfg);

    controller.verify_availability().unwrap();
    let single = vec![galileo(11, Some(E1_HZ))];
    let dual = vec![galileo(11, Some(E1_HZ)), galileo(12, Some(E5B_HZ))];

    assert!(controller.on_snapshot(&single).unwrap().is_some());
    // still listening, but decision is terminal
    assert!(source.running());
    assert_eq!(controller.on_snapshot(&dual).unwrap(), None);
    assert_eq!(controller.on_snapshot(&[]).unwrap(), None);

    assert_eq!(store.writes(), 1);
    assert_eq!(sink.notifications(), vec![Notification::SingleFrequency]);
    assert_eq!(
        controller.outcome().unwrap(),
        AvailabilityOutcome::Available(FrequencyClass::Single)
    );
}

#[test]
fn cached_decision_skips_listening() {
    let mut store = CountingStore::default();
    let mut cache = DecisionCache::new(store.inner.clone());
    cache.write(AvailabilityOutcome::NotAvailable).unwrap();
    store.inner = cache.into_inner();

    let source = ScriptedSource::default();
    let sink = RecordingSink::default();
    let controller = SessionController::new(
        source.clone(),
        store.clone(),
        sink.clone(),
        SessionConfig::default(),
    );

    assert_eq!(
        controller.verify_availability().unwrap(),
        Verification::Cached(AvailabilityOutcome::NotAvailable)
    );
    assert_eq!(source.starts(), 0);
    assert_eq!(store.writes(), 0);
    assert!(sink.notifications().is_empty(), "cached outcome is never notified again");

    // snapshots are dropped
    let snapshot = vec![galileo(1, Some(E1_HZ))];
    assert_eq!(controller.on_snapshot(&snapshot).unwrap(), None);
}

#[test]
fn satellite_status_not_supported() {
    let capabilities = Capabilities {
        satellite_status: false,
        carrier_frequency: false,
    };
    let (controller, source, store, sink) = controller(capabilities, SessionConfig::default());

    assert_eq!(
        controller.verify_availability().unwrap(),
        Verification::Determined(AvailabilityOutcome::NotAvailable)
    );
    assert_eq!(source.starts(), 0);
    assert_eq!(store.writes(), 1);
    assert_eq!(sink.notifications(), vec![Notification::NotAvailable]);

    // next session
    assert_eq!(
        controller.verify_availability().unwrap(),
        Verification::Cached(AvailabilityOutcome::NotAvailable)
    );
    assert_eq!(sink.notifications().len(), 1);
}

#[test]
fn carrier_frequency_not_supported() {
    let capabilities = Capabilities {
        satellite_status: true,
        carrier_frequency: false,
    };
    let (controller, _, _, sink) = controller(capabilities, SessionConfig::default());
    controller.verify_availability().unwrap();

    let snapshot = vec![galileo(11, Some(E1_HZ)), galileo(11, Some(E5A_HZ))];
    assert_eq!(
        controller.on_snapshot(&snapshot).unwrap(),
        Some(AvailabilityOutcome::Available(FrequencyClass::Single))
    );
    assert_eq!(sink.notifications(), vec![Notification::SingleFrequency]);
}

#[test]
fn galileo_free_threshold() {
    let cfg = SessionConfig::default().with_galileo_free_snapshots(3);
    let (controller, _, store, sink) = controller(Capabilities::default(), cfg);
    controller.verify_availability().unwrap();

    let snapshot = gps_glonass_snapshot();
    assert_eq!(controller.on_snapshot(&snapshot).unwrap(), None);
    assert_eq!(controller.on_snapshot(&snapshot).unwrap(), None);
    assert_eq!(store.writes(), 0);
    assert_eq!(
        controller.on_snapshot(&snapshot).unwrap(),
        Some(AvailabilityOutcome::NotAvailable)
    );
    assert_eq!(store.writes(), 1);
    assert_eq!(sink.notifications(), vec![Notification::NotAvailable]);
}

#[test]
fn galileo_wins_before_threshold() {
    let cfg = SessionConfig::default().with_galileo_free_snapshots(3);
    let (controller, _, _, sink) = controller(Capabilities::default(), cfg);
    controller.verify_availability().unwrap();

    assert_eq!(controller.on_snapshot(&gps_glonass_snapshot()).unwrap(), None);
    let mut snapshot = gps_glonass_snapshot();
    snapshot.push(galileo(26, None));
    assert_eq!(
        controller.on_snapshot(&snapshot).unwrap(),
        Some(AvailabilityOutcome::Available(FrequencyClass::Single))
    );
    assert_eq!(sink.notifications(), vec![Notification::SingleFrequency]);
}

#[test]
fn galileo_free_count_restarts_on_galileo() {
    let cfg = SessionConfig::default().with_galileo_free_snapshots(3);
    let (controller, _, store, sink) = controller(Capabilities::default(), cfg);
    controller.verify_availability().unwrap();

    let no_galileo = gps_glonass_snapshot();
    assert_eq!(controller.on_snapshot(&no_galileo).unwrap(), None);
    assert_eq!(controller.on_snapshot(&no_galileo).unwrap(), None);

    // galileo is seen, but cannot be persisted
    store.set_fail_writes(true);
    assert!(controller
        .on_snapshot(&[galileo(11, Some(E1_HZ))])
        .is_err());
    store.set_fail_writes(false);

    // counting starts over
    assert_eq!(controller.on_snapshot(&no_galileo).unwrap(), None);
    assert_eq!(controller.on_snapshot(&no_galileo).unwrap(), None);
    assert_eq!(store.writes(), 0);
    assert!(sink.notifications().is_empty());
    assert_eq!(
        controller.on_snapshot(&no_galileo).unwrap(),
        Some(AvailabilityOutcome::NotAvailable)
    );
    assert_eq!(store.writes(), 1);
}

#[test]
fn snapshots_before_verification_are_dropped() {
    let (controller, _, store, sink) =
        controller(Capabilities::default(), SessionConfig::default());
    let snapshot = vec![galileo(11, Some(E1_HZ))];
    assert_eq!(controller.on_snapshot(&snapshot).unwrap(), None);
    assert_eq!(store.writes(), 0);
    assert!(sink.notifications().is_empty());
    assert_eq!(controller.outcome().unwrap(), AvailabilityOutcome::Unknown);
}

#[test]
fn storage_failure_is_surfaced() {
    let source = ScriptedSource::default();
    let store = CountingStore::failing();
    let sink = RecordingSink::default();
    let controller = SessionController::new(
        source.clone(),
        store,
        sink.clone(),
        SessionConfig::default(),
    );

    controller.verify_availability().unwrap();
    let snapshot = vec![galileo(11, Some(E1_HZ))];
    match controller.on_snapshot(&snapshot) {
        Err(Error::Io(_)) => {},
        other => panic!("expecting i/o error, got {:?}", other),
    }
    // nothing was notified and we keep listening
    assert!(sink.notifications().is_empty());
    assert!(source.running());
    assert_eq!(controller.outcome().unwrap(), AvailabilityOutcome::Unknown);
}

#[test]
fn source_failure_is_surfaced() {
    let source = ScriptedSource {
        fail_on_start: true,
        ..Default::default()
    };
    let controller = SessionController::new(
        source,
        CountingStore::default(),
        RecordingSink::default(),
        SessionConfig::default(),
    );
    assert!(matches!(
        controller.verify_availability(),
        Err(Error::SignalSource(_))
    ));
    assert!(!controller.is_listening());
}

#[test]
fn verification_while_listening() {
    let (controller, source, _, _) =
        controller(Capabilities::default(), SessionConfig::default());
    assert_eq!(controller.verify_availability().unwrap(), Verification::Listening);
    assert_eq!(controller.verify_availability().unwrap(), Verification::Listening);
    assert_eq!(source.starts(), 1);
}

#[test]
fn stop_releases_source() {
    let (controller, source, _, _) =
        controller(Capabilities::default(), SessionConfig::default());
    controller.verify_availability().unwrap();
    controller.stop();
    assert!(!source.running());
    assert_eq!(source.stops(), 1);
    // idempotent
    controller.stop();
    assert_eq!(source.stops(), 1);
}

#[test]
fn drop_releases_source() {
    let (controller, source, _, _) =
        controller(Capabilities::default(), SessionConfig::default());
    controller.verify_availability().unwrap();
    assert!(source.running());
    drop(controller);
    assert!(!source.running());
}

#[test]
fn events_do_not_affect_outcome() {
    let (controller, _, store, sink) =
        controller(Capabilities::default(), SessionConfig::default());
    controller.verify_availability().unwrap();
    controller.on_event(GnssEvent::Started);
    controller.on_event(GnssEvent::FirstFix(Duration::from_milliseconds(4250.0)));
    controller.on_event(GnssEvent::MeasurementStatus(MeasurementStatus::from_raw(1)));
    controller.on_event(GnssEvent::Location {
        latitude_ddeg: 48.808378,
        longitude_ddeg: 2.382682,
        accuracy_m: 3.9,
    });
    controller.on_event(GnssEvent::Stopped);
    assert_eq!(store.writes(), 0);
    assert!(sink.notifications().is_empty());
    assert!(controller.is_listening());
}

#[test]
fn concurrent_snapshots_write_once() {
    for stop_on_decision in [true, false] {
        let cfg = SessionConfig::default().with_stop_on_decision(stop_on_decision);
        let (controller, _, store, sink) = controller(Capabilities::default(), cfg);
        controller.verify_availability().unwrap();

        let controller = Arc::new(controller);
        let determined = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|i| {
                    let controller = Arc::clone(&controller);
                    scope.spawn(move || {
                        let snapshot = if i % 2 == 0 {
                            vec![galileo(i, Some(E1_HZ))]
                        } else {
                            vec![galileo(i, Some(E1_HZ)), galileo(i, Some(E5A_HZ))]
                        };
                        controller.on_snapshot(&snapshot).unwrap()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .filter_map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert_eq!(determined.len(), 1, "only one snapshot may determine the outcome");
        assert_eq!(store.writes(), 1);
        assert_eq!(sink.notifications().len(), 1);
        assert_eq!(controller.outcome().unwrap(), determined[0]);
    }
}

#[test]
fn sink_may_query_the_controller() {
    for satellite_status in [true, false] {
        let capabilities = Capabilities {
            satellite_status,
            carrier_frequency: true,
        };
        let sink = CallbackSink::default();
        let controller = Rc::new(SessionController::new(
            ScriptedSource::new(capabilities),
            CountingStore::default(),
            sink.clone(),
            SessionConfig::default(),
        ));

        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let controller = Rc::downgrade(&controller);
            let seen = Rc::clone(&seen);
            sink.set(move |notification| {
                if let Some(controller) = controller.upgrade() {
                    seen.borrow_mut().push((
                        notification,
                        controller.outcome().unwrap(),
                        controller.is_listening(),
                    ));
                }
            });
        }

        if satellite_status {
            assert_eq!(controller.verify_availability().unwrap(), Verification::Listening);
            controller
                .on_snapshot(&[galileo(11, Some(E1_HZ))])
                .unwrap();
            assert_eq!(
                *seen.borrow(),
                vec![(
                    Notification::SingleFrequency,
                    AvailabilityOutcome::Available(FrequencyClass::Single),
                    false
                )]
            );
        } else {
            assert_eq!(
                controller.verify_availability().unwrap(),
                Verification::Determined(AvailabilityOutcome::NotAvailable)
            );
            assert_eq!(
                *seen.borrow(),
                vec![(
                    Notification::NotAvailable,
                    AvailabilityOutcome::NotAvailable,
                    false
                )]
            );
        }
    }
}
