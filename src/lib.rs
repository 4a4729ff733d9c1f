#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * Galileo relevance is part of the Geo-Rust framework.
 * This framework is shipped under both Apache-2.0 and MIT License.
 *
 * Documentation: https://github.com/georust/rinex
 */

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

pub mod availability;
pub mod cache;
pub mod carrier;
pub mod constellation;
pub mod report;
pub mod session;

mod config;
mod error;

#[cfg(test)]
mod tests;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::availability::{
        evaluate, AvailabilityOutcome, Evaluator, FrequencyClass, ReportClassification,
    };
    pub use crate::cache::{DecisionCache, KeyValueStore, MemoryStore};
    pub use crate::carrier::{resolve_band_label, to_mhz};
    pub use crate::config::SessionConfig;
    pub use crate::constellation::{classify, classify_sbas, ConstellationType, SbasSubtype};
    pub use crate::error::{Error, ParsingError};
    pub use crate::report::{ReportFlags, SatelliteReport, NO_DATA};
    pub use crate::session::{
        Capabilities, GnssEvent, MeasurementStatus, Notification, NotificationSink,
        SessionController, SignalSource, SnapshotConsumer, Verification,
    };

    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub use crate::cache::FileStore;

    // pub re-export
    pub use hifitime::{Duration, Epoch};
}

pub use error::{Error, ParsingError};
