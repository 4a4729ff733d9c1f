//! Galileo availability evaluation
use crate::{
    carrier::{is_galileo_single_frequency_band, resolve_band_label, to_mhz},
    constellation::{ConstellationType, SbasSubtype},
    report::SatelliteReport,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Galileo frequency capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrequencyClass {
    /// E1 only
    Single,
    /// E1 plus another Galileo band
    Dual,
}

/// Galileo availability determination
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AvailabilityOutcome {
    /// Never evaluated
    #[default]
    Unknown,
    /// No Galileo vehicle observed, or platform cannot tell
    NotAvailable,
    /// Galileo vehicles are tracked
    Available(FrequencyClass),
}

impl AvailabilityOutcome {
    /// Returns true once a determination has been made
    pub fn is_determined(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
    /// Returns true if Galileo is available
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
    /// Frequency class, when Galileo is available
    pub fn frequency_class(&self) -> Option<FrequencyClass> {
        match self {
            Self::Available(class) => Some(*class),
            _ => None,
        }
    }
}

impl std::fmt::Display for AvailabilityOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::NotAvailable => write!(f, "galileo not available"),
            Self::Available(FrequencyClass::Single) => write!(f, "galileo (single frequency)"),
            Self::Available(FrequencyClass::Dual) => write!(f, "galileo (dual frequency)"),
        }
    }
}

/// Classification of a single [SatelliteReport]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportClassification {
    /// Vehicle identifier
    pub svid: i32,
    /// Constellation
    pub constellation: ConstellationType,
    /// Augmentation system, SBAS vehicles only
    pub sbas: Option<SbasSubtype>,
    /// Carrier band, when reported and identified
    pub band: Option<&'static str>,
}

impl ReportClassification {
    /// Returns true if this report proves a second Galileo band
    pub fn is_galileo_dual_frequency_evidence(&self) -> bool {
        self.constellation.is_galileo()
            && self
                .band
                .map(|label| !is_galileo_single_frequency_band(label))
                .unwrap_or(false)
    }
}

/// [Evaluator] classifies reports and aggregates one snapshot
/// into an [AvailabilityOutcome]. It holds no state: evaluating the
/// same snapshot twice gives the same outcome.
///
/// Dual frequency is a heuristic: it is inferred from the presence of any
/// non E1 Galileo band within a single snapshot, because the platform does
/// not expose a dual frequency capability. A snapshot where the second band
/// is not tracked yet under reports the capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator {}

impl Evaluator {
    /// Classifies a single report
    pub fn classify_report(&self, report: &SatelliteReport) -> ReportClassification {
        let constellation = report.constellation();
        let band = report
            .carrier_frequency_hz()
            .and_then(|hz| resolve_band_label(constellation, report.svid, to_mhz(hz)));
        ReportClassification {
            svid: report.svid,
            constellation,
            sbas: report.sbas_subtype(),
            band,
        }
    }

    /// Aggregates one snapshot, processed in the order it was received.
    /// Never returns [AvailabilityOutcome::Unknown].
    pub fn evaluate(&self, snapshot: &[SatelliteReport]) -> AvailabilityOutcome {
        let mut found_galileo = false;
        let mut dual_frequency = false;

        for report in snapshot {
            let classification = self.classify_report(report);
            if let Some(sbas) = classification.sbas {
                trace!("{} #{}: {}", classification.constellation, classification.svid, sbas);
            }
            debug!(
                "{} #{} - frequency={}",
                classification.constellation,
                classification.svid,
                classification.band.unwrap_or("none")
            );
            if classification.constellation.is_galileo() {
                found_galileo = true;
                if classification.is_galileo_dual_frequency_evidence() {
                    dual_frequency = true;
                }
            }
        }

        if !found_galileo {
            AvailabilityOutcome::NotAvailable
        } else if dual_frequency {
            AvailabilityOutcome::Available(FrequencyClass::Dual)
        } else {
            AvailabilityOutcome::Available(FrequencyClass::Single)
        }
    }
}

/// Evaluates one snapshot with a default [Evaluator]
/// ```
/// use galileo_relevance::prelude::*;
///
/// let snapshot = vec![
///     SatelliteReport::new(1, 3).with_carrier_frequency_hz(1_575_420_000.0),
///     SatelliteReport::new(6, 11).with_carrier_frequency_hz(1_575_420_000.0),
///     SatelliteReport::new(6, 12).with_carrier_frequency_hz(1_176_450_000.0),
/// ];
/// assert_eq!(
///     evaluate(&snapshot),
///     AvailabilityOutcome::Available(FrequencyClass::Dual)
/// );
/// assert_eq!(evaluate(&[]), AvailabilityOutcome::NotAvailable);
/// ```
pub fn evaluate(snapshot: &[SatelliteReport]) -> AvailabilityOutcome {
    Evaluator::default().evaluate(snapshot)
}
