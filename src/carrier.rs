//! Carrier frequency bands and their identification
use crate::constellation::ConstellationType;
use std::ops::RangeInclusive;

/// Default tolerance window around a band center, in MHz
pub const TOLERANCE_MHZ: f64 = 1.0;

/// Galileo band that only single frequency receivers track
pub const GALILEO_SINGLE_FREQUENCY_BAND: &str = "E1";

/// BeiDou vehicles that are not geostationary (MEO & IGSO)
const BEIDOU_NON_GEO: RangeInclusive<i32> = 6..=58;

/// SBAS geostationary pseudo PRN range
const SBAS_GEO: RangeInclusive<i32> = 120..=158;

/// Known carrier band
#[derive(Debug, Clone)]
struct Band {
    constellation: ConstellationType,
    center_mhz: f64,
    tolerance_mhz: f64,
    label: &'static str,
    /// Restricts this band to some vehicles only
    svid: Option<RangeInclusive<i32>>,
}

impl Band {
    fn new(constellation: ConstellationType, center_mhz: f64, label: &'static str) -> Self {
        Self {
            constellation,
            center_mhz,
            tolerance_mhz: TOLERANCE_MHZ,
            label,
            svid: None,
        }
    }
    fn with_tolerance(&self, tolerance_mhz: f64) -> Self {
        let mut s = self.clone();
        s.tolerance_mhz = tolerance_mhz;
        s
    }
    fn with_svid_range(&self, svid: RangeInclusive<i32>) -> Self {
        let mut s = self.clone();
        s.svid = Some(svid);
        s
    }
    fn matches(&self, constellation: ConstellationType, svid: i32, freq_mhz: f64) -> bool {
        if self.constellation != constellation {
            return false;
        }
        if let Some(range) = &self.svid {
            if !range.contains(&svid) {
                return false;
            }
        }
        (freq_mhz - self.center_mhz).abs() <= self.tolerance_mhz
    }
}

lazy_static! {
    /*
     * Table order is the tie breaker: first match wins.
     */
    static ref BANDS: Vec<Band> = {
        use ConstellationType::*;
        vec![
            Band::new(GPS, 1575.42, "L1"),
            Band::new(GPS, 1227.6, "L2"),
            Band::new(GPS, 1381.05, "L3"),
            Band::new(GPS, 1379.913, "L4"),
            Band::new(GPS, 1176.45, "L5"),
            // FDMA: 1598.0625 to 1609.3125 MHz
            Band::new(Glonass, 1604.0, "L1").with_tolerance(6.0),
            // FDMA: 1242.9375 to 1251.6875 MHz
            Band::new(Glonass, 1247.0, "L2").with_tolerance(5.0),
            Band::new(Glonass, 1207.14, "L3"),
            Band::new(BeiDou, 1561.098, "B1"),
            Band::new(BeiDou, 1589.742, "B1-2"),
            Band::new(BeiDou, 1575.42, "B1C").with_svid_range(BEIDOU_NON_GEO),
            Band::new(BeiDou, 1207.14, "B2"),
            Band::new(BeiDou, 1176.45, "B2a").with_svid_range(BEIDOU_NON_GEO),
            Band::new(BeiDou, 1268.52, "B3"),
            Band::new(QZSS, 1575.42, "L1"),
            Band::new(QZSS, 1227.6, "L2"),
            Band::new(QZSS, 1176.45, "L5"),
            Band::new(QZSS, 1278.75, "L6"),
            Band::new(Galileo, 1575.42, "E1"),
            Band::new(Galileo, 1191.795, "E5"),
            Band::new(Galileo, 1176.45, "E5a"),
            Band::new(Galileo, 1207.14, "E5b"),
            Band::new(Galileo, 1278.75, "E6"),
            Band::new(SBAS, 1575.42, "L1").with_svid_range(SBAS_GEO),
            Band::new(SBAS, 1176.45, "L5").with_svid_range(SBAS_GEO),
        ]
    };
}

/// Converts a frequency in Hz to MHz
pub fn to_mhz(hz: f64) -> f64 {
    hz / 1.0E6
}

/// Identifies the carrier band label of a signal, from its constellation,
/// the vehicle identifier and the carrier frequency in MHz.
/// Returns None when the frequency does not fall in any known band.
/// ```
/// use galileo_relevance::prelude::*;
///
/// let e5a = resolve_band_label(ConstellationType::Galileo, 11, to_mhz(1_176_450_000.0));
/// assert_eq!(e5a, Some("E5a"));
///
/// let l1 = resolve_band_label(ConstellationType::GPS, 3, 1575.42);
/// assert_eq!(l1, Some("L1"));
///
/// assert_eq!(resolve_band_label(ConstellationType::Galileo, 11, 1300.0), None);
/// ```
pub fn resolve_band_label(
    constellation: ConstellationType,
    svid: i32,
    freq_mhz: f64,
) -> Option<&'static str> {
    BANDS
        .iter()
        .find(|band| band.matches(constellation, svid, freq_mhz))
        .map(|band| band.label)
}

/// Returns true if this label is the Galileo single frequency band
pub fn is_galileo_single_frequency_band(label: &str) -> bool {
    label == GALILEO_SINGLE_FREQUENCY_BAND
}
