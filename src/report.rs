//! Per satellite status reports
use crate::constellation::{classify, classify_sbas, ConstellationType, SbasSubtype};
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel carrier frequency, when the platform did not report one.
/// Zero is never used for this purpose.
pub const NO_DATA: f64 = -1.0;

bitflags! {
    /// Status flags attached to a [SatelliteReport]
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ReportFlags: u8 {
        /// Almanac data is available for this vehicle
        const ALMANAC = 0x01;
        /// Ephemeris data is available for this vehicle
        const EPHEMERIS = 0x02;
        /// Vehicle was used in the latest position fix
        const USED_IN_FIX = 0x04;
        /// A carrier frequency was reported
        const CARRIER_FREQUENCY = 0x08;
    }
}

/// Status of a single vehicle, as delivered by the platform in one snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteReport {
    /// Constellation relative identifier (SVID / PRN)
    pub svid: i32,
    /// Platform native constellation code
    pub constellation_raw: i32,
    /// Carrier to noise density, in dB.Hz
    #[cfg_attr(feature = "serde", serde(default))]
    pub cn0_dbhz: f64,
    /// Elevation angle in degrees
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation_deg: f64,
    /// Azimuth angle in degrees
    #[cfg_attr(feature = "serde", serde(default))]
    pub azimuth_deg: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: ReportFlags,
    /// Raw carrier frequency in Hz, [NO_DATA] when not reported.
    /// Only meaningful with [ReportFlags::CARRIER_FREQUENCY].
    #[cfg_attr(feature = "serde", serde(default = "no_data"))]
    carrier_frequency_hz: f64,
}

#[cfg(feature = "serde")]
fn no_data() -> f64 {
    NO_DATA
}

impl Default for SatelliteReport {
    fn default() -> Self {
        Self {
            svid: 0,
            constellation_raw: 0,
            cn0_dbhz: 0.0,
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
            flags: ReportFlags::empty(),
            carrier_frequency_hz: NO_DATA,
        }
    }
}

impl SatelliteReport {
    /// Builds a new report for given vehicle, without any carrier information
    pub fn new(constellation_raw: i32, svid: i32) -> Self {
        Self {
            svid,
            constellation_raw,
            ..Default::default()
        }
    }

    /// Copies and sets the carrier to noise density
    pub fn with_cn0_dbhz(&self, cn0_dbhz: f64) -> Self {
        let mut s = *self;
        s.cn0_dbhz = cn0_dbhz;
        s
    }

    /// Copies and sets elevation and azimuth, in degrees
    pub fn with_elevation_azimuth(&self, elevation_deg: f64, azimuth_deg: f64) -> Self {
        let mut s = *self;
        s.elevation_deg = elevation_deg;
        s.azimuth_deg = azimuth_deg;
        s
    }

    /// Copies and sets status flags. Carrier frequency presence
    /// is not affected.
    pub fn with_flags(&self, flags: ReportFlags) -> Self {
        let mut s = *self;
        let carrier = s.flags & ReportFlags::CARRIER_FREQUENCY;
        s.flags = (flags - ReportFlags::CARRIER_FREQUENCY) | carrier;
        s
    }

    /// Copies and attaches a carrier frequency in Hz.
    /// [NO_DATA] drops the carrier frequency instead.
    pub fn with_carrier_frequency_hz(&self, hz: f64) -> Self {
        if hz == NO_DATA {
            return self.without_carrier_frequency();
        }
        let mut s = *self;
        s.carrier_frequency_hz = hz;
        s.flags |= ReportFlags::CARRIER_FREQUENCY;
        s
    }

    /// Copies and drops the carrier frequency, if any
    pub fn without_carrier_frequency(&self) -> Self {
        let mut s = *self;
        s.carrier_frequency_hz = NO_DATA;
        s.flags -= ReportFlags::CARRIER_FREQUENCY;
        s
    }

    /// Returns the carrier frequency in Hz, only when one was reported
    pub fn carrier_frequency_hz(&self) -> Option<f64> {
        if self.has_carrier_frequency() {
            Some(self.carrier_frequency_hz)
        } else {
            None
        }
    }

    /// Returns true when a carrier frequency was reported.
    /// The flag alone is not enough: [NO_DATA] is never a frequency.
    pub fn has_carrier_frequency(&self) -> bool {
        self.flags.contains(ReportFlags::CARRIER_FREQUENCY) && self.carrier_frequency_hz != NO_DATA
    }

    pub fn has_almanac(&self) -> bool {
        self.flags.contains(ReportFlags::ALMANAC)
    }

    pub fn has_ephemeris(&self) -> bool {
        self.flags.contains(ReportFlags::EPHEMERIS)
    }

    pub fn used_in_fix(&self) -> bool {
        self.flags.contains(ReportFlags::USED_IN_FIX)
    }

    /// [ConstellationType] this vehicle belongs to
    pub fn constellation(&self) -> ConstellationType {
        classify(self.constellation_raw)
    }

    /// Augmentation system, for SBAS vehicles only
    pub fn sbas_subtype(&self) -> Option<SbasSubtype> {
        if self.constellation().is_sbas() {
            Some(classify_sbas(self.svid))
        } else {
            None
        }
    }
}
