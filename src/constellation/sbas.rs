//! Geostationary augmentation systems
use crate::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
 * Database, built by build.rs, for detailed SBAS vehicle identification
 */
include!(concat!(env!("OUT_DIR"), "/sbas.rs"));

/// Augmentation system a geostationary vehicle serves
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SbasSubtype {
    /// American augmentation system
    WAAS,
    /// European augmentation system
    EGNOS,
    /// Indian augmentation system
    GAGAN,
    /// Japanese MTSAT Space Based augmentation system
    MSAS,
    /// Russian augmentation system
    SDCM,
    /// Chinese augmentation system
    SNAS,
    /// Vehicle does not belong to the database
    #[default]
    Unknown,
}

impl std::fmt::Display for SbasSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WAAS => write!(f, "WAAS"),
            Self::EGNOS => write!(f, "EGNOS"),
            Self::GAGAN => write!(f, "GAGAN"),
            Self::MSAS => write!(f, "MSAS"),
            Self::SDCM => write!(f, "SDCM"),
            Self::SNAS => write!(f, "SNAS"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for SbasSubtype {
    type Err = ParsingError;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.trim().to_lowercase().as_str() {
            "waas" => Ok(Self::WAAS),
            "egnos" => Ok(Self::EGNOS),
            "gagan" => Ok(Self::GAGAN),
            "msas" => Ok(Self::MSAS),
            "sdcm" => Ok(Self::SDCM),
            "snas" | "bdsbas" => Ok(Self::SNAS),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParsingError::SbasSubtype(string.to_string())),
        }
    }
}

fn sbas_definition(svid: i32) -> Option<&'static SBASHelper<'static>> {
    SBAS_VEHICLES.iter().find(|e| i32::from(e.svid) == svid)
}

/// Identifies the augmentation system of an SBAS vehicle
/// from its identifier. Unknown identifiers are [SbasSubtype::Unknown].
/// ```
/// use galileo_relevance::prelude::*;
///
/// assert_eq!(classify_sbas(123), SbasSubtype::EGNOS);
/// assert_eq!(classify_sbas(133), SbasSubtype::WAAS);
/// assert_eq!(classify_sbas(5), SbasSubtype::Unknown);
/// ```
pub fn classify_sbas(svid: i32) -> SbasSubtype {
    sbas_definition(svid)
        .and_then(|e| e.subtype.parse().ok())
        .unwrap_or_default()
}

/// Name of the geostationary vehicle behind this identifier, if known
pub fn sbas_vehicle_name(svid: i32) -> Option<&'static str> {
    sbas_definition(svid).map(|e| e.id)
}
