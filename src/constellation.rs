//! GNSS constellations, as reported by the platform
use crate::ParsingError;
use num_traits::FromPrimitive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod sbas;

pub use sbas::{classify_sbas, sbas_vehicle_name, SbasSubtype};

/// Constellation a satellite report belongs to.
/// Discriminants are the platform native constellation codes.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstellationType {
    /// Unidentified or unsupported constellation
    #[default]
    Unknown = 0,
    /// `GPS` american constellation
    GPS = 1,
    /// Geostationary augmentation systems
    SBAS = 2,
    /// `Glonass` russian constellation
    Glonass = 3,
    /// `QZSS` japanese constellation
    QZSS = 4,
    /// `BeiDou` chinese constellation
    BeiDou = 5,
    /// `Galileo` european constellation
    Galileo = 6,
}

/// Identifies the [ConstellationType] from the platform native code.
/// Total: any code we do not know of is [ConstellationType::Unknown].
/// ```
/// use galileo_relevance::prelude::*;
///
/// assert_eq!(classify(6), ConstellationType::Galileo);
/// assert_eq!(classify(7), ConstellationType::Unknown); // IRNSS
/// assert_eq!(classify(-1), ConstellationType::Unknown);
/// ```
pub fn classify(raw: i32) -> ConstellationType {
    ConstellationType::from_i32(raw).unwrap_or_default()
}

impl ConstellationType {
    /// Returns true if Self is the Galileo constellation
    pub fn is_galileo(&self) -> bool {
        *self == Self::Galileo
    }
    /// Returns true if Self is an augmentation system
    pub fn is_sbas(&self) -> bool {
        *self == Self::SBAS
    }
}

impl std::fmt::Display for ConstellationType {
    /*
     * Formats Self as 3 letter code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "GPS"),
            Self::Glonass => write!(f, "GLO"),
            Self::Galileo => write!(f, "GAL"),
            Self::BeiDou => write!(f, "BDS"),
            Self::QZSS => write!(f, "QZSS"),
            Self::SBAS => write!(f, "SBAS"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::fmt::LowerHex for ConstellationType {
    /*
     * {:x}: formats Self as single letter standard code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "G"),
            Self::Glonass => write!(f, "R"),
            Self::Galileo => write!(f, "E"),
            Self::BeiDou => write!(f, "C"),
            Self::QZSS => write!(f, "J"),
            Self::SBAS => write!(f, "S"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

impl std::str::FromStr for ConstellationType {
    type Err = ParsingError;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let s = string.trim().to_lowercase();
        match s.as_str() {
            "g" | "gps" | "navstar" => Ok(Self::GPS),
            "r" | "glo" | "glonass" => Ok(Self::Glonass),
            "e" | "gal" | "galileo" => Ok(Self::Galileo),
            "c" | "bds" | "beidou" => Ok(Self::BeiDou),
            "j" | "qzss" => Ok(Self::QZSS),
            "s" | "sbas" => Ok(Self::SBAS),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParsingError::Constellation(string.to_string())),
        }
    }
}
