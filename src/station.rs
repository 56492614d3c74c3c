use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Station codes published by CBIBS for its Chesapeake Bay buoy platforms.
///
/// The set is closed: the service only answers for these codes, so anything
/// else is rejected client-side before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Station {
    /// Upper Potomac.
    UP,
    /// Gooses Reef.
    GR,
    /// Jamestown.
    J,
    /// First Landing.
    FL,
    /// Stingray Point.
    SR,
    /// Potomac.
    PL,
    /// Annapolis.
    AN,
    /// York Spit.
    YS,
    /// Norfolk.
    N,
    /// Susquehanna.
    SN,
    /// Patapsco.
    S,
}

impl Station {
    /// Every station the service currently publishes.
    pub const ALL: [Station; 11] = [
        Station::UP,
        Station::GR,
        Station::J,
        Station::FL,
        Station::SR,
        Station::PL,
        Station::AN,
        Station::YS,
        Station::N,
        Station::SN,
        Station::S,
    ];

    /// The code as it appears in request URLs.
    pub fn code(self) -> &'static str {
        match self {
            Station::UP => "UP",
            Station::GR => "GR",
            Station::J => "J",
            Station::FL => "FL",
            Station::SR => "SR",
            Station::PL => "PL",
            Station::AN => "AN",
            Station::YS => "YS",
            Station::N => "N",
            Station::SN => "SN",
            Station::S => "S",
        }
    }

    /// Parses a station code, accepting any letter case.
    ///
    /// Returns [`Error::InvalidStationCode`] carrying the offending input
    /// when the code is not in the published set.
    pub fn from_code(code: &str) -> Result<Station, Error> {
        match code.to_ascii_uppercase().as_str() {
            "UP" => Ok(Station::UP),
            "GR" => Ok(Station::GR),
            "J" => Ok(Station::J),
            "FL" => Ok(Station::FL),
            "SR" => Ok(Station::SR),
            "PL" => Ok(Station::PL),
            "AN" => Ok(Station::AN),
            "YS" => Ok(Station::YS),
            "N" => Ok(Station::N),
            "SN" => Ok(Station::SN),
            "S" => Ok(Station::S),
            _ => Err(Error::InvalidStationCode(code.to_string())),
        }
    }
}

impl FromStr for Station {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Station::from_code(s)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
