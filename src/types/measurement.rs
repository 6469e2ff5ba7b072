//! Defines the numeric measurement columns of an air-quality dataset.

use serde::Serialize;
use std::fmt;

/// A numeric column of the Measurement Table.
///
/// The first seven variants are the pollutant and temperature columns the dashboard
/// correlates; the remaining ones are the extra weather readings shipped with the
/// source dataset. Every variant is stored as a nullable 64-bit float once the table
/// is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Measurement {
    /// Fine particulate matter, µg/m³.
    #[serde(rename = "PM2.5")]
    Pm25,
    /// Coarse particulate matter, µg/m³.
    #[serde(rename = "PM10")]
    Pm10,
    /// Sulphur dioxide, µg/m³.
    #[serde(rename = "SO2")]
    So2,
    /// Nitrogen dioxide, µg/m³.
    #[serde(rename = "NO2")]
    No2,
    /// Carbon monoxide, µg/m³.
    #[serde(rename = "CO")]
    Co,
    /// Ozone, µg/m³.
    #[serde(rename = "O3")]
    O3,
    /// Air temperature, °C.
    #[serde(rename = "TEMP")]
    Temp,
    /// Air pressure, hPa.
    #[serde(rename = "PRES")]
    Pres,
    /// Dew point temperature, °C.
    #[serde(rename = "DEWP")]
    Dewp,
    /// Precipitation, mm.
    #[serde(rename = "RAIN")]
    Rain,
    /// Wind speed, m/s.
    #[serde(rename = "WSPM")]
    Wspm,
}

impl Measurement {
    /// Every measurement column the loader knows how to normalise.
    pub const ALL: [Measurement; 11] = [
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::So2,
        Measurement::No2,
        Measurement::Co,
        Measurement::O3,
        Measurement::Temp,
        Measurement::Pres,
        Measurement::Dewp,
        Measurement::Rain,
        Measurement::Wspm,
    ];

    /// The four pollutants shown on the monthly, station and rainfall charts.
    pub const POLLUTANTS: [Measurement; 4] = [
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::So2,
        Measurement::No2,
    ];

    /// The columns of the pollutant/temperature correlation heatmap.
    pub const CORRELATED: [Measurement; 7] = [
        Measurement::Pm25,
        Measurement::Pm10,
        Measurement::So2,
        Measurement::No2,
        Measurement::Co,
        Measurement::O3,
        Measurement::Temp,
    ];

    /// The header name of this column in the source CSV.
    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::Pm25 => "PM2.5",
            Measurement::Pm10 => "PM10",
            Measurement::So2 => "SO2",
            Measurement::No2 => "NO2",
            Measurement::Co => "CO",
            Measurement::O3 => "O3",
            Measurement::Temp => "TEMP",
            Measurement::Pres => "PRES",
            Measurement::Dewp => "DEWP",
            Measurement::Rain => "RAIN",
            Measurement::Wspm => "WSPM",
        }
    }

    /// Looks a measurement up by its CSV header name. Matching is exact.
    pub fn from_column_name(name: &str) -> Option<Measurement> {
        Measurement::ALL
            .into_iter()
            .find(|m| m.column_name() == name)
    }
}

/// Formats a `Measurement` as its CSV header name.
///
/// # Examples
///
/// ```
/// use air_quality::Measurement;
///
/// assert_eq!(Measurement::Pm25.to_string(), "PM2.5");
/// assert_eq!(format!("{}", Measurement::Temp), "TEMP");
/// ```
impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}
