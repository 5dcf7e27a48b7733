use serde::{Deserialize, Serialize};

/// A named output column of a processed station series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    AirTemperature,
    DewPointTemperature,
    SeaLevelPressure,
    WindDirection,
    WindSpeedRate,
    SkyConditionCode,
    OneHourPrecipDepth,
    ThreeHourPrecipDepth,
    SixHourPrecipDepth,
    TwelveHourPrecipDepth,
    OtherPrecipDepth,
}

/// Physical representation of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Decoded from tenths
    Scaled,
    /// Stored as-is (degrees, sky code)
    Integer,
}

impl Variable {
    pub const ALL: [Variable; 11] = [
        Variable::AirTemperature,
        Variable::DewPointTemperature,
        Variable::SeaLevelPressure,
        Variable::WindDirection,
        Variable::WindSpeedRate,
        Variable::SkyConditionCode,
        Variable::OneHourPrecipDepth,
        Variable::ThreeHourPrecipDepth,
        Variable::SixHourPrecipDepth,
        Variable::TwelveHourPrecipDepth,
        Variable::OtherPrecipDepth,
    ];

    /// The sub-variables a generic "Precip" request expands to, in output order
    pub const PRECIP: [Variable; 5] = [
        Variable::OneHourPrecipDepth,
        Variable::ThreeHourPrecipDepth,
        Variable::SixHourPrecipDepth,
        Variable::TwelveHourPrecipDepth,
        Variable::OtherPrecipDepth,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Variable::ALL
            .iter()
            .copied()
            .find(|v| v.display_name() == name.trim())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::AirTemperature => "Air Temperature",
            Variable::DewPointTemperature => "Dew Point Temperature",
            Variable::SeaLevelPressure => "Sea Level Pressure",
            Variable::WindDirection => "Wind Direction",
            Variable::WindSpeedRate => "Wind Speed Rate",
            Variable::SkyConditionCode => "Sky Condition Code",
            Variable::OneHourPrecipDepth => "One Hour Precip Depth",
            Variable::ThreeHourPrecipDepth => "Three Hour Precip Depth",
            Variable::SixHourPrecipDepth => "Six Hour Precip Depth",
            Variable::TwelveHourPrecipDepth => "Twelve Hour Precip Depth",
            Variable::OtherPrecipDepth => "Other Precip Depth",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Variable::WindDirection | Variable::SkyConditionCode => ValueKind::Integer,
            _ => ValueKind::Scaled,
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Variable::AirTemperature | Variable::DewPointTemperature => "°C",
            Variable::SeaLevelPressure => "hPa",
            Variable::WindDirection => "degrees",
            Variable::WindSpeedRate => "m/s",
            Variable::SkyConditionCode => "code",
            _ => "mm",
        }
    }

    pub fn is_precipitation(&self) -> bool {
        Variable::PRECIP.contains(self)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
