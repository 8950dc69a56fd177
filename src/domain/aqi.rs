use chrono::{DateTime, NaiveDate, Utc};

/// Best-effort user position. Superseded wholesale on every re-resolution;
/// never merged field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            latitude: lat,
            longitude: lon,
            city: None,
            state: None,
            country: None,
        }
    }

    pub fn display_name(&self) -> String {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.clone(),
            _ => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

/// Which rung of the resolution ladder produced the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTier {
    /// Device fix, optionally reverse-geocoded.
    Precise,
    /// IP-based guess; the user should be able to correct it.
    Network,
    /// Hardcoded fallback, used when every lookup failed.
    Default,
    /// Explicit pick from the city directory.
    Manual,
}

#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub location: Location,
    pub tier: LocationTier,
}

impl LocationTier {
    /// Banner text surfaced so a wrong guess can be corrected manually.
    pub fn advisory(self, location: &Location) -> Option<String> {
        match self {
            Self::Precise => Some("Using precise device location.".to_string()),
            Self::Network => Some(format!(
                "Using network location: {}. Press s to pick your city if this is wrong.",
                location.display_name()
            )),
            Self::Default => Some(format!(
                "Using default location: {}. Press s to select your exact city.",
                location.display_name()
            )),
            Self::Manual => None,
        }
    }
}

/// The fixed fallback used when both device and network lookups yield nothing.
pub fn default_location() -> ResolvedLocation {
    ResolvedLocation {
        location: Location {
            latitude: 23.1815,
            longitude: 79.9864,
            city: Some("Jabalpur".to_string()),
            state: Some("Madhya Pradesh".to_string()),
            country: Some("India".to_string()),
        },
        tier: LocationTier::Default,
    }
}

/// Canonical pollutant concentrations in ug/m3. Missing provider fields
/// default to zero rather than failing the reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pollutants {
    pub pm2_5: f64,
    pub pm10: f64,
    pub no2: f64,
    pub so2: f64,
    pub co: f64,
    pub o3: f64,
}

impl Pollutants {
    /// Concentrations are physical quantities; negative values are clamped.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            pm2_5: self.pm2_5.max(0.0),
            pm10: self.pm10.max(0.0),
            no2: self.no2.max(0.0),
            so2: self.so2.max(0.0),
            co: self.co.max(0.0),
            o3: self.o3.max(0.0),
        }
    }

    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("PM2.5", self.pm2_5),
            ("PM10", self.pm10),
            ("NO2", self.no2),
            ("SO2", self.so2),
            ("CO", self.co),
            ("O3", self.o3),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingSource {
    Waqi,
    OpenWeather,
    Sample,
}

/// One live reading at a time; replaced wholesale on every fetch.
#[derive(Debug, Clone)]
pub struct AirQualityReading {
    pub aqi: u16,
    pub location_label: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub observed_at: DateTime<Utc>,
    pub pollutants: Pollutants,
    pub source: ReadingSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub day_label: String,
    pub aqi: u16,
    pub date: NaiveDate,
}

/// Reference or remote city match, deduplicated by (name, state).
#[derive(Debug, Clone, PartialEq)]
pub struct CityCandidate {
    pub name: String,
    pub state: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl CityCandidate {
    pub fn to_location(&self) -> Location {
        Location {
            latitude: self.lat,
            longitude: self.lon,
            city: Some(self.name.clone()),
            state: Some(self.state.clone()),
            country: Some(self.country.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub label: &'static str,
    pub severity_rank: u8,
}

/// Six buckets, inclusive on the lower bucket at 50/100/150/200/300.
#[must_use]
pub fn level_of(aqi: u16) -> AqiLevel {
    let (label, severity_rank) = match aqi {
        0..=50 => ("Good", 0),
        51..=100 => ("Moderate", 1),
        101..=150 => ("Unhealthy for Sensitive", 2),
        151..=200 => ("Unhealthy", 3),
        201..=300 => ("Very Unhealthy", 4),
        _ => ("Hazardous", 5),
    };
    AqiLevel {
        label,
        severity_rank,
    }
}

/// US-EPA style piecewise-linear PM2.5 breakpoints, floor-rounded.
/// Monotone in the concentration and continuous at each breakpoint.
#[must_use]
pub fn aqi_from_pm25(pm2_5: f64) -> u16 {
    let c = if pm2_5.is_finite() { pm2_5.max(0.0) } else { 0.0 };
    let aqi = if c <= 12.0 {
        c * 4.17
    } else if c <= 35.4 {
        50.0 + (c - 12.0) * (50.0 / 23.4)
    } else if c <= 55.4 {
        100.0 + (c - 35.4) * (100.0 / 20.0)
    } else if c <= 150.4 {
        200.0 + (c - 55.4) * (100.0 / 95.0)
    } else {
        300.0 + (c - 150.4) * (100.0 / 249.6)
    };
    clamp_aqi(aqi.floor())
}

/// AQI values are never negative; provider values outside u16 are saturated.
#[must_use]
pub fn clamp_aqi(value: f64) -> u16 {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }
    value.round().min(f64::from(u16::MAX)) as u16
}
