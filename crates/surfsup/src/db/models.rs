use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Daily precipitation keyed by `YYYY-MM-DD`. Later rows for the same date overwrite earlier ones.
pub type Precipitation = BTreeMap<String, Option<f64>>;

#[derive(sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct PrecipitationRow {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Measurement count for a single station
#[derive(sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// MIN/AVG/MAX of `tobs` over a filtered set; all `None` when the set is empty
#[derive(sqlx::FromRow, Clone, Copy, Debug, Default, PartialEq)]
pub struct TemperatureStats {
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// Response row for `/api/v1.0/{start}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct StartStats {
    #[serde(rename = "min temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "avg temp")]
    pub avg_temp: Option<f64>,
    #[serde(rename = "max temp")]
    pub max_temp: Option<f64>,
}

/// Response row for `/api/v1.0/{start}/{end}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct RangeStats {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

impl From<TemperatureStats> for StartStats {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            min_temp: stats.min_temp,
            avg_temp: stats.avg_temp,
            max_temp: stats.max_temp,
        }
    }
}

impl From<TemperatureStats> for RangeStats {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            tmin: stats.min_temp,
            tavg: stats.avg_temp,
            tmax: stats.max_temp,
        }
    }
}
