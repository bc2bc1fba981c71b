use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Date;
use utoipa::ToSchema;

use crate::db::{
    self, days_before, parse_iso_date, ClimateData, Precipitation, RangeStats, StartStats,
    TemperatureObservation,
};

/// Station the legacy tobs report was pinned to.
pub const LEGACY_ACTIVE_STATION: &str = "USC00519281";

/// Days covered by the "last year of data" reports.
pub const REPORT_WINDOW_DAYS: i64 = 365;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Store(#[from] db::Error),
    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    MalformedDate(String),
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MalformedDate(_) => StatusCode::BAD_REQUEST,
            Error::Store(e) => {
                error!("climate store error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Parse a date taken from a request path.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    parse_iso_date(raw).map_err(|e| {
        debug!("rejecting date parameter {:?}: {}", raw, e);
        Error::MalformedDate(raw.to_owned())
    })
}

/// Compatibility pins for the legacy report behaviour. Unset means computed.
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    /// Fixed station for the tobs report instead of the most active one
    pub tobs_station: Option<String>,
    /// Fixed upper bound for the precipitation report instead of the latest date
    pub precipitation_until: Option<Date>,
}

pub struct ClimateReports {
    climate_db: Arc<dyn ClimateData>,
    options: ReportOptions,
}

impl ClimateReports {
    pub fn new(climate_db: Arc<dyn ClimateData>, options: ReportOptions) -> Self {
        if let Some(station) = &options.tobs_station {
            warn!("tobs report pinned to station {}", station);
        }
        if let Some(until) = &options.precipitation_until {
            warn!("precipitation report pinned to end at {}", until);
        }
        Self {
            climate_db,
            options,
        }
    }

    /// Precipitation for the year leading up to the most recent measurement.
    pub async fn get_precipitation(&self) -> Result<Precipitation, Error> {
        let Some(latest) = self.climate_db.latest_date().await? else {
            debug!("no measurements stored, precipitation report is empty");
            return Ok(Precipitation::new());
        };
        let start = days_before(latest, REPORT_WINDOW_DAYS);
        let end = self.options.precipitation_until.unwrap_or(latest);
        debug!("precipitation window {} to {}", start, end);

        let rows = self.climate_db.precipitation_between(start, end).await?;
        Ok(rows.into_iter().map(|row| (row.date, row.prcp)).collect())
    }

    pub async fn get_stations(&self) -> Result<Vec<String>, Error> {
        Ok(self.climate_db.station_ids().await?)
    }

    /// Temperature observations of the most active station over its last year of data.
    pub async fn get_tobs(&self) -> Result<Vec<TemperatureObservation>, Error> {
        let station = match &self.options.tobs_station {
            Some(station) => station.clone(),
            None => match self.climate_db.most_active_station().await? {
                Some(activity) => activity.station,
                None => {
                    debug!("no measurements stored, tobs report is empty");
                    return Ok(vec![]);
                }
            },
        };

        let Some(latest) = self.climate_db.latest_station_date(&station).await? else {
            debug!("station {} has no measurements", station);
            return Ok(vec![]);
        };
        let since = days_before(latest, REPORT_WINDOW_DAYS);
        debug!("tobs for {} since {}", station, since);

        Ok(self.climate_db.station_tobs_since(&station, since).await?)
    }

    pub async fn get_stats_from(&self, start: Date) -> Result<Vec<StartStats>, Error> {
        let stats = self.climate_db.temperature_stats(start, None).await?;
        Ok(vec![stats.into()])
    }

    /// Inclusive on both ends. `start > end` is an empty window, not an error.
    pub async fn get_stats_range(&self, start: Date, end: Date) -> Result<Vec<RangeStats>, Error> {
        let stats = self.climate_db.temperature_stats(start, Some(end)).await?;
        Ok(vec![stats.into()])
    }
}
