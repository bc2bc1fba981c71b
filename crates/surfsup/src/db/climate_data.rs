use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use surfsup_core::readable_file;
use time::Date;

use super::{
    parse_iso_date, to_iso_date, PrecipitationRow, StationActivity, TemperatureObservation,
    TemperatureStats,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query climate store: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Climate store is not readable at {0}")]
    Unavailable(String),
    #[error("Stored date `{value}` is not YYYY-MM-DD: {source}")]
    StoredDate {
        value: String,
        source: time::error::Parse,
    },
}

/// Read-side queries against the `measurement` and `station` tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Most recent measurement date across all stations
    async fn latest_date(&self) -> Result<Option<Date>, Error>;
    /// `(date, prcp)` for every measurement with `start <= date <= end`
    async fn precipitation_between(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<PrecipitationRow>, Error>;
    /// Every row of the `station` table, duplicates included, in store order
    async fn station_ids(&self) -> Result<Vec<String>, Error>;
    /// Station with the most measurement rows, ties going to the smallest id
    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error>;
    async fn latest_station_date(&self, station: &str) -> Result<Option<Date>, Error>;
    async fn station_tobs_since(
        &self,
        station: &str,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// Single-row MIN/AVG/MAX of `tobs` for `date >= start` (and `date <= end` when given)
    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    /// Opens the pre-populated database read-only. The file is never created.
    pub async fn new(path: &str) -> Result<Self, Error> {
        if !readable_file(path) {
            return Err(Error::Unavailable(path.to_owned()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("climate store opened read-only at: {}", path);
        Ok(Self { pool })
    }
}

fn stored_date(value: Option<String>) -> Result<Option<Date>, Error> {
    value
        .map(|value| match parse_iso_date(&value) {
            Ok(date) => Ok(date),
            Err(source) => Err(Error::StoredDate { value, source }),
        })
        .transpose()
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_date(&self) -> Result<Option<Date>, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;
        debug!("latest measurement date: {:?}", latest);
        stored_date(latest)
    }

    async fn precipitation_between(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<PrecipitationRow>, Error> {
        let rows = sqlx::query_as::<_, PrecipitationRow>(
            "SELECT date, prcp FROM measurement WHERE date >= ? AND date <= ?",
        )
        .bind(to_iso_date(start))
        .bind(to_iso_date(end))
        .fetch_all(&self.pool)
        .await?;
        debug!(
            "precipitation rows between {} and {}: {}",
            start,
            end,
            rows.len()
        );
        Ok(rows)
    }

    async fn station_ids(&self) -> Result<Vec<String>, Error> {
        let stations = sqlx::query_scalar("SELECT station FROM station")
            .fetch_all(&self.pool)
            .await?;
        Ok(stations)
    }

    async fn most_active_station(&self) -> Result<Option<StationActivity>, Error> {
        let activity = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(*) AS observations
             FROM measurement
             GROUP BY station
             ORDER BY observations DESC, station ASC
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        debug!("most active station: {:?}", activity);
        Ok(activity)
    }

    async fn latest_station_date(&self, station: &str) -> Result<Option<Date>, Error> {
        let latest: Option<String> =
            sqlx::query_scalar("SELECT MAX(date) FROM measurement WHERE station = ?")
                .bind(station)
                .fetch_one(&self.pool)
                .await?;
        stored_date(latest)
    }

    async fn station_tobs_since(
        &self,
        station: &str,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let rows = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, tobs FROM measurement WHERE station = ? AND date >= ?",
        )
        .bind(station)
        .bind(to_iso_date(since))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error> {
        let mut sql = String::from(
            "SELECT CAST(MIN(tobs) AS REAL) AS min_temp,
                    CAST(AVG(tobs) AS REAL) AS avg_temp,
                    CAST(MAX(tobs) AS REAL) AS max_temp
             FROM measurement
             WHERE date >= ?",
        );
        if end.is_some() {
            sql.push_str(" AND date <= ?");
        }

        let mut query = sqlx::query_as::<_, TemperatureStats>(&sql).bind(to_iso_date(start));
        if let Some(end) = end {
            query = query.bind(to_iso_date(end));
        }

        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
