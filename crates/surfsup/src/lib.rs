pub mod db;
pub mod reports;
pub mod routes;
mod startup;
mod utils;

pub use db::{
    ClimateAccess, ClimateData, Precipitation, PrecipitationRow, RangeStats, StartStats,
    StationActivity, TemperatureObservation, TemperatureStats,
};
pub use reports::{
    parse_date, ClimateReports, ReportOptions, LEGACY_ACTIVE_STATION, REPORT_WINDOW_DAYS,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
