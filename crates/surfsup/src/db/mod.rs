mod climate_data;
mod dates;
mod models;

pub use climate_data::*;
pub use dates::*;
pub use models::*;
