mod aoi;
mod engine;
mod error;
mod geometry;
mod types;

pub use aoi::{parse_aoi_list, AreaOfInterest};
pub use engine::{search_passes, SearchOptions, SearchWindow};
pub use error::SearchError;
pub use types::Pass;
