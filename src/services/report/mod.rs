pub mod charts;
pub mod summary;

pub use charts::{LineChart, ReportRenderer, POST_ENGAGEMENT_CHART, PROFILE_VIEWS_CHART};
