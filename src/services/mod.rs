pub mod columns;
pub mod engagement;
pub mod excel;
pub mod pipeline;
pub mod profile_views;
pub mod report;
