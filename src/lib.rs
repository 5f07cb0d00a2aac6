//! Sales KPI dashboard: load a sales table once, then filter by region and
//! category and recompute every metric and chart on each change.

pub mod config;
pub mod data;
pub mod pipeline;
pub mod present;
pub mod state;
