// Audit log interpretation: filter-window derivation and detail rendering
pub mod formatter;
pub mod window;

pub use formatter::{format_details, target_description, DetailField, DetailRecord};
pub use window::{day_range_utc, offset_from_minutes};
