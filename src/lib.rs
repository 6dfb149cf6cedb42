//! CESA Attendance Utility Library
//!
//! This library provides functionality for fetching scholarship roster data,
//! generating paginated PDF attendance sheets, and rendering oficio letters.

pub mod helpers;
pub mod models;
pub mod service;

pub use service::{AttendanceConfig, AttendanceService};

// Re-export key types for convenience
pub use helpers::layout::{DateRange, PageGeometry};
pub use helpers::pdf::{BandColor, SheetFont, SheetJob};
pub use models::roster::{ScholarRow, StudentRef};
