//! Shape Normalizer
//!
//! Turns the store's inconsistent response bodies into canonical rows and
//! coerces individual fields. Pure functions only; malformed input degrades
//! to empty rows or zero values instead of errors.

mod coerce;
mod row;


pub use coerce::{as_bool, as_datetime, as_f64, as_i64, as_string, RowExt};
pub use row::{
    extract_documents, extract_rows, extract_single, normalize_row, unwrap_value, CanonicalRow,
};
