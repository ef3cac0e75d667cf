//! File and service front-ends for the [topsis] ranking engine.
//!
//! [app] reads decision tables from CSV or Excel files, runs the ranking and writes
//! the result table next to an optional JSON summary. [app::service] handles the
//! same ranking when it arrives as an uploaded file with an email address.

pub mod app;
