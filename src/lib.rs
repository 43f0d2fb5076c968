//! # Equiviz Core: equipment dataset analytics and reporting
//!
//! The processing core behind the chemical equipment parameter visualizer:
//! it ingests an uploaded CSV of equipment readings, cleans it into a fixed
//! five-column table, computes a structured statistical analysis, scrubs the
//! result for strict-JSON safety, and renders a paginated PDF report.
//!
//! The HTTP surface, authentication, durable storage and the GUI live outside
//! this crate; everything here is a pure, deterministic transformation of an
//! input snapshot, safe to dispatch concurrently across independent datasets.
//!
//! ## Example
//!
//! ```rust
//! use equiviz_core::pipeline;
//!
//! let csv = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
//!     Pump A,Pump,10,1.2,45\n\
//!     Valve B,Valve,5,0.8,30\n";
//! let output = pipeline::run(csv)?;
//! assert_eq!(output.summary.total_rows, 2);
//! assert_eq!(output.analytics.stats["flowrate"].mean, Some(7.5));
//! # Ok::<(), equiviz_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod analytics;
pub mod clean;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod table;

pub use error::{Error, Result};
