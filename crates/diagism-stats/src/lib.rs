//! Statistical utilities for the DiagISM workspace.
//!
//! This crate provides the small set of statistics needed to summarize
//! Monte-Carlo prediction ensembles and to grade trained regressors:
//!
//! - **Descriptive statistics**: mean, median, population and sample spread
//! - **Percentiles**: linear-interpolated quantiles of a dataset
//! - **Summaries**: descriptive statistics and percentiles computed in one pass
//! - **Regression quality**: coefficient of determination (R²)
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`summary`]: Combined descriptive statistics and percentiles
//! - [`regression`]: Goodness-of-fit measures for predictions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use diagism_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing percentiles
//!
//! ```
//! use diagism_stats::percentiles::Percentiles;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let percentiles = Percentiles::new(&values, &[16.0, 50.0, 84.0]);
//! assert_eq!(percentiles.get(50.0), Some(3.0));
//! ```
//!
//! ## Scoring predictions
//!
//! ```
//! use diagism_stats::regression::coefficient_of_determination;
//!
//! let observed = [1.0, 2.0, 3.0];
//! let r2 = coefficient_of_determination(&observed, &observed).unwrap();
//! assert_eq!(r2, 1.0);
//! ```

pub mod descriptive;
pub mod percentiles;
pub mod regression;
pub mod summary;
