//! Monte-Carlo uncertainty propagation for DiagISM predictions.
//!
//! Observed line luminosities rarely cover every model input, and the ones that
//! are observed carry measurement errors. This crate turns each input row into an
//! ensemble of plausible complete rows and pushes the whole ensemble through a
//! fitted pipeline, so that every prediction comes with a spread.
//!
//! # Overview
//!
//! - [`input`]: reconciling user tables with the model's feature columns
//! - [`reference`]: the simulated population used as a prior
//! - [`conditioning`]: the per-row conditioning window and its fallback
//! - [`policy`]: the per-column sampling decision table
//! - [`generator`]: mock ensembles ([`generate_mocks`](generator::generate_mocks))
//! - [`aggregate`]: prediction summaries ([`predict_and_summarize`](aggregate::predict_and_summarize))
//! - [`session`]: a whole request, including the score gate
//!
//! # Example
//!
//! ```
//! use diagism_mock::{
//!     generator::MockConfig,
//!     input::InputTable,
//!     reference::ReferenceTable,
//!     session::PredictionContext,
//! };
//! use diagism_model::{
//!     Feature, FeatureValues,
//!     pipeline::Pipeline,
//!     regressor::{LinearRegressor, RegressorModel},
//!     scaler::{FeatureScaler, TargetScaler},
//! };
//!
//! // a toy population where every line tracks [CII]
//! let reference = ReferenceTable::new(
//!     (0..50)
//!         .map(|i| FeatureValues::from_fn(|_| 5.0 + 0.04 * f64::from(i)))
//!         .collect(),
//! );
//! let mut coefficients = vec![0.0; Feature::LEN];
//! coefficients[Feature::CII158.index()] = 1.0;
//! let pipeline = Pipeline::new(
//!     FeatureScaler::identity(),
//!     RegressorModel::Linear(LinearRegressor { coefficients, intercept: 0.0 }),
//!     TargetScaler::identity(),
//!     0.95,
//! )?;
//!
//! let input = InputTable::from_records(
//!     ["Lum_OIII_88", "Lum_CII_158", "log(1+z)"],
//!     [["6.0", "6.0", "0.17"]],
//! )?;
//! let context = PredictionContext { reference: &reference, predictor: &pipeline };
//! let report = context.run(&input, &MockConfig::default())?;
//!
//! let summary = report.rows[0].summary;
//! assert!((summary.median - 6.0).abs() < 0.01);
//! assert!(summary.per_16th < summary.median && summary.median < summary.per_84th);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod conditioning;
pub mod generator;
pub mod input;
pub mod policy;
pub mod reference;
pub mod session;
