//! Model-serving layer for DiagISM predictions.
//!
//! This crate describes what the trained regression models consume and produce,
//! and evaluates them. It never trains anything: pipelines are fitted offline and
//! loaded as data.
//!
//! # Overview
//!
//! - [`feature`]: the nine model inputs ([`Feature`]) and a row of values ([`FeatureValues`])
//! - [`parameter`]: the physical parameters that can be predicted ([`PhysicalParameter`])
//! - [`scaler`]: fitted robust scalers for inputs and targets
//! - [`regressor`]: the [`Regressor`](regressor::Regressor) trait and its MLP / linear implementations
//! - [`pipeline`]: scaler + regressor + scaler, the [`Predictor`](pipeline::Predictor)
//!   capability interface, and the score gate ([`ScoreGrade`](pipeline::ScoreGrade))
//! - [`bundle`]: all pipelines of one model variant plus the hyperparameter lookup table
//!
//! # Example
//!
//! ```
//! use diagism_model::{
//!     Feature, FeatureValues,
//!     pipeline::{Pipeline, Predictor as _, ScoreGrade},
//!     regressor::{LinearRegressor, RegressorModel},
//!     scaler::{FeatureScaler, TargetScaler},
//! };
//!
//! let mut coefficients = vec![0.0; Feature::LEN];
//! coefficients[Feature::CII158.index()] = 1.0;
//! let pipeline = Pipeline::new(
//!     FeatureScaler::identity(),
//!     RegressorModel::Linear(LinearRegressor { coefficients, intercept: 0.0 }),
//!     TargetScaler::identity(),
//!     0.93,
//! )?;
//! assert_eq!(pipeline.grade(), ScoreGrade::Reliable);
//!
//! let mut row = FeatureValues::from_array([0.0; Feature::LEN]);
//! row[Feature::CII158] = 6.0;
//! assert_eq!(pipeline.predict_physical(&[row]), vec![6.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    feature::{Feature, FeatureValues},
    parameter::PhysicalParameter,
};

pub mod bundle;
pub mod feature;
pub mod parameter;
pub mod pipeline;
pub mod regressor;
pub mod scaler;
