//! Trained regressors evaluated on scaled feature rows.
//!
//! Regressors are fitted offline and shipped as data. This module only knows how
//! to evaluate them:
//!
//! - [`MlpRegressor`]: a dense feed-forward network with one hidden activation
//!   and an identity output unit
//! - [`LinearRegressor`]: an affine model, mostly useful as a baseline
//!
//! [`RegressorModel`] is the serialized, tagged union of the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fitted single-output regressor.
pub trait Regressor: fmt::Debug + Send + Sync {
    /// Number of input values expected by [`Regressor::predict_one`].
    fn n_features(&self) -> usize;

    /// Predicts the (scaled) target for one (scaled) input row.
    #[must_use]
    fn predict_one(&self, input: &[f64]) -> f64;
}

/// Shape errors found when loading a regressor.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RegressorShapeError {
    #[display("network has no layers")]
    NoLayers,
    #[display("layer {layer} has {rows} weight rows, expected {expected}")]
    InputMismatch {
        layer: usize,
        rows: usize,
        expected: usize,
    },
    #[display("layer {layer} has ragged weight rows")]
    RaggedWeights { layer: usize },
    #[display("layer {layer} has {biases} biases for {outputs} outputs")]
    BiasMismatch {
        layer: usize,
        biases: usize,
        outputs: usize,
    },
    #[display("output layer has {outputs} units, expected 1")]
    MultipleOutputs { outputs: usize },
}

/// Hidden-layer activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Logistic,
    Tanh,
    #[default]
    Relu,
}

impl Activation {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Logistic => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
        }
    }
}

/// One fully connected layer.
///
/// `weights[i][j]` connects input `i` to output `j`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    fn n_inputs(&self) -> usize {
        self.weights.len()
    }

    fn n_outputs(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut output = self.biases.clone();
        for (x, row) in std::iter::zip(input, &self.weights) {
            for (out, w) in std::iter::zip(&mut output, row) {
                *out += x * w;
            }
        }
        output
    }
}

/// Multi-layer perceptron regressor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "MlpRecord", into = "MlpRecord")]
pub struct MlpRegressor {
    activation: Activation,
    layers: Vec<DenseLayer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct MlpRecord {
    #[serde(default)]
    activation: Activation,
    layers: Vec<DenseLayer>,
}

impl TryFrom<MlpRecord> for MlpRegressor {
    type Error = RegressorShapeError;

    fn try_from(record: MlpRecord) -> Result<Self, Self::Error> {
        Self::new(record.activation, record.layers)
    }
}

impl From<MlpRegressor> for MlpRecord {
    fn from(mlp: MlpRegressor) -> Self {
        Self {
            activation: mlp.activation,
            layers: mlp.layers,
        }
    }
}

impl MlpRegressor {
    /// Builds a network after checking that consecutive layer shapes agree and
    /// that the last layer has a single output.
    pub fn new(
        activation: Activation,
        layers: Vec<DenseLayer>,
    ) -> Result<Self, RegressorShapeError> {
        let first = layers.first().ok_or(RegressorShapeError::NoLayers)?;
        let mut expected = first.n_inputs();
        for (layer, dense) in layers.iter().enumerate() {
            if dense.n_inputs() != expected {
                return Err(RegressorShapeError::InputMismatch {
                    layer,
                    rows: dense.n_inputs(),
                    expected,
                });
            }
            let outputs = dense.n_outputs();
            if dense.weights.iter().any(|row| row.len() != outputs) {
                let width = dense.weights.first().map_or(outputs, Vec::len);
                if dense.weights.iter().all(|row| row.len() == width) {
                    return Err(RegressorShapeError::BiasMismatch {
                        layer,
                        biases: outputs,
                        outputs: width,
                    });
                }
                return Err(RegressorShapeError::RaggedWeights { layer });
            }
            expected = outputs;
        }
        if expected != 1 {
            return Err(RegressorShapeError::MultipleOutputs { outputs: expected });
        }
        Ok(Self { activation, layers })
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Regressor for MlpRegressor {
    fn n_features(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::n_inputs)
    }

    fn predict_one(&self, input: &[f64]) -> f64 {
        let last = self.layers.len() - 1;
        let mut values = input.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            values = layer.forward(&values);
            if i != last {
                for v in &mut values {
                    *v = self.activation.apply(*v);
                }
            }
        }
        values[0]
    }
}

/// Affine regressor `y = intercept + coefficients · x`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_one(&self, input: &[f64]) -> f64 {
        self.intercept
            + std::iter::zip(&self.coefficients, input)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Serialized regressor of any supported kind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorModel {
    Mlp(MlpRegressor),
    Linear(LinearRegressor),
}

impl Regressor for RegressorModel {
    fn n_features(&self) -> usize {
        match self {
            Self::Mlp(mlp) => mlp.n_features(),
            Self::Linear(linear) => linear.n_features(),
        }
    }

    fn predict_one(&self, input: &[f64]) -> f64 {
        match self {
            Self::Mlp(mlp) => mlp.predict_one(input),
            Self::Linear(linear) => linear.predict_one(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(weights: Vec<Vec<f64>>, biases: Vec<f64>) -> DenseLayer {
        DenseLayer { weights, biases }
    }

    #[test]
    fn test_relu_network_forward_pass() {
        // 2 inputs -> 2 hidden (relu) -> 1 output
        let mlp = MlpRegressor::new(
            Activation::Relu,
            vec![
                layer(vec![vec![1.0, -1.0], vec![1.0, -1.0]], vec![0.0, 0.0]),
                layer(vec![vec![2.0], vec![3.0]], vec![0.5]),
            ],
        )
        .unwrap();
        assert_eq!(mlp.n_features(), 2);
        // hidden = relu([3, -3]) = [3, 0]
        assert_eq!(mlp.predict_one(&[1.0, 2.0]), 6.5);
        // hidden = relu([-3, 3]) = [0, 3]
        assert_eq!(mlp.predict_one(&[-1.0, -2.0]), 9.5);
    }

    #[test]
    fn test_output_layer_is_linear() {
        let mlp = MlpRegressor::new(
            Activation::Logistic,
            vec![layer(vec![vec![-4.0]], vec![1.0])],
        )
        .unwrap();
        assert_eq!(mlp.predict_one(&[1.0]), -3.0);
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            MlpRegressor::new(Activation::Relu, vec![]).unwrap_err(),
            RegressorShapeError::NoLayers
        );
        assert_eq!(
            MlpRegressor::new(
                Activation::Relu,
                vec![
                    layer(vec![vec![1.0, 1.0]], vec![0.0, 0.0]),
                    layer(vec![vec![1.0]], vec![0.0]),
                ],
            )
            .unwrap_err(),
            RegressorShapeError::InputMismatch {
                layer: 1,
                rows: 1,
                expected: 2
            }
        );
        assert_eq!(
            MlpRegressor::new(
                Activation::Relu,
                vec![layer(vec![vec![1.0, 1.0]], vec![0.0, 0.0])],
            )
            .unwrap_err(),
            RegressorShapeError::MultipleOutputs { outputs: 2 }
        );
        assert_eq!(
            MlpRegressor::new(
                Activation::Relu,
                vec![layer(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0])],
            )
            .unwrap_err(),
            RegressorShapeError::RaggedWeights { layer: 0 }
        );
    }

    #[test]
    fn test_tagged_deserialization() {
        let json = r#"{
            "kind": "mlp",
            "activation": "tanh",
            "layers": [{"weights": [[0.0], [0.0]], "biases": [1.25]}]
        }"#;
        let model: RegressorModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict_one(&[3.0, 4.0]), 1.25);

        let json = r#"{"kind": "mlp", "layers": []}"#;
        let err = serde_json::from_str::<RegressorModel>(json).unwrap_err();
        assert!(err.to_string().contains("network has no layers"));

        let json = r#"{"kind": "linear", "coefficients": [1.0, 2.0], "intercept": -1.0}"#;
        let model: RegressorModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.predict_one(&[1.0, 1.0]), 2.0);
    }
}
