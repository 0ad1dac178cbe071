use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Activation applied after each hidden layer. The output layer is always
/// linear (raw regression output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
        }
    }

    /// Derivative expressed in terms of the activation output. For tanh this
    /// is `1 - y^2`; for ReLU the subgradient at zero is taken as zero.
    pub fn grad_from_output(&self, y: f64) -> f64 {
        match self {
            Activation::Relu => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Tanh => 1.0 - y * y,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            other => Err(ConfigError::UnknownActivation(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("hidden unit list has {units} entries for {layers} hidden layers")]
    UnitCountMismatch { layers: usize, units: usize },
    #[error("dropout probability {0} outside [0, 1)")]
    DropoutOutOfRange(f64),
    #[error("hidden layer {index} has zero units")]
    ZeroWidthLayer { index: usize },
    #[error("unknown activation '{0}'; supported values: relu, tanh")]
    UnknownActivation(String),
}

/// Full network/training configuration for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub hidden_layers: usize,
    pub hidden_units: Vec<usize>,
    pub learning_rate: f64,
    pub epochs: usize,
    pub activation: Activation,
    pub dropout: f64,
}

impl ModelConfig {
    /// Fixed reference configuration: one hidden layer of 20 units trained
    /// with the default Adagrad step size.
    pub fn baseline() -> Self {
        ModelConfig {
            hidden_layers: 1,
            hidden_units: vec![20],
            learning_rate: 0.01,
            epochs: 100_000,
            activation: Activation::Relu,
            dropout: 0.1,
        }
    }

    /// Fail-fast structural checks. The unit-list/layer-count agreement is a
    /// hard precondition for network construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_units.len() != self.hidden_layers {
            return Err(ConfigError::UnitCountMismatch {
                layers: self.hidden_layers,
                units: self.hidden_units.len(),
            });
        }
        if let Some(index) = self.hidden_units.iter().position(|&u| u == 0) {
            return Err(ConfigError::ZeroWidthLayer { index });
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(ConfigError::DropoutOutOfRange(self.dropout));
        }
        Ok(())
    }
}
