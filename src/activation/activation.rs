use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::graph::node::ComputationalNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationFunction {
    Sigmoid,
    Relu,
    #[serde(rename = "lin")]
    Linear,
    Tanh,
}

impl ActivationFunction {
    /// Element-wise activation.
    ///
    /// Sigmoid and Tanh return `f64::INFINITY` when an intermediate `exp`
    /// overflows.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Relu => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Linear => x,
            ActivationFunction::Tanh => tanh(x),
        }
    }

    /// Local derivative evaluated at the pre-activation `x`.
    /// Relu uses a sub-gradient of 0 at the origin.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = sigmoid(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Linear => 1.0,
            ActivationFunction::Tanh => {
                let t = tanh(x);
                1.0 - t * t
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Relu => "relu",
            ActivationFunction::Linear => "lin",
            ActivationFunction::Tanh => "tanh",
        }
    }
}

impl FromStr for ActivationFunction {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "relu" => Ok(ActivationFunction::Relu),
            "lin" => Ok(ActivationFunction::Linear),
            "tanh" => Ok(ActivationFunction::Tanh),
            other => Err(NnError::UnknownActivation(other.to_string())),
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Activation as a graph node: caches the pre-activation input on forward.
#[derive(Debug, Clone)]
pub struct ActivationNode {
    pub kind: ActivationFunction,
    x: Option<f64>,
}

impl ActivationNode {
    pub fn new(kind: ActivationFunction) -> ActivationNode {
        ActivationNode { kind, x: None }
    }
}

impl ComputationalNode for ActivationNode {
    type Input = f64;
    type Output = f64;
    type Gradient = f64;

    fn forward(&mut self, x: f64) -> f64 {
        self.x = Some(x);
        self.kind.function(x)
    }

    fn backward(&self, dz: f64) -> Result<f64> {
        let x = self.x.ok_or(NnError::BackwardBeforeForward("ActivationNode"))?;
        Ok(dz * self.kind.derivative(x))
    }
}

fn sigmoid(x: f64) -> f64 {
    let e = (-x).exp();
    if !e.is_finite() {
        return f64::INFINITY;
    }
    1.0 / (1.0 + e)
}

// Exponential definition, with the same overflow fallback as sigmoid.
fn tanh(x: f64) -> f64 {
    let (ep, en) = (x.exp(), (-x).exp());
    if !ep.is_finite() || !en.is_finite() {
        return f64::INFINITY;
    }
    (ep - en) / (ep + en)
}
