use crate::error::{NnError, Result};
use crate::graph::node::ComputationalNode;

/// Multiplies an input by a weight: `x[0] * x[1]`.
///
/// `x[1]` doubles as the weight storage, so the weight survives between
/// passes while `x[0]` is overwritten on every forward call. The owning
/// neuron updates the weight through `set_weight`.
#[derive(Debug, Clone)]
pub struct MultiplyNode {
    x: [f64; 2],
    cached: bool,
}

impl MultiplyNode {
    pub fn new(weight: f64) -> MultiplyNode {
        MultiplyNode { x: [1.0, weight], cached: false }
    }

    pub fn weight(&self) -> f64 {
        self.x[1]
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.x[1] = weight;
    }
}

impl ComputationalNode for MultiplyNode {
    type Input = [f64; 2];
    type Output = f64;
    /// `[d/d input, d/d weight]`
    type Gradient = [f64; 2];

    fn forward(&mut self, x: [f64; 2]) -> f64 {
        self.x = x;
        self.cached = true;
        self.x[0] * self.x[1]
    }

    fn backward(&self, dz: f64) -> Result<[f64; 2]> {
        if !self.cached {
            return Err(NnError::BackwardBeforeForward("MultiplyNode"));
        }
        Ok([dz * self.x[1], dz * self.x[0]])
    }
}
