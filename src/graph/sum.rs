use crate::error::{NnError, Result};
use crate::graph::node::ComputationalNode;

/// Sums a vector of scalars. The local Jacobian is all ones, so backward
/// broadcasts `dz` once per summed input.
#[derive(Debug, Clone, Default)]
pub struct SumNode {
    x: Option<Vec<f64>>,
}

impl SumNode {
    pub fn new() -> SumNode {
        SumNode::default()
    }
}

impl ComputationalNode for SumNode {
    type Input = Vec<f64>;
    type Output = f64;
    type Gradient = Vec<f64>;

    fn forward(&mut self, x: Vec<f64>) -> f64 {
        let total = x.iter().sum();
        self.x = Some(x);
        total
    }

    fn backward(&self, dz: f64) -> Result<Vec<f64>> {
        let x = self.x.as_ref().ok_or(NnError::BackwardBeforeForward("SumNode"))?;
        Ok(vec![dz; x.len()])
    }
}
