use crate::error::Result;

/// A scalar operation in the computation graph.
///
/// `forward` caches its input as node state; `backward` applies the local
/// derivative to the incoming gradient `dz` using that cached input, never a
/// fresh one. Every `backward` must therefore be preceded by a matching
/// `forward` in the same pass. Nodes report a violation as
/// `NnError::BackwardBeforeForward` instead of differentiating stale state.
pub trait ComputationalNode {
    type Input;
    type Output;
    type Gradient;

    fn forward(&mut self, x: Self::Input) -> Self::Output;

    fn backward(&self, dz: f64) -> Result<Self::Gradient>;
}
