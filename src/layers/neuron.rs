use std::iter;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::trace;

use crate::activation::activation::{ActivationFunction, ActivationNode};
use crate::error::{NnError, Result};
use crate::graph::{ComputationalNode, MultiplyNode, SumNode};

const WEIGHT_STD: f64 = 0.1;
const BIAS_STD: f64 = 0.01;

/// Gradients produced by one `Neuron::backward` call.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronGradients {
    /// d loss / d weight, one per input followed by the bias weight.
    pub weights: Vec<f64>,
    /// d loss / d input, one per (non-bias) input. This is what flows to the
    /// previous layer.
    pub inputs: Vec<f64>,
}

/// An artificial neuron built from graph nodes:
/// `activation(sum(x_i * w_i) + 1.0 * b)`.
///
/// The bias is the last multiply node, fed a constant 1.0. Gradients from
/// every `backward` call are accumulated until `update_weights` consumes
/// them, so callers must update once per accumulated batch or the
/// accumulator keeps growing.
#[derive(Debug, Clone)]
pub struct Neuron {
    n_inputs: usize,
    multiply_nodes: Vec<MultiplyNode>,
    sum_node: SumNode,
    activation_node: ActivationNode,
    previous_deltas: Vec<f64>,
    gradients: Vec<Vec<f64>>,
}

impl Neuron {
    /// Input weights are drawn from N(0, 0.1), the bias weight from N(0, 0.01).
    pub fn new<R: Rng + ?Sized>(n_inputs: usize, activation: ActivationFunction, rng: &mut R) -> Neuron {
        let weights = (0..n_inputs)
            .map(|_| gauss(&mut *rng, WEIGHT_STD))
            .collect();
        let bias = gauss(rng, BIAS_STD);
        Neuron::with_weights(weights, bias, activation)
    }

    /// Builds a neuron with explicit weights; `n_inputs` is `weights.len()`.
    pub fn with_weights(weights: Vec<f64>, bias: f64, activation: ActivationFunction) -> Neuron {
        let n_inputs = weights.len();
        let multiply_nodes = weights.into_iter()
            .chain(iter::once(bias))
            .map(MultiplyNode::new)
            .collect();

        Neuron {
            n_inputs,
            multiply_nodes,
            sum_node: SumNode::new(),
            activation_node: ActivationNode::new(activation),
            previous_deltas: vec![0.0; n_inputs + 1],
            gradients: Vec::new(),
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation_node.kind
    }

    /// Current weights, bias last.
    pub fn weights(&self) -> Vec<f64> {
        self.multiply_nodes.iter().map(|m| m.weight()).collect()
    }

    pub fn bias(&self) -> f64 {
        self.multiply_nodes[self.n_inputs].weight()
    }

    /// Number of backward calls accumulated since the last update.
    pub fn pending_gradients(&self) -> usize {
        self.gradients.len()
    }

    pub fn forward(&mut self, inputs: &[f64]) -> Result<f64> {
        if inputs.len() != self.n_inputs {
            return Err(NnError::InputSizeMismatch { expected: self.n_inputs, got: inputs.len() });
        }

        let products = inputs.iter()
            .copied()
            .chain(iter::once(1.0))
            .zip(self.multiply_nodes.iter_mut())
            .map(|(x, node)| {
                let w = node.weight();
                node.forward([x, w])
            })
            .collect();

        let summed = self.sum_node.forward(products);
        Ok(self.activation_node.forward(summed))
    }

    /// `external` holds one or more gradients arriving at this neuron's
    /// output along different paths; they are summed into one incoming
    /// gradient before differentiating.
    pub fn backward(&mut self, external: &[f64]) -> Result<NeuronGradients> {
        if external.is_empty() {
            return Err(NnError::ShapeMismatch("neuron received no external gradient".into()));
        }
        let d: f64 = external.iter().sum();

        let act = self.activation_node.backward(d)?;
        let per_product = self.sum_node.backward(act)?;

        let mut weights = Vec::with_capacity(self.multiply_nodes.len());
        let mut inputs = Vec::with_capacity(self.n_inputs);
        for (i, (node, g)) in self.multiply_nodes.iter().zip(per_product).enumerate() {
            let [dx, dw] = node.backward(g)?;
            weights.push(dw);
            if i < self.n_inputs {
                inputs.push(dx);
            }
        }

        self.gradients.push(weights.clone());
        Ok(NeuronGradients { weights, inputs })
    }

    /// Drops accumulated gradients without touching the weights.
    pub fn clear_gradients(&mut self) {
        self.gradients.clear();
    }

    /// Momentum SGD step with the mean of the accumulated gradients:
    /// `delta = lr * mean_grad + momentum * previous_delta`, `w -= delta`.
    pub fn update_weights(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        if self.gradients.is_empty() {
            return Err(NnError::EmptyGradients);
        }
        let n = self.gradients.len() as f64;

        for (i, node) in self.multiply_nodes.iter_mut().enumerate() {
            let mean_grad = self.gradients.iter().map(|g| g[i]).sum::<f64>() / n;
            let delta = learning_rate * mean_grad + momentum * self.previous_deltas[i];
            node.set_weight(node.weight() - delta);
            self.previous_deltas[i] = delta;
        }

        trace!(samples = self.gradients.len(), "neuron weights updated");
        self.gradients.clear();
        Ok(())
    }
}

/// Sample from N(0, std).
fn gauss<R: Rng + ?Sized>(rng: &mut R, std: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    z * std
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn new_has_bias_weight_and_zero_deltas() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = Neuron::new(4, ActivationFunction::Tanh, &mut rng);
        assert_eq!(n.n_inputs(), 4);
        assert_eq!(n.weights().len(), 5);
        assert_eq!(n.previous_deltas, vec![0.0; 5]);
        assert!(n.weights().iter().all(|w| w.abs() < 1.0));
    }

    #[test]
    fn forward_adds_bias_internally() {
        let mut n = Neuron::with_weights(vec![2.0, -1.0], 0.5, ActivationFunction::Linear);
        assert_eq!(n.forward(&[3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn forward_rejects_wrong_width() {
        let mut n = Neuron::with_weights(vec![1.0, 1.0], 0.0, ActivationFunction::Linear);
        assert!(matches!(
            n.forward(&[1.0]),
            Err(NnError::InputSizeMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn backward_returns_weight_and_input_gradients() {
        let mut n = Neuron::with_weights(vec![2.0, -1.0], 0.5, ActivationFunction::Linear);
        n.forward(&[3.0, 4.0]).unwrap();
        let g = n.backward(&[1.5]).unwrap();
        assert_eq!(g.weights, vec![4.5, 6.0, 1.5]);
        assert_eq!(g.inputs, vec![3.0, -1.5]);
        assert_eq!(n.pending_gradients(), 1);
    }

    #[test]
    fn backward_sums_multiple_paths() {
        let mut n = Neuron::with_weights(vec![1.0], 0.0, ActivationFunction::Linear);
        n.forward(&[2.0]).unwrap();
        let g = n.backward(&[0.25, 0.75, 1.0]).unwrap();
        assert_eq!(g.weights, vec![4.0, 2.0]);
    }

    #[test]
    fn backward_through_sigmoid() {
        let mut n = Neuron::with_weights(vec![0.0], 0.0, ActivationFunction::Sigmoid);
        assert_eq!(n.forward(&[3.0]).unwrap(), 0.5);
        let g = n.backward(&[1.0]).unwrap();
        assert_relative_eq!(g.weights[0], 0.75);
        assert_relative_eq!(g.weights[1], 0.25);
    }

    #[test]
    fn update_weights_averages_accumulated_gradients() {
        let mut n = Neuron::with_weights(vec![1.0], 0.0, ActivationFunction::Linear);
        n.forward(&[1.0]).unwrap();
        n.backward(&[1.0]).unwrap(); // dw = [1, 1]
        n.forward(&[3.0]).unwrap();
        n.backward(&[1.0]).unwrap(); // dw = [3, 1]

        n.update_weights(0.5, 0.0).unwrap();
        assert_relative_eq!(n.weights()[0], 1.0 - 0.5 * 2.0);
        assert_relative_eq!(n.bias(), -0.5);
        assert_eq!(n.pending_gradients(), 0);
    }

    #[test]
    fn update_weights_applies_momentum() {
        let mut n = Neuron::with_weights(vec![1.0], 0.0, ActivationFunction::Linear);
        n.forward(&[1.0]).unwrap();
        n.backward(&[1.0]).unwrap();
        n.update_weights(0.1, 0.9).unwrap();
        // delta_1 = 0.1
        assert_relative_eq!(n.weights()[0], 0.9);

        n.forward(&[1.0]).unwrap();
        n.backward(&[1.0]).unwrap();
        n.update_weights(0.1, 0.9).unwrap();
        // delta_2 = 0.1 + 0.9 * 0.1
        assert_relative_eq!(n.weights()[0], 0.9 - 0.19);
        assert_relative_eq!(n.previous_deltas[0], 0.19);
    }

    #[test]
    fn clear_gradients_keeps_weights() {
        let mut n = Neuron::with_weights(vec![1.0], 0.5, ActivationFunction::Linear);
        n.forward(&[2.0]).unwrap();
        n.backward(&[1.0]).unwrap();
        n.clear_gradients();
        assert_eq!(n.pending_gradients(), 0);
        assert_eq!(n.weights(), vec![1.0, 0.5]);
        assert!(matches!(n.update_weights(0.1, 0.0), Err(NnError::EmptyGradients)));
    }

    #[test]
    fn update_without_gradients_fails() {
        let mut n = Neuron::with_weights(vec![1.0], 0.0, ActivationFunction::Linear);
        assert!(matches!(n.update_weights(0.1, 0.0), Err(NnError::EmptyGradients)));
    }

    #[test]
    fn backward_before_forward_fails() {
        let mut n = Neuron::with_weights(vec![1.0], 0.0, ActivationFunction::Relu);
        assert!(matches!(n.backward(&[1.0]), Err(NnError::BackwardBeforeForward(_))));
    }
}
