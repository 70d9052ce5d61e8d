use crate::error::Result;
use crate::layers::dense::Layer;
use crate::optim::sgd::Sgd;
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// An ordered stack of layers.
///
/// Layer `i`'s neuron count must equal layer `i + 1`'s `n_inputs`. `add`
/// does not check this; a mismatch surfaces as `InputSizeMismatch` on the
/// first forward pass. `NetworkSpec::build` validates up front.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn new() -> Network {
        Network { layers: Vec::new() }
    }

    pub fn add(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Forward pass; every node caches its input for the following backward.
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Backpropagates `dz`, given in the output layer's `Layer::backward`
    /// shape, through the layers in reverse order. Each layer's result is
    /// the next (earlier) layer's `dz`. Returns the input-side gradients of
    /// the first layer, one vector per first-layer neuron.
    pub fn backward(&mut self, dz: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let mut next_dz = dz.to_vec();
        for layer in self.layers.iter_mut().rev() {
            next_dz = layer.backward(&next_dz)?;
        }
        Ok(next_dz)
    }

    pub fn update_weights(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        for layer in &mut self.layers {
            layer.update_weights(learning_rate, momentum)?;
        }
        Ok(())
    }

    /// Discards every neuron's accumulated gradients, e.g. after a pass
    /// that failed between `backward` and `update_weights`.
    pub fn clear_gradients(&mut self) {
        for layer in &mut self.layers {
            layer.clear_gradients();
        }
    }

    /// Inference. Only the transient per-node caches change.
    pub fn predict(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        self.forward(x)
    }

    /// Trains on `(inputs[i], targets[i])` pairs and returns the total loss
    /// of every epoch. See `train_loop`.
    pub fn fit(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        optimizer: &Sgd,
        config: &TrainConfig,
    ) -> Result<Vec<f64>> {
        train_loop(self, inputs, targets, optimizer, config)
    }

    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(|l| l.n_inputs)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(|l| l.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::error::NnError;
    use crate::layers::neuron::Neuron;
    use rand::{rngs::StdRng, SeedableRng};

    fn linear_neuron(weights: Vec<f64>) -> Neuron {
        Neuron::with_weights(weights, 0.0, ActivationFunction::Linear)
    }

    #[test]
    fn forward_threads_layers() {
        let mut net = Network::new();
        net.add(Layer::from_neurons(vec![linear_neuron(vec![2.0]), linear_neuron(vec![3.0])]).unwrap());
        net.add(Layer::from_neurons(vec![linear_neuron(vec![1.0, -1.0])]).unwrap());
        assert_eq!(net.forward(&[1.0]).unwrap(), vec![-1.0]);
    }

    #[test]
    fn backward_routes_gradients_through_every_path() {
        let mut net = Network::new();
        net.add(Layer::from_neurons(vec![linear_neuron(vec![2.0]), linear_neuron(vec![3.0])]).unwrap());
        net.add(Layer::from_neurons(vec![linear_neuron(vec![1.0, -1.0])]).unwrap());
        net.forward(&[1.0]).unwrap();

        // out = 1*(2x) - 1*(3x), so d out / d x = -1 split over two paths.
        let dx = net.backward(&[vec![1.0]]).unwrap();
        assert_eq!(dx, vec![vec![2.0], vec![-3.0]]);
        let total: f64 = dx.iter().map(|d| d[0]).sum();
        assert_eq!(total, -1.0);
    }

    #[test]
    fn widths_3_4_1_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut net = Network::new();
        net.add(Layer::new(3, 4, ActivationFunction::Tanh, &mut rng));
        net.add(Layer::new(4, 1, ActivationFunction::Sigmoid, &mut rng));

        let out = net.forward(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(out.len(), 1);

        let dx = net.backward(&[vec![0.5]]).unwrap();
        assert_eq!(dx.len(), 4);
        assert!(dx.iter().all(|g| g.len() == 3));
    }

    #[test]
    fn mismatched_layers_fail_on_forward() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new();
        net.add(Layer::new(2, 3, ActivationFunction::Relu, &mut rng));
        net.add(Layer::new(2, 1, ActivationFunction::Relu, &mut rng));
        assert!(matches!(
            net.forward(&[1.0, 1.0]),
            Err(NnError::InputSizeMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn update_without_backward_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut net = Network::new();
        net.add(Layer::new(2, 2, ActivationFunction::Tanh, &mut rng));
        net.forward(&[1.0, 0.0]).unwrap();
        assert!(matches!(net.update_weights(0.1, 0.0), Err(NnError::EmptyGradients)));
    }
}
