use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::neuron::Neuron;

/// A fully connected layer: every neuron sees the same input vector.
#[derive(Debug, Clone)]
pub struct Layer {
    pub n_inputs: usize,
    pub activation: ActivationFunction,
    neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        n_inputs: usize,
        n_neurons: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let neurons = (0..n_neurons)
            .map(|_| Neuron::new(n_inputs, activation, &mut *rng))
            .collect();

        Layer { n_inputs, activation, neurons }
    }

    /// Same as `new` but takes the activation by its configuration name
    /// (`sigmoid`, `relu`, `lin`, `tanh`).
    pub fn from_name<R: Rng + ?Sized>(
        n_inputs: usize,
        n_neurons: usize,
        activation: &str,
        rng: &mut R,
    ) -> Result<Layer> {
        Ok(Layer::new(n_inputs, n_neurons, activation.parse()?, rng))
    }

    /// Assembles a layer from pre-built neurons, which must agree on input
    /// width and activation.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<Layer> {
        let first = neurons.first()
            .ok_or_else(|| NnError::ShapeMismatch("a layer needs at least one neuron".into()))?;
        let (n_inputs, activation) = (first.n_inputs(), first.activation());

        if let Some(odd) = neurons.iter()
            .position(|n| n.n_inputs() != n_inputs || n.activation() != activation)
        {
            return Err(NnError::ShapeMismatch(format!(
                "neuron {} does not match the layer's {} inputs / {} activation",
                odd, n_inputs, activation
            )));
        }

        Ok(Layer { n_inputs, activation, neurons })
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.neurons.iter_mut()
            .map(|neuron| neuron.forward(input))
            .collect()
    }

    /// `dz` holds one entry per gradient source, each a vector with one
    /// gradient per neuron of this layer. Neuron `i` receives `entry[i]`
    /// from every entry and sums them.
    ///
    /// Fed the output of the next layer's `backward` (one entry per neuron
    /// of that layer, each holding its d loss / d input), this sums every
    /// path into each of our outputs. The training loop passes a single
    /// entry for the output layer. Several entries from independent samples
    /// would also sum, but that batching shape is not exercised by `fit`,
    /// which accumulates across samples through repeated calls instead.
    ///
    /// Returns, per neuron, d loss / d input for the layer's inputs (the
    /// bias gradient never flows backward).
    pub fn backward(&mut self, dz: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let size = self.size();
        if let Some(bad) = dz.iter().find(|entry| entry.len() != size) {
            return Err(NnError::ShapeMismatch(format!(
                "layer has {} neurons but received {} gradients",
                size,
                bad.len()
            )));
        }

        self.neurons.iter_mut()
            .enumerate()
            .map(|(i, neuron)| {
                let neuron_dz: Vec<f64> = dz.iter().map(|entry| entry[i]).collect();
                neuron.backward(&neuron_dz).map(|g| g.inputs)
            })
            .collect()
    }

    pub fn update_weights(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        for neuron in &mut self.neurons {
            neuron.update_weights(learning_rate, momentum)?;
        }
        Ok(())
    }

    pub fn clear_gradients(&mut self) {
        for neuron in &mut self.neurons {
            neuron.clear_gradients();
        }
    }
}
