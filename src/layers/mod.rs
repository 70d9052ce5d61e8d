pub mod neuron;
pub mod dense;

pub use neuron::{Neuron, NeuronGradients};
pub use dense::Layer;
