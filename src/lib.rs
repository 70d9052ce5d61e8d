pub mod error;
pub mod graph;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod eval;

// Convenience re-exports
pub use error::{NnError, Result};
pub use graph::{ComputationalNode, MultiplyNode, SumNode};
pub use activation::activation::{ActivationFunction, ActivationNode};
pub use layers::{Layer, Neuron, NeuronGradients};
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::squared_error::SquaredErrorLoss;
pub use optim::sgd::Sgd;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use eval::ConfusionMatrix;
