pub mod confusion;

pub use confusion::ConfusionMatrix;
