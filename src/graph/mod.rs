pub mod node;
pub mod multiply;
pub mod sum;

pub use node::ComputationalNode;
pub use multiply::MultiplyNode;
pub use sum::SumNode;
