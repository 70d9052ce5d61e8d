use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::dense::Layer;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size` — width of the vector fed into this layer (the previous
///                  layer's `size`, or the raw feature count for the first)
/// - `size`       — number of neurons in this layer
/// - `activation` — one of `sigmoid`, `relu`, `lin`, `tanh`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable network architecture plus the seed its weights are
/// initialized from.
///
/// Only the architecture is stored. Trained weights are never persisted;
/// rebuilding a spec with the same seed reproduces the same initial weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Ordered input → output.
    pub layers: Vec<LayerSpec>,
}

fn default_seed() -> u64 {
    1337
}

impl NetworkSpec {
    /// The stroke-risk classifier: two tanh hidden layers and a single
    /// sigmoid output unit.
    pub fn stroke_classifier(n_features: usize) -> NetworkSpec {
        NetworkSpec {
            name: "stroke-classifier".into(),
            seed: default_seed(),
            layers: vec![
                LayerSpec { input_size: n_features, size: n_features, activation: ActivationFunction::Tanh },
                LayerSpec { input_size: n_features, size: 10, activation: ActivationFunction::Tanh },
                LayerSpec { input_size: 10, size: 1, activation: ActivationFunction::Sigmoid },
            ],
        }
    }

    /// Checks that every layer's `input_size` matches the previous layer's `size`.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NnError::ShapeMismatch(format!("network spec '{}' has no layers", self.name)));
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size {
                return Err(NnError::ShapeMismatch(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i, pair[0].size, i + 1, pair[1].input_size
                )));
            }
        }
        Ok(())
    }

    /// Builds a freshly initialized network seeded from `self.seed`.
    pub fn build(&self) -> Result<Network> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.build_with(&mut rng)
    }

    pub fn build_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        let mut network = Network::new();
        for spec in &self.layers {
            network.add(Layer::new(spec.input_size, spec.size, spec.activation, &mut *rng));
        }
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_classifier_chains() {
        let spec = NetworkSpec::stroke_classifier(21);
        spec.validate().unwrap();
        let net = spec.build().unwrap();
        assert_eq!(net.input_size(), Some(21));
        assert_eq!(net.output_size(), Some(1));
    }

    #[test]
    fn validate_rejects_broken_chain() {
        let spec = NetworkSpec {
            name: "broken".into(),
            seed: 1,
            layers: vec![
                LayerSpec { input_size: 3, size: 4, activation: ActivationFunction::Relu },
                LayerSpec { input_size: 5, size: 1, activation: ActivationFunction::Linear },
            ],
        };
        assert!(matches!(spec.validate(), Err(NnError::ShapeMismatch(_))));
        assert!(spec.build().is_err());
    }

    #[test]
    fn same_seed_same_weights() {
        let spec = NetworkSpec::stroke_classifier(4);
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        for (la, lb) in a.layers.iter().zip(&b.layers) {
            for (na, nb) in la.neurons().iter().zip(lb.neurons()) {
                assert_eq!(na.weights(), nb.weights());
            }
        }
    }

    #[test]
    fn json_round_trip_with_default_seed() {
        let json = r#"{
            "name": "tiny",
            "layers": [
                { "input_size": 2, "size": 2, "activation": "tanh" },
                { "input_size": 2, "size": 1, "activation": "lin" }
            ]
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.seed, 1337);
        assert_eq!(spec.layers[1].activation, ActivationFunction::Linear);

        let unknown = json.replace("\"lin\"", "\"softmax\"");
        assert!(serde_json::from_str::<NetworkSpec>(&unknown).is_err());
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join("strokenet_spec_test.json");
        let path = path.to_str().unwrap();
        let spec = NetworkSpec::stroke_classifier(5);
        spec.save_json(path).unwrap();
        assert_eq!(NetworkSpec::load_json(path).unwrap(), spec);
        let _ = std::fs::remove_file(path);
    }
}
