use rand::{rngs::StdRng, SeedableRng};
use strokenet::{ActivationFunction, Layer, Network, Sgd, TrainConfig};

fn main() -> strokenet::Result<()> {
    tracing_subscriber::fmt::init();

    let mut rng = StdRng::seed_from_u64(1337);
    let mut network = Network::new();
    network.add(Layer::new(2, 4, ActivationFunction::Tanh, &mut rng));
    network.add(Layer::new(4, 1, ActivationFunction::Sigmoid, &mut rng));

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let optimizer = Sgd::with_momentum(0.5, 0.9);
    let config = TrainConfig::new(2000).with_shuffle(true);
    let history = network.fit(&inputs, &expected_outputs, &optimizer, &config)?;

    for (epoch, loss) in history.iter().enumerate().step_by(250) {
        println!("Epoch {epoch}: loss = {loss:.6}");
    }

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
