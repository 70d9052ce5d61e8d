use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use strokenet::data::{encode, read_table, stratified_split, EncodeOptions, MinMaxScaler};
use strokenet::{ConfusionMatrix, NetworkSpec, NnError, Result, Sgd, TrainConfig};

/// Trains the stroke-risk classifier on a CSV file and reports test metrics.
#[derive(Parser, Debug)]
#[command(name = "strokenet", version, about)]
struct Cli {
    /// CSV file with a header row.
    #[arg(long)]
    data: String,

    /// Column holding the 0/1 label.
    #[arg(long, default_value = "stroke")]
    target: String,

    /// Columns to one-hot encode.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "gender,ever_married,work_type,Residence_type,smoking_status"
    )]
    categorical: Vec<String>,

    /// Columns to drop.
    #[arg(long, value_delimiter = ',', default_value = "id")]
    ignore: Vec<String>,

    /// Network architecture JSON; defaults to the built-in stroke classifier.
    #[arg(long)]
    spec: Option<String>,

    #[arg(long, default_value_t = 10)]
    epochs: usize,

    #[arg(long, default_value_t = 0.01)]
    learning_rate: f64,

    #[arg(long, default_value_t = 0.9)]
    momentum: f64,

    #[arg(long, default_value_t = 1)]
    batch_size: usize,

    /// Seeds the train/test split and the built-in network's weights.
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Share of each class used for training.
    #[arg(long, default_value_t = 0.35)]
    train_fraction: f64,

    /// Decision threshold on the sigmoid output.
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,

    #[arg(long)]
    shuffle: bool,

    /// Log every epoch's loss.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let table = read_table(&cli.data)?;
    let dataset = encode(&table, &EncodeOptions {
        target: cli.target.clone(),
        categorical: cli.categorical.clone(),
        ignore: cli.ignore.clone(),
    })?;
    info!(rows = dataset.len(), features = dataset.n_features(), "loaded {}", cli.data);

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let split = stratified_split(&dataset.inputs, &dataset.targets, cli.train_fraction, &mut rng)?;
    let scaler = MinMaxScaler::fit(&split.train_inputs)?;
    let train_inputs = scaler.transform(&split.train_inputs)?;
    let test_inputs = scaler.transform(&split.test_inputs)?;
    info!(train = train_inputs.len(), test = test_inputs.len(), "split dataset");

    let spec = match &cli.spec {
        Some(path) => NetworkSpec::load_json(path)?,
        None => NetworkSpec { seed: cli.seed, ..NetworkSpec::stroke_classifier(dataset.n_features()) },
    };
    let mut network = spec.build()?;
    if network.input_size() != Some(dataset.n_features()) {
        return Err(NnError::ShapeMismatch(format!(
            "network '{}' expects {:?} inputs but the dataset has {} features",
            spec.name,
            network.input_size(),
            dataset.n_features()
        )));
    }

    let optimizer = Sgd::with_momentum(cli.learning_rate, cli.momentum);
    let config = TrainConfig::new(cli.epochs)
        .with_batch_size(cli.batch_size)
        .with_shuffle(cli.shuffle)
        .with_verbose(cli.verbose);
    let history = network.fit(&train_inputs, &split.train_targets, &optimizer, &config)?;
    if let Some(loss) = history.last() {
        println!("Loss: {}", loss);
    }

    let matrix = ConfusionMatrix::evaluate(&mut network, &test_inputs, &split.test_targets, cli.threshold)?;
    println!("{}", matrix);
    Ok(())
}
