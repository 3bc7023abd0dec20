use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use getaround_pricing::config::Settings;
use getaround_pricing::dataset::{load_delays, load_listings};
use getaround_pricing::market::{self, MarketReport};
use getaround_pricing::server::{self, AppState};
use getaround_pricing::storage::{BlobStore, FsBlobStore};
use getaround_pricing::telemetry::init_tracing;
use getaround_pricing::tracking::JsonlMetricsSink;
use getaround_pricing::training::TrainingRun;
use getaround_pricing::{CarFeatures, Predictor};
use std::net::IpAddr;
use std::path::PathBuf;

/// pricing - train, serve and query the rental price model
#[derive(Parser, Debug)]
#[command(name = "pricing")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ./pricing.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the pipeline on a listings CSV and publish the artifact
    Train {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        epochs: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Serve predictions over HTTP from one pinned artifact
    Serve {
        /// Artifact key, e.g. models/getaround_pricing_<run_id>.bin
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        host: Option<IpAddr>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Price one listing from the command line
    Predict(PredictArgs),
    /// Print market tables for a listings CSV
    Analyze {
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Checkout delay CSV export
        #[arg(long)]
        delays: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List published artifacts
    List,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[arg(long)]
    key: Option<String>,
    #[arg(long)]
    model_key: String,
    #[arg(long)]
    mileage: i64,
    #[arg(long)]
    engine_power: i64,
    #[arg(long)]
    fuel: String,
    #[arg(long)]
    paint_color: String,
    #[arg(long)]
    car_type: String,
    #[arg(long)]
    private_parking_available: bool,
    #[arg(long)]
    has_gps: bool,
    #[arg(long)]
    has_air_conditioning: bool,
    #[arg(long)]
    automatic_car: bool,
    #[arg(long)]
    has_getaround_connect: bool,
    #[arg(long)]
    has_speed_regulator: bool,
    #[arg(long)]
    winter_tires: bool,
}

impl From<PredictArgs> for CarFeatures {
    fn from(args: PredictArgs) -> Self {
        CarFeatures {
            model_key: args.model_key,
            mileage: args.mileage,
            engine_power: args.engine_power,
            fuel: args.fuel,
            paint_color: args.paint_color,
            car_type: args.car_type,
            private_parking_available: args.private_parking_available,
            has_gps: args.has_gps,
            has_air_conditioning: args.has_air_conditioning,
            automatic_car: args.automatic_car,
            has_getaround_connect: args.has_getaround_connect,
            has_speed_regulator: args.has_speed_regulator,
            winter_tires: args.winter_tires,
        }
    }
}

fn pinned_key(settings: &Settings, flag: Option<String>) -> Result<String> {
    match flag.or_else(|| settings.model.key.clone()) {
        Some(key) => Ok(key),
        None => bail!("no model key: pass --key or set model.key / PRICING__MODEL__KEY"),
    }
}

fn load_predictor(settings: &Settings, key: &str) -> Result<Predictor> {
    let store = FsBlobStore::new(&settings.storage.root);
    Predictor::load(&store, &settings.storage.bucket, key)
        .with_context(|| format!("failed to load artifact {}/{}", settings.storage.bucket, key))
}

fn print_report(report: &MarketReport) {
    println!("Mean daily price by brand");
    for row in &report.by_model {
        println!("  {:<14} {:>8.2}  (n={})", row.model_key, row.mean_price, row.count);
    }

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
    println!("\nOption impact (with / without)");
    for row in &report.options {
        println!(
            "  {:<22} {:>8} / {:>8}",
            row.option,
            fmt(row.mean_with),
            fmt(row.mean_without)
        );
    }

    if let Some(bins) = &report.delay_histogram {
        println!("\nCheckout delay histogram (minutes)");
        for bin in bins.iter().filter(|b| b.count > 0) {
            println!("  [{:>4}, {:>4})  {}", bin.start, bin.end, bin.count);
        }
    }
    if let Some(rows) = &report.delay_by_checkin {
        println!("\nMean checkout delay by check-in type");
        for row in rows {
            println!("  {:<10} {:>8.1} min  (n={})", row.checkin_type, row.mean_delay, row.count);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    init_tracing(&settings.logging);

    match cli.command {
        Command::Train {
            dataset,
            epochs,
            learning_rate,
            seed,
        } => {
            if let Some(dataset) = dataset {
                settings.training.dataset = dataset;
            }
            if let Some(epochs) = epochs {
                settings.training.epochs = epochs;
            }
            if let Some(lr) = learning_rate {
                settings.training.learning_rate = lr;
            }
            if let Some(seed) = seed {
                settings.training.seed = seed;
            }

            let store = FsBlobStore::new(&settings.storage.root);
            let sink = JsonlMetricsSink::new(&settings.tracking.metrics_path);
            let report = TrainingRun::new(&store, &sink, settings.training_options())
                .run_csv(&settings.training.dataset)
                .with_context(|| {
                    format!("training on {} failed", settings.training.dataset.display())
                })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve { key, host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            let key = pinned_key(&settings, key)?;
            let predictor = load_predictor(&settings, &key)?;
            server::serve(settings.server.addr(), AppState::new(predictor)).await?;
        }
        Command::Predict(args) => {
            let key = pinned_key(&settings, args.key.clone())?;
            let predictor = load_predictor(&settings, &key)?;
            let prediction = predictor.predict_features(args.into())?;
            let band = prediction.band();
            println!(
                "Estimated daily price: {:.2} ({}: {})",
                prediction.rental_price,
                band,
                band.message()
            );
        }
        Command::Analyze {
            dataset,
            delays,
            json,
        } => {
            let dataset = dataset.unwrap_or(settings.training.dataset);
            let (frame, prices) = load_listings(&dataset)?;
            let delay_path = delays.or_else(|| {
                let default = settings.training.delays;
                default.exists().then_some(default)
            });
            let delays = delay_path.map(load_delays).transpose()?;
            let report = market::analyze(&frame, &prices, delays.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::List => {
            let store = FsBlobStore::new(&settings.storage.root);
            for key in store.list(&settings.storage.bucket, &settings.storage.prefix)? {
                println!("{}", key);
            }
        }
    }
    Ok(())
}
