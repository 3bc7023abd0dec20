//! Layered settings: built-in defaults, then an optional TOML file, then
//! `PRICING__<SECTION>__<KEY>` environment variables. CLI flags are applied
//! on top by the binary.

use crate::error::Result;
use crate::pipeline::TrainerSettings;
use crate::training::TrainingOptions;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "pricing.toml";
pub const ENV_PREFIX: &str = "PRICING";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding one sub-directory per bucket.
    pub root: PathBuf,
    pub bucket: String,
    pub prefix: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub name: String,
    /// Artifact key pinned by the server.
    pub key: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub dataset: PathBuf,
    pub delays: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub l2: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingSettings {
    pub experiment: String,
    pub metrics_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub model: ModelSettings,
    pub server: ServerSettings,
    pub training: TrainingSettings,
    pub tracking: TrackingSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let training = TrainingOptions::default();
        let trainer = TrainerSettings::default();
        Self {
            storage: StorageSettings {
                root: PathBuf::from("store"),
                bucket: training.bucket,
                prefix: training.prefix,
            },
            model: ModelSettings {
                name: training.model_name,
                key: None,
            },
            server: ServerSettings {
                host: IpAddr::from([0, 0, 0, 0]),
                port: 4000,
            },
            training: TrainingSettings {
                dataset: PathBuf::from("data/get_around_pricing_project.csv"),
                delays: PathBuf::from("data/get_around_delay_analysis.csv"),
                test_size: training.test_size,
                seed: training.seed,
                learning_rate: trainer.learning_rate,
                epochs: trainer.max_epochs,
                batch_size: trainer.batch_size,
                l2: trainer.l2,
            },
            tracking: TrackingSettings {
                experiment: training.experiment,
                metrics_path: PathBuf::from("runs/metrics.jsonl"),
            },
            logging: LoggingSettings {
                format: LogFormat::Pretty,
                filter: "info".into(),
            },
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `pricing.toml` in the working directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn trainer(&self) -> TrainerSettings {
        TrainerSettings {
            learning_rate: self.training.learning_rate,
            max_epochs: self.training.epochs,
            batch_size: self.training.batch_size,
            l2: self.training.l2,
        }
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions {
            experiment: self.tracking.experiment.clone(),
            model_name: self.model.name.clone(),
            bucket: self.storage.bucket.clone(),
            prefix: self.storage.prefix.clone(),
            test_size: self.training.test_size,
            seed: self.training.seed,
            trainer: self.trainer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.training.test_size, 0.2);
        assert_eq!(settings.training.seed, 42);
        assert_eq!(settings.model.key, None);
        assert_eq!(settings.training_options().trainer, TrainerSettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\n\n[model]\nkey = \"models/getaround_pricing_abc.bin\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 8081);
        assert_eq!(
            settings.model.key.as_deref(),
            Some("models/getaround_pricing_abc.bin")
        );
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.storage.bucket, "artifacts");
    }

    #[test]
    fn test_environment_overrides() {
        // Prefix private to this test.
        std::env::set_var("PRICINGENVTEST__TRAINING__EPOCHS", "7");
        std::env::set_var("PRICINGENVTEST__SERVER__PORT", "9090");
        let settings = Settings::load_with_prefix(None, "PRICINGENVTEST");
        std::env::remove_var("PRICINGENVTEST__TRAINING__EPOCHS");
        std::env::remove_var("PRICINGENVTEST__SERVER__PORT");

        let settings = settings.unwrap();
        assert_eq!(settings.training.epochs, 7);
        assert_eq!(settings.server.port, 9090);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(matches!(
            Settings::load(Some(Path::new("/no/such/pricing.toml"))),
            Err(PricingError::Config(_))
        ));
    }
}
