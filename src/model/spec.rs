use serde::{Deserialize, Serialize};

/// Architecture and optimizer settings handed verbatim to an external
/// sequence-model trainer. Nothing in this crate interprets these values
/// beyond serializing them; the trainer library owns their semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrainerSpec {
    #[serde(default = "default_recurrent_units")]
    pub recurrent_units: usize,
    #[serde(default = "default_dropout")]
    pub dropout: f64,
    #[serde(default = "default_dense_units")]
    pub dense_units: usize,
    #[serde(default = "default_loss")]
    pub loss: String,
    #[serde(default = "default_optimizer")]
    pub optimizer: String,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_recurrent_units() -> usize {
    14
}

fn default_dropout() -> f64 {
    0.2
}

fn default_dense_units() -> usize {
    1
}

fn default_loss() -> String {
    "mean_squared_error".to_string()
}

fn default_optimizer() -> String {
    "adam".to_string()
}

fn default_epochs() -> usize {
    100
}

fn default_batch_size() -> usize {
    32
}

impl Default for TrainerSpec {
    fn default() -> Self {
        Self {
            recurrent_units: default_recurrent_units(),
            dropout: default_dropout(),
            dense_units: default_dense_units(),
            loss: default_loss(),
            optimizer: default_optimizer(),
            epochs: default_epochs(),
            batch_size: default_batch_size(),
        }
    }
}
