//! Configuration for stacked recurrent layers.

use std::fmt;
use std::str::FromStr;

use burn::config::Config;
use burn::grad_clipping::GradientClippingConfig;
use burn::nn::Initializer;
use burn::tensor::backend::Backend;

use super::base::RnnBase;
use super::{Lstm, Recurrent, Rnn};
use crate::cells::{CellConfig, RecurrentCell};
use crate::error::RecurrentError;

/// Which cell a stack is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecurrentMode {
    #[serde(rename = "RNN")]
    Rnn,
    #[serde(rename = "LSTM")]
    Lstm,
}

impl RecurrentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrentMode::Rnn => "RNN",
            RecurrentMode::Lstm => "LSTM",
        }
    }
}

impl fmt::Display for RecurrentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrentMode {
    type Err = RecurrentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RNN" => Ok(RecurrentMode::Rnn),
            "LSTM" => Ok(RecurrentMode::Lstm),
            other => Err(RecurrentError::UnknownMode(other.to_string())),
        }
    }
}

/// Configuration of a stacked, optionally bidirectional recurrent layer.
///
/// The compute device is not part of the configuration; it is passed to
/// [`init`](Self::init) and every state the module allocates lives there.
#[derive(Config, Debug)]
pub struct RnnBaseConfig {
    /// Cell type
    pub mode: RecurrentMode,
    /// Number of input features
    pub input_size: usize,
    /// Hidden units per layer and direction
    pub hidden_size: usize,
    /// Number of stacked layers
    pub num_layers: usize,
    /// Recurrent projection width; carried for custom cells, unused by the built-in ones
    #[config(default = "None")]
    pub recurrent_size: Option<usize>,
    /// Whether cells carry a bias
    #[config(default = true)]
    pub bias: bool,
    /// Gradient clipping threshold
    #[config(default = "None")]
    pub grad_clip: Option<f64>,
    /// Run a reverse-time stack alongside the forward one
    #[config(default = false)]
    pub bidirectional: bool,
    /// `[batch, seq, features]` when true, `[seq, batch, features]` otherwise
    #[config(default = true)]
    pub batch_first: bool,
    /// Weight initializer for every cell; `None` keeps Burn's `Linear` default
    #[config(default = "None")]
    pub initializer: Option<Initializer>,
}

impl RnnBaseConfig {
    /// Plain RNN configuration
    pub fn rnn(input_size: usize, hidden_size: usize, num_layers: usize) -> Self {
        Self::new(RecurrentMode::Rnn, input_size, hidden_size, num_layers)
    }

    /// LSTM configuration
    pub fn lstm(input_size: usize, hidden_size: usize, num_layers: usize) -> Self {
        Self::new(RecurrentMode::Lstm, input_size, hidden_size, num_layers)
    }

    /// Number of directions, 1 or 2
    pub fn num_directions(&self) -> usize {
        if self.bidirectional {
            2
        } else {
            1
        }
    }

    /// Feature width of the produced output sequence
    pub fn output_size(&self) -> usize {
        self.hidden_size * self.num_directions()
    }

    /// Input width of the cells at `layer`
    ///
    /// Layer 0 reads the module input; deeper layers read the previous
    /// layer's output, which is twice as wide when bidirectional.
    pub fn layer_input_size(&self, layer: usize) -> usize {
        if layer == 0 {
            self.input_size
        } else {
            self.output_size()
        }
    }

    /// Cell configuration for `layer`
    pub fn cell_config(&self, layer: usize) -> CellConfig {
        CellConfig::new(self.layer_input_size(layer), self.hidden_size)
            .with_bias(self.bias)
            .with_grad_clip(self.grad_clip)
            .with_initializer(self.initializer.clone())
    }

    /// Gradient clipping to hand to the optimizer, if configured
    pub fn gradient_clipping(&self) -> Option<GradientClippingConfig> {
        self.grad_clip
            .map(|threshold| GradientClippingConfig::Value(threshold as f32))
    }

    /// Reject configurations no stack can be built from
    pub fn validate(&self) -> Result<(), RecurrentError> {
        if self.num_layers == 0 {
            return Err(RecurrentError::InvalidConfig(
                "num_layers must be at least 1".to_string(),
            ));
        }
        if self.input_size == 0 {
            return Err(RecurrentError::InvalidConfig(
                "input_size must be positive".to_string(),
            ));
        }
        if self.hidden_size == 0 {
            return Err(RecurrentError::InvalidConfig(
                "hidden_size must be positive".to_string(),
            ));
        }
        if let Some(clip) = self.grad_clip {
            if !(clip.is_finite() && clip > 0.0) {
                return Err(RecurrentError::InvalidConfig(format!(
                    "grad_clip must be a positive finite number, got {clip}"
                )));
            }
        }
        Ok(())
    }

    /// Build the stack selected by [`mode`](Self::mode)
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Recurrent<B>, RecurrentError> {
        match self.mode {
            RecurrentMode::Rnn => Rnn::new(self.clone(), device).map(Recurrent::Rnn),
            RecurrentMode::Lstm => Lstm::new(self.clone(), device).map(Recurrent::Lstm),
        }
    }

    /// Build a stack of `C` cells
    ///
    /// `mode` is recorded but does not select the cell type here; `C` does.
    pub fn init_with<B: Backend, C: RecurrentCell<B>>(
        &self,
        device: &B::Device,
    ) -> Result<RnnBase<B, C>, RecurrentError> {
        self.validate()?;
        Ok(RnnBase::build(self.clone(), device))
    }
}
