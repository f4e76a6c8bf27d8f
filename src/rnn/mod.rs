//! # Stacked Recurrent Layers
//!
//! Multi-layer, optionally bidirectional sequence layers built from the cells
//! in [`crate::cells`]. **These are the APIs most users should use.**
//!
//! ## Available Layers
//!
//! | Layer | Cell | Final state |
//! |-------|------|-------------|
//! | [`Rnn`] | [`RnnCell`] | `h` |
//! | [`Lstm`] | [`LstmCell`] | `(h, c)` |
//! | [`Recurrent`] | chosen by [`RecurrentMode`] at construction | [`RecurrentState`] |
//! | [`RnnBase<B, C>`] | any [`RecurrentCell`] | `C::State` |
//!
//! ## Quick Start
//!
//! ```ignore
//! use rnnstack::prelude::*;
//! use burn::tensor::Tensor;
//!
//! let config = RnnBaseConfig::lstm(16, 32, 2).with_bidirectional(true);
//! let lstm = Lstm::<Backend>::new(config, &device)?;
//!
//! // Process sequence: [batch=4, seq_len=10, features=16]
//! let input: Tensor<Backend, 3> = Tensor::zeros([4, 10, 16], &device);
//! let (output, state) = lstm.forward(input);
//!
//! // output: [4, 10, 64] - both directions, concatenated per timestep
//! // state.forward / state.backward: ([4, 32], [4, 32]) each
//! ```
//!
//! ## Tensor Shapes
//!
//! ### Input Tensor (3D)
//!
//! | Format | Shape | Default |
//! |--------|-------|---------|
//! | Batch-first | `[batch, seq_len, features]` | ✓ Yes |
//! | Sequence-first | `[seq_len, batch, features]` | No |
//!
//! Use `.with_batch_first(false)` on the config to switch to sequence-first.
//! The output uses the same layout as the input.
//!
//! ### Output Tensor
//!
//! | Setting | Feature width |
//! |---------|---------------|
//! | unidirectional | `hidden_size` |
//! | bidirectional | `2 * hidden_size` (forward half first) |
//!
//! ## Unrolling Order
//!
//! Unidirectional stacks walk time in the outer loop and layers in the inner
//! loop, so layer `k` at timestep `t` consumes layer `k - 1`'s hidden output at
//! the same `t`. Bidirectional stacks walk layers in the outer loop: layer `k`
//! runs forward over the whole sequence, then backward, and the two output
//! sequences are concatenated feature-wise before layer `k + 1` starts. The
//! backward half at position `t` is always the output computed from input
//! position `t`.
//!
//! State is zeroed at the start of every call, on the input's device; nothing
//! carries over between calls.
//!
//! ## Inside a Model
//!
//! Every layer here is a Burn `Module`, so it nests in a model like `Linear`
//! does and its parameters travel with the model's records and optimizer.
//!
//! ```ignore
//! #[derive(Module, Debug)]
//! pub struct Tagger<B: Backend> {
//!     encoder: Lstm<B>,
//!     head: Linear<B>,
//! }
//! ```
//!
//! ## Choosing the Cell at Runtime
//!
//! ```ignore
//! let mode: RecurrentMode = "LSTM".parse()?; // unknown names are rejected here
//! let layer = RnnBaseConfig::new(mode, 16, 32, 1).init::<Backend>(&device)?;
//!
//! let (output, state) = layer.forward(input);
//! match state.forward {
//!     RecurrentState::Hidden(h) => { /* RNN */ }
//!     RecurrentState::HiddenCell(h, c) => { /* LSTM */ }
//! }
//! ```

pub mod base;
pub mod config;

pub use base::{FinalState, RnnBase};
pub use config::{RecurrentMode, RnnBaseConfig};

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cells::{LstmCell, RnnCell};
use crate::error::RecurrentError;

/// Stacked plain RNN
pub type Rnn<B> = RnnBase<B, RnnCell<B>>;

/// Stacked LSTM
pub type Lstm<B> = RnnBase<B, LstmCell<B>>;

impl<B: Backend> RnnBase<B, RnnCell<B>> {
    /// Build a plain RNN stack; `config.mode` is overridden to [`RecurrentMode::Rnn`]
    pub fn new(config: RnnBaseConfig, device: &B::Device) -> Result<Self, RecurrentError> {
        RnnBaseConfig {
            mode: RecurrentMode::Rnn,
            ..config
        }
        .init_with(device)
    }
}

impl<B: Backend> RnnBase<B, LstmCell<B>> {
    /// Build an LSTM stack; `config.mode` is overridden to [`RecurrentMode::Lstm`]
    pub fn new(config: RnnBaseConfig, device: &B::Device) -> Result<Self, RecurrentError> {
        RnnBaseConfig {
            mode: RecurrentMode::Lstm,
            ..config
        }
        .init_with(device)
    }
}

/// Final state of a [`Recurrent`] layer, tagged by cell kind.
#[derive(Debug, Clone)]
pub enum RecurrentState<B: Backend> {
    Hidden(Tensor<B, 2>),
    HiddenCell(Tensor<B, 2>, Tensor<B, 2>),
}

impl<B: Backend> RecurrentState<B> {
    pub fn hidden(&self) -> &Tensor<B, 2> {
        match self {
            RecurrentState::Hidden(h) | RecurrentState::HiddenCell(h, _) => h,
        }
    }

    /// Cell memory, LSTM only
    pub fn cell(&self) -> Option<&Tensor<B, 2>> {
        match self {
            RecurrentState::Hidden(_) => None,
            RecurrentState::HiddenCell(_, c) => Some(c),
        }
    }
}

/// A stack whose cell type was picked from [`RnnBaseConfig::mode`].
#[derive(Module, Debug)]
pub enum Recurrent<B: Backend> {
    Rnn(Rnn<B>),
    Lstm(Lstm<B>),
}

impl<B: Backend> Recurrent<B> {
    pub fn mode(&self) -> RecurrentMode {
        match self {
            Recurrent::Rnn(_) => RecurrentMode::Rnn,
            Recurrent::Lstm(_) => RecurrentMode::Lstm,
        }
    }

    pub fn config(&self) -> &RnnBaseConfig {
        match self {
            Recurrent::Rnn(rnn) => rnn.config(),
            Recurrent::Lstm(lstm) => lstm.config(),
        }
    }

    pub fn output_size(&self) -> usize {
        self.config().output_size()
    }

    /// See [`RnnBase::forward`]
    pub fn forward(&self, input: Tensor<B, 3>) -> (Tensor<B, 3>, FinalState<RecurrentState<B>>) {
        match self {
            Recurrent::Rnn(rnn) => {
                let (output, state) = rnn.forward(input);
                (output, state.map(RecurrentState::Hidden))
            }
            Recurrent::Lstm(lstm) => {
                let (output, state) = lstm.forward(input);
                (output, state.map(|(h, c)| RecurrentState::HiddenCell(h, c)))
            }
        }
    }
}
