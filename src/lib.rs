//! # rnnstack - stacked recurrent layers for Burn
//!
//! Multi-layer, optionally bidirectional RNN and LSTM layers built from
//! per-timestep cells and unrolled over a sequence dimension. All tensor work
//! goes through Burn's [`Backend`](burn::tensor::backend::Backend), so the same
//! layers run on any backend Burn supports.
//!
//! ## Features
//!
//! - **Stacking**: any number of layers; layer `k` consumes layer `k - 1`'s
//!   hidden output at the same timestep
//! - **Bidirectional**: independent reverse-time stack, outputs concatenated
//!   per timestep
//! - **RNN / LSTM**: built-in cells, plus any custom [`RecurrentCell`](cells::RecurrentCell)
//! - **Runtime mode selection**: `"RNN"` / `"LSTM"` parsed once into
//!   [`RecurrentMode`](rnn::RecurrentMode)
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use rnnstack::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let config = RnnBaseConfig::rnn(4, 3, 2);
//! let rnn = Rnn::<Backend>::new(config, &device).unwrap();
//!
//! let input = Tensor::<Backend, 3>::zeros([2, 5, 4], &device);
//! let (output, state) = rnn.forward(input);
//!
//! assert_eq!(output.dims(), [2, 5, 3]);
//! assert_eq!(state.forward.dims(), [2, 3]);
//! ```

pub mod cells;
pub mod error;
pub mod rnn;

pub use error::RecurrentError;

pub mod prelude {
    pub use crate::cells::{CellConfig, CellState, LstmCell, RecurrentCell, RnnCell};
    pub use crate::error::RecurrentError;
    pub use crate::rnn::{
        FinalState, Lstm, Recurrent, RecurrentMode, RecurrentState, Rnn, RnnBase, RnnBaseConfig,
    };
}
