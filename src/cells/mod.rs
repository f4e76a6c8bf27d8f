//! # Recurrent Cell Implementations
//!
//! Single-timestep, single-layer, single-direction cells. The stacked layers in
//! [`crate::rnn`] own one cell per (layer, direction) and drive them through
//! the [`RecurrentCell`] trait; nothing in the unrolling code knows which cell
//! it is running.
//!
//! ## Cell Types
//!
//! | Cell | State | Update |
//! |------|-------|--------|
//! | [`RnnCell`] | `h` | `h' = tanh(W_x x + b + W_h h)` |
//! | [`LstmCell`] | `(h, c)` | four-gate LSTM |
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | `input` | `[batch, input_size]` |
//! | hidden / cell state | `[batch, hidden_size]` |
//!
//! ## Writing a Custom Cell
//!
//! A cell is a Burn [`Module`] so the stack can record and move its parameters.
//!
//! ```ignore
//! use rnnstack::cells::{CellConfig, RecurrentCell};
//!
//! #[derive(Module, Debug)]
//! pub struct MyCell<B: Backend> {
//!     weights: Linear<B>,
//!     #[module(skip)]
//!     input_size: usize,
//!     #[module(skip)]
//!     hidden_size: usize,
//! }
//!
//! impl<B: Backend> RecurrentCell<B> for MyCell<B> {
//!     type State = Tensor<B, 2>;
//!
//!     fn init(config: &CellConfig, device: &B::Device) -> Self { /* ... */ }
//!     fn input_size(&self) -> usize { self.input_size }
//!     fn hidden_size(&self) -> usize { self.hidden_size }
//!     fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> { /* ... */ }
//! }
//!
//! let stack = config.init_with::<Backend, MyCell<Backend>>(&device)?;
//! ```

pub mod lstm_cell;
pub mod rnn_cell;

pub use lstm_cell::LstmCell;
pub use rnn_cell::RnnCell;

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Initializer, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Settings every cell is built from.
#[derive(Config, Debug)]
pub struct CellConfig {
    /// Width of the input vector at each timestep
    pub input_size: usize,
    /// Width of the hidden state
    pub hidden_size: usize,
    /// Whether the input projection carries a bias
    #[config(default = true)]
    pub bias: bool,
    /// Gradient clipping threshold, applied by the optimizer
    #[config(default = "None")]
    pub grad_clip: Option<f64>,
    /// Weight initializer; `None` keeps Burn's `Linear` default
    #[config(default = "None")]
    pub initializer: Option<Initializer>,
}

impl CellConfig {
    /// Linear layer config mapping `d_input` to `d_output` with this cell's initializer.
    pub(crate) fn linear(&self, d_input: usize, d_output: usize, bias: bool) -> LinearConfig {
        let config = LinearConfig::new(d_input, d_output).with_bias(bias);
        match &self.initializer {
            Some(initializer) => config.with_initializer(initializer.clone()),
            None => config,
        }
    }
}

/// State carried by a cell from one timestep to the next.
pub trait CellState<B: Backend>: Clone {
    /// Zero state for a batch, placed on `device`.
    fn zeros(batch_size: usize, hidden_size: usize, device: &B::Device) -> Self;

    /// The component fed to the next layer and written to the output sequence.
    fn hidden(&self) -> Tensor<B, 2>;
}

impl<B: Backend> CellState<B> for Tensor<B, 2> {
    fn zeros(batch_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Tensor::zeros([batch_size, hidden_size], device)
    }

    fn hidden(&self) -> Tensor<B, 2> {
        self.clone()
    }
}

impl<B: Backend> CellState<B> for (Tensor<B, 2>, Tensor<B, 2>) {
    fn zeros(batch_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let zeros = Tensor::zeros([batch_size, hidden_size], device);
        (zeros.clone(), zeros)
    }

    fn hidden(&self) -> Tensor<B, 2> {
        self.0.clone()
    }
}

/// One-timestep recurrent transition.
///
/// Implementations must be pure per call: the returned state depends only on
/// the input, the previous state and the cell's parameters.
pub trait RecurrentCell<B: Backend>: Module<B> {
    /// State threaded through time.
    type State: CellState<B>;

    /// Build a cell with freshly initialized parameters.
    fn init(config: &CellConfig, device: &B::Device) -> Self;

    fn input_size(&self) -> usize;

    fn hidden_size(&self) -> usize;

    /// Advance one timestep.
    ///
    /// # Arguments
    /// * `input` - `[batch, input_size]`
    /// * `state` - previous state, each component `[batch, hidden_size]`
    fn step(&self, input: Tensor<B, 2>, state: Self::State) -> Self::State;
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_cell_config_defaults() {
        let config = CellConfig::new(4, 8);

        assert!(config.bias);
        assert_eq!(config.grad_clip, None);
        assert!(config.initializer.is_none());
    }

    #[test]
    fn test_zero_states() {
        let device = Default::default();

        let h = <Tensor<TestBackend, 2> as CellState<TestBackend>>::zeros(3, 5, &device);
        assert_eq!(h.dims(), [3, 5]);
        assert_eq!(h.sum().into_scalar(), 0.0);

        let (h, c) =
            <(Tensor<TestBackend, 2>, Tensor<TestBackend, 2>) as CellState<TestBackend>>::zeros(
                3, 5, &device,
            );
        assert_eq!(h.dims(), [3, 5]);
        assert_eq!(c.dims(), [3, 5]);
    }

    #[test]
    fn test_lstm_state_hidden_is_first_component() {
        let device = Default::default();
        let h = Tensor::<TestBackend, 2>::ones([2, 3], &device);
        let c = Tensor::<TestBackend, 2>::zeros([2, 3], &device);

        let hidden = CellState::<TestBackend>::hidden(&(h, c));
        assert_eq!(hidden.sum().into_scalar(), 6.0);
    }
}
