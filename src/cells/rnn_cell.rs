use burn::module::Module;
use burn::nn::Linear;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::{CellConfig, RecurrentCell};

/// Elman recurrent cell: `h' = tanh(W_x @ x + b + W_h @ h)`.
#[derive(Module, Debug)]
pub struct RnnCell<B: Backend> {
    #[module(skip)]
    input_size: usize,
    #[module(skip)]
    hidden_size: usize,
    input_map: Linear<B>,
    recurrent_map: Linear<B>,
}

impl<B: Backend> RnnCell<B> {
    /// Create a new RNN cell with a biased input projection
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self::from_config(&CellConfig::new(input_size, hidden_size), device)
    }

    /// Create a cell from a [`CellConfig`]
    pub fn from_config(config: &CellConfig, device: &B::Device) -> Self {
        let input_map = config
            .linear(config.input_size, config.hidden_size, config.bias)
            .init(device);
        let recurrent_map = config
            .linear(config.hidden_size, config.hidden_size, false)
            .init(device);

        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            input_map,
            recurrent_map,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Advance one timestep
    ///
    /// # Arguments
    /// * `input` - `[batch_size, input_size]`
    /// * `hidden_state` - `[batch_size, hidden_size]`
    ///
    /// # Returns
    /// The new hidden state, `[batch_size, hidden_size]`
    pub fn forward(&self, input: Tensor<B, 2>, hidden_state: Tensor<B, 2>) -> Tensor<B, 2> {
        (self.input_map.forward(input) + self.recurrent_map.forward(hidden_state)).tanh()
    }
}

impl<B: Backend> RecurrentCell<B> for RnnCell<B> {
    type State = Tensor<B, 2>;

    fn init(config: &CellConfig, device: &B::Device) -> Self {
        Self::from_config(config, device)
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn step(&self, input: Tensor<B, 2>, state: Self::State) -> Self::State {
        self.forward(input, state)
    }
}
