use burn::module::Module;
use burn::nn::Linear;
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::{CellConfig, RecurrentCell};

/// Long short-term memory cell.
///
/// All four gates come out of one fused projection pair, chunked in this order:
/// - g = tanh(W_ig @ x + b_ig + W_hg @ h)  (candidate)
/// - i = sigmoid(W_ii @ x + b_ii + W_hi @ h)  (input gate)
/// - f = sigmoid(W_if @ x + b_if + W_hf @ h + 1)  (forget gate)
/// - o = sigmoid(W_io @ x + b_io + W_ho @ h)  (output gate)
/// - c' = f * c + i * g
/// - h' = o * tanh(c')
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    #[module(skip)]
    input_size: usize,
    #[module(skip)]
    hidden_size: usize,
    input_map: Linear<B>,     // input -> 4 * hidden_size
    recurrent_map: Linear<B>, // hidden -> 4 * hidden_size, never biased
}

impl<B: Backend> LstmCell<B> {
    /// Create a new LSTM cell with a biased input projection
    ///
    /// # Arguments
    /// * `input_size` - Size of the input features
    /// * `hidden_size` - Size of the hidden state
    /// * `device` - Device to create the module on
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self::from_config(&CellConfig::new(input_size, hidden_size), device)
    }

    /// Create a cell from a [`CellConfig`]
    pub fn from_config(config: &CellConfig, device: &B::Device) -> Self {
        let input_map = config
            .linear(config.input_size, 4 * config.hidden_size, config.bias)
            .init(device);
        let recurrent_map = config
            .linear(config.hidden_size, 4 * config.hidden_size, false)
            .init(device);

        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            input_map,
            recurrent_map,
        }
    }

    /// Get the input size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the hidden size
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Perform a forward pass through the LSTM cell
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape `[batch_size, input_size]`
    /// * `states` - Tuple of (hidden_state, cell_state), each of shape `[batch_size, hidden_size]`
    ///
    /// # Returns
    /// Tuple of (new_hidden_state, new_cell_state)
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        states: (Tensor<B, 2>, Tensor<B, 2>),
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let (hidden_state, cell_state) = states;

        let z = self.input_map.forward(input) + self.recurrent_map.forward(hidden_state);

        let chunks = z.chunk(4, 1);
        let candidate = chunks[0].clone().tanh();
        let input_gate = activation::sigmoid(chunks[1].clone());
        let forget_gate = activation::sigmoid(chunks[2].clone() + 1.0);
        let output_gate = activation::sigmoid(chunks[3].clone());

        let new_cell = cell_state * forget_gate + candidate * input_gate;
        let new_hidden = new_cell.clone().tanh() * output_gate;

        (new_hidden, new_cell)
    }
}

impl<B: Backend> RecurrentCell<B> for LstmCell<B> {
    type State = (Tensor<B, 2>, Tensor<B, 2>);

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
