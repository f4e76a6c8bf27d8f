//! Test cells with hand-checkable arithmetic.

use std::marker::PhantomData;

use burn::backend::NdArray;
use burn::module::Module;
use burn::tensor::backend::Backend as BurnBackend;
use burn::tensor::{Tensor, TensorData};
use rnnstack::cells::{CellConfig, RecurrentCell};

pub type Backend = NdArray<f32>;

/// Accumulates its input: `h' = h + x[:, ..hidden_size]`.
#[derive(Module, Debug)]
pub struct SumCell<B: BurnBackend> {
    #[module(skip)]
    pub input_size: usize,
    #[module(skip)]
    pub hidden_size: usize,
    _backend: PhantomData<B>,
}

impl<B: BurnBackend> RecurrentCell<B> for SumCell<B> {
    type State = Tensor<B, 2>;

    fn init(config: &CellConfig, _device: &B::Device) -> Self {
        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            _backend: PhantomData,
        }
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn step(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> {
        state + input.narrow(1, 0, self.hidden_size)
    }
}

/// Forgets its state and repeats its input: `h' = x[:, ..hidden_size]`.
#[derive(Module, Debug)]
pub struct EchoCell<B: BurnBackend> {
    #[module(skip)]
    pub input_size: usize,
    #[module(skip)]
    pub hidden_size: usize,
    _backend: PhantomData<B>,
}

impl<B: BurnBackend> RecurrentCell<B> for EchoCell<B> {
    type State = Tensor<B, 2>;

    fn init(config: &CellConfig, _device: &B::Device) -> Self {
        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            _backend: PhantomData,
        }
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn step(&self, input: Tensor<B, 2>, _state: Tensor<B, 2>) -> Tensor<B, 2> {
        input.narrow(1, 0, self.hidden_size)
    }
}

/// LSTM-shaped cell: `h' = h + x[:, ..hidden_size]`, `c' = c + 1`.
///
/// The cell component counts how many steps a direction has taken.
#[derive(Module, Debug)]
pub struct CountingCell<B: BurnBackend> {
    #[module(skip)]
    pub input_size: usize,
    #[module(skip)]
    pub hidden_size: usize,
    _backend: PhantomData<B>,
}

impl<B: BurnBackend> RecurrentCell<B> for CountingCell<B> {
    type State = (Tensor<B, 2>, Tensor<B, 2>);

    fn init(config: &CellConfig, _device: &B::Device) -> Self {
        Self {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            _backend: PhantomData,
        }
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn step(&self, input: Tensor<B, 2>, state: Self::State) -> Self::State {
        let (h, c) = state;
        (h + input.narrow(1, 0, self.hidden_size), c + 1.0)
    }
}

/// `[batch, seq, 1]` input from per-batch rows of timestep values.
pub fn sequence(rows: &[&[f32]]) -> Tensor<Backend, 3> {
    let seq_len = rows[0].len();
    let values: Vec<f32> = rows.iter().flat_map(|row| row.iter().copied()).collect();
    Tensor::from_data(
        TensorData::new(values, [rows.len(), seq_len, 1]),
        &Default::default(),
    )
}

pub fn values<const D: usize>(tensor: Tensor<Backend, D>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap()
}
