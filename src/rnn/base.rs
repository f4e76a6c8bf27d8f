//! Stacked recurrent layer shared by every cell type.
//!
//! [`RnnBase`] owns one cell per (layer, direction) and unrolls them over the
//! time axis. Unidirectional stacks advance time in the outer loop and layers
//! in the inner loop; bidirectional stacks finish a whole layer in both
//! directions before the next layer reads its concatenated output.

use std::marker::PhantomData;

use burn::module::{Ignored, Module};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::config::{RecurrentMode, RnnBaseConfig};
use crate::cells::{CellState, RecurrentCell};

/// Final state of the last layer, per direction.
#[derive(Debug, Clone)]
pub struct FinalState<S> {
    /// Forward-direction state after the last timestep
    pub forward: S,
    /// Reverse-direction state after timestep 0; `None` for unidirectional stacks
    pub backward: Option<S>,
}

impl<S> FinalState<S> {
    /// The state computed last: the reverse direction's when present.
    pub fn last_computed(&self) -> &S {
        self.backward.as_ref().unwrap_or(&self.forward)
    }

    pub fn map<T>(self, mut f: impl FnMut(S) -> T) -> FinalState<T> {
        FinalState {
            forward: f(self.forward),
            backward: self.backward.map(f),
        }
    }
}

/// Multi-layer, optionally bidirectional recurrent layer over cells `C`.
///
/// A Burn [`Module`]: the cells' parameters are visited, recorded and moved
/// between devices with the rest of a model. Zero states are allocated on the
/// device of the input handed to [`RnnBase::forward`].
///
/// # Type Parameters
/// * `B` - The backend type
/// * `C` - The per-timestep cell
#[derive(Module, Debug)]
pub struct RnnBase<B: Backend, C> {
    /// Forward-direction cells, indexed by layer
    cells: Vec<C>,
    /// Reverse-direction cells, indexed by layer; empty unless bidirectional
    reverse_cells: Vec<C>,
    /// Settings the stack was built from
    #[module(skip)]
    config: Ignored<RnnBaseConfig>,
    _backend: PhantomData<B>,
}

impl<B: Backend, C: RecurrentCell<B>> RnnBase<B, C> {
    /// Build every cell. The configuration must already be validated.
    pub(crate) fn build(config: RnnBaseConfig, device: &B::Device) -> Self {
        let build_stack = || {
            (0..config.num_layers)
                .map(|layer| C::init(&config.cell_config(layer), device))
                .collect::<Vec<_>>()
        };

        let cells = build_stack();
        let reverse_cells = if config.bidirectional {
            build_stack()
        } else {
            Vec::new()
        };

        log::debug!(
            "built {} stack: {} layer(s) x {} direction(s), input {} -> hidden {}",
            config.mode,
            config.num_layers,
            config.num_directions(),
            config.input_size,
            config.hidden_size,
        );

        Self {
            cells,
            reverse_cells,
            config: Ignored(config),
            _backend: PhantomData,
        }
    }

    pub fn config(&self) -> &RnnBaseConfig {
        &self.config
    }

    pub fn mode(&self) -> RecurrentMode {
        self.config.mode
    }

    pub fn input_size(&self) -> usize {
        self.config.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.config.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.config.num_layers
    }

    pub fn is_bidirectional(&self) -> bool {
        self.config.bidirectional
    }

    /// Output feature width (doubled when bidirectional)
    pub fn output_size(&self) -> usize {
        self.config.output_size()
    }

    /// Forward-direction cells, one per layer
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    /// Reverse-direction cells, one per layer when bidirectional
    pub fn reverse_cells(&self) -> &[C] {
        &self.reverse_cells
    }

    /// One zero state per layer, `[batch_size, hidden_size]` on `device`
    pub fn initial_states(&self, batch_size: usize, device: &B::Device) -> Vec<C::State> {
        (0..self.config.num_layers)
            .map(|_| self.zero_state(batch_size, device))
            .collect()
    }

    fn zero_state(&self, batch_size: usize, device: &B::Device) -> C::State {
        <C::State as CellState<B>>::zeros(batch_size, self.config.hidden_size, device)
    }

    /// Forward pass over a whole sequence
    ///
    /// # Arguments
    /// * `input` - `[batch, seq, input_size]`, or `[seq, batch, input_size]`
    ///   when the stack is not batch-first
    ///
    /// # Returns
    /// Tuple of (output, final_state) where:
    /// - output: `[batch, seq, output_size]` in the same layout as `input`
    /// - final_state: the last layer's state for each direction
    ///
    /// States start at zero on `input`'s device every call.
    pub fn forward(&self, input: Tensor<B, 3>) -> (Tensor<B, 3>, FinalState<C::State>) {
        let input = if self.config.batch_first {
            input
        } else {
            input.swap_dims(0, 1)
        };
        let [batch_size, seq_len, _] = input.dims();

        log::trace!(
            "{} forward: batch {}, seq {}, bidirectional {}",
            self.config.mode,
            batch_size,
            seq_len,
            self.config.bidirectional,
        );

        let (output, final_state) = if seq_len == 0 {
            self.empty_sequence(batch_size, &input.device())
        } else if self.config.bidirectional {
            self.forward_bidirectional(input)
        } else {
            self.forward_unidirectional(input)
        };

        let output = if self.config.batch_first {
            output
        } else {
            output.swap_dims(0, 1)
        };
        (output, final_state)
    }

    /// Time outer, layers inner: layer `k` reads layer `k - 1` at the same timestep.
    fn forward_unidirectional(&self, input: Tensor<B, 3>) -> (Tensor<B, 3>, FinalState<C::State>) {
        let [batch_size, seq_len, _] = input.dims();
        let device = input.device();
        let mut states = self.initial_states(batch_size, &device);
        let mut outputs = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let mut x = timestep(&input, t);
            for (cell, state) in self.cells.iter().zip(states.iter_mut()) {
                let next = cell.step(x, state.clone());
                x = next.hidden();
                *state = next;
            }
            outputs.push(x);
        }

        let output = Tensor::stack::<3>(outputs, 1);
        let forward = self.last_layer(states, batch_size, &device);
        (output, FinalState {
            forward,
            backward: None,
        })
    }

    /// Layers outer, time inner: each layer completes both directions before
    /// the next layer reads the concatenation.
    fn forward_bidirectional(&self, input: Tensor<B, 3>) -> (Tensor<B, 3>, FinalState<C::State>) {
        let [batch_size, _, _] = input.dims();
        let device = input.device();
        let mut forward_states = self.initial_states(batch_size, &device);
        let mut backward_states = self.initial_states(batch_size, &device);
        let mut layer_input = input;

        let layers = self.cells.iter().zip(self.reverse_cells.iter());
        let states = forward_states.iter_mut().zip(backward_states.iter_mut());
        for ((cell, reverse_cell), (forward_state, backward_state)) in layers.zip(states) {
            let forward_outputs = unroll(cell, &layer_input, forward_state, false);
            let backward_outputs = unroll(reverse_cell, &layer_input, backward_state, true);

            layer_input = Tensor::cat(
                vec![
                    Tensor::stack::<3>(forward_outputs, 1),
                    Tensor::stack::<3>(backward_outputs, 1),
                ],
                2,
            );
        }

        let forward = self.last_layer(forward_states, batch_size, &device);
        let backward = self.last_layer(backward_states, batch_size, &device);
        (layer_input, FinalState {
            forward,
            backward: Some(backward),
        })
    }

    fn empty_sequence(
        &self,
        batch_size: usize,
        device: &B::Device,
    ) -> (Tensor<B, 3>, FinalState<C::State>) {
        let output = Tensor::zeros([batch_size, 0, self.output_size()], device);

        (output, FinalState {
            forward: self.zero_state(batch_size, device),
            backward: self
                .config
                .bidirectional
                .then(|| self.zero_state(batch_size, device)),
        })
    }

    fn last_layer(
        &self,
        mut states: Vec<C::State>,
        batch_size: usize,
        device: &B::Device,
    ) -> C::State {
        states
            .pop()
            .unwrap_or_else(|| self.zero_state(batch_size, device))
    }
}

/// `input[:, t, :]` as `[batch, features]`
fn timestep<B: Backend>(input: &Tensor<B, 3>, t: usize) -> Tensor<B, 2> {
    let [batch_size, _, features] = input.dims();
    input.clone().narrow(1, t, 1).reshape([batch_size, features])
}

/// Run one cell across every timestep of `input`, updating `state` in place.
///
/// Outputs are returned in time order even when iterating in reverse, so index
/// `t` always holds the output computed from input position `t`.
fn unroll<B: Backend, C: RecurrentCell<B>>(
    cell: &C,
    input: &Tensor<B, 3>,
    state: &mut C::State,
    reverse: bool,
) -> Vec<Tensor<B, 2>> {
    let [_, seq_len, _] = input.dims();
    let mut outputs = Vec::with_capacity(seq_len);

    for i in 0..seq_len {
        let t = if reverse { seq_len - 1 - i } else { i };
        let next = cell.step(timestep(input, t), state.clone());
        outputs.push(next.hidden());
        *state = next;
    }

    if reverse {
        outputs.reverse();
    }
    outputs
}
