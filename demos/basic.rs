//! Basic usage of stacked and bidirectional recurrent layers
//!
//! Run with `cargo run --example basic`.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use rnnstack::prelude::*;

type Backend = NdArray<f32>;

fn main() -> Result<(), RecurrentError> {
    println!("=== rnnstack Basic Example ===\n");

    let device = Default::default();
    let input = Tensor::<Backend, 3>::random([4, 10, 16], Distribution::Uniform(-1.0, 1.0), &device);

    // Example 1: two stacked RNN layers
    println!("Example 1: Stacked RNN");
    let rnn = Rnn::<Backend>::new(RnnBaseConfig::rnn(16, 32, 2), &device)?;
    let (output, state) = rnn.forward(input.clone());
    println!("  Input shape:  {:?}", input.dims());
    println!("  Output shape: {:?}", output.dims());
    println!("  State shape:  {:?}", state.forward.dims());
    println!();

    // Example 2: bidirectional LSTM
    println!("Example 2: Bidirectional LSTM");
    let config = RnnBaseConfig::lstm(16, 32, 2).with_bidirectional(true);
    let lstm = Lstm::<Backend>::new(config, &device)?;
    let (output, state) = lstm.forward(input.clone());
    let (h, c) = state.forward;
    println!("  Output shape: {:?} (both directions)", output.dims());
    println!("  Forward state:  h {:?}, c {:?}", h.dims(), c.dims());
    if let Some((h, c)) = state.backward {
        println!("  Backward state: h {:?}, c {:?}", h.dims(), c.dims());
    }
    println!();

    // Example 3: cell type picked from a string
    println!("Example 3: Mode selected at runtime");
    for name in ["RNN", "LSTM", "GRU"] {
        match name.parse::<RecurrentMode>() {
            Ok(mode) => {
                let layer = RnnBaseConfig::new(mode, 16, 8, 1).init::<Backend>(&device)?;
                let (output, _) = layer.forward(input.clone());
                println!("  {name}: output {:?}", output.dims());
            }
            Err(err) => println!("  {name}: {err}"),
        }
    }
    println!();

    println!("=== Examples completed successfully! ===");
    Ok(())
}
