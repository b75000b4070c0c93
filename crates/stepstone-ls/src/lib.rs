// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Stepstone‑LS: construction and stepping‑stone improvement of shipment plans
//!
//! This crate holds the allocation engine for balanced transportation problems.
//! A plan is first built greedily by the minimum‑cost‑cell method and then
//! improved by the stepping‑stone local search: every empty cell is tested by
//! closing an alternating cycle through basic cells and shifting allocation
//! around the cycle whenever that lowers the total cost.
//!
//! Core flow
//! - Build a `stepstone_model::matrix::TransportMatrix<T>`.
//! - Run an `initial::InitialSolutionBuilder` (`MinimumCostCellBuilder`).
//! - Run `optimizer::SteppingStoneOptimizer` with a monitor stack.
//!
//! Guarantees
//! - Row and column sums are preserved by construction and by every pivot.
//! - Each improving pivot strictly lowers the total cost, so every run on a
//!   balanced integer instance terminates.
//!
//! Module map
//! - `initial`: initial‑solution builders.
//! - `cycle`: cycle steps, cycles and the depth‑first cycle search.
//! - `pivot`: cycle evaluation and the stepping‑stone pivot.
//! - `optimizer`: the sweep driver.
//! - `monitor`: optimizer monitors (log, limits, composite).
//! - `result`: outcomes with termination reasons.
//! - `stats`: lightweight counters/timing.

pub mod cycle;
pub mod initial;
pub mod monitor;
pub mod optimizer;
pub mod pivot;
pub mod result;
pub mod stats;
