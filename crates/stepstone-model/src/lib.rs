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

//! # Stepstone Model
//!
//! **The Domain Model for the Balanced Transportation Problem.**
//!
//! This crate defines the data structures that describe a transportation instance:
//! factories (supply nodes) with a fixed production, warehouses (demand nodes) with a
//! fixed demand, and a dense cost/allocation matrix holding one cell per
//! (factory, warehouse) pair. It is the interchange layer between problem input
//! (text or TOML files) and the allocation engine in `stepstone_ls`.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly-typed wrappers (`SupplyIndex`, `DemandIndex`) so that a row index can never address a column.
//! * **`num`**: The `TransportNumeric` bound shared by every generic quantity and cost.
//! * **`node`**: Immutable `SupplyNode` / `DemandNode` records.
//! * **`matrix`**: The `TransportMatrix` (mutable allocations, fixed topology) and its `TransportMatrixBuilder`.
//! * **`plan`**: `ShipmentPlan`, an immutable snapshot of a matrix that renders as a text table.
//! * **`loading`**: `ProblemLoader`, reading the line-oriented problem grammar and a structured TOML format.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Supply and demand indices are distinct types.
//! 2.  **Memory Layout**: Cells live in a single row-major vector; node records are kept in parallel ordered vectors.
//! 3.  **Fail-Fast**: The builder validates dimensions, cost table size and balance before a matrix exists.

pub mod index;
pub mod loading;
pub mod matrix;
pub mod node;
pub mod num;
pub mod plan;
