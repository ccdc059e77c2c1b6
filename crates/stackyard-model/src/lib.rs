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

//! # Stackyard Model
//!
//! **The bay model for the Stackyard block relocation solver.**
//!
//! This crate defines the data structures used to represent the **Block
//! Relocation Problem (BRP)**: a bay of `W` stacks of capacity `H` holding the
//! items `1..=n`, which must be retrieved in increasing order. It is the shared
//! layer between instance input, the heuristic policies
//! (`stackyard_heuristics`) and the exact search (`stackyard_bnb`).
//!
//! ## Architecture
//!
//! * **`instance`**: The immutable `Instance` and the `HeightLimit` rules.
//! * **`loading`**: `InstanceLoader` for the plain-text benchmark format.
//! * **`state`**: The mutable `BayState` with its operation log and undo.
//! * **`bounds`**: Lower bounds `lb1`, `lb2`, `lb3` and their instrumentation.
//! * **`condense`**: Merging of redundant relocation pairs in a finished log.
//! * **`writer`**: Instance descriptions and move logs as text.
//! * **`generator`**: Seeded random instances for tests and benchmarks.
//! * **`err`**: The shared `BayError` and `ConfigurationError`.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: Instances are validated once on construction, and moves
//!     are checked before they touch the state.
//! 2.  **Reversible**: Every move is logged and can be undone exactly, which
//!     lets the depth-first search work on a single state.

pub mod bounds;
pub mod condense;
pub mod err;
pub mod generator;
pub mod instance;
pub mod loading;
pub mod state;
pub mod writer;
