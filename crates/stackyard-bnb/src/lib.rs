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

//! Stackyard-BnB: exact search for the block relocation problem
//!
//! Finds a retrieval plan with the minimum number of relocations. All engines
//! start from a `BayState`, take their initial incumbent from a
//! `stackyard_heuristics::policy::HeuristicProvider`, and prune with one of
//! the bounds of `stackyard_model::bounds`.
//!
//! Core flow
//! - Load or generate an `Instance` and build its root `BayState`.
//! - Pick a heuristic, e.g. `PolicyName::build`.
//! - Configure a `config::SearchConfig` (bound, strategy, cap, time limit).
//! - Run one of the `engine::SearchEngine` implementations, optionally with a
//!   monitor.
//!
//! Engines
//! - `worklist::BranchAndBound`: explicit queue of cloned states, breadth- or
//!   depth-first.
//! - `dfbb::DepthFirstBnb`: recursion over one state with undo.
//! - `deepening::IterativeDeepeningBnb`: repeated depth-first descents with
//!   an increasing target, starting from the root's `lb3`.
//!
//! Guarantees
//! - Every engine returns a plan that replays on the instance.
//! - A run that is not stopped by a monitor proves its plan optimal (or
//!   proves that no plan beats the relocation cap).
//! - A stopped run still returns the best plan known, never an error.
//!
//! Module map
//! - `branching`: branch generation with lookahead and symmetry breaking.
//! - `config`: search parameters.
//! - `engine`: the `SearchEngine` trait and its driver.
//! - `incumbent`: best plan and upper bound.
//! - `monitor`: time limit, log, no-op and composite monitors.
//! - `result`: outcomes with termination reasons.
//! - `stats`: counters and timing.

pub mod branching;
pub mod config;
pub mod deepening;
pub mod dfbb;
pub mod engine;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod stats;
pub mod worklist;
