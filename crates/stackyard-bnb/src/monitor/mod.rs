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

//! Monitoring utilities for tree search
//!
//! Defines the `TreeSearchMonitor` trait plus lightweight implementations to
//! observe and stop the engines without touching their logic.
//!
//! Components
//! - `tree_search_monitor`: the monitoring interface and `SearchCommand`.
//! - `composite`: fan-out monitor; short-circuits on first non-`Continue`.
//! - `log`: periodic progress reporting through `tracing`.
//! - `no_op`: zero-overhead placeholder.
//! - `time_limit`: cooperative wall-clock limit.

pub mod composite;
pub mod log;
pub mod no_op;
pub mod time_limit;
pub mod tree_search_monitor;
