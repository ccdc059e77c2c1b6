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

//! Plain-text output of instances and move logs.
//!
//! The instance description is a single line of the form
//! `instance BRPData(W=3, H=5, n=6, stacks=[[5, 1], [2, 6, 3], [4]])`.
//!
//! A move log has one line per operation, numbered from 0:
//!
//! ```raw
//! relocating 5 from 0 to 2	(0)
//! retrieving 1 from 0	(1)
//! ```
//!
//! Retrievals are numbered by their position in the retrieval sequence, which
//! equals the retrieved item. Relocated items are recovered by replaying the
//! log on the instance, so an invalid log is rejected before anything is
//! written.

use crate::{
    err::BayError,
    instance::Instance,
    state::{BayState, Operation},
};
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

/// The error type for writing instances and move logs.
#[derive(Debug)]
pub enum WriteError {
    /// An I/O error occurred while writing.
    Io(std::io::Error),
    /// The operation log does not replay on the instance.
    InvalidLog(BayError),
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidLog(e) => write!(f, "Invalid move log: {}", e),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidLog(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for WriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<BayError> for WriteError {
    fn from(e: BayError) -> Self {
        Self::InvalidLog(e)
    }
}

/// Formats the one-line description of `instance`.
pub fn format_instance(instance: &Instance) -> String {
    let stacks: Vec<String> = instance
        .stacks()
        .iter()
        .map(|stack| {
            let items: Vec<String> = stack.iter().map(usize::to_string).collect();
            format!("[{}]", items.join(", "))
        })
        .collect();

    format!(
        "instance BRPData(W={}, H={}, n={}, stacks=[{}])",
        instance.num_stacks(),
        instance.max_height(),
        instance.num_items(),
        stacks.join(", ")
    )
}

/// Writes the description of `instance` to `path`, replacing its content.
pub fn write_instance_to_file<P: AsRef<Path>>(instance: &Instance, path: P) -> Result<(), WriteError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", format_instance(instance))?;
    out.flush()?;
    Ok(())
}

/// Writes the move log of `operations` on `instance` to `out`.
pub fn write_move_log<W: Write>(
    mut out: W,
    instance: &Instance,
    operations: &[Operation],
) -> Result<(), WriteError> {
    let mut state = BayState::new(instance);
    let mut retrieved = 0;
    for (i, &op) in operations.iter().enumerate() {
        state.apply(op)?;
        if op.is_retrieval() {
            retrieved += 1;
            writeln!(out, "retrieving {} from {}\t({})", retrieved, op.from, i)?;
            continue;
        }

        let Some(item) = state.top(op.to) else {
            return Err(BayError::InternalInconsistency(format!(
                "stack {} is empty right after relocation {}",
                op.to, i
            ))
            .into());
        };
        writeln!(
            out,
            "relocating {} from {} to {}\t({})",
            item, op.from, op.to, i
        )?;
    }
    Ok(())
}

/// Appends the move log of `state` to `path`, creating the file if needed.
pub fn append_move_log_to_file<P: AsRef<Path>>(
    state: &BayState,
    instance: &Instance,
    path: P,
) -> Result<(), WriteError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    write_move_log(&mut out, instance, state.operations())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::with_max_height(vec![vec![2, 3], vec![1], vec![]], 3).unwrap()
    }

    #[test]
    fn test_format_instance() {
        assert_eq!(
            format_instance(&instance()),
            "instance BRPData(W=3, H=3, n=3, stacks=[[2, 3], [1], []])"
        );
    }

    #[test]
    fn test_move_log_recovers_items() {
        let inst = instance();
        let mut state = BayState::new(&inst);
        state.retrieve_all().unwrap();
        state.relocate(0, 2).unwrap();
        state.retrieve_all().unwrap();

        let mut buf = Vec::new();
        write_move_log(&mut buf, &inst, state.operations()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "retrieving 1 from 1\t(0)\n\
             relocating 3 from 0 to 2\t(1)\n\
             retrieving 2 from 0\t(2)\n\
             retrieving 3 from 2\t(3)\n"
        );
    }

    #[test]
    fn test_invalid_log_writes_nothing_after_failure() {
        let inst = instance();
        let mut buf = Vec::new();
        let res = write_move_log(&mut buf, &inst, &[Operation::retrieval(0)]);
        assert!(matches!(res, Err(WriteError::InvalidLog(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_relocation_from_empty_stack_stops_the_log() {
        let inst = instance();
        let mut buf = Vec::new();
        let ops = [
            Operation::relocation(0, 2),
            Operation::relocation(2, 0),
            Operation::relocation(2, 1),
        ];
        let res = write_move_log(&mut buf, &inst, &ops);
        assert!(matches!(
            res,
            Err(WriteError::InvalidLog(BayError::InvalidRelocation {
                from: 2,
                to: 1,
                ..
            }))
        ));
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "relocating 3 from 0 to 2\t(0)\nrelocating 3 from 2 to 0\t(1)\n"
        );
    }

    #[test]
    fn test_files_are_written_and_appended() {
        let inst = instance();
        let mut state = BayState::new(&inst);
        state.retrieve_all().unwrap();

        let path = std::env::temp_dir().join(format!(
            "stackyard-writer-{}.txt",
            std::process::id()
        ));
        write_instance_to_file(&inst, &path).unwrap();
        append_move_log_to_file(&state, &inst, &path).unwrap();
        append_move_log_to_file(&state, &inst, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("instance BRPData(W=3"));
        assert_eq!(lines[1], "retrieving 1 from 1\t(0)");
        assert_eq!(lines[2], lines[1]);
    }
}
