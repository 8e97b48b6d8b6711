//! Result verification
//!
//! The verifier is the correctness oracle for the whole crate: it recomputes
//! the expected result sequentially from the untouched input and compares
//! element-wise. It runs after every timed run. A mismatch is reported in
//! full (every diverging index with both values) but is not a process
//! error; that keeps the verifier usable both as a regression check and as
//! a diagnostic.

use std::fmt;
use std::ops::AddAssign;

use num_traits::Num;

use crate::scan::{inclusive_scan, partial_sum};

/// One diverging position: the parallel value and the reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch<T> {
    pub index: usize,
    pub actual: T,
    pub expected: T,
}

/// Outcome of comparing a parallel result against the sequential reference.
#[derive(Debug, Clone)]
pub struct Report<T> {
    actual_len: usize,
    expected_len: usize,
    mismatches: Vec<Mismatch<T>>,
}

impl<T> Report<T> {
    pub fn passed(&self) -> bool {
        self.actual_len == self.expected_len && self.mismatches.is_empty()
    }

    /// Diverging positions, in index order. Empty when the run passed,
    /// unless the lengths themselves disagree.
    pub fn mismatches(&self) -> &[Mismatch<T>] {
        &self.mismatches
    }
}

impl<T: fmt::Display> fmt::Display for Report<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "PASSED.");
        }
        writeln!(f, "FAILED.")?;
        if self.actual_len != self.expected_len {
            writeln!(f, "length\t{}\t{}", self.actual_len, self.expected_len)?;
        }
        for m in &self.mismatches {
            writeln!(f, "{}\t{}\t{}", m.index, m.actual, m.expected)?;
        }
        Ok(())
    }
}

/// Compare a parallel inclusive prefix sum against the sequential scan of
/// the original input.
pub fn verify_scan<T>(input: &[T], actual: &[T]) -> Report<T>
where
    T: Copy + Num + AddAssign + PartialEq,
{
    let expected = inclusive_scan(input);
    let mismatches = expected
        .iter()
        .zip(actual)
        .enumerate()
        .filter(|(_, (e, a))| *e != *a)
        .map(|(index, (&expected, &actual))| Mismatch {
            index,
            actual,
            expected,
        })
        .collect();
    Report {
        actual_len: actual.len(),
        expected_len: expected.len(),
        mismatches,
    }
}

/// Compare a parallel global sum against the sequential sum of the input.
pub fn verify_reduce<T>(input: &[T], actual: T) -> Report<T>
where
    T: Copy + Num + AddAssign + PartialEq,
{
    let expected = partial_sum(input);
    let mismatches = if actual == expected {
        Vec::new()
    } else {
        vec![Mismatch {
            index: 0,
            actual,
            expected,
        }]
    };
    Report {
        actual_len: 1,
        expected_len: 1,
        mismatches,
    }
}
