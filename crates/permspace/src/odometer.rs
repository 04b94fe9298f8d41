//! Mixed-radix enumeration over independent parameter digits.
//!
//! Digits are stored in significance order: position 0 is the most
//! significant (slowest changing) parameter and the last position changes on
//! every step, exactly like the innermost of a set of nested loops.

use std::iter::FusedIterator;

/// Splits a linear index into one digit per position.
///
/// `index` must be below the product of `sizes`; higher bits are discarded.
pub fn decode(sizes: &[usize], index: u64) -> Vec<usize> {
    let mut digits = vec![0; sizes.len()];
    let mut rest = index;
    for position in (0..sizes.len()).rev() {
        let radix = sizes[position] as u64;
        digits[position] = (rest % radix) as usize;
        rest /= radix;
    }
    digits
}

/// Inverse of [`decode`]: folds digits back into a linear index.
pub fn encode(sizes: &[usize], digits: &[usize]) -> u64 {
    let mut index = 0u64;
    let mut weight = 1u64;
    for position in (0..sizes.len()).rev() {
        index += digits[position] as u64 * weight;
        weight *= sizes[position] as u64;
    }
    index
}

/// Lazy enumerator over the half-open index range `[start, end)`.
///
/// The starting digits are decoded once; each later step is a carry
/// increment rather than a fresh decode.
#[derive(Debug, Clone)]
pub struct Odometer {
    sizes: Vec<usize>,
    digits: Vec<usize>,
    next: u64,
    end: u64,
}

impl Odometer {
    pub fn new(sizes: Vec<usize>, start: u64, end: u64) -> Self {
        let start = start.min(end);
        let digits = if start < end {
            decode(&sizes, start)
        } else {
            vec![0; sizes.len()]
        };
        Self {
            sizes,
            digits,
            next: start,
            end,
        }
    }

    /// Linear index the next call to `next` will produce.
    pub fn position(&self) -> u64 {
        self.next
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    fn advance(&mut self) {
        for position in (0..self.digits.len()).rev() {
            self.digits[position] += 1;
            if self.digits[position] < self.sizes[position] {
                return;
            }
            self.digits[position] = 0;
        }
    }
}

impl Iterator for Odometer {
    type Item = (u64, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = (self.next, self.digits.clone());
        self.next += 1;
        if self.next < self.end {
            self.advance();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl FusedIterator for Odometer {}
