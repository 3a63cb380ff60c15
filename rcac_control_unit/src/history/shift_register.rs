//! Fixed-capacity, most-recent-first shift register.
//!
//! Backed by a ring buffer: `push` moves the head one slot back and
//! overwrites the oldest element, so a shift costs O(1) instead of copying
//! the whole buffer. Index 0 is always the most recent value.
//!
//! Storage is reserved once in [`ShiftRegister::try_zeroed`] with a fallible
//! reservation. Nothing after construction allocates.

use core::ops::Index;

use rcac_common::adaptive::error::{RcacError, RcacResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRegister {
    data: Vec<f32>,
    /// Physical index of the most recent element.
    head: usize,
}

impl ShiftRegister {
    /// Allocate a zero-filled register of `len` elements.
    ///
    /// # Errors
    /// `RcacError::AllocationFailure` if the reservation fails.
    pub fn try_zeroed(buffer: &'static str, len: usize) -> RcacResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| RcacError::AllocationFailure {
                buffer,
                requested: len,
            })?;
        data.resize(len, 0.0);
        Ok(Self { data, head: 0 })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shift every element one position older and store `value` at index 0.
    /// The oldest element is discarded.
    #[inline]
    pub fn push(&mut self, value: f32) {
        let len = self.data.len();
        if len == 0 {
            return;
        }
        self.head = if self.head == 0 { len - 1 } else { self.head - 1 };
        self.data[self.head] = value;
    }

    /// Element `age` ticks old (0 = most recent).
    #[inline]
    pub fn get(&self, age: usize) -> Option<f32> {
        let len = self.data.len();
        if age >= len {
            return None;
        }
        Some(self.data[self.physical(age)])
    }

    /// Most recent element, or 0.0 for an empty register.
    #[inline]
    pub fn latest(&self) -> f32 {
        self.get(0).unwrap_or(0.0)
    }

    /// Iterate most-recent-first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.data.len()).map(move |age| self.data[self.physical(age)])
    }

    #[inline]
    fn physical(&self, age: usize) -> usize {
        let idx = self.head + age;
        if idx >= self.data.len() {
            idx - self.data.len()
        } else {
            idx
        }
    }
}

impl Index<usize> for ShiftRegister {
    type Output = f32;

    fn index(&self, age: usize) -> &f32 {
        assert!(
            age < self.data.len(),
            "shift register index {age} out of range (len {})",
            self.data.len()
        );
        &self.data[self.physical(age)]
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
