//! Inclusive, strided index ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};

/// An inclusive `(first, last, stride)` index selector on one axis.
///
/// `last` is always the last selected index: constructing
/// `Range::with_stride(0, 10, 3)` stores `last = 9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct Range {
    first: usize,
    last: usize,
    stride: usize,
}

#[derive(Deserialize)]
struct RawRange {
    first: usize,
    last: usize,
    #[serde(default = "unit_stride")]
    stride: usize,
}

fn unit_stride() -> usize {
    1
}

impl TryFrom<RawRange> for Range {
    type Error = SubsetError;

    fn try_from(raw: RawRange) -> Result<Self> {
        Range::with_stride(raw.first, raw.last, raw.stride)
    }
}

#[allow(clippy::len_without_is_empty)]
impl Range {
    pub fn new(first: usize, last: usize) -> Result<Self> {
        Self::with_stride(first, last, 1)
    }

    pub fn with_stride(first: usize, last: usize, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(SubsetError::invalid_range(format!(
                "stride must be >= 1 in {}:{}",
                first, last
            )));
        }
        if first > last {
            return Err(SubsetError::invalid_range(format!(
                "first {} > last {}",
                first, last
            )));
        }
        let last = first + (last - first) / stride * stride;
        Ok(Self { first, last, stride })
    }

    /// A single index.
    pub fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
            stride: 1,
        }
    }

    /// The whole of an axis of size `n`.
    pub fn full(n: usize) -> Result<Self> {
        Self::full_with_stride(n, 1)
    }

    /// Every `stride`-th index of an axis of size `n`, starting at 0.
    ///
    /// Yields `ceil(n / stride)` indices, never past `n - 1`.
    pub fn full_with_stride(n: usize, stride: usize) -> Result<Self> {
        if n == 0 {
            return Err(SubsetError::invalid_range("axis has no elements"));
        }
        Self::with_stride(0, n - 1, stride)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of selected indices.
    pub fn len(&self) -> usize {
        (self.last - self.first) / self.stride + 1
    }

    /// Number of indices spanned from `first` to `last` inclusive.
    pub fn span(&self) -> usize {
        self.last - self.first + 1
    }

    /// The `i`-th selected index.
    pub fn element(&self, i: usize) -> Option<usize> {
        (i < self.len()).then(|| self.first + i * self.stride)
    }

    /// Position of `index` among the selected indices.
    pub fn index_of(&self, index: usize) -> Option<usize> {
        if index < self.first || index > self.last || (index - self.first) % self.stride != 0 {
            return None;
        }
        Some((index - self.first) / self.stride)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        (self.first..=self.last).step_by(self.stride)
    }

    /// True when this selects every index of an axis of size `n`.
    pub fn is_full(&self, n: usize) -> bool {
        self.first == 0 && self.last + 1 == n && self.stride == 1
    }

    /// Same span with a different stride.
    pub fn restride(&self, stride: usize) -> Result<Self> {
        Self::with_stride(self.first, self.last, stride)
    }

    /// Fail with `RangeOutOfBounds` unless this fits an axis of size `n`.
    pub fn check_within(&self, axis: &str, n: usize) -> Result<()> {
        if self.last >= n {
            return Err(SubsetError::out_of_bounds(axis, self, n));
        }
        Ok(())
    }

    /// Resolve `inner`, expressed in this range's index space, to indices of
    /// the axis this range selects from.
    ///
    /// `None` when `inner` reaches past this range.
    pub fn compose(&self, inner: &Range) -> Option<Range> {
        let first = self.element(inner.first)?;
        let last = self.element(inner.last)?;
        Some(Range {
            first,
            last,
            stride: self.stride * inner.stride,
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stride == 1 {
            write!(f, "{}:{}", self.first, self.last)
        } else {
            write!(f, "{}:{}:{}", self.first, self.last, self.stride)
        }
    }
}
