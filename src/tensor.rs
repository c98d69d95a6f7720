// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Dense row-major tensors with an explicit shape.
//
// The kernel's inputs are frame-major 2D arrays ([nframes, width]) plus the 1D atom-count
// array. Keeping the shape next to the flat data lets the dimension resolver reject inputs of
// the wrong rank instead of guessing.

use crate::error::ProdForceError;
use smallvec::SmallVec;

/// Shape of a tensor; almost always rank 1 or 2, so it stays inline.
pub type Shape = SmallVec<[usize; 2]>;

/// A dense, row-major tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T> Tensor<T> {
    /// Wraps flat row-major `data` with the given shape.
    ///
    /// Fails if the number of elements implied by `shape` differs from `data.len()`.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self, ProdForceError> {
        let expected = shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
        if expected != Some(data.len()) {
            let needed = match expected {
                Some(n) => n.to_string(),
                None => "more than usize::MAX".to_string(),
            };
            return Err(ProdForceError::invalid(format!(
                "tensor of shape {:?} needs {} elements, got {}",
                shape,
                needed,
                data.len()
            )));
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            data,
        })
    }

    /// A rank-1 tensor holding `data`.
    pub fn vector(data: Vec<T>) -> Self {
        Self {
            shape: smallvec::smallvec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Extent of dimension `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= self.rank()`.
    pub fn dim_size(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row `index` of a rank-2 tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is not rank 2 or `index` is out of bounds.
    pub fn row(&self, index: usize) -> &[T] {
        assert_eq!(self.rank(), 2, "row() needs a rank-2 tensor");
        let width = self.shape[1];
        &self.data[index * width..(index + 1) * width]
    }
}
