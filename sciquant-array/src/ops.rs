use super::{ArrayError, DType, NdArray, Samples};
use crate::array::element_count;

impl NdArray {
    /// Fails with `ShapeMismatch` unless both arrays have identical shapes
    pub fn check_same_shape(&self, other: &Self) -> Result<(), ArrayError> {
        if self.shape() != other.shape() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape().to_vec(),
                found: other.shape().to_vec(),
            });
        }
        Ok(())
    }

    /// Same samples under a new shape with the same element count
    pub fn reshape(self, shape: &[usize]) -> Result<Self, ArrayError> {
        if element_count(shape) != self.len() {
            return Err(ArrayError::ShapeMismatch {
                expected: shape.to_vec(),
                found: self.shape().to_vec(),
            });
        }
        Ok(NdArray {
            shape: shape.to_vec(),
            samples: self.samples,
        })
    }

    /// 1-D view of the samples
    pub fn flatten(self) -> Self {
        NdArray {
            shape: vec![self.len()],
            samples: self.samples,
        }
    }

    /// Convert to another dtype. Narrowing saturates at the target maximum.
    pub fn astype(&self, dtype: DType) -> Self {
        if self.dtype() == dtype {
            return self.clone();
        }
        let samples = match dtype {
            DType::U16 => Samples::U16(self.iter_u16().collect()),
            DType::U8 => Samples::U8(self.iter_u16().map(|v| v.min(u8::MAX as u16) as u8).collect()),
        };
        NdArray {
            shape: self.shape.clone(),
            samples,
        }
    }

    /// Smallest sample, `None` for an empty array
    pub fn min_value(&self) -> Option<u16> {
        self.iter_u16().min()
    }

    /// Largest sample, `None` for an empty array
    pub fn max_value(&self) -> Option<u16> {
        self.iter_u16().max()
    }

    /// Arithmetic mean of all samples
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = self.iter_u16().map(f64::from).sum();
        Some(sum / self.len() as f64)
    }

    /// Extract the (N-1)-d slab at `index` along `axis`.
    ///
    /// For a `(T, H, W)` stack `frame(0, t)` is frame `t`; for an `(H, W, T)`
    /// stack the caller passes `axis = 2`.
    pub fn frame(&self, axis: usize, index: usize) -> Result<Self, ArrayError> {
        let ndim = self.ndim();
        if axis >= ndim {
            return Err(ArrayError::AxisOutOfRange { axis, ndim });
        }
        let len = self.shape()[axis];
        if index >= len {
            return Err(ArrayError::IndexOutOfRange { index, len });
        }

        let outer: usize = self.shape()[..axis].iter().product();
        let inner: usize = self.shape()[axis + 1..].iter().product();
        let mut out_shape = self.shape().to_vec();
        out_shape.remove(axis);

        let mut picked = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let base = (o * len + index) * inner;
            for i in 0..inner {
                // flat index is in range by construction
                if let Some(v) = self.get(base + i) {
                    picked.push(v);
                }
            }
        }
        NdArray::from_u16_values(&out_shape, self.dtype(), picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reshape_keeps_samples() {
        let a = NdArray::from_u8(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
        let b = a.clone().reshape(&[3, 2]).unwrap();
        assert_eq!(b.shape(), &[3, 2]);
        assert_eq!(b.to_le_bytes(), a.to_le_bytes());

        let err = a.reshape(&[4, 2]).unwrap_err();
        assert!(matches!(err, ArrayError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_min_max_mean() {
        let a = NdArray::from_u16(&[4], vec![7, 3000, 12, 1]).unwrap();
        assert_eq!(a.min_value(), Some(1));
        assert_eq!(a.max_value(), Some(3000));
        assert!((a.mean().unwrap() - 755.0).abs() < 1e-9);
        assert_eq!(NdArray::zeros(&[0], DType::U8).min_value(), None);
    }

    #[test]
    fn test_frame_leading_and_trailing_axis() {
        // (2, 2, 3): values encode (t, r, c) as 100*t + 10*r + c
        let mut vals = Vec::new();
        for t in 0..2u16 {
            for r in 0..2u16 {
                for c in 0..3u16 {
                    vals.push(100 * t + 10 * r + c);
                }
            }
        }
        let stack = NdArray::from_u16(&[2, 2, 3], vals).unwrap();

        let f1 = stack.frame(0, 1).unwrap();
        assert_eq!(f1.shape(), &[2, 3]);
        assert_eq!(f1.iter_u16().collect::<Vec<_>>(), vec![100, 101, 102, 110, 111, 112]);

        let last = stack.frame(2, 2).unwrap();
        assert_eq!(last.shape(), &[2, 2]);
        assert_eq!(last.iter_u16().collect::<Vec<_>>(), vec![2, 12, 102, 112]);

        assert!(matches!(stack.frame(3, 0), Err(ArrayError::AxisOutOfRange { .. })));
        assert!(matches!(stack.frame(0, 2), Err(ArrayError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_astype_widen_and_narrow() {
        let a = NdArray::from_u16(&[2], vec![5, 700]).unwrap();
        let narrow = a.astype(DType::U8);
        assert_eq!(narrow.samples(), &Samples::U8(vec![5, 255]));
        let wide = narrow.astype(DType::U16);
        assert_eq!(wide.samples(), &Samples::U16(vec![5, 255]));
    }
}
