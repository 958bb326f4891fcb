//! Growable pixel buffers owned by CPU workers.

use crate::pixel::Bgra;

/// A byte buffer backed by `u32`-aligned pixel storage.
///
/// The buffer has a logical length in bytes and a capacity that only grows.
/// [`ensure_capacity`](PixelBuffer::ensure_capacity) reallocates when the
/// requested length exceeds the capacity and always sets the logical length,
/// so a smaller request keeps the allocation but shortens the visible bytes.
///
/// # Example
///
/// ```rust
/// use fx_core::PixelBuffer;
///
/// let mut buf = PixelBuffer::new();
/// buf.ensure_capacity(64);
/// assert_eq!(buf.len(), 64);
/// assert_eq!(buf.pixels().len(), 16);
///
/// buf.ensure_capacity(8);
/// assert_eq!(buf.len(), 8);
/// assert!(buf.capacity() >= 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PixelBuffer {
    data: Vec<Bgra>,
    len: usize,
}

impl PixelBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
        }
    }

    /// Grows the buffer to hold at least `bytes` and sets the logical length.
    ///
    /// Returns `true` if storage was reallocated.
    pub fn ensure_capacity(&mut self, bytes: usize) -> bool {
        let pixels = bytes.div_ceil(size_of::<Bgra>());
        let grew = pixels > self.data.len();
        if grew {
            self.data = vec![Bgra::TRANSPARENT; pixels];
        }
        self.len = bytes;
        grew
    }

    /// Logical length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the logical length is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len() * size_of::<Bgra>()
    }

    /// The logical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.data)[..self.len]
    }

    /// The logical bytes, mutable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.data)[..self.len]
    }

    /// Whole pixels inside the logical length.
    pub fn pixels(&self) -> &[Bgra] {
        &self.data[..self.len / size_of::<Bgra>()]
    }

    /// Whole pixels inside the logical length, mutable.
    pub fn pixels_mut(&mut self) -> &mut [Bgra] {
        let n = self.len / size_of::<Bgra>();
        &mut self.data[..n]
    }
}
