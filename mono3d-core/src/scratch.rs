/// Grow-only scratch storage reused across draws
use tracing::debug;

/// A buffer whose length only ever increases.
///
/// `reserve(n)` guarantees at least `n` initialized elements; existing
/// contents are left as they are and never shrunk. New slots start as `fill`.
#[derive(Debug, Clone)]
pub struct GrowBuffer<T> {
    name: &'static str,
    fill: T,
    data: Vec<T>,
}

impl<T: Copy> GrowBuffer<T> {
    pub fn new(name: &'static str, fill: T) -> Self {
        Self {
            name,
            fill,
            data: Vec::new(),
        }
    }

    /// Ensure room for `len` elements, growing if needed
    pub fn reserve(&mut self, len: usize) {
        if self.data.len() < len {
            debug!(buffer = self.name, from = self.data.len(), to = len, "growing scratch buffer");
            self.data.resize(len, self.fill);
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
