/// A border type used by the neighbourhood filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Repeat the outermost row or column.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Reflect around the edge pixel, excluding it.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl BorderMode {
    /// Map a possibly out-of-range index into `[0, len)`.
    ///
    /// `len` must be non-zero.
    #[inline]
    pub fn map_index(self, i: isize, len: usize) -> usize {
        match self {
            BorderMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            BorderMode::Reflect101 => Self::reflect101(i, len),
        }
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else if i >= len {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }
}
