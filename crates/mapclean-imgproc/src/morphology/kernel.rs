use mapclean_image::ImageError;

/// A rectangular morphological structuring element.
///
/// Every cell of the rectangle takes part in the operation and the anchor is
/// the geometric centre, so both sides must be odd.
///
/// # Example
///
/// ```rust
/// use mapclean_imgproc::morphology::Kernel;
///
/// let kernel = Kernel::rect(3, 5).unwrap();
/// assert_eq!(kernel.width(), 5);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.pad(), (1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a `height` x `width` rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidKernelSize`] if a side is zero or even.
    pub fn rect(height: usize, width: usize) -> Result<Self, ImageError> {
        if height == 0 || width == 0 || height % 2 == 0 || width % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(height, width));
        }
        Ok(Self { width, height })
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the padding for the kernel (offset from center) as (rows, cols).
    pub fn pad(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }
}
