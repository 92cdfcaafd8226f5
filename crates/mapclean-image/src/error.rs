/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size mismatch: {0}x{1} vs {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a structuring element or filter window has an unusable size.
    #[error("Invalid kernel size {0}x{1}")]
    InvalidKernelSize(usize, usize),

    /// Error when the map resolution cannot be used to convert lengths to pixels.
    #[error("Invalid resolution: {0} cm per pixel")]
    InvalidResolution(f32),

    /// Error when a numeric parameter is outside its valid range.
    #[error("Invalid parameter {0}: {1}")]
    InvalidParameter(&'static str, f32),

    /// Error when an operation does not support the number of channels.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),
}
