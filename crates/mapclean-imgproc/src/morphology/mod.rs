mod kernel;
pub use kernel::Kernel;

mod ops;
pub use ops::{close, dilate, erode};
