/// Create a gaussian blur kernel.
///
/// A non-positive `sigma` is derived from the kernel size as
/// `0.3 * ((kernel_size - 1) * 0.5 - 1) + 0.8`; in that case kernels of size
/// 1, 3, 5 and 7 use the fixed binomial taps that conventional image
/// libraries use.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        let fixed: Option<&[f32]> = match kernel_size {
            1 => Some(&[1.0]),
            3 => Some(&[0.25, 0.5, 0.25]),
            5 => Some(&[0.0625, 0.25, 0.375, 0.25, 0.0625]),
            7 => Some(&[
                0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
            ]),
            _ => None,
        };
        if let Some(taps) = fixed {
            return taps.to_vec();
        }
    }

    let sigma = if sigma <= 0.0 {
        0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    } else {
        sigma
    };

    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size as f32 - 1.0) / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the 3x3 sobel kernels as (derivative, smoothing) taps.
pub fn sobel_kernel_1d() -> ([i32; 3], [i32; 3]) {
    ([-1, 0, 1], [1, 2, 1])
}
