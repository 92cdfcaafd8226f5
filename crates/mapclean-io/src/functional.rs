use std::path::Path;

use mapclean_image::{Image, ImageSize};

use crate::error::IoError;

/// A decoded 8-bit image with the channel layout of the source file.
#[derive(Debug, Clone)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl GenericImage {
    /// The size of the decoded image.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// The number of channels of the decoded image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(_) => 1,
            GenericImage::Rgb8(_) => 3,
            GenericImage::Rgba8(_) => 4,
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate,
/// guessing the format from the file content. Grayscale sources decode to
/// [`GenericImage::L8`], colour sources to [`GenericImage::Rgb8`] and sources
/// with alpha to [`GenericImage::Rgba8`]; deeper bit depths are reduced to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Errors
///
/// [`IoError::FileDoesNotExist`] for a missing path and
/// [`IoError::ImageDecodeError`] when the content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let image = if !color.has_color() && !color.has_alpha() {
        GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?)
    } else if color.has_alpha() {
        GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
    } else {
        GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?)
    };

    log::debug!(
        "decoded {} as {:?} {}",
        file_path.display(),
        color,
        image.size()
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::{write_image_png_mono8, write_image_png_rgb8};

    #[test]
    fn read_any_mono8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("map.png");

        let image = Image::<u8, 1>::new([3, 2].into(), vec![0, 50, 100, 150, 200, 250])?;
        write_image_png_mono8(&file_path, &image)?;

        match read_image_any(&file_path)? {
            GenericImage::L8(decoded) => assert_eq!(decoded, image),
            other => panic!("unexpected layout with {} channels", other.num_channels()),
        }

        Ok(())
    }

    #[test]
    fn read_any_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("map.png");

        let image = Image::<u8, 3>::from_size_val([4, 5].into(), 128)?;
        write_image_png_rgb8(&file_path, &image)?;

        let decoded = read_image_any(&file_path)?;
        assert_eq!(decoded.num_channels(), 3);
        assert_eq!(decoded.size().width, 4);
        assert_eq!(decoded.size().height, 5);

        Ok(())
    }

    #[test]
    fn read_any_missing_file() {
        let res = read_image_any("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_any_garbage() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("map.png");
        std::fs::write(&file_path, b"definitely not an image")?;

        let res = read_image_any(&file_path);
        assert!(matches!(res, Err(IoError::ImageDecodeError(_))));

        Ok(())
    }
}
