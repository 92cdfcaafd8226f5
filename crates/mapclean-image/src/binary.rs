use crate::image::Image;

/// Intensity written for an occupied cell when a binary grid is encoded as mono8.
pub const OCCUPIED: u8 = 255;

/// Intensity written for a free cell when a binary grid is encoded as mono8.
pub const FREE: u8 = 0;

/// A two-valued occupancy grid with one `bool` per cell.
///
/// `true` marks an OCCUPIED cell and `false` a FREE one.
pub type BinaryImage = Image<bool, 1>;

impl Image<bool, 1> {
    /// Encode the grid as mono8, writing `occupied_value` for OCCUPIED and `0` for FREE.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapclean_image::{BinaryImage, OCCUPIED};
    ///
    /// let grid = BinaryImage::new([3, 1].into(), vec![false, true, true]).unwrap();
    /// assert_eq!(grid.to_mono8(OCCUPIED).as_slice(), &[0, 255, 255]);
    /// ```
    pub fn to_mono8(&self, occupied_value: u8) -> Image<u8, 1> {
        let data = self
            .as_slice()
            .iter()
            .map(|&v| if v { occupied_value } else { FREE })
            .collect();
        Image::<u8, 1>::from_parts(self.size(), data)
    }

    /// Number of OCCUPIED cells.
    pub fn count_occupied(&self) -> usize {
        self.as_slice().iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use crate::{BinaryImage, ImageError, OCCUPIED};

    #[rustfmt::skip]
    #[test]
    fn mono8_encoding() -> Result<(), ImageError> {
        let grid = BinaryImage::new(
            [3, 2].into(),
            vec![
                false, true, false,
                true, false, true,
            ],
        )?;
        assert_eq!(grid.count_occupied(), 3);

        let encoded = grid.to_mono8(OCCUPIED);
        assert_eq!(
            encoded.as_slice(),
            &[
                  0, 255,   0,
                255,   0, 255,
            ]
        );
        assert_eq!(grid.to_mono8(1).as_slice(), &[0, 1, 0, 1, 0, 1]);

        Ok(())
    }
}
