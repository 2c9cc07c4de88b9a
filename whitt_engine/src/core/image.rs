use crate::core::types::Colour;
use getset::CopyGetters;

/// Storage for a rendered RGBA floating point image.
///
/// Pixels are stored row-major, `(0, 0)` being the top-left corner.
#[derive(CopyGetters, Clone, Debug)]
pub struct ImageBuffer {
    #[get_copy = "pub"]
    width: usize,
    #[get_copy = "pub"]
    height: usize,
    data: Box<[Colour]>,
}

impl ImageBuffer {
    /// Creates a new image with the specified dimensions, filled with [`Colour::BLACK`]
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, Colour::BLACK)
    }

    /// Creates a new image with the specified dimensions, and the given fill pixel value
    pub fn new_filled(width: usize, height: usize, fill: Colour) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height].into_boxed_slice(),
        }
    }

    /// Returns the RGBA colour at image position `(x, y)`
    ///
    /// # Panics
    /// If `(x, y)` is outside `[0, width) x [0, height)`
    pub fn pixel(&self, x: usize, y: usize) -> Colour {
        assert!(x < self.width && y < self.height, "pixel position out of bounds");
        self.data[x + self.width * y]
    }

    /// Overwrites the RGBA colour at image position `(x, y)`
    ///
    /// # Panics
    /// If `(x, y)` is outside `[0, width) x [0, height)`
    pub fn set_pixel(&mut self, rgba: Colour, x: usize, y: usize) {
        assert!(x < self.width && y < self.height, "pixel position out of bounds");
        self.data[x + self.width * y] = rgba;
    }

    pub fn pixels(&self) -> impl Iterator<Item = &Colour> { self.data.iter() }

    /// Iterates over the rows of the image, top to bottom.
    ///
    /// The mutable row slices are disjoint, so they can be handed out to
    /// parallel workers. A zero-width image has no rows; `chunks_mut`
    /// requires a non-zero chunk size, and the data slice is empty anyway.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Colour]> {
        self.data.chunks_mut(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_row_major() {
        let mut img = ImageBuffer::new(3, 2);
        img.set_pixel(Colour::WHITE, 2, 1);

        assert_eq!(img.pixel(2, 1), Colour::WHITE);
        assert_eq!(img.pixel(1, 0).a(), 0.);
        let last_row = img.rows_mut().nth(1).unwrap();
        assert_eq!(last_row[2], Colour::WHITE);
    }

    #[test]
    fn degenerate_images_have_no_rows() {
        assert_eq!(ImageBuffer::new(0, 4).rows_mut().count(), 0);
        assert_eq!(ImageBuffer::new(4, 0).rows_mut().count(), 0);
    }
}
