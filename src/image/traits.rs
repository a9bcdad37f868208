//! Row access shared by the owned float image and the borrowed 8-bit view.
//!
//! Both types are row-major with an explicit stride; code that only walks
//! rows (conversion, resampling, map statistics) is written once against
//! [`ImageView`].

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Elements between the starts of consecutive rows.
    fn stride(&self) -> usize;

    /// The `width()` visible pixels of row `y`.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows {
            image: self,
            next: 0,
        }
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

/// Top-to-bottom row iterator returned by [`ImageView::rows`].
pub struct Rows<'a, I: ImageView> {
    image: &'a I,
    next: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        let image = self.image;
        if self.next >= image.height() {
            return None;
        }
        self.next += 1;
        Some(image.row(self.next - 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.image.height() - self.next;
        (left, Some(left))
    }
}

impl<I: ImageView> ExactSizeIterator for Rows<'_, I> {}
