use crate::image::ImageF32;

/// Response maps for every (scale, filter) pair, stored flat in
/// scale-major order: map `(s, f)` lives at `s * nfilters + f`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseGrid {
    nscales: usize,
    nfilters: usize,
    maps: Vec<ImageF32>,
}

impl ResponseGrid {
    pub(crate) fn from_flat(nscales: usize, nfilters: usize, maps: Vec<ImageF32>) -> Self {
        debug_assert_eq!(maps.len(), nscales * nfilters);
        Self {
            nscales,
            nfilters,
            maps,
        }
    }

    /// Length of the first (scale) axis.
    pub fn nscales(&self) -> usize {
        self.nscales
    }

    /// Length of the second (filter) axis.
    pub fn nfilters(&self) -> usize {
        self.nfilters
    }

    pub fn get(&self, scale: usize, filter: usize) -> Option<&ImageF32> {
        if scale >= self.nscales || filter >= self.nfilters {
            return None;
        }
        self.maps.get(scale * self.nfilters + filter)
    }

    /// All filter responses at one scale, in filter order.
    pub fn scale(&self, scale: usize) -> &[ImageF32] {
        let start = scale * self.nfilters;
        &self.maps[start..start + self.nfilters]
    }

    /// `(scale, filter, map)` triples in scale-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ImageF32)> {
        let nf = self.nfilters.max(1);
        self.maps
            .iter()
            .enumerate()
            .map(move |(i, m)| (i / nf, i % nf, m))
    }

    pub fn maps(&self) -> &[ImageF32] {
        &self.maps
    }

    /// Nested `[scale][filter]` layout.
    pub fn into_nested(self) -> Vec<Vec<ImageF32>> {
        let nf = self.nfilters;
        let mut out = Vec::with_capacity(self.nscales);
        let mut maps = self.maps.into_iter();
        for _ in 0..self.nscales {
            out.push(maps.by_ref().take(nf).collect());
        }
        out
    }
}
