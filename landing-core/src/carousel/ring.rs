/// Most clones placed on each side of the real slides.
pub const MAX_CLONES: usize = 2;

/// Index arithmetic for `N` real slides padded with `K = min(2, N)` clones
/// on each side: `[clones of last K] [N real] [clones of first K]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex {
    real: usize,
    clones: usize,
}

impl RingIndex {
    /// `None` for an empty carousel.
    pub fn new(real: usize) -> Option<Self> {
        (real > 0).then(|| Self {
            real,
            clones: real.min(MAX_CLONES),
        })
    }

    /// Padded length, clones included.
    pub fn len(&self) -> usize {
        self.real + 2 * self.clones
    }

    pub fn real_len(&self) -> usize {
        self.real
    }

    pub fn clones(&self) -> usize {
        self.clones
    }

    pub fn first_real(&self) -> usize {
        self.clones
    }

    pub fn last_real(&self) -> usize {
        self.clones + self.real - 1
    }

    pub fn is_clone(&self, index: usize) -> bool {
        index < self.first_real() || index > self.last_real()
    }

    /// Real slide shown at padded `index`.
    pub fn origin(&self, index: usize) -> usize {
        if index < self.clones {
            self.real - self.clones + index
        } else if index > self.last_real() {
            (index - self.clones - self.real) % self.real
        } else {
            index - self.clones
        }
    }

    /// Padded index of real slide `real`.
    pub fn padded(&self, real: usize) -> Option<usize> {
        (real < self.real).then_some(self.clones + real)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide<T> {
    pub item: T,
    /// Index of the real slide this one shows.
    pub origin: usize,
    pub is_clone: bool,
}

/// Real items wrapped with boundary clones to fake an endless row.
#[derive(Debug, Clone)]
pub struct SlideRing<T> {
    index: RingIndex,
    slides: Vec<Slide<T>>,
}

impl<T: Clone> SlideRing<T> {
    pub fn new(items: Vec<T>) -> Option<Self> {
        let index = RingIndex::new(items.len())?;

        let slides = (0..index.len())
            .map(|i| {
                let origin = index.origin(i);
                Slide {
                    item: items[origin].clone(),
                    origin,
                    is_clone: index.is_clone(i),
                }
            })
            .collect();

        Some(Self { index, slides })
    }
}

impl<T> SlideRing<T> {
    pub fn index(&self) -> RingIndex {
        self.index
    }

    pub fn slides(&self) -> &[Slide<T>] {
        &self.slides
    }

    pub fn get(&self, index: usize) -> Option<&Slide<T>> {
        self.slides.get(index)
    }

    /// The addressable items, clones excluded.
    pub fn real_items(&self) -> impl Iterator<Item = &T> {
        self.slides.iter().filter(|s| !s.is_clone).map(|s| &s.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_is_rejected() {
        assert!(RingIndex::new(0).is_none());
        assert!(SlideRing::<u8>::new(Vec::new()).is_none());
    }

    #[test]
    fn five_items_get_two_clones_each_side() {
        let ring = SlideRing::new(vec!["a", "b", "c", "d", "e"]).unwrap();
        let order: Vec<_> = ring.slides().iter().map(|s| s.item).collect();
        assert_eq!(order, ["d", "e", "a", "b", "c", "d", "e", "a", "b"]);

        let clones: Vec<_> = ring.slides().iter().map(|s| s.is_clone).collect();
        assert_eq!(
            clones,
            [true, true, false, false, false, false, false, true, true]
        );

        let idx = ring.index();
        assert_eq!((idx.len(), idx.first_real(), idx.last_real()), (9, 2, 6));
        assert_eq!(idx.padded(4), Some(6));
        assert_eq!(idx.padded(5), None);
        assert_eq!(idx.origin(7), 0);
        assert_eq!(idx.origin(1), 4);
    }

    #[test]
    fn single_item_gets_one_clone_each_side() {
        let ring = SlideRing::new(vec![42]).unwrap();
        let idx = ring.index();
        assert_eq!(idx.clones(), 1);
        assert_eq!(idx.len(), 3);
        assert!(ring.slides().iter().all(|s| s.item == 42 && s.origin == 0));
        assert_eq!(ring.real_items().count(), 1);
    }

    #[test]
    fn real_items_skip_clones() {
        let ring = SlideRing::new(vec![1, 2, 3]).unwrap();
        assert_eq!(ring.real_items().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }
}
