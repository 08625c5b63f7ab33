//! Fragment pool: the shuffled, addressable set of letter fragments
//! for one level.
//!
//! Availability lives here, not in the presentation layer.
//! A fragment is unavailable while it sits in the current guess and
//! after a correct answer has consumed it.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

/// Opaque fragment handle. Derived from the pool position, so it is
/// stable for the lifetime of one level and never reused within it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct FragmentId(pub usize);

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    id: FragmentId,
    text: String,
    available: bool,
}

impl Fragment {
    pub fn id(&self) -> FragmentId { self.id }
    pub fn text(&self) -> &str { &self.text }
    pub fn is_available(&self) -> bool { self.available }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("level has {actual} fragments but there are {expected} fragment slots")]
    CapacityMismatch { expected: usize, actual: usize },
    #[error("fragment {0} is already unavailable")]
    AlreadyUnavailable(FragmentId),
    #[error("no fragment {0} in this level")]
    UnknownFragment(FragmentId),
}

#[derive(Clone, Debug, Default)]
pub struct FragmentPool {
    fragments: Vec<Fragment>,
}

impl FragmentPool {
    /// Shuffle `fragments` and assign ids by final position.
    ///
    /// `capacity` is the number of fragment slots the presentation layer
    /// offers. Any mismatch is rejected here instead of over- or
    /// under-filling slots later.
    pub fn build<R: Rng + ?Sized>(
        mut fragments: Vec<String>,
        capacity: usize,
        rng: &mut R,
    ) -> Result<Self, PoolError> {
        if fragments.len() != capacity {
            return Err(PoolError::CapacityMismatch {
                expected: capacity,
                actual: fragments.len(),
            });
        }

        fragments.shuffle(rng);

        let fragments = fragments
            .into_iter()
            .enumerate()
            .map(|(pos, text)| Fragment { id: FragmentId(pos), text, available: true })
            .collect();

        Ok(FragmentPool { fragments })
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id.0)
    }

    /// Fragments in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn is_available(&self, id: FragmentId) -> bool {
        self.get(id).is_some_and(Fragment::is_available)
    }

    pub fn available_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.available).count()
    }

    /// Take a fragment out of play and return its text.
    pub fn reveal(&mut self, id: FragmentId) -> Result<&str, PoolError> {
        let frag = self
            .fragments
            .get_mut(id.0)
            .ok_or(PoolError::UnknownFragment(id))?;
        if !frag.available {
            return Err(PoolError::AlreadyUnavailable(id));
        }
        frag.available = false;
        Ok(&frag.text)
    }

    /// Put a fragment back into play. Idempotent; unknown ids are ignored.
    pub fn restore(&mut self, id: FragmentId) {
        if let Some(frag) = self.fragments.get_mut(id.0) {
            frag.available = true;
        }
    }

    pub fn restore_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = FragmentId>,
    {
        for id in ids {
            self.restore(id);
        }
    }
}
