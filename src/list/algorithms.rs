use crate::list::List;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        // The cached lengths reject lists of different sizes without a walk.
        #[cfg(feature = "length")]
        if self.len != other.len {
            return false;
        }
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

/// Lists are ordered lexicographically, element by element.
impl<T: PartialOrd> PartialOrd for List<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for List<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Clone> Clone for List<T> {
    /// Returns a deep copy of the list.
    ///
    /// If cloning an element panics, the partial copy is dropped and `self`
    /// is left untouched.
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    /// Replaces the contents of `self` with a deep copy of `source`.
    ///
    /// The copy is built completely before it is swapped in, so if cloning an
    /// element panics, `self` keeps its old contents. Positions into the old
    /// contents of `self` are invalidated on success.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let source = List::from_iter([1, 2, 3]);
    /// let mut list = List::from_iter([9]);
    /// let end = list.end();
    ///
    /// list.clone_from(&source);
    /// assert_eq!(list, source);
    /// assert_eq!(list.end(), end);
    /// ```
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
        log::trace!("replaced the contents of a list by a copy");
    }
}

/// The element count is hashed after the elements, so that nested lists
/// like `[[1], [2]]` and `[[1, 2]]` hash differently.
impl<T: Hash> Hash for List<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let count = self.iter().fold(0_usize, |count, item| {
            item.hash(state);
            count + 1
        });
        state.write_usize(count);
    }
}

impl<T> List<T> {
    /// Returns `true` if the `List` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_back(0);
    /// list.push_back(1);
    /// list.push_back(2);
    ///
    /// assert_eq!(list.contains(&0), true);
    /// assert_eq!(list.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.iter().any(|item| item == x)
    }
}
