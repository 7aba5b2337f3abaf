use crate::error::ListError;
#[cfg(feature = "length")]
use crate::list::count_nodes;
use crate::list::{connect, Links, List, Node};
use crate::Iter;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// A handle to a node of a [`List`], either an element or the ghost node.
///
/// A `Position` does not borrow the list. It keeps denoting the same node
/// across any mutation of the list except the removal of that very node,
/// including [`List::splice`] and [`List::swap`] moving the element into
/// another list.
///
/// Two positions are equal if and only if they denote the same node.
///
/// Positions are neither `Send` nor `Sync`: they only make sense next to the
/// list that owns their node.
pub struct Position<T> {
    node: NonNull<Links>,
    _marker: PhantomData<*const T>,
}

impl<T> Position<T> {
    pub(crate) fn new(node: NonNull<Links>) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub(crate) fn node(self) -> NonNull<Links> {
        self.node
    }

    /// Returns the position of the next node in the ring.
    ///
    /// The next of the last element is the ghost node ([`List::end`]), and the
    /// next of the ghost node is the first element ([`List::begin`]).
    ///
    /// # Safety
    ///
    /// The node denoted by `self` must not have been dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2]);
    /// unsafe {
    ///     let second = list.begin().next();
    ///     assert_eq!(list.get(second), Some(&2));
    ///     assert_eq!(second.next(), list.end());
    ///     assert_eq!(list.end().next(), list.begin());
    /// }
    /// ```
    #[inline]
    pub unsafe fn next(self) -> Self {
        Self::new(self.node.as_ref().next)
    }

    /// Returns the position of the previous node in the ring.
    ///
    /// The previous of the first element is the ghost node ([`List::end`]),
    /// and the previous of the ghost node is the last element.
    ///
    /// # Safety
    ///
    /// The node denoted by `self` must not have been dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2]);
    /// unsafe {
    ///     let last = list.end().prev();
    ///     assert_eq!(list.get(last), Some(&2));
    ///     assert_eq!(list.begin().prev(), list.end());
    /// }
    /// ```
    #[inline]
    pub unsafe fn prev(self) -> Self {
        Self::new(self.node.as_ref().prev)
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Position<T> {}

impl<T> Hash for Position<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<T> fmt::Debug for Position<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Position").field(&self.node.as_ptr()).finish()
    }
}

/// An iterator over the positions of the elements of a `List`.
///
/// This `struct` is created by [`List::positions`]. Like [`Iter`], it
/// borrows the list immutably, so the positions it yields cannot be
/// invalidated while iterating.
pub struct Positions<'a, T: 'a> {
    start: NonNull<Links>,
    end: NonNull<Links>,
    _marker: PhantomData<&'a List<T>>,
}

impl<'a, T: 'a> Iterator for Positions<'a, T> {
    type Item = Position<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        let current = self.start;
        // SAFETY: `start..end` is a valid non-empty range of the borrowed list.
        self.start = unsafe { current.as_ref().next };
        Some(Position::new(current))
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Positions<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is a valid non-empty range of the borrowed list.
        self.end = unsafe { self.end.as_ref().prev };
        Some(Position::new(self.end))
    }
}

impl<'a, T: 'a> FusedIterator for Positions<'a, T> {}

impl<T> List<T> {
    /// Returns the position of the first element, or [`end`](List::end) if
    /// the list is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn begin(&self) -> Position<T> {
        Position::new(self.front_node())
    }

    /// Returns the position of the ghost node, one past the last element.
    ///
    /// It never changes during the lifetime of the list, even across
    /// [`swap`](List::swap).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn end(&self) -> Position<T> {
        Position::new(self.ghost_node())
    }

    /// Provides an iterator over the positions of all elements, from front
    /// to back.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let positions = Vec::from_iter(list.positions());
    ///
    /// // SAFETY: every position belongs to `list`.
    /// unsafe {
    ///     list.erase(positions[1]).unwrap();
    ///     assert_eq!(list.get(positions[2]), Some(&3));
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 3]);
    /// ```
    pub fn positions(&self) -> Positions<'_, T> {
        Positions {
            start: self.front_node(),
            end: self.ghost_node(),
            _marker: PhantomData,
        }
    }

    /// Provides a reference to the element at `pos`, or `None` if `pos` is
    /// the ghost node.
    ///
    /// # Safety
    ///
    /// `pos` must denote a node of this list that has not been dropped.
    #[inline]
    pub unsafe fn get(&self, pos: Position<T>) -> Option<&T> {
        self.element(pos.node())
    }

    /// Provides a mutable reference to the element at `pos`, or `None` if
    /// `pos` is the ghost node.
    ///
    /// # Safety
    ///
    /// `pos` must denote a node of this list that has not been dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2]);
    /// unsafe {
    ///     let last = list.end().prev();
    ///     *list.get_mut(last).unwrap() = 20;
    ///     assert_eq!(list.get_mut(list.end()), None);
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 20]);
    /// ```
    #[inline]
    pub unsafe fn get_mut(&mut self, pos: Position<T>) -> Option<&mut T> {
        self.element_mut(pos.node())
    }

    /// Provides a forward iterator over the elements in `first..last`.
    ///
    /// # Safety
    ///
    /// `first` and `last` must denote nodes of this list that have not been
    /// dropped, and `first` must not be after `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3, 4]);
    /// let second = unsafe { list.begin().next() };
    /// let range = unsafe { list.range(second, list.end()) };
    /// assert_eq!(Vec::from_iter(range.rev()), vec![&4, &3, &2]);
    /// ```
    pub unsafe fn range(&self, first: Position<T>, last: Position<T>) -> Iter<'_, T> {
        Iter::from_range(
            first.node(),
            last.node(),
            #[cfg(feature = "length")]
            count_nodes(first.node(), last.node()),
        )
    }

    /// Inserts `value` before `pos`, and returns the position of the new
    /// element. Inserting before [`end`](List::end) appends to the list.
    ///
    /// The node is allocated before any link is touched.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    ///
    /// `pos` must denote a node of this list that has not been dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 3]);
    /// unsafe {
    ///     let three = list.begin().next();
    ///     let two = list.insert(three, 2);
    ///     assert_eq!(two.next(), three);
    ///     list.insert(list.end(), 4);
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3, 4]);
    /// ```
    pub unsafe fn insert(&mut self, pos: Position<T>, value: T) -> Position<T> {
        let node = Node::new_detached(value);
        let next = pos.node();
        self.attach_node(next.as_ref().prev, next, node);
        Position::new(node)
    }

    /// Removes and drops the element at `pos`, and returns the position that
    /// followed it.
    ///
    /// Returns [`ListError::GhostPosition`] without changing anything if `pos`
    /// is the ghost node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    ///
    /// `pos` must denote a node of this list that has not been dropped.
    /// The position itself is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2]);
    /// unsafe {
    ///     let next = list.erase(list.begin()).unwrap();
    ///     assert_eq!(list.get(next), Some(&2));
    ///     assert_eq!(list.erase(next), Ok(list.end()));
    ///     assert_eq!(list.erase(list.end()), Err(ListError::GhostPosition));
    /// }
    /// assert!(list.is_empty());
    /// ```
    pub unsafe fn erase(&mut self, pos: Position<T>) -> Result<Position<T>, ListError> {
        let node = pos.node();
        if node == self.ghost_node() {
            return Err(ListError::GhostPosition);
        }
        let next = node.as_ref().next;
        drop(self.detach_node(node));
        Ok(Position::new(next))
    }

    /// Removes the element at `pos` and returns it.
    ///
    /// Returns [`ListError::GhostPosition`] without changing anything if `pos`
    /// is the ghost node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    ///
    /// `pos` must denote a node of this list that has not been dropped.
    /// The position itself is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([String::from("a"), String::from("b")]);
    /// let a = unsafe { list.remove(list.begin()) };
    /// assert_eq!(a.as_deref(), Ok("a"));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub unsafe fn remove(&mut self, pos: Position<T>) -> Result<T, ListError> {
        let node = pos.node();
        if node == self.ghost_node() {
            return Err(ListError::GhostPosition);
        }
        Ok(self.detach_node(node).into_element())
    }

    /// Removes and drops every element in `first..last`, and returns `last`.
    ///
    /// If `first == last` nothing is removed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k*) time, where *k* is the
    /// number of removed elements.
    ///
    /// # Safety
    ///
    /// `first` and `last` must denote nodes of this list that have not been
    /// dropped, and `first` must not be after `last`. Positions in
    /// `first..last` are invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4]);
    /// unsafe {
    ///     let first = list.begin().next();
    ///     let last = list.end().prev();
    ///     let after = list.erase_range(first, last);
    ///     assert_eq!(list.get(after), Some(&4));
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 4]);
    /// ```
    pub unsafe fn erase_range(&mut self, first: Position<T>, last: Position<T>) -> Position<T> {
        self.erase_nodes(first.node(), last.node());
        last
    }

    /// Moves the elements in `first..last` of `other` before `pos` in `self`.
    ///
    /// No element is copied, allocated or dropped: the nodes are relinked, and
    /// positions of the moved elements now belong to `self`. If
    /// `first == last` nothing is moved.
    ///
    /// To move elements inside one list, use [`splice_within`].
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time, or in *O*(*k*) time with
    /// `feature = "length"`, where *k* is the number of moved elements.
    ///
    /// # Safety
    ///
    /// - `pos` must denote a node of `self` that has not been dropped;
    /// - `first` and `last` must denote nodes of `other` that have not been
    ///   dropped, and `first` must not be after `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 5]);
    /// let mut other = List::from_iter([2, 3, 4, 6]);
    /// unsafe {
    ///     let five = list.end().prev();
    ///     let (two, six) = (other.begin(), other.end().prev());
    ///     list.splice(five, &mut other, two, six);
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 2, 3, 4, 5]);
    /// assert_eq!(Vec::from_iter(other), vec![6]);
    /// ```
    ///
    /// [`splice_within`]: List::splice_within
    pub unsafe fn splice(
        &mut self,
        pos: Position<T>,
        other: &mut List<T>,
        first: Position<T>,
        last: Position<T>,
    ) {
        let (front, end) = (first.node(), last.node());
        if front == end {
            return;
        }
        let detached = other.detach_nodes(
            front,
            end.as_ref().prev,
            #[cfg(feature = "length")]
            count_nodes(front, end),
        );
        let next = pos.node();
        self.attach_nodes(next.as_ref().prev, next, detached);
        log::trace!("spliced a run of nodes from another list before {:?}", pos);
    }

    /// Moves the elements in `first..last` of this list before `pos`.
    ///
    /// If `first == last`, `pos == first` or `pos == last`, nothing is moved.
    /// Returns [`ListError::DestinationInRange`] without changing anything if
    /// `pos` lies strictly inside the range.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k*) time, where *k* is the number
    /// of moved elements.
    ///
    /// # Safety
    ///
    /// `pos`, `first` and `last` must denote nodes of this list that have not
    /// been dropped, and `first` must not be after `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4]);
    /// unsafe {
    ///     let three = list.end().prev().prev();
    ///     // Move `[3, 4]` to the front.
    ///     list.splice_within(list.begin(), three, list.end()).unwrap();
    ///
    ///     let four = three.next();
    ///     assert_eq!(
    ///         list.splice_within(four, three, list.end()),
    ///         Err(ListError::DestinationInRange),
    ///     );
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![3, 4, 1, 2]);
    /// ```
    pub unsafe fn splice_within(
        &mut self,
        pos: Position<T>,
        first: Position<T>,
        last: Position<T>,
    ) -> Result<(), ListError> {
        if first == last || pos == first || pos == last {
            return Ok(());
        }
        let (front, end, next) = (first.node(), last.node(), pos.node());
        let ghost = self.ghost_node();
        let mut len = 0_usize;
        let mut node = front;
        while node != end {
            debug_assert!(node != ghost, "Cannot splice the ghost node");
            if node == next {
                return Err(ListError::DestinationInRange);
            }
            len += 1;
            node = node.as_ref().next;
        }
        self.splice_within_unchecked(pos, first, last);
        log::trace!("spliced a run of {} nodes before {:?}", len, pos);
        Ok(())
    }

    /// Moves the elements in `first..last` of this list before `pos`, without
    /// checking that `pos` lies outside the range.
    ///
    /// If `first == last`, `pos == first` or `pos == last`, nothing is moved.
    /// The length of the list does not change, so no node is counted even
    /// with `feature = "length"`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Safety
    ///
    /// - `pos`, `first` and `last` must denote nodes of this list that have
    ///   not been dropped, and `first` must not be after `last`;
    /// - `pos` must not lie strictly inside `first..last`; use
    ///   [`splice_within`](List::splice_within) when that is not known.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3, 4, 5]);
    /// unsafe {
    ///     let two = list.begin().next();
    ///     let four = two.next().next();
    ///     // Move `[2, 3]` to the back.
    ///     list.splice_within_unchecked(list.end(), two, four);
    /// }
    /// assert_eq!(Vec::from_iter(list), vec![1, 4, 5, 2, 3]);
    /// ```
    pub unsafe fn splice_within_unchecked(
        &mut self,
        pos: Position<T>,
        first: Position<T>,
        last: Position<T>,
    ) {
        if first == last || pos == first || pos == last {
            return;
        }
        let (front, end, next) = (first.node(), last.node(), pos.node());
        let back = end.as_ref().prev;
        // `next` is outside `front..=end`, so its `prev` is untouched by the unlink.
        connect(front.as_ref().prev, end);
        connect(next.as_ref().prev, front);
        connect(back, next);
    }
}

#[cfg(test)]
mod tests {
    use crate::list::check_links;
    use crate::{List, ListError, Position};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashSet, VecDeque};
    use std::iter::FromIterator;

    #[test]
    fn erase_then_splice_everything() {
        let mut list = List::new();
        list.push_back(1);
        list.push_back(2);
        list.push_back(3);
        assert_eq!(Vec::from_iter(list.iter().copied()), vec![1, 2, 3]);

        unsafe { list.erase(list.begin()).unwrap() };
        assert_eq!(list.front(), Some(&2));

        let mut other = List::new();
        let (first, last) = (list.begin(), list.end());
        unsafe { other.splice(other.begin(), &mut list, first, last) };
        check_links(&list);
        check_links(&other);
        assert!(list.is_empty());
        assert_eq!(Vec::from_iter(other), vec![2, 3]);
    }

    #[test]
    fn position_identity() {
        let list = List::from_iter([7, 7]);
        let (first, second) = unsafe { (list.begin(), list.begin().next()) };
        assert_ne!(first, second);
        assert_eq!(unsafe { second.prev() }, first);
        assert_eq!(unsafe { list.get(first) }, unsafe { list.get(second) });

        let set = HashSet::<Position<i32>>::from_iter(list.positions());
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&list.end()));

        let empty = List::<i32>::new();
        assert_eq!(empty.begin(), empty.end());
        assert_eq!(unsafe { empty.end().next() }, empty.end());
        assert_eq!(unsafe { empty.get(empty.begin()) }, None);
    }

    #[test]
    fn positions_iterate_both_ways() {
        let list = List::from_iter(0..5);
        let forward = Vec::from_iter(list.positions());
        let mut backward = Vec::from_iter(list.positions().rev());
        backward.reverse();
        assert_eq!(forward, backward);
        for (i, pos) in forward.into_iter().enumerate() {
            assert_eq!(unsafe { list.get(pos) }, Some(&i));
        }

        let mut positions = list.positions();
        assert_eq!(positions.next(), Some(list.begin()));
        assert_eq!(positions.next_back(), Some(unsafe { list.end().prev() }));
        assert_eq!(positions.count(), 3);
        assert_eq!(List::<u8>::new().positions().next(), None);
    }

    #[test]
    fn insert_and_erase() {
        let mut list = List::new();
        unsafe {
            let b = list.insert(list.end(), 'b');
            let a = list.insert(b, 'a');
            let d = list.insert(list.end(), 'd');
            let c = list.insert(d, 'c');
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec!['a', 'b', 'c', 'd']);
            assert_eq!(list.begin(), a);

            assert_eq!(list.erase(b), Ok(c));
            assert_eq!(list.erase(d), Ok(list.end()));
            assert_eq!(list.erase(list.end()), Err(ListError::GhostPosition));
            assert_eq!(list.remove(list.end()), Err(ListError::GhostPosition));
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec!['a', 'c']);

            assert_eq!(list.remove(a), Ok('a'));
            assert_eq!(list.get(c), Some(&'c'));
            assert_eq!(list.begin(), c);
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn erase_range_cases() {
        let mut list = List::from_iter(0..6);
        let positions = Vec::from_iter(list.positions());
        unsafe {
            assert_eq!(list.erase_range(positions[2], positions[2]), positions[2]);
            assert_eq!(list.len(), 6);

            assert_eq!(list.erase_range(positions[1], positions[4]), positions[4]);
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![0, 4, 5]);

            assert_eq!(list.erase_range(positions[4], list.end()), list.end());
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![0]);

            list.erase_range(list.begin(), list.end());
        }
        check_links(&list);
        assert!(list.is_empty());
    }

    #[test]
    fn splice_keeps_positions() {
        let mut list = List::from_iter([1, 2, 3, 4, 5]);
        let mut other = List::from_iter([10, 20]);
        let positions = Vec::from_iter(list.positions());
        let twenty = unsafe { other.end().prev() };

        unsafe {
            other.splice(twenty, &mut list, positions[1], positions[4]);
            check_links(&list);
            check_links(&other);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![1, 5]);
            assert_eq!(Vec::from_iter(other.iter().copied()), vec![10, 2, 3, 4, 20]);

            // the moved positions now belong to `other`
            assert_eq!(other.get(positions[2]), Some(&3));
            assert_eq!(positions[3].next(), twenty);
            assert_eq!(positions[0].next(), positions[4]);

            // empty range
            other.splice(other.begin(), &mut list, positions[4], positions[4]);
            assert_eq!(list.len(), 2);

            // move them back
            list.splice(positions[4], &mut other, positions[1], twenty);
        }
        check_links(&list);
        check_links(&other);
        assert_eq!(Vec::from_iter(list), vec![1, 2, 3, 4, 5]);
        assert_eq!(Vec::from_iter(other), vec![10, 20]);
    }

    #[test]
    fn splice_within_cases() {
        let mut list = List::from_iter(0..5);
        let p = Vec::from_iter(list.positions());
        unsafe {
            // no-ops
            assert_eq!(list.splice_within(p[0], p[2], p[2]), Ok(()));
            assert_eq!(list.splice_within(p[1], p[1], p[3]), Ok(()));
            assert_eq!(list.splice_within(p[3], p[1], p[3]), Ok(()));
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![0, 1, 2, 3, 4]);

            // destination strictly inside the range
            assert_eq!(
                list.splice_within(p[2], p[1], p[4]),
                Err(ListError::DestinationInRange)
            );
            assert_eq!(
                list.splice_within(p[4], p[0], list.end()),
                Err(ListError::DestinationInRange)
            );
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![0, 1, 2, 3, 4]);

            // forward and backward moves
            assert_eq!(list.splice_within(list.end(), p[0], p[2]), Ok(()));
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![2, 3, 4, 0, 1]);

            assert_eq!(list.splice_within(p[2], p[4], p[1]), Ok(()));
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![4, 0, 2, 3, 1]);
            assert_eq!(list.begin(), p[4]);
            assert_eq!(list.end().prev(), p[1]);
        }
    }

    #[test]
    fn splice_within_unchecked_cases() {
        let mut list = List::from_iter(0..5);
        let p = Vec::from_iter(list.positions());
        unsafe {
            list.splice_within_unchecked(p[0], p[2], p[2]);
            list.splice_within_unchecked(p[1], p[1], p[3]);
            list.splice_within_unchecked(p[3], p[1], p[3]);
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![0, 1, 2, 3, 4]);

            // run at the back moved to the front
            list.splice_within_unchecked(list.begin(), p[3], list.end());
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![3, 4, 0, 1, 2]);

            // single node moved forward, next to the destination
            list.splice_within_unchecked(p[2], p[0], p[1]);
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), vec![3, 4, 1, 0, 2]);

            // the whole list before the ghost stays in place
            list.splice_within_unchecked(list.end(), list.begin(), list.end());
            check_links(&list);
            assert_eq!(list.begin(), p[3]);
            assert_eq!(list.end().prev(), p[2]);
        }
        assert_eq!(list.len(), 5);
    }

    fn check_model(list: &List<i32>, model: &VecDeque<i32>, positions: &[Position<i32>]) {
        check_links(list);
        assert!(list.iter().eq(model.iter()));
        assert_eq!(positions.len(), model.len());
        for (pos, value) in positions.iter().zip(model) {
            assert_eq!(unsafe { list.get(*pos) }, Some(value));
        }
    }

    #[test]
    fn random_operations_match_model() {
        let mut rng = StdRng::seed_from_u64(0x00c0_ffee);
        let mut list = List::new();
        let mut model = VecDeque::new();
        let mut positions = Vec::new();

        for value in 0..2000 {
            let len = model.len();
            let at = |i: usize, positions: &Vec<Position<i32>>, list: &List<i32>| {
                positions.get(i).copied().unwrap_or_else(|| list.end())
            };
            match rng.gen_range(0..9) {
                0 => {
                    list.push_front(value);
                    model.push_front(value);
                    positions.insert(0, list.begin());
                }
                1 => {
                    list.push_back(value);
                    model.push_back(value);
                    positions.push(unsafe { list.end().prev() });
                }
                2 => {
                    assert_eq!(list.pop_front(), model.pop_front());
                    if len > 0 {
                        positions.remove(0);
                    }
                }
                3 => {
                    assert_eq!(list.pop_back(), model.pop_back());
                    positions.pop();
                }
                4 => {
                    let i = rng.gen_range(0..=len);
                    let pos = unsafe { list.insert(at(i, &positions, &list), value) };
                    model.insert(i, value);
                    positions.insert(i, pos);
                }
                5 if len > 0 => {
                    let i = rng.gen_range(0..len);
                    let next = unsafe { list.erase(positions[i]) };
                    assert_eq!(next, Ok(at(i + 1, &positions, &list)));
                    model.remove(i);
                    positions.remove(i);
                }
                6 => {
                    let a = rng.gen_range(0..=len);
                    let b = rng.gen_range(a..=len);
                    let (first, last) = (at(a, &positions, &list), at(b, &positions, &list));
                    assert_eq!(unsafe { list.erase_range(first, last) }, last);
                    model.drain(a..b);
                    positions.drain(a..b);
                }
                7 => {
                    let a = rng.gen_range(0..=len);
                    let b = rng.gen_range(a..=len);
                    let d = rng.gen_range(0..=len);
                    let (first, last) = (at(a, &positions, &list), at(b, &positions, &list));
                    let dest = at(d, &positions, &list);
                    let inside = a < d && d < b;
                    let result = if !inside && rng.gen_bool(0.5) {
                        unsafe { list.splice_within_unchecked(dest, first, last) };
                        Ok(())
                    } else {
                        unsafe { list.splice_within(dest, first, last) }
                    };
                    if inside {
                        assert_eq!(result, Err(ListError::DestinationInRange));
                    } else {
                        assert_eq!(result, Ok(()));
                        let moved = Vec::from_iter(model.drain(a..b));
                        let moved_positions = Vec::from_iter(positions.drain(a..b));
                        let d = if d > a { d - moved.len() } else { d };
                        for (k, (value, pos)) in moved.into_iter().zip(moved_positions).enumerate()
                        {
                            model.insert(d + k, value);
                            positions.insert(d + k, pos);
                        }
                    }
                }
                8 => {
                    // move a run to another list and back again
                    let a = rng.gen_range(0..=len);
                    let b = rng.gen_range(a..=len);
                    let (first, last) = (at(a, &positions, &list), at(b, &positions, &list));
                    let mut other = List::from_iter([-1]);
                    unsafe {
                        other.splice(other.begin(), &mut list, first, last);
                        check_links(&list);
                        check_links(&other);
                        assert_eq!(other.len(), b - a + 1);
                        assert!(other.iter().take(b - a).eq(model.range(a..b)));
                        if a < b {
                            assert_eq!(other.begin(), first);
                        }
                        let (front, minus_one) = (other.begin(), other.end().prev());
                        list.splice(last, &mut other, front, minus_one);
                    }
                    assert_eq!(Vec::from_iter(other), vec![-1]);
                }
                _ => {}
            }
            check_model(&list, &model, &positions);
        }

        list.clear();
        check_links(&list);
        assert!(list.is_empty());
    }
}
