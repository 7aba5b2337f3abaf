use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::{IntoIter, Iter, IterMut};

pub mod iterator;
pub mod position;

mod algorithms;

/// The `List` is a doubly-linked list with owned nodes, implemented as a ring
/// closed by a ghost node.
/// It allows inserting, removing elements at any given position in constant time,
/// and moving runs of elements between lists in constant time.
///
/// The `List` contains:
/// - a pointer `ghost` that points to the ghost node;
/// - a length field `len` indicating the length of the list. It can be enabled by
///   enabling the `length` feature in your `Cargo.toml`:
/// ```text
/// [dependencies]
/// ring_list = { features = ["length"] }
/// ```
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `start..end`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node).
pub struct List<T> {
    ghost: NonNull<Links>,
    #[cfg(feature = "length")]
    /// the length of the list
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

/// The link header shared by the ghost node and the element nodes.
pub(crate) struct Links {
    pub(crate) next: NonNull<Links>,
    pub(crate) prev: NonNull<Links>,
}

/// An element node. The header comes first, so a pointer to the node is
/// also a pointer to its links.
#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) links: Links,
    pub(crate) element: T,
}

/// Nodes fragment detached from a list, used in splicing, swapping and
/// range erasing.
///
/// When detached from a list, reading of `front.prev` and `back.next`
/// is invalid.
pub(crate) struct DetachedNodes<T> {
    pub(crate) front: NonNull<Links>,
    pub(crate) back: NonNull<Links>,
    #[cfg(feature = "length")]
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

// private methods
impl<T> List<T> {
    pub(crate) fn ghost_node(&self) -> NonNull<Links> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Links> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the list).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_node(&self) -> NonNull<Links> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the list).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Detach a single node `node` from the list, and return it as a box.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the list,
    /// or whether it is the ghost node.
    ///
    /// If the `node` does not belong to the list, this function call will make
    /// the list ill-formed.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Links>) -> Box<Node<T>> {
        debug_assert!(node != self.ghost, "Cannot detach the ghost node");
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        let (prev, next) = (node.as_ref().prev, node.as_ref().next);
        connect(prev, next);
        Box::from_raw(node.cast::<Node<T>>().as_ptr())
    }

    /// Attach a single node `node` to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the list, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    ///
    /// If the `prev` and `next` does not belong to the list, or they are not
    /// adjacent nodes, this function call will make the list ill-formed.
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Links>,
        next: NonNull<Links>,
        node: NonNull<Links>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        #[cfg(feature = "length")]
        {
            self.len += 1;
        }
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, next);
        }
    }

    /// Detach a range of nodes `front..=back` from the list, and return the detached
    /// nodes.
    ///
    /// It is unsafe because it does not check whether `front..=back` is a valid range
    /// (i.e. `front` must **NOT** be at the right of `back`, and the range must not
    /// contain the ghost node), or whether it belongs to the list.
    ///
    /// If `front..=back` is not a valid range or it does not belong to the list,
    /// this function call will make the list ill-formed.
    pub(crate) unsafe fn detach_nodes(
        &mut self,
        front: NonNull<Links>,
        back: NonNull<Links>,
        #[cfg(feature = "length")] len: usize,
    ) -> DetachedNodes<T> {
        #[cfg(feature = "length")]
        {
            self.len -= len;
        }
        connect(front.as_ref().prev, back.as_ref().next);
        DetachedNodes::new(
            front,
            back,
            #[cfg(feature = "length")]
            len,
        )
    }

    /// Attach a range of detached nodes to the list, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belongs
    /// to the list, or whether the `prev` and `next` is adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    ///
    /// If the `prev` and `next` does not belong to the list, or they are not
    /// adjacent nodes, this function call will make the list ill-formed.
    pub(crate) unsafe fn attach_nodes(
        &mut self,
        prev: NonNull<Links>,
        next: NonNull<Links>,
        detached: DetachedNodes<T>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, detached.front);
        connect(detached.back, next);
        #[cfg(feature = "length")]
        {
            self.len += detached.len;
        }
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, detached.front);
            assert_adjacent(detached.back, next);
        }
    }

    /// Detach all nodes from the list, and return the detached nodes, or return
    /// `None` if the list is empty.
    ///
    /// It is safe because `self.front_node()..=self.back_node()` is a valid range.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes<T>> {
        if self.is_empty() {
            return None;
        }
        unsafe {
            Some(self.detach_nodes(
                self.front_node(),
                self.back_node(),
                #[cfg(feature = "length")]
                self.len,
            ))
        }
    }

    /// Drop every node in `start..end`.
    ///
    /// The range is detached before any element is dropped, so the list stays
    /// well-formed even if dropping an element panics.
    ///
    /// It is unsafe because it does not check whether `start..end` is a valid range
    /// of the list.
    pub(crate) unsafe fn erase_nodes(&mut self, start: NonNull<Links>, end: NonNull<Links>) {
        if start == end {
            return;
        }
        let back = end.as_ref().prev;
        let detached = self.detach_nodes(
            start,
            back,
            #[cfg(feature = "length")]
            count_nodes(start, end),
        );
        let erased = detached.dispose();
        log::trace!("erased a run of {} nodes", erased);
    }
}

impl<T> List<T> {
    /// Create an empty `List`
    ///
    /// # Examples
    /// ```
    /// use ring_list::List;
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let ghost = new_ghost();
        #[cfg(feature = "length")]
        let len = 0;
        let _marker = PhantomData;
        Self {
            ghost,
            #[cfg(feature = "length")]
            len,
            _marker,
        }
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.is_empty());
    ///
    /// list.push_front("foo");
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the length of the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time with `feature = "length"`,
    /// and in *O*(*n*) time without it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.len(), 1);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.len(), 2);
    ///
    /// list.push_back(3);
    /// assert_eq!(list.len(), 3);
    /// ```
    #[cfg(feature = "length")]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the length of the `List`, by walking the ring.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time. Enable the `length`
    /// feature to make it *O*(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let list = List::from([1, 2, 3]);
    /// assert_eq!(list.len(), 3);
    /// ```
    #[cfg(not(feature = "length"))]
    pub fn len(&self) -> usize {
        // SAFETY: `front..ghost` is always a valid range of the list.
        unsafe { count_nodes(self.front_node(), self.ghost_node()) }
    }

    /// Removes all elements from the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// list.push_front(1);
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.front(), Some(&1));
    ///
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// assert_eq!(list.front(), None);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        // SAFETY: `front..ghost` is always a valid range of the list.
        unsafe { self.erase_nodes(self.front_node(), self.ghost_node()) }
    }

    /// Provides a reference to the front element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.front(), None);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: the front node is a valid node of the list.
        unsafe { self.element(self.front_node()) }
    }

    /// Provides a mutable reference to the front element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.front(), None);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front(), Some(&1));
    ///
    /// if let Some(x) = list.front_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.front(), Some(&5));
    /// ```
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the front node is a valid node of the list.
        unsafe { self.element_mut(self.front_node()) }
    }

    /// Provides a reference to the back element, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.back(), None);
    ///
    /// list.push_back(1);
    /// assert_eq!(list.back(), Some(&1));
    /// ```
    #[inline]
    pub fn back(&self) -> Option<&T> {
        // SAFETY: the back node is a valid node of the list.
        unsafe { self.element(self.back_node()) }
    }

    /// Provides a mutable reference to the back element, or `None` if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.back(), None);
    ///
    /// list.push_back(1);
    /// assert_eq!(list.back(), Some(&1));
    ///
    /// if let Some(x) = list.back_mut() {
    ///     *x = 5;
    /// }
    /// assert_eq!(list.back(), Some(&5));
    /// ```
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: the back node is a valid node of the list.
        unsafe { self.element_mut(self.back_node()) }
    }

    /// Adds an element first in the list.
    ///
    /// The node is allocated before any link is touched, so if the allocation
    /// fails the list is left as it was.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// assert_eq!(list.front().unwrap(), &2);
    ///
    /// list.push_front(1);
    /// assert_eq!(list.front().unwrap(), &1);
    /// ```
    pub fn push_front(&mut self, elt: T) {
        let node = Node::new_detached(elt);
        // SAFETY: `ghost` and the front node are adjacent nodes of the list.
        unsafe { self.attach_node(self.ghost_node(), self.front_node(), node) }
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1);
    /// list.push_front(3);
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is an element node.
        Some(unsafe { self.detach_node(self.front_node()) }.into_element())
    }

    /// Appends an element to the back of a list.
    ///
    /// The node is allocated before any link is touched, so if the allocation
    /// fails the list is left as it was.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.back().unwrap(), &3);
    /// ```
    pub fn push_back(&mut self, elt: T) {
        let node = Node::new_detached(elt);
        // SAFETY: the back node and `ghost` are adjacent nodes of the list.
        unsafe { self.attach_node(self.back_node(), self.ghost_node(), node) }
    }

    /// Removes the last element from a list and returns it, or `None` if
    /// it is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_back(), None);
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is an element node.
        Some(unsafe { self.detach_node(self.back_node()) }.into_element())
    }

    /// Provides a forward iterator.
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
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&0));
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Provides a forward iterator with mutable references.
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
    /// for element in list.iter_mut() {
    ///     *element += 10;
    /// }
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&10));
    /// assert_eq!(iter.next(), Some(&11));
    /// assert_eq!(iter.next(), Some(&12));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` becomes empty. Positions of the moved elements
    /// now belong to `self`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list1 = List::new();
    /// list1.push_back('a');
    ///
    /// let mut list2 = List::new();
    /// list2.push_back('b');
    /// list2.push_back('c');
    ///
    /// list1.append(&mut list2);
    ///
    /// let mut iter = list1.iter();
    /// assert_eq!(iter.next(), Some(&'a'));
    /// assert_eq!(iter.next(), Some(&'b'));
    /// assert_eq!(iter.next(), Some(&'c'));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list2.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // `self.back_node()` and `self.ghost_node()` are valid
            // nodes in the list and they are adjacent, so it is safe.
            unsafe { self.attach_nodes(self.back_node(), self.ghost_node(), detached) }
        }
    }

    /// Moves all elements from `other` to the begin of the list.
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    ///
    /// let mut list1 = List::new();
    /// list1.push_back('a');
    ///
    /// let mut list2 = List::new();
    /// list2.push_back('b');
    /// list2.push_back('c');
    ///
    /// list2.prepend(&mut list1);
    ///
    /// let mut iter = list2.iter();
    /// assert_eq!(iter.next(), Some(&'a'));
    /// assert_eq!(iter.next(), Some(&'b'));
    /// assert_eq!(iter.next(), Some(&'c'));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list1.is_empty());
    /// ```
    pub fn prepend(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // `self.ghost_node()` and `self.front_node()` are valid
            // nodes in the list and they are adjacent, so it is safe.
            unsafe { self.attach_nodes(self.ghost_node(), self.front_node(), detached) }
        }
    }

    /// Exchanges the elements of two lists.
    ///
    /// Each ghost node is relinked into the ring of the other list; no element
    /// is moved in memory. Positions of elements stay valid and follow their
    /// elements, while [`end`](List::end) of each list keeps denoting that list's
    /// ghost node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list1 = List::from_iter([1, 2]);
    /// let mut list2 = List::from_iter([3]);
    /// let one = list1.begin();
    ///
    /// list1.swap(&mut list2);
    ///
    /// assert_eq!(Vec::from_iter(&list1), vec![&3]);
    /// assert_eq!(Vec::from_iter(&list2), vec![&1, &2]);
    /// // SAFETY: `one` now belongs to `list2`.
    /// assert_eq!(unsafe { list2.get(one) }, Some(&1));
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        let mine = self.detach_all_nodes();
        let theirs = other.detach_all_nodes();
        log::trace!(
            "swapping lists (self empty: {}, other empty: {})",
            mine.is_none(),
            theirs.is_none()
        );
        // Both lists are empty rings here, so each ghost is adjacent to itself.
        if let Some(detached) = theirs {
            unsafe { self.attach_nodes(self.ghost_node(), self.ghost_node(), detached) }
        }
        if let Some(detached) = mine {
            unsafe { other.attach_nodes(other.ghost_node(), other.ghost_node(), detached) }
        }
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Links {
    fn dangling() -> Self {
        Links {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

impl<T> Node<T> {
    /// Create a detached node with given element.
    ///
    /// `node.prev` and `node.next` are dangling until the node is attached.
    pub(crate) fn new_detached(element: T) -> NonNull<Links> {
        let node = Box::leak(Box::new(Node {
            links: Links::dangling(),
            element,
        }));
        NonNull::from(node).cast()
    }

    /// Borrow the element of an element node.
    ///
    /// It is unsafe because `node` must be a live element node (never the ghost
    /// node), and the returned lifetime is unbounded.
    pub(crate) unsafe fn element<'a>(node: NonNull<Links>) -> &'a T {
        &(*node.cast::<Node<T>>().as_ptr()).element
    }

    /// Mutably borrow the element of an element node.
    ///
    /// It is unsafe for the same reasons as [`Node::element`], and the caller must
    /// also guarantee that the element is not aliased.
    pub(crate) unsafe fn element_mut<'a>(node: NonNull<Links>) -> &'a mut T {
        &mut (*node.cast::<Node<T>>().as_ptr()).element
    }

    pub(crate) fn into_element(self: Box<Self>) -> T {
        self.element
    }
}

impl<T> DetachedNodes<T> {
    /// If is unsafe because it must be guaranteed that `front..=back` is
    /// a valid range and its length must be equal to `len` (with
    /// `#[cfg(feature = "length")]`).
    unsafe fn new(
        front: NonNull<Links>,
        back: NonNull<Links>,
        #[cfg(feature = "length")] len: usize,
    ) -> Self {
        let _marker = PhantomData;
        #[cfg(feature = "length")]
        debug_assert!(len > 0, "Cannot detach nodes of length 0");
        Self {
            front,
            back,
            #[cfg(feature = "length")]
            len,
            _marker,
        }
    }

    /// Drop every node of the fragment, and return how many were dropped.
    ///
    /// If dropping an element panics, the remaining nodes are leaked.
    fn dispose(self) -> usize {
        let mut current = self.front;
        let mut count = 0;
        loop {
            // SAFETY: `front..=back` is a valid detached range owned by `self`;
            // `next` is read before the node is freed.
            let node = unsafe { Box::from_raw(current.cast::<Node<T>>().as_ptr()) };
            let is_back = current == self.back;
            current = node.links.next;
            drop(node);
            count += 1;
            if is_back {
                return count;
            }
        }
    }
}

// element access shared by the front/back accessors and positions
impl<T> List<T> {
    /// It is unsafe because `node` must be a valid node of the list.
    pub(crate) unsafe fn element(&self, node: NonNull<Links>) -> Option<&T> {
        if node == self.ghost {
            return None;
        }
        Some(Node::element(node))
    }

    /// It is unsafe because `node` must be a valid node of the list.
    pub(crate) unsafe fn element_mut(&mut self, node: NonNull<Links>) -> Option<&mut T> {
        if node == self.ghost {
            return None;
        }
        Some(Node::element_mut(node))
    }
}

/// Link `prev` and `next` as adjacent nodes.
///
/// It is unsafe because both nodes must be valid.
pub(crate) unsafe fn connect(prev: NonNull<Links>, next: NonNull<Links>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// Count the nodes in `start..end`.
///
/// It is unsafe because `start..end` must be a valid range of a list.
pub(crate) unsafe fn count_nodes(mut start: NonNull<Links>, end: NonNull<Links>) -> usize {
    let mut count = 0;
    while start != end {
        count += 1;
        start = start.as_ref().next;
    }
    count
}

fn new_ghost() -> NonNull<Links> {
    let ghost = NonNull::from(Box::leak(Box::new(Links::dangling())));
    // SAFETY: `ghost` is freshly allocated; linking it to itself makes an empty ring.
    unsafe { connect(ghost, ghost) };
    ghost
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Links>, next: NonNull<Links>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

/// Frees the ghost node when dropped, so it is released even if dropping an
/// element of the list unwinds.
struct GhostGuard(NonNull<Links>);

impl Drop for GhostGuard {
    fn drop(&mut self) {
        // SAFETY: the ghost node was leaked from a box in `new_ghost`, and the
        // dropping list was the only owner of it.
        unsafe { drop(Box::from_raw(self.0.as_ptr())) };
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        let _ghost = GhostGuard(self.ghost);
        self.clear();
    }
}

unsafe impl<T: Send> Send for List<T> {}

unsafe impl<T: Sync> Sync for List<T> {}

// Ensure that `List` and its read-only iterators are covariant in their type parameters.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}

/// Walk the whole ring of `list` and check that every node is linked back by
/// its neighbours, and that the cached length (if any) matches.
#[cfg(test)]
pub(crate) fn check_links<T>(list: &List<T>) {
    let ghost = list.ghost_node();
    let mut len = 0;
    let mut node = ghost;
    loop {
        // SAFETY: every node reachable from the ghost node is valid.
        let (prev, next) = unsafe { (node.as_ref().prev, node.as_ref().next) };
        unsafe {
            assert_eq!(prev.as_ref().next, node, "prev link is broken");
            assert_eq!(next.as_ref().prev, node, "next link is broken");
        }
        node = next;
        if node == ghost {
            break;
        }
        len += 1;
    }
    assert_eq!(list.is_empty(), len == 0);
    assert_eq!(list.len(), len);
}

#[cfg(test)]
mod tests {
    use crate::list::{check_links, List};
    use std::cell::RefCell;
    use std::iter::FromIterator;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn list_create() {
        let mut list = List::<i32>::new();
        assert!(list.is_empty());
        check_links(&list);
        list.push_back(1);
        assert!(!list.is_empty());
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.is_empty());
        check_links(&list);
    }

    #[derive(Debug)]
    struct DropChecker<'a, T: Copy> {
        value: T,
        dropped: &'a RefCell<Vec<T>>,
    }
    impl<'a, T: Copy> DropChecker<'a, T> {
        fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
            Self { value, dropped }
        }
    }
    impl<'a, T: Copy> Drop for DropChecker<'a, T> {
        fn drop(&mut self) {
            self.dropped.borrow_mut().push(self.value);
        }
    }

    #[test]
    fn list_drop() {
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut list = List::new();
        list.push_back(DropChecker::new(1, &dropped));
        list.push_back(DropChecker::new(2, &dropped));
        list.push_back(DropChecker::new(3, &dropped));
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn list_clear_drops_in_order() {
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut list = List::new();
        list.push_front(DropChecker::new(2, &dropped));
        list.push_front(DropChecker::new(1, &dropped));
        list.push_back(DropChecker::new(3, &dropped));
        list.clear();
        assert!(list.is_empty());
        check_links(&list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 3]);

        list.push_back(DropChecker::new(4, &dropped));
        assert_eq!(list.front().map(|checker| checker.value), Some(4));
    }

    /// Records its value when dropped, and panics afterwards if the value
    /// is `fuse`.
    struct PanicOnDrop<'a> {
        value: i32,
        fuse: i32,
        dropped: &'a RefCell<Vec<i32>>,
    }
    impl Drop for PanicOnDrop<'_> {
        fn drop(&mut self) {
            self.dropped.borrow_mut().push(self.value);
            if self.value == self.fuse {
                panic!("dropping {}", self.value);
            }
        }
    }

    fn fused_list(fuse: i32, dropped: &RefCell<Vec<i32>>) -> List<PanicOnDrop<'_>> {
        List::from_iter((0..5).map(|value| PanicOnDrop {
            value,
            fuse,
            dropped,
        }))
    }

    fn values(list: &List<PanicOnDrop<'_>>) -> Vec<i32> {
        Vec::from_iter(list.iter().map(|item| item.value))
    }

    #[test]
    fn list_erase_range_with_panicking_drop() {
        let dropped = RefCell::new(Vec::new());
        let mut list = fused_list(2, &dropped);
        let result = catch_unwind(AssertUnwindSafe(|| unsafe {
            let (first, last) = (list.begin().next(), list.end().prev());
            list.erase_range(first, last);
        }));
        assert!(result.is_err());
        check_links(&list);
        // `3` was detached with the run and is leaked.
        assert_eq!(values(&list), vec![0, 4]);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2]);

        list.push_back(PanicOnDrop {
            value: 5,
            fuse: 2,
            dropped: &dropped,
        });
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 0, 4, 5]);
    }

    #[test]
    fn list_clear_with_panicking_drop() {
        let dropped = RefCell::new(Vec::new());
        let mut list = fused_list(1, &dropped);
        let result = catch_unwind(AssertUnwindSafe(|| list.clear()));
        assert!(result.is_err());
        check_links(&list);
        assert!(list.is_empty());
        assert_eq!(dropped.borrow().as_slice(), &[0, 1]);

        list.push_front(PanicOnDrop {
            value: 7,
            fuse: 1,
            dropped: &dropped,
        });
        assert_eq!(values(&list), vec![7]);
    }

    #[test]
    fn list_drop_with_panicking_drop() {
        let dropped = RefCell::new(Vec::new());
        let list = fused_list(3, &dropped);
        let result = catch_unwind(AssertUnwindSafe(|| drop(list)));
        assert!(result.is_err());
        assert_eq!(dropped.borrow().as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn list_push_and_pop() {
        let mut list = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);

        list.push_back(1);
        assert_eq!(list.back(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        list.push_front(1);
        list.push_front(2);
        list.push_back(3);
        check_links(&list);
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.front(), Some(&2));
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_back(), Some(3));

        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        check_links(&list);
    }

    #[test]
    fn list_push_back_keeps_order() {
        for n in 0..6 {
            let mut list = List::new();
            (0..n).for_each(|i| list.push_back(i));
            check_links(&list);
            assert_eq!(Vec::from_iter(list.iter().copied()), Vec::from_iter(0..n));
            assert_eq!(
                Vec::from_iter(list.iter().rev().copied()),
                Vec::from_iter((0..n).rev())
            );
        }
    }

    #[test]
    fn list_front_and_back_mut() {
        let mut list = List::from_iter([1, 2, 3]);
        *list.front_mut().unwrap() *= 10;
        *list.back_mut().unwrap() *= 10;
        assert_eq!(Vec::from_iter(list), vec![10, 2, 30]);

        let mut empty = List::<i32>::new();
        assert_eq!(empty.front_mut(), None);
        assert_eq!(empty.back_mut(), None);
    }

    #[test]
    fn list_append_and_prepend() {
        fn test_append_and_prepend(list: &[i32], other: &[i32]) {
            let expected = Vec::from_iter(list.iter().chain(other).copied());

            let mut appended = List::from_iter(list.iter().copied());
            let mut tail = List::from_iter(other.iter().copied());
            appended.append(&mut tail);
            check_links(&appended);
            check_links(&tail);
            assert!(tail.is_empty());
            assert_eq!(Vec::from_iter(appended), expected);

            let mut head = List::from_iter(list.iter().copied());
            let mut prepended = List::from_iter(other.iter().copied());
            prepended.prepend(&mut head);
            check_links(&prepended);
            check_links(&head);
            assert!(head.is_empty());
            assert_eq!(Vec::from_iter(prepended), expected);
        }
        test_append_and_prepend(&[0, 1, 2], &[3, 4]);
        test_append_and_prepend(&[0, 1, 2], &[]);
        test_append_and_prepend(&[], &[3, 4]);
        test_append_and_prepend(&[], &[]);
        test_append_and_prepend(&[0], &[1]);
    }

    #[test]
    fn list_swap() {
        let mut list1 = List::from_iter([1, 2, 3]);
        let mut list2 = List::from_iter([4]);
        let (end1, end2) = (list1.end(), list2.end());
        let two = unsafe { list1.begin().next() };
        let four = list2.begin();

        list1.swap(&mut list2);
        check_links(&list1);
        check_links(&list2);
        assert_eq!(Vec::from_iter(list1.iter().copied()), vec![4]);
        assert_eq!(Vec::from_iter(list2.iter().copied()), vec![1, 2, 3]);

        // Ghost nodes stay with their lists, elements move.
        assert_eq!(list1.end(), end1);
        assert_eq!(list2.end(), end2);
        unsafe {
            assert_eq!(list2.get(two), Some(&2));
            assert_eq!(list1.get(four), Some(&4));
            assert_eq!(two.next(), list2.begin().next().next());
            assert_eq!(four.next(), list1.end());
        }
    }

    #[test]
    fn list_swap_with_empty() {
        let mut list1 = List::from_iter([1, 2]);
        let mut list2 = List::new();

        list1.swap(&mut list2);
        check_links(&list1);
        check_links(&list2);
        assert!(list1.is_empty());
        assert_eq!(Vec::from_iter(list2.iter().copied()), vec![1, 2]);

        list1.swap(&mut list2);
        assert!(list2.is_empty());
        assert_eq!(Vec::from_iter(list1.iter().copied()), vec![1, 2]);

        let mut empty1 = List::<i32>::new();
        let mut empty2 = List::<i32>::new();
        empty1.swap(&mut empty2);
        check_links(&empty1);
        check_links(&empty2);
        assert!(empty1.is_empty() && empty2.is_empty());
    }

    #[test]
    fn list_len() {
        let mut list = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        list.push_back(1);
        assert_eq!(list.len(), 1);

        list.pop_front();
        assert_eq!(list.len(), 0);

        list.append(&mut List::from_iter(0..5));
        assert_eq!(list.len(), 5);

        list.prepend(&mut List::from_iter(7..10));
        assert_eq!(list.len(), 8);

        let mut other = List::from_iter(0..2);
        list.swap(&mut other);
        assert_eq!(list.len(), 2);
        assert_eq!(other.len(), 8);

        list.clear();
        assert_eq!(list.len(), 0);
    }
}
