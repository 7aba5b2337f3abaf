//! This crate provides a doubly-linked list with owned nodes, implemented as a
//! ring closed by a ghost node, with position handles that survive mutation.
//!
//! The [`List`] allows inserting and removing elements at any given
//! [`Position`] in constant time, and moving a whole run of elements from one
//! list to another (splicing) in constant time, without copying, allocating
//! or dropping anything.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use ring_list::List;
//! use std::iter::FromIterator;
//!
//! let mut list = List::from_iter([1, 2, 3]);
//! let mut other = List::new();
//!
//! // SAFETY: every position comes from the list it is passed to.
//! unsafe {
//!     let second = list.begin().next();
//!     list.erase(list.begin()).unwrap();
//!     assert_eq!(list.front(), Some(&2));
//!
//!     // Move everything left in `list` to the front of `other`.
//!     let (first, last) = (list.begin(), list.end());
//!     other.splice(other.begin(), &mut list, first, last);
//!
//!     // `second` followed its element into `other`.
//!     assert_eq!(other.get(second), Some(&2));
//! }
//! assert!(list.is_empty());
//! assert_eq!(Vec::from_iter(other), vec![2, 3]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║ payload T ║           ║ payload T ║                            ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                            │   │
//! │      Node 0                  Node 1                               │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║   (len)   ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a pointer `ghost` that points to the ghost node;
//! - a length field `len` indicating the length of the list. It is enabled by
//!   the `length` feature in your `Cargo.toml`:
//! ```text
//! [dependencies]
//! ring_list = { features = ["length"] }
//! ```
//!
//! Each node of the list `List<T>` is allocated on heap, and starts with the
//! same link header:
//! - the `next` pointer that points to the next element (or the ghost node if it
//!   is the last element in the list);
//! - the `prev` pointer that points to the previous element (or the ghost node if
//!   it is the first element in the list).
//!
//! Element nodes carry the payload `T` right after the header. The ghost node is
//! a bare header and has *NO* payload.
//!
//! Initially, there is a ghost node in an empty list, of which the `next` and `prev`
//! pointer point to itself. As elements are inserted into the list, `ghost.next`
//! points to the first element, and `ghost.prev` points to the last element of
//! the list. Since every node has a valid `next` and `prev`, inserting at the
//! front, at the back or in the middle is the same pointer surgery.
//!
//! # Positions
//!
//! A [`Position`] is a copyable handle to a node of a list. [`List::begin`] is
//! the first element (or the ghost node if the list is empty), and [`List::end`]
//! is always the ghost node.
//!
//! Positions do not borrow the list. A position stays valid, and keeps denoting
//! the same element, across insertions, removals of *other* elements, and
//! [`splice`]s or [`swap`]s that move its element into another list. It is
//! invalidated only when its element is dropped.
//!
//! Since the compiler cannot track that, operations taking positions are
//! `unsafe`: the caller promises that each position is still valid and belongs
//! to the list it is passed to. Everything that can be checked in constant time
//! is checked and reported instead: reading the ghost node returns `None`, and
//! erasing it returns [`ListError::GhostPosition`].
//!
//! # Iteration
//!
//! Iterating over a list is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended iterators and iterate the list like an array (fused and non-cyclic).
//! [`IterMut`] provides mutability of the elements (but not the linked structure of
//! the list). Reverse iteration is `iter().rev()`.
//!
//! ## Examples
//!
//! ```
//! use ring_list::List;
//! use std::iter::FromIterator;
//!
//! let mut list = List::from_iter([1, 2, 3]);
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&1));
//! assert_eq!(iter.next(), Some(&2));
//! assert_eq!(iter.next(), Some(&3));
//! assert_eq!(iter.next(), None);
//! assert_eq!(iter.next(), None); // Fused and non-cyclic
//!
//! assert_eq!(Vec::from_iter(list.iter().rev()), vec![&3, &2, &1]);
//!
//! list.iter_mut().for_each(|item| *item *= 2);
//! assert_eq!(Vec::from_iter(list), vec![2, 4, 6]);
//! ```
//!
//! [`List`]: crate::List
//! [`Position`]: crate::Position
//! [`Iter`]: crate::Iter
//! [`IterMut`]: crate::IterMut
//! [`ListError::GhostPosition`]: crate::ListError::GhostPosition
//! [`splice`]: crate::List::splice
//! [`swap`]: crate::List::swap

#[doc(inline)]
pub use error::ListError;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter, IterMut};
#[doc(inline)]
pub use list::position::{Position, Positions};
#[doc(inline)]
pub use list::List;

pub mod list;

mod error;
