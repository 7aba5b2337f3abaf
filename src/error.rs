use std::fmt;

/// Errors reported by the positional operations of a [`List`].
///
/// [`List`]: crate::List
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The position is the ghost node, which holds no element.
    GhostPosition,
    /// The destination of a splice lies inside the range being moved.
    DestinationInRange,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::GhostPosition => f.write_str("position is the ghost node of the list"),
            ListError::DestinationInRange => {
                f.write_str("splice destination lies inside the moved range")
            }
        }
    }
}

impl std::error::Error for ListError {}
