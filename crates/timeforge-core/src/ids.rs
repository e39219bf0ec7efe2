//! Strongly typed handles.
//!
//! Every arena-allocated object (meets, tasks, monitors, ...) and every
//! instance-model entity (events, resources, ...) is addressed by a
//! `#[repr(transparent)]` wrapper around `usize`, so handles from different
//! index spaces cannot be mixed up.
//!
//! ```
//! use timeforge_core::{EventId, Id};
//!
//! let e = EventId::new(3);
//! assert_eq!(e.index(), 3);
//! assert_eq!(format!("{}", e), "EventId(3)");
//! ```

use std::fmt;

/// Common interface of all typed handles, used by generic arenas.
pub trait Id: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    /// Creates a handle from a raw index.
    fn new(index: usize) -> Self;

    /// Returns the raw index.
    fn index(self) -> usize;
}

/// Defines a typed handle.
///
/// # Usage
/// ```ignore
/// define_id!(
///     /// Handle of a meet.
///     MeetId
/// );
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            /// Creates a handle from a raw index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl $crate::ids::Id for $name {
            #[inline]
            fn new(index: usize) -> Self {
                Self(index)
            }

            #[inline]
            fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(id: $name) -> usize {
                id.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Handle of an event in the instance.
    EventId
);
define_id!(
    /// Handle of an event resource (one resource requirement of an event).
    EventResourceId
);
define_id!(
    /// Handle of a resource in the instance.
    ResourceId
);
define_id!(
    /// Handle of a resource group in the instance.
    ResourceGroupId
);
define_id!(
    /// Handle of a constraint in the instance.
    ConstraintId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_and_display() {
        let r = ResourceId::new(7);
        assert_eq!(usize::from(r), 7);
        assert_eq!(ResourceId::from(7), r);
        assert_eq!(format!("{:?}", r), "ResourceId(7)");
    }

    #[test]
    fn test_ordering() {
        assert!(EventId::new(1) < EventId::new(2));
        assert_eq!(<EventId as Id>::new(4).index(), 4);
    }
}
