//! Category-dispatched view operations.
//!
//! | Trait              | Receiver                  |
//! |--------------------|---------------------------|
//! | [`SequenceOps`]    | sequence                  |
//! | [`TextOps`]        | text scalar               |
//! | [`PolymorphicOps`] | sequence or text scalar   |
//!
//! All three are implemented by [`Store`](crate::Store); each call checks the
//! receiver's current shape and fails with
//! [`ViewError::CategoryMismatch`](crate::ViewError::CategoryMismatch) when it
//! does not fit.

pub mod polymorphic;
pub mod sequence;
pub mod text;

pub use polymorphic::PolymorphicOps;
pub use sequence::{Children, SequenceOps};
pub use text::TextOps;
