//! Account linking: tying a voice identity to an account identity.
//!
//! - `identity`: resolves which account a voice identity acts for.
//! - `linking`: completes a pending link when the user speaks its code.

pub mod identity;
pub mod linking;
