//! Feature composition functions
//!
//! Each function takes the contract plus typed options and applies a
//! bounded set of mutations. Side effects that must happen once per
//! contract (a parent import, a role grant) are gated on the "was new"
//! booleans of `add_parent` and `add_variable`, so every function here can
//! be called repeatedly for different targets.

pub mod access;
pub mod info;
pub mod pausable;
pub mod upgradeable;

pub use access::{set_access_control, Access};
pub use info::{set_info, Info};
pub use pausable::add_pausable;
pub use upgradeable::set_upgradeable;
