//! Core types for Warden.

pub mod action;
pub mod avatar;
pub mod email;
pub mod external;
pub mod profile;
pub mod session;

pub use action::*;
pub use avatar::*;
pub use email::*;
pub use external::*;
pub use profile::*;
pub use session::*;
