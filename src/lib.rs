//! Warden: identity and session lifecycle facade.
//!
//! Orchestrates a hosted identity provider's REST API to manage a user's
//! sessions, email addresses, linked OAuth accounts, and profile image, and
//! projects the responses into a normalized local model. Every command
//! returns a uniform [`ActionResult`](types::ActionResult) envelope.
//!
//! # Quick Start
//!
//! ```no_run
//! use warden::prelude::*;
//!
//! # async fn example() -> warden::error::Result<()> {
//! let facade = IdentityFacade::new(ProviderConfig::from_env())?;
//! let caller = Caller::new("user_123").with_session_id("sess_abc");
//!
//! let added = facade.add_email(&caller, "ada@example.com").await;
//! match added.error_str() {
//!     None => println!("check your inbox"),
//!     Some(kind) => println!("failed: {kind}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod avatar;
pub mod caller;
pub mod config;
pub mod device;
pub mod emails;
pub mod error;
pub mod facade;
pub mod prelude;
pub mod profile;
pub mod provider;
pub mod sessions;
pub mod types;
pub mod util;
pub mod view;
