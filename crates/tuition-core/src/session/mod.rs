//! Session domain module.
//!
//! - `model`: the authenticated session (`Session`, `UserRecord`, `AccessToken`)
//! - `store`: storage trait for the session of the running client

mod model;
mod store;

pub use model::{AccessToken, Session, UserRecord};
pub use store::SessionStore;
