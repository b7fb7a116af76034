//! Actors issuing edits and the policy deciding where they may build

pub mod actor;
pub mod permission;

pub use actor::{Actor, Session};
pub use permission::{AllowAll, Authorizer, DenyAll, Permission};
