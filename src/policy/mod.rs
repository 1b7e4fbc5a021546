//! Route classification and the role policy.
//!
//! A [`PolicyTable`] turns a raw path into a [`Route`] and a
//! [`Resolution`](crate::auth::Resolution) into a [`Verdict`](crate::Verdict).
//! It does no I/O; resolving the credential and bounding that call in time is
//! the [`Gate`](crate::Gate)'s job.
//!
//! Role rules run in a fixed order and the first one that fires decides:
//!
//! | Order | Rule | Fires when | Redirects to |
//! |---|---|---|---|
//! | 1 | admin tier | admin path, role not admitted | dashboard |
//! | 2 | superadmin landing | landing path, superadmin role | admin users |
//! | 3 | dashboard tier | dashboard path, role not admitted | sign-in |
//!
//! If none fires the request is allowed.

mod path;
mod rules;
mod table;

pub use path::normalize_path;
pub use table::{PolicyTable, Route, Tier};
