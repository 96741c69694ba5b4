//! Relation joins.
//!
//! - [`JoinColumns`] - which two columns a relation equates
//! - [`JoinBuilder`] - the JOIN clause with constraints and options
//! - [`OrderedHasOneJoiner`] - latest/earliest row of an ordered has-one
//! - [`one_row_condition`] - single related row for has-many joins

mod builder;
mod columns;
mod has_one;
mod window;

pub use builder::{JoinBuilder, JoinOptions};
pub use columns::JoinColumns;
pub use has_one::OrderedHasOneJoiner;
pub use window::one_row_condition;
pub(crate) use window::correlated_subquery;
