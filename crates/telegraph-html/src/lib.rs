//! HTML preparation for Telegraph pages
//!
//! Telegraph accepts a small subset of HTML. This crate turns arbitrary feed
//! markup into that subset and assembles the final `Document`:
//! 1. `sanitize()` filters tags and attributes down to the allowed sets
//! 2. `Footer::render()` appends the attribution and source link
//! 3. `compose()` derives title and author fields from the feed entry

pub mod entry;
pub mod footer;
pub mod sanitize;

pub use entry::{FeedEntry, compose};
pub use footer::Footer;
pub use sanitize::{ALLOWED_ATTRS, ALLOWED_TAGS, sanitize};
