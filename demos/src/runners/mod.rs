//! Algorithm runners for the demos.

mod walkthrough;

pub use walkthrough::{Walkthrough, WalkthroughStep};
