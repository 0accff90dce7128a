//! The two orchestrations and their error kinds.
//!
//! Both run strictly in sequence and stop at the first failing step. Nothing
//! already done is rolled back:
//! - [`ramify`] checks its preconditions, then mounts, extracts and chowns
//! - [`unramify`] packs, chowns the archive, then unmounts

mod error;
mod ramify;
mod unramify;

pub use error::{Operation, RamifyError};
pub use ramify::{is_empty_dir, ramify, tmpfs_capacity};
pub use unramify::unramify;
