//! Pipeline module driving codec sessions over streams.

mod sync;

pub use sync::{decode, encode};
