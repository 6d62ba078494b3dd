//! Input/output helpers.
//!
//! - value sources + batched line reading (`source`)
//! - record tokenizing (`tokens`)
//! - histogram output (`emit`)
//! - JSON run summary (`summary`)

pub mod emit;
pub mod source;
pub mod summary;
pub mod tokens;

pub use emit::*;
pub use source::*;
pub use summary::*;
pub use tokens::*;
