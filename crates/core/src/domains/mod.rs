//! Built-in domain schemas.
//!
//! Each schema lists its fields in the exact order the corresponding model was trained on.
//! Encodings are fixed tables; do not "fix" an encoding that looks reversed without checking
//! the trained model.

mod cancer;
mod diabetes;
mod heart;

pub use cancer::schema as cancer;
pub use diabetes::schema as diabetes;
pub use heart::schema as heart;
