//! Text shaping helpers shared by the offer builder.

pub mod inflect;
pub mod truncate;

pub use inflect::{NounForms, inflect};
pub use truncate::truncate;
