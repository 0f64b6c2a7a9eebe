//! Image decode and encode around the transform.

pub mod decode;
pub mod encode;
