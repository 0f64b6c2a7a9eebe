//! Pure geometry: gravity placement and the crop/pad plan.

pub mod gravity;
pub mod plan;
