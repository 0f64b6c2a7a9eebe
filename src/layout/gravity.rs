//! Crop-window and paste-offset placement by [`Gravity`].
//!
//! Pure geometry. Centering uses floor division, so on an odd difference the
//! spare pixel ends up on the right/bottom side.

use crate::foundation::core::{Axis, Gravity, Rect, Size};

/// Top-left corner of a `box_w × box_h` window inside an `outer_w × outer_h`
/// canvas.
///
/// Callers keep `box <= outer` on both axes; if not, the offset saturates to 0.
pub fn compute_crop_offset(
    outer_w: u32,
    outer_h: u32,
    box_w: u32,
    box_h: u32,
    gravity: Gravity,
) -> (u32, u32) {
    let space_x = outer_w.saturating_sub(box_w);
    let space_y = outer_h.saturating_sub(box_h);
    let x = offset_1d(space_x, gravity, Axis::Horizontal).min(space_x);
    let y = offset_1d(space_y, gravity, Axis::Vertical).min(space_y);
    (x, y)
}

/// Offset at which an `inner_w × inner_h` image is pasted onto a larger
/// `outer_w × outer_h` canvas.
pub fn compute_paste_offset(
    outer_w: u32,
    outer_h: u32,
    inner_w: u32,
    inner_h: u32,
    gravity: Gravity,
) -> (u32, u32) {
    // Same anchoring rule as the crop window; only the roles of the two boxes differ.
    compute_crop_offset(outer_w, outer_h, inner_w, inner_h, gravity)
}

/// Crop window of `size` within `outer`, anchored by `gravity`.
pub fn crop_rect(outer: Size, size: Size, gravity: Gravity) -> Rect {
    let width = size.width.min(outer.width);
    let height = size.height.min(outer.height);
    let (x, y) = compute_crop_offset(outer.width, outer.height, width, height, gravity);
    Rect::new(x, y, width, height)
}

fn offset_1d(space: u32, gravity: Gravity, axis: Axis) -> u32 {
    match (axis, gravity) {
        (Axis::Horizontal, Gravity::Left) | (Axis::Vertical, Gravity::Top) => 0,
        (Axis::Horizontal, Gravity::Right) | (Axis::Vertical, Gravity::Bottom) => space,
        _ => space / 2,
    }
}
