//! Crop-vs-pad decision for a target aspect ratio.
//!
//! [`plan_fit`] classifies each axis independently as *shrink*
//! (`target <= current`) or *grow* and returns a [`FitPlan`]. The shrinking
//! axis is always cropped first, on its own, so a crop window never exceeds the
//! source on either side.
//!
//! ```
//! use aspectfit::{AspectRatio, FitAction, Gravity, KeepAxis, Size, plan_fit};
//!
//! let plan = plan_fit(
//!     Size::new(1000, 500),
//!     "16:9".parse::<AspectRatio>().unwrap(),
//!     KeepAxis::Height,
//!     Gravity::Center,
//!     Gravity::Center,
//! )
//! .unwrap();
//!
//! assert_eq!(plan.target, Size::new(889, 500));
//! assert!(matches!(plan.action, FitAction::CropOnly { .. }));
//! ```

use crate::foundation::core::{AspectRatio, Axis, Gravity, KeepAxis, Rect, Size};
use crate::foundation::error::{AspectFitError, AspectFitResult};
use crate::layout::gravity::{compute_paste_offset, crop_rect};

/// What to do with the source to reach the target size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FitAction {
    /// Both axes shrink (or match): extract `crop` and stop.
    CropOnly { crop: Rect },
    /// No axis shrinks: paste the whole source onto the canvas at `placement`.
    PadOnly { placement: (u32, u32) },
    /// One axis shrinks, `grow` grows: crop the shrinking axis, then pad `grow`.
    CropThenPad {
        grow: Axis,
        crop: Rect,
        placement: (u32, u32),
    },
}

/// Computed fit for a given source size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FitPlan {
    /// Source dimensions after orientation normalization.
    pub source: Size,
    /// Final output dimensions.
    pub target: Size,
    pub action: FitAction,
}

impl FitPlan {
    /// Whether pixels outside the source are introduced.
    pub fn needs_padding(&self) -> bool {
        !matches!(self.action, FitAction::CropOnly { .. })
    }

    /// Whether the output is the source unchanged.
    pub fn is_identity(&self) -> bool {
        match self.action {
            FitAction::CropOnly { crop } => crop.is_full(self.source),
            _ => false,
        }
    }
}

/// Largest output, in bytes of RGBA8, that a plan may ask for (1 GiB).
pub const MAX_TARGET_BYTES: u64 = 1 << 30;

/// Target dimensions for `source` at `ratio`, holding `keep` fixed.
///
/// The derived side is rounded to the nearest integer with ties away from
/// zero (`f64::round`). A derived side of zero or one that does not fit in
/// `u32` is an [`AspectFitError::InvalidDimension`], and so is a target whose
/// RGBA8 buffer would exceed [`MAX_TARGET_BYTES`].
pub fn target_size(source: Size, ratio: AspectRatio, keep: KeepAxis) -> AspectFitResult<Size> {
    if source.is_empty() {
        return Err(AspectFitError::invalid_dimension(format!(
            "source image is {source}, expected at least 1x1"
        )));
    }

    let derived = match keep {
        KeepAxis::Height => ratio.value() * f64::from(source.height),
        KeepAxis::Width => f64::from(source.width) / ratio.value(),
    };
    let rounded = derived.round();
    if !(1.0..=f64::from(u32::MAX)).contains(&rounded) {
        return Err(AspectFitError::invalid_dimension(format!(
            "aspect {} with {keep} {} gives a derived side of {derived}",
            ratio.value(),
            match keep {
                KeepAxis::Height => source.height,
                KeepAxis::Width => source.width,
            },
        )));
    }
    let derived = rounded as u32;

    let target = match keep {
        KeepAxis::Height => Size::new(derived, source.height),
        KeepAxis::Width => Size::new(source.width, derived),
    };
    let bytes = u64::from(target.width)
        .checked_mul(u64::from(target.height))
        .and_then(|px| px.checked_mul(4));
    match bytes {
        Some(b) if b <= MAX_TARGET_BYTES => Ok(target),
        _ => Err(AspectFitError::invalid_dimension(format!(
            "target {target} exceeds the {MAX_TARGET_BYTES}-byte RGBA limit"
        ))),
    }
}

/// Plan the crop/pad steps that bring `source` to `ratio`.
pub fn plan_fit(
    source: Size,
    ratio: AspectRatio,
    keep: KeepAxis,
    crop_gravity: Gravity,
    pad_gravity: Gravity,
) -> AspectFitResult<FitPlan> {
    let target = target_size(source, ratio, keep)?;
    Ok(plan_to_size(source, target, crop_gravity, pad_gravity))
}

/// Plan the crop/pad steps that bring `source` to exactly `target`.
///
/// A crop window that covers the whole source is not a crop: a growing axis
/// next to a matching one yields [`FitAction::PadOnly`].
pub fn plan_to_size(
    source: Size,
    target: Size,
    crop_gravity: Gravity,
    pad_gravity: Gravity,
) -> FitPlan {
    let grow_w = target.width > source.width;
    let grow_h = target.height > source.height;

    let action = match (grow_w, grow_h) {
        (false, false) => FitAction::CropOnly {
            crop: crop_rect(source, target, crop_gravity),
        },
        (true, true) => FitAction::PadOnly {
            placement: placement(target, source, pad_gravity),
        },
        (true, false) | (false, true) => {
            let (grow, window) = if grow_w {
                (Axis::Horizontal, Size::new(source.width, target.height))
            } else {
                (Axis::Vertical, Size::new(target.width, source.height))
            };
            let crop = crop_rect(source, window, crop_gravity);
            let placement = placement(target, crop.size(), pad_gravity);
            if crop.is_full(source) {
                FitAction::PadOnly { placement }
            } else {
                FitAction::CropThenPad {
                    grow,
                    crop,
                    placement,
                }
            }
        }
    };

    FitPlan {
        source,
        target,
        action,
    }
}

fn placement(canvas: Size, inner: Size, gravity: Gravity) -> (u32, u32) {
    compute_paste_offset(
        canvas.width,
        canvas.height,
        inner.width,
        inner.height,
        gravity,
    )
}
