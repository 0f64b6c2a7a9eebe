use image::{DynamicImage, RgbaImage, imageops};

use crate::foundation::core::{AspectRatio, Gravity, KeepAxis, Rect, Rgba8, Size};
use crate::foundation::error::AspectFitResult;
use crate::layout::plan::{FitAction, FitPlan, plan_fit};

/// Settings for one aspect-fit transform.
///
/// ```
/// use aspectfit::{FitOptions, Gravity, KeepAxis, Rgba8};
///
/// let opts = FitOptions::new("4:5".parse().unwrap())
///     .keep(KeepAxis::Width)
///     .crop_gravity(Gravity::Top)
///     .pad_color(Rgba8::white());
///
/// let src = image::DynamicImage::new_rgb8(400, 300);
/// let out = opts.apply(&src).unwrap();
/// assert_eq!(out.dimensions(), (400, 500));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
    pub aspect: AspectRatio,
    pub keep: KeepAxis,
    pub crop_gravity: Gravity,
    pub pad_gravity: Gravity,
    pub pad_color: Rgba8,
}

impl FitOptions {
    /// Keep height, center both steps, pad with transparent black.
    pub fn new(aspect: AspectRatio) -> Self {
        Self {
            aspect,
            keep: KeepAxis::default(),
            crop_gravity: Gravity::default(),
            pad_gravity: Gravity::default(),
            pad_color: Rgba8::transparent(),
        }
    }

    pub fn keep(mut self, keep: KeepAxis) -> Self {
        self.keep = keep;
        self
    }

    pub fn crop_gravity(mut self, gravity: Gravity) -> Self {
        self.crop_gravity = gravity;
        self
    }

    pub fn pad_gravity(mut self, gravity: Gravity) -> Self {
        self.pad_gravity = gravity;
        self
    }

    pub fn pad_color(mut self, color: Rgba8) -> Self {
        self.pad_color = color;
        self
    }

    /// Plan the fit for a source of `size` without touching pixels.
    pub fn plan(&self, size: Size) -> AspectFitResult<FitPlan> {
        plan_fit(
            size,
            self.aspect,
            self.keep,
            self.crop_gravity,
            self.pad_gravity,
        )
    }

    /// Run the transform on `image`. See [`fit`].
    pub fn apply(&self, image: &DynamicImage) -> AspectFitResult<RgbaImage> {
        fit(
            image,
            self.aspect,
            self.keep,
            self.crop_gravity,
            self.pad_gravity,
            self.pad_color,
        )
    }
}

/// Crop and/or pad `image` to `aspect`, holding `keep` fixed.
///
/// The input is converted to RGBA8 and never modified; the result is a new
/// buffer of exactly the planned target size. Orientation metadata is applied
/// by the loader (see [`crate::load_image`]) before this point.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn fit(
    image: &DynamicImage,
    aspect: AspectRatio,
    keep: KeepAxis,
    crop_gravity: Gravity,
    pad_gravity: Gravity,
    pad_color: Rgba8,
) -> AspectFitResult<RgbaImage> {
    let plan = plan_fit(
        Size::new(image.width(), image.height()),
        aspect,
        keep,
        crop_gravity,
        pad_gravity,
    )?;
    tracing::debug!(target_size = %plan.target, action = ?plan.action, "planned fit");

    let rgba = image.to_rgba8();
    Ok(apply_plan(&rgba, &plan, pad_color))
}

/// Execute a [`FitPlan`] on an RGBA8 buffer whose size is `plan.source`.
pub fn apply_plan(rgba: &RgbaImage, plan: &FitPlan, pad_color: Rgba8) -> RgbaImage {
    if plan.is_identity() {
        return rgba.clone();
    }

    match plan.action {
        FitAction::CropOnly { crop } => crop_to(rgba, crop),
        FitAction::PadOnly { placement } => pad_onto(rgba, plan.target, placement, pad_color),
        FitAction::CropThenPad {
            crop, placement, ..
        } => pad_onto(&crop_to(rgba, crop), plan.target, placement, pad_color),
    }
}

fn crop_to(rgba: &RgbaImage, r: Rect) -> RgbaImage {
    imageops::crop_imm(rgba, r.x, r.y, r.width, r.height).to_image()
}

/// Straight copy onto a filled canvas: source pixels replace canvas pixels,
/// alpha included.
fn pad_onto(rgba: &RgbaImage, canvas: Size, at: (u32, u32), color: Rgba8) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, color.to_pixel());
    imageops::replace(&mut out, rgba, i64::from(at.0), i64::from(at.1));
    out
}
