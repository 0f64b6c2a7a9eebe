#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod fit;
pub mod foundation;
pub mod io;
pub mod layout;
pub mod shift;

pub use batch::{BatchJob, BatchReport, FileOutcome, output_path, process_one, run};
pub use config::merge::{
    ConflictPolicy, ListStrategy, MergeOptions, deep_merge, merge_layers, read_json,
};
pub use config::options::{JobConfig, ResolvedJob};
pub use fit::{FitOptions, apply_plan, fit};
pub use foundation::core::{AspectRatio, Axis, Gravity, KeepAxis, Rect, Rgba8, Size};
pub use foundation::error::{AspectFitError, AspectFitResult};
pub use io::decode::{load_image, load_image_from_memory};
pub use io::encode::{
    DEFAULT_FORMAT, DEFAULT_JPEG_QUALITY, SaveOptions, save_dynamic_image, save_image,
};
pub use layout::gravity::{compute_crop_offset, compute_paste_offset, crop_rect};
pub use layout::plan::{
    FitAction, FitPlan, MAX_TARGET_BYTES, plan_fit, plan_to_size, target_size,
};
pub use shift::shift_right;
