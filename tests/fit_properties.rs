use aspectfit::{
    AspectRatio, FitAction, FitOptions, Gravity, KeepAxis, Rgba8, Size, plan_fit, target_size,
};
use image::{DynamicImage, Rgba, RgbaImage};

fn ratio(s: &str) -> AspectRatio {
    s.parse().unwrap()
}

fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 128, 255])
    }))
}

const GRAVITIES: [Gravity; 5] = [
    Gravity::Center,
    Gravity::Top,
    Gravity::Bottom,
    Gravity::Left,
    Gravity::Right,
];

#[test]
fn output_ratio_is_within_one_pixel_of_target() {
    let sizes = [(1, 1), (3, 7), (640, 480), (1000, 500), (333, 999), (1920, 1080)];
    let ratios = ["16:9", "4:5", "1:1", "3:2", "9:16", "2.39"];

    for &(w, h) in &sizes {
        for r in ratios {
            let r = ratio(r);
            for keep in [KeepAxis::Width, KeepAxis::Height] {
                let Ok(t) = target_size(Size::new(w, h), r, keep) else {
                    continue;
                };
                match keep {
                    KeepAxis::Height => {
                        assert_eq!(t.height, h);
                        let exact = r.value() * f64::from(h);
                        assert!((f64::from(t.width) - exact).abs() <= 0.5, "{w}x{h} {r:?}");
                    }
                    KeepAxis::Width => {
                        assert_eq!(t.width, w);
                        let exact = f64::from(w) / r.value();
                        assert!((f64::from(t.height) - exact).abs() <= 0.5, "{w}x{h} {r:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn output_dimensions_match_plan_for_every_gravity() {
    let src = gradient(301, 157);
    for r in ["16:9", "1:1", "9:16", "5:4"] {
        for g in GRAVITIES {
            let opts = FitOptions::new(ratio(r)).crop_gravity(g).pad_gravity(g);
            let plan = opts.plan(Size::new(301, 157)).unwrap();
            let out = opts.apply(&src).unwrap();
            assert_eq!(out.dimensions(), (plan.target.width, plan.target.height));
        }
    }
}

#[test]
fn fitting_twice_changes_nothing() {
    let src = gradient(517, 233);
    for keep in [KeepAxis::Width, KeepAxis::Height] {
        let opts = FitOptions::new(ratio("4:3"))
            .keep(keep)
            .pad_color(Rgba8::white());
        let once = opts.apply(&src).unwrap();
        let twice = opts.apply(&DynamicImage::ImageRgba8(once.clone())).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn example_wide_source_crops_to_sixteen_nine() {
    let plan = plan_fit(
        Size::new(1000, 500),
        ratio("16:9"),
        KeepAxis::Height,
        Gravity::Center,
        Gravity::Center,
    )
    .unwrap();
    assert_eq!(plan.target, Size::new(889, 500));
    assert!(matches!(plan.action, FitAction::CropOnly { crop } if crop.x == 55));
}

#[test]
fn example_square_source_pads_to_sixteen_nine() {
    let out = FitOptions::new(ratio("16:9"))
        .pad_color(Rgba8::black())
        .apply(&gradient(500, 500))
        .unwrap();
    assert_eq!(out.dimensions(), (889, 500));
    assert_eq!(out.get_pixel(193, 250), &Rgba([0, 0, 0, 255]));
    assert_eq!(out.get_pixel(194, 250), &Rgba([0, (250 * 13 % 256) as u8, 128, 255]));
    assert_eq!(out.get_pixel(694, 250), &Rgba([0, 0, 0, 255]));
}

#[test]
fn example_keep_width_portrait() {
    let out = FitOptions::new(ratio("9:16"))
        .keep(KeepAxis::Width)
        .pad_gravity(Gravity::Top)
        .apply(&gradient(900, 900))
        .unwrap();
    assert_eq!(out.dimensions(), (900, 1600));
    // Top gravity leaves all padding below the image.
    assert_eq!(out.get_pixel(0, 899)[3], 255);
    assert_eq!(out.get_pixel(0, 900), &Rgba([0, 0, 0, 0]));
}

#[test]
fn example_exact_ratio_is_identity() {
    let src = gradient(160, 90);
    let out = FitOptions::new(ratio("16:9")).apply(&src).unwrap();
    assert_eq!(out, src.to_rgba8());
}

#[test]
fn degenerate_inputs_error() {
    let opts = FitOptions::new(ratio("1:1"));
    assert!(opts.apply(&DynamicImage::new_rgba8(0, 10)).is_err());
    assert!("0:1".parse::<AspectRatio>().is_err());
    assert!("-2".parse::<AspectRatio>().is_err());
}
