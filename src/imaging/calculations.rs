//! Pure layout math for viewport fitting.
//!
//! Everything here is a pure function over dimensions — no I/O, no pixels —
//! so the combined-layout decision logic is unit testable without decoding a
//! single image.

/// Portrait means strictly narrower than tall. Square counts as landscape.
pub fn is_portrait(dims: (f64, f64)) -> bool {
    dims.0 < dims.1
}

/// Viewport share given to each image of a combined pair.
///
/// Halves the viewport axis whose viewport/source scale factor is the larger
/// of the two: when the height multiplier dominates, the pair stacks top and
/// bottom (halved height); otherwise it sits side by side (halved width).
pub fn combined_dimensions(target: (f64, f64), source: (f64, f64)) -> (f64, f64) {
    let multiplier_width = target.0 / source.0;
    let multiplier_height = target.1 / source.1;
    if multiplier_height > multiplier_width {
        (target.0, target.1 / 2.0)
    } else {
        (target.0 / 2.0, target.1)
    }
}

/// Fraction of the source lost to cropping when fill-fitted into `target`.
///
/// The source is scaled uniformly by the larger of the two axis ratios
/// (cover semantics), then whatever overflows the target box is cut away.
/// For a perfectly matching aspect ratio this is zero up to floating-point
/// rounding, so comparisons should tolerate a small epsilon.
pub fn cut_loss(target: (f64, f64), source: (f64, f64)) -> f64 {
    let multiplier = (target.0 / source.0).max(target.1 / source.1);
    1.0 - (target.0 * target.1) / ((source.0 * multiplier) * (source.1 * multiplier))
}

/// Largest size preserving the source aspect ratio that fits inside `target`.
/// At least one axis matches the target exactly.
pub fn fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let src_aspect = source.0 as f64 / source.1 as f64;
    let tgt_aspect = target.0 as f64 / target.1 as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: width matches, height shrinks
        let w = target.0;
        let h = ((w as f64 / src_aspect).round() as u32).max(1);
        (w, h)
    } else {
        let h = target.1;
        let w = ((h as f64 * src_aspect).round() as u32).max(1);
        (w, h)
    }
}

/// Smallest size preserving the source aspect ratio that covers `target`.
/// At least one axis matches the target exactly; the other may exceed it.
pub fn fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let src_aspect = source.0 as f64 / source.1 as f64;
    let tgt_aspect = target.0 as f64 / target.1 as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height matches, width overflows
        let h = target.1;
        let w = ((h as f64 * src_aspect).round() as u32).max(1);
        (w, h)
    } else {
        let w = target.0;
        let h = ((w as f64 / src_aspect).round() as u32).max(1);
        (w, h)
    }
}
