// Mask filters used by the combiner: elementwise max (union) and a Gaussian
// blur built from three sliding-window box passes.
//
// The blur runs on fixed-point integers so the running sums are exact: the
// result does not depend on summation history, and a larger input never
// produces a smaller output. Cost is independent of the radius.
use crate::types::Mask;

/// Number of box passes used to approximate one Gaussian.
const GAUSS_PASSES: usize = 3;

/// Fixed-point scale: 1.0 in the mask is this many units.
const ONE: u32 = 1 << 24;

/// `dst = max(dst, src)` per pixel. Both masks must share dimensions.
pub fn max_in_place(dst: &mut Mask, src: &Mask) {
    debug_assert_eq!((dst.width, dst.height), (src.width, src.height));
    for (d, &s) in dst.alpha.iter_mut().zip(&src.alpha) {
        if s > *d {
            *d = s;
        }
    }
}

/// Owned form of [`max_in_place`], handy as a reduce operator.
pub fn union(mut a: Mask, b: Mask) -> Mask {
    max_in_place(&mut a, &b);
    a
}

/// Box radii whose three successive passes approximate a Gaussian with
/// standard deviation `sigma`.
pub fn gaussian_box_radii(sigma: f64) -> [usize; GAUSS_PASSES] {
    let n = GAUSS_PASSES as f64;
    let var12 = 12.0 * sigma * sigma;
    let ideal = (var12 / n + 1.0).sqrt();

    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let l = lower as f64;
    let m = ((var12 - n * l * l - 4.0 * n * l - 3.0 * n) / (-4.0 * l - 4.0)).round();
    let m = m.clamp(0.0, n) as usize;

    let mut radii = [0; GAUSS_PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let size = if i < m { lower } else { upper };
        *r = ((size - 1) / 2) as usize;
    }
    radii
}

/// Separable box blur over a `width` x `height` plane with edge extension.
/// Pass 1 averages rows into `tmp`, pass 2 averages columns into `dst`.
pub fn box_blur(
    src: &[u32],
    tmp: &mut [u32],
    dst: &mut [u32],
    width: usize,
    height: usize,
    radius: usize,
) {
    debug_assert_eq!(src.len(), width * height);
    debug_assert_eq!(tmp.len(), src.len());
    debug_assert_eq!(dst.len(), src.len());
    if width == 0 || height == 0 {
        return;
    }
    if radius == 0 {
        dst.copy_from_slice(src);
        return;
    }

    /* ---- Pass 1: horizontal (rows of src into tmp) ---- */
    for (row, out) in src.chunks_exact(width).zip(tmp.chunks_exact_mut(width)) {
        slide(row, out, radius);
    }

    /* ---- Pass 2: vertical (columns of tmp into dst) ---- */
    let mut column = vec![0u32; height];
    let mut blurred = vec![0u32; height];
    for x in 0..width {
        for (y, c) in column.iter_mut().enumerate() {
            *c = tmp[y * width + x];
        }
        slide(&column, &mut blurred, radius);
        for (y, &v) in blurred.iter().enumerate() {
            dst[y * width + x] = v;
        }
    }
}

// Running-sum average over one line. Samples past either end repeat the edge
// pixel, so the window always holds 2r+1 samples.
fn slide(line: &[u32], out: &mut [u32], radius: usize) {
    let last = line.len() - 1;
    let px = |i: usize| u64::from(line[i.min(last)]);
    let win = 2 * radius as u64 + 1;

    // Window for x = 0 is [-r, r]: the left half is all edge pixel, and
    // anything past the right end is the last pixel again.
    let inside: u64 = line[1..=radius.min(last)].iter().map(|&v| u64::from(v)).sum();
    let past_end = radius.saturating_sub(last) as u64 * px(last);
    let mut sum = px(0) * (radius as u64 + 1) + inside + past_end;

    for (x, o) in out.iter_mut().enumerate() {
        *o = (sum / win) as u32;
        let leaving = x.saturating_sub(radius);
        let entering = x.saturating_add(radius + 1);
        sum = sum + px(entering) - px(leaving);
    }
}

fn to_fixed(a: f32) -> u32 {
    (a.clamp(0.0, 1.0) * ONE as f32).round() as u32
}

fn from_fixed(v: u32) -> f32 {
    v as f32 / ONE as f32
}

/// Gaussian blur with standard deviation `sigma`, via three box passes.
pub fn gaussian_blur(mask: &Mask, sigma: f64) -> Mask {
    let (w, h) = (mask.width, mask.height);
    let mut current: Vec<u32> = mask.alpha.iter().map(|&a| to_fixed(a)).collect();
    let mut tmp = vec![0u32; current.len()];
    let mut next = vec![0u32; current.len()];

    for radius in gaussian_box_radii(sigma) {
        box_blur(&current, &mut tmp, &mut next, w, h, radius);
        std::mem::swap(&mut current, &mut next);
    }

    Mask {
        width: w,
        height: h,
        alpha: current.into_iter().map(from_fixed).collect(),
    }
}
