pub(crate) type PremulRgba8 = [u8; 4];

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Source-over for premultiplied pixels.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Bilinear blend of four premultiplied texels with fractional weights `fx`, `fy` in `[0,1]`.
pub(crate) fn bilerp(
    tl: PremulRgba8,
    tr: PremulRgba8,
    bl: PremulRgba8,
    br: PremulRgba8,
    fx: f64,
    fy: f64,
) -> PremulRgba8 {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(tl[i]) + (f64::from(tr[i]) - f64::from(tl[i])) * fx;
        let bottom = f64::from(bl[i]) + (f64::from(br[i]) - f64::from(bl[i])) * fx;
        out[i] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    // Rounding each channel independently can push colour above alpha; keep it premultiplied.
    for i in 0..3 {
        out[i] = out[i].min(out[3]);
    }
    out
}

/// Unpremultiply one pixel back to straight alpha.
pub(crate) fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = px[3];
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let a16 = u32::from(a);
            let mut out = [0u8; 4];
            for i in 0..3 {
                out[i] = ((u32::from(px[i]) * 255 + a16 / 2) / a16).min(255) as u8;
            }
            out[3] = a;
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
