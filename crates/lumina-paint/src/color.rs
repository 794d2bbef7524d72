//! Colors in gamma and linear space, with premultiplied alpha.
//!
//! [`Color32`] is what ends up in vertices: sRGBA bytes, premultiplied in
//! gamma space. [`Rgba`] is the linear-space `f32` equivalent used whenever
//! a color has to be scaled exactly.

use bytemuck::{Pod, Zeroable};

/// 8-bit sRGBA color with premultiplied alpha.
///
/// An alpha of zero with non-zero color channels is an *additive* color:
/// it brightens whatever is behind it without occluding it.
///
/// The struct is `#[repr(C)]` and [`Pod`], so it can be placed directly in
/// vertex buffers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Pod, Zeroable)]
pub struct Color32(pub(crate) [u8; 4]);

impl Color32 {
    pub const TRANSPARENT: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 0);
    pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);
    pub const DARK_GRAY: Color32 = Color32::from_rgb(96, 96, 96);
    pub const GRAY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const LIGHT_GRAY: Color32 = Color32::from_rgb(220, 220, 220);
    pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
    pub const RED: Color32 = Color32::from_rgb(255, 0, 0);
    pub const GREEN: Color32 = Color32::from_rgb(0, 255, 0);
    pub const BLUE: Color32 = Color32::from_rgb(0, 0, 255);
    pub const YELLOW: Color32 = Color32::from_rgb(255, 255, 0);
    pub const LIGHT_GREEN: Color32 = Color32::from_rgb(150, 255, 150);
    pub const LIGHT_BLUE: Color32 = Color32::from_rgb(140, 160, 255);

    /// An ugly color used to flag something that is wrong.
    pub const DEBUG_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 200, 0, 128);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// An additive color: alpha is zero.
    #[inline]
    pub const fn from_rgb_additive(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0])
    }

    /// From `sRGBA` with premultiplied alpha.
    #[inline]
    pub const fn from_rgba_premultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// From `sRGBA` without premultiplied alpha.
    ///
    /// Premultiplication happens in linear space so the result honours the
    /// `channel <= alpha` invariant there.
    pub fn from_rgba_unmultiplied(r: u8, g: u8, b: u8, a: u8) -> Self {
        match a {
            255 => Self::from_rgb(r, g, b),
            0 => Self::TRANSPARENT,
            _ => {
                let a_lin = linear_f32_from_linear_u8(a);
                Self([
                    gamma_u8_from_linear_f32(linear_f32_from_gamma_u8(r) * a_lin),
                    gamma_u8_from_linear_f32(linear_f32_from_gamma_u8(g) * a_lin),
                    gamma_u8_from_linear_f32(linear_f32_from_gamma_u8(b) * a_lin),
                    a,
                ])
            }
        }
    }

    #[inline]
    pub const fn from_gray(l: u8) -> Self {
        Self([l, l, l, 255])
    }

    #[inline]
    pub const fn from_black_alpha(a: u8) -> Self {
        Self([0, 0, 0, a])
    }

    pub fn from_white_alpha(a: u8) -> Self {
        Rgba::from_white_alpha(linear_f32_from_linear_u8(a)).into()
    }

    #[inline]
    pub const fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn a(&self) -> u8 {
        self.0[3]
    }

    /// Returns an opaque version of self.
    #[inline]
    pub fn to_opaque(self) -> Self {
        Rgba::from(self).to_opaque().into()
    }

    /// Returns an additive version of self.
    #[inline]
    pub const fn additive(self) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, 0])
    }

    /// Is the alpha zero while some color channel is not?
    #[inline]
    pub fn is_additive(self) -> bool {
        self.a() == 0 && self != Self::TRANSPARENT
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a() == 255
    }

    /// Premultiplied RGBA.
    #[inline]
    pub const fn to_array(&self) -> [u8; 4] {
        self.0
    }

    #[inline]
    pub const fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r(), self.g(), self.b(), self.a())
    }

    /// sRGBA without premultiplied alpha.
    pub fn to_srgba_unmultiplied(&self) -> [u8; 4] {
        Rgba::from(*self).to_srgba_unmultiplied()
    }

    /// Scale every channel (alpha included) by `factor` in gamma space.
    ///
    /// Cheap and monotonic, which is what fading thin lines needs.
    /// `factor` should be in `0.0..=1.0`.
    #[must_use]
    #[inline]
    pub fn gamma_multiply(self, factor: f32) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&factor),
            "gamma_multiply factor out of range: {factor}"
        );
        let Self([r, g, b, a]) = self;
        Self([
            (r as f32 * factor + 0.5) as u8,
            (g as f32 * factor + 0.5) as u8,
            (b as f32 * factor + 0.5) as u8,
            (a as f32 * factor + 0.5) as u8,
        ])
    }

    /// Scale every channel (alpha included) by `factor` in linear space.
    ///
    /// This is the physically correct way to fade a premultiplied color.
    #[must_use]
    pub fn linear_multiply(self, factor: f32) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&factor),
            "linear_multiply factor out of range: {factor}"
        );
        (Rgba::from(self) * factor).into()
    }
}

impl From<Color32> for [u8; 4] {
    fn from(color: Color32) -> Self {
        color.0
    }
}

impl std::ops::Index<usize> for Color32 {
    type Output = u8;

    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

// ----------------------------------------------------------------------------

/// Linear-space RGBA with premultiplied alpha, `f32` per channel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rgba(pub(crate) [f32; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::from_rgba_premultiplied(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::from_rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn from_rgba_premultiplied(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub fn from_rgba_unmultiplied(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r * a, g * a, b * a, a])
    }

    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    #[inline]
    pub fn from_white_alpha(a: f32) -> Self {
        debug_assert!((0.0..=1.0).contains(&a), "a: {a}");
        Self([a, a, a, a])
    }

    #[inline]
    pub fn r(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> f32 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> f32 {
        self.0[3]
    }

    /// Perceptual-ish intensity, ignoring alpha.
    #[inline]
    pub fn intensity(&self) -> f32 {
        0.3 * self.r() + 0.59 * self.g() + 0.11 * self.b()
    }

    #[must_use]
    pub fn to_opaque(&self) -> Self {
        if self.a() == 0.0 {
            // Additive or fully transparent: keep the rgb as-is.
            Self::from_rgb(self.r(), self.g(), self.b())
        } else {
            Self::from_rgb(
                self.r() / self.a(),
                self.g() / self.a(),
                self.b() / self.a(),
            )
        }
    }

    /// Unmultiply alpha and convert to sRGBA bytes.
    pub fn to_srgba_unmultiplied(&self) -> [u8; 4] {
        let [r, g, b, a] = self.to_rgba_unmultiplied();
        [
            gamma_u8_from_linear_f32(r),
            gamma_u8_from_linear_f32(g),
            gamma_u8_from_linear_f32(b),
            linear_u8_from_linear_f32(a.abs()),
        ]
    }

    /// Linear RGBA without premultiplied alpha.
    pub fn to_rgba_unmultiplied(&self) -> [f32; 4] {
        let a = self.a();
        if a == 0.0 {
            // Additive, let's assume we are black
            self.0
        } else {
            [self.r() / a, self.g() / a, self.b() / a, a]
        }
    }

    #[inline]
    pub fn to_array(&self) -> [f32; 4] {
        self.0
    }
}

impl std::ops::Mul<f32> for Rgba {
    type Output = Rgba;

    #[inline]
    fn mul(self, factor: f32) -> Rgba {
        Self([
            self.0[0] * factor,
            self.0[1] * factor,
            self.0[2] * factor,
            self.0[3] * factor,
        ])
    }
}

impl std::ops::Add for Rgba {
    type Output = Rgba;

    #[inline]
    fn add(self, rhs: Rgba) -> Rgba {
        Self([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
        ])
    }
}

impl From<Color32> for Rgba {
    fn from(srgba: Color32) -> Self {
        Self([
            linear_f32_from_gamma_u8(srgba.0[0]),
            linear_f32_from_gamma_u8(srgba.0[1]),
            linear_f32_from_gamma_u8(srgba.0[2]),
            linear_f32_from_linear_u8(srgba.0[3]),
        ])
    }
}

impl From<Rgba> for Color32 {
    fn from(rgba: Rgba) -> Self {
        Self([
            gamma_u8_from_linear_f32(rgba.0[0]),
            gamma_u8_from_linear_f32(rgba.0[1]),
            gamma_u8_from_linear_f32(rgba.0[2]),
            linear_u8_from_linear_f32(rgba.0[3]),
        ])
    }
}

// ----------------------------------------------------------------------------
// Color space conversions

/// gamma `[0, 255]` -> linear `[0, 1]`.
pub fn linear_f32_from_gamma_u8(s: u8) -> f32 {
    if s <= 10 {
        s as f32 / 3294.6
    } else {
        ((s as f32 + 14.025) / 269.025).powf(2.4)
    }
}

/// linear `[0, 255]` -> linear `[0, 1]`.
///
/// Useful for alpha-channel.
#[inline(always)]
pub fn linear_f32_from_linear_u8(a: u8) -> f32 {
    a as f32 / 255.0
}

/// linear `[0, 1]` -> gamma `[0, 255]` (clamped).
///
/// Values outside this range will be clamped to the range.
pub fn gamma_u8_from_linear_f32(l: f32) -> u8 {
    if l <= 0.0 {
        0
    } else if l <= 0.0031308 {
        fast_round(3294.6 * l)
    } else if l <= 1.0 {
        fast_round(269.025 * l.powf(1.0 / 2.4) - 14.025)
    } else {
        255
    }
}

/// linear `[0, 1]` -> linear `[0, 255]` (clamped).
///
/// Useful for alpha-channel.
#[inline(always)]
pub fn linear_u8_from_linear_f32(a: f32) -> u8 {
    fast_round(a * 255.0)
}

/// gamma `[0, 1]` -> linear `[0, 1]` (not clamped).
///
/// Works for numbers outside this range (e.g. negative numbers).
pub fn linear_from_gamma(gamma: f32) -> f32 {
    if gamma < 0.0 {
        -linear_from_gamma(-gamma)
    } else if gamma <= 0.04045 {
        gamma / 12.92
    } else {
        ((gamma + 0.055) / 1.055).powf(2.4)
    }
}

/// linear `[0, 1]` -> gamma `[0, 1]` (not clamped).
///
/// Works for numbers outside this range (e.g. negative numbers).
pub fn gamma_from_linear(linear: f32) -> f32 {
    if linear < 0.0 {
        -gamma_from_linear(-linear)
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

// `as u8` saturates, so this also clamps to `0..=255`.
#[inline(always)]
fn fast_round(r: f32) -> u8 {
    (r + 0.5) as _
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_u8_round_trip() {
        for b in 0..=255 {
            let l = linear_f32_from_gamma_u8(b);
            assert_eq!(gamma_u8_from_linear_f32(l), b, "byte {b}");
        }
    }

    #[test]
    fn test_linear_u8_round_trip() {
        for a in 0..=255 {
            assert_eq!(linear_u8_from_linear_f32(linear_f32_from_linear_u8(a)), a);
        }
    }

    #[test]
    fn test_float_gamma_round_trip() {
        for i in 0..=100 {
            let g = i as f32 / 100.0;
            assert!((gamma_from_linear(linear_from_gamma(g)) - g).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unmultiplied_respects_alpha() {
        let color = Color32::from_rgba_unmultiplied(255, 128, 0, 100);
        assert_eq!(color.a(), 100);
        let rgba = Rgba::from(color);
        assert!(rgba.r() <= rgba.a() + 1e-3);
        assert!(rgba.g() <= rgba.a() + 1e-3);
    }

    #[test]
    fn test_additive() {
        let color = Color32::from_rgb(10, 20, 30).additive();
        assert!(color.is_additive());
        assert!(!Color32::TRANSPARENT.is_additive());
    }

    #[test]
    fn test_gamma_multiply() {
        assert_eq!(Color32::WHITE.gamma_multiply(0.0), Color32::TRANSPARENT);
        assert_eq!(Color32::WHITE.gamma_multiply(1.0), Color32::WHITE);
        let half = Color32::RED.gamma_multiply(0.5);
        assert_eq!(half.to_array(), [128, 0, 0, 128]);
    }

    #[test]
    fn test_linear_multiply_fades_alpha() {
        let faded = Color32::WHITE.linear_multiply(0.5);
        assert_eq!(faded.a(), 128);
        // Linear 0.5 is brighter than gamma 0.5
        assert!(faded.r() > 128);
    }

    #[test]
    fn test_unmultiply_round_trip() {
        let srgba = [200, 100, 50, 255];
        let color = Color32::from_rgba_unmultiplied(srgba[0], srgba[1], srgba[2], srgba[3]);
        assert_eq!(color.to_srgba_unmultiplied(), srgba);
    }
}
