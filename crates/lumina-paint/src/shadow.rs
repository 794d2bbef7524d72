use lumina_core::geometry::Rect;
use lumina_core::math::Vec2;

use crate::{Color32, RectShape, Rounding};

/// The color and fuzziness of a fuzzy shape.
///
/// Can be used for a rectangular shadow with a soft penumbra.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Shadow {
    /// Move the shadow by this much.
    ///
    /// For instance, a value of `(1.0, 2.0)` will move the shadow 1 point to
    /// the right and 2 points down, causing a drop-shadow effect.
    pub offset: Vec2,

    /// The width of the blur, i.e. the width of the fuzzy penumbra.
    ///
    /// A value of 0.0 means a sharp shadow.
    pub blur: f32,

    /// Expand the shadow in all directions by this much.
    pub spread: f32,

    /// Color of the opaque center of the shadow.
    pub color: Color32,
}

/// How far something extends past each side of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margin {
    /// Total horizontal and vertical extent.
    #[inline]
    pub fn sum(&self) -> Vec2 {
        Vec2::new(self.left + self.right, self.top + self.bottom)
    }
}

impl Shadow {
    /// No shadow at all.
    pub const NONE: Self = Self {
        offset: Vec2::ZERO,
        blur: 0.0,
        spread: 0.0,
        color: Color32::TRANSPARENT,
    };

    /// The argument is the rectangle of the shadow caster.
    pub fn as_shape(&self, rect: Rect, rounding: impl Into<Rounding>) -> RectShape {
        let Self {
            offset,
            blur,
            spread,
            color,
        } = *self;

        let rect = rect.translate(offset).expand(spread);
        let rounding = rounding.into() + spread;

        RectShape::filled(rect, rounding, color).with_blur_width(blur)
    }

    /// How much larger than the caster the painted shadow is on each side.
    pub fn margin(&self) -> Margin {
        let Self {
            offset,
            blur,
            spread,
            color: _,
        } = *self;
        let extent = spread + 0.5 * blur;
        Margin {
            left: extent - offset.x,
            right: extent + offset.x,
            top: extent - offset.y,
            bottom: extent + offset.y,
        }
    }
}
