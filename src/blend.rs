use crate::{
    buffer::{FrameRGB, ensure_same_dimensions},
    error::{MorphixError, MorphixResult},
};

/// Mixing factor as an integer percentage. 0 keeps the base frame untouched,
/// 100 replaces it with the target frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MixFactor(u8);

impl MixFactor {
    pub const ZERO: MixFactor = MixFactor(0);
    pub const HALF: MixFactor = MixFactor(50);
    pub const FULL: MixFactor = MixFactor(100);

    pub fn percent(p: u32) -> MorphixResult<Self> {
        if p > 100 {
            return Err(MorphixError::validation(format!(
                "mix factor {p} out of range 0..=100"
            )));
        }
        Ok(Self(p as u8))
    }

    /// Clamp a fraction in [0, 1] and round to the nearest percent.
    pub fn from_fraction(f: f32) -> Self {
        let f = if f.is_finite() { f.clamp(0.0, 1.0) } else { 0.0 };
        Self((f * 100.0).round() as u8)
    }

    /// For callers that have already validated the range.
    pub(crate) fn from_validated(p: u8) -> Self {
        debug_assert!(p <= 100);
        Self(p)
    }

    pub fn as_percent(self) -> u8 {
        self.0
    }

    pub fn as_fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl std::fmt::Display for MixFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Convex combination of two channel samples in the percent domain,
/// divided with round-half-up. Exact at both endpoints.
#[inline]
fn lerp_u8(a: u8, b: u8, pct: u16) -> u8 {
    let acc = u32::from(a) * u32::from(100 - pct) + u32::from(b) * u32::from(pct);
    ((acc + 50) / 100) as u8
}

/// Blend `a` toward `b` by `mix`, writing into `dst`.
///
/// All three frames must share the same dimensions; a mismatch is a hard error
/// and `dst` is left untouched.
pub fn blend_into(
    dst: &mut FrameRGB,
    a: &FrameRGB,
    b: &FrameRGB,
    mix: MixFactor,
) -> MorphixResult<()> {
    ensure_same_dimensions(a, b)?;
    ensure_same_dimensions(dst, a)?;

    let pct = u16::from(mix.as_percent());
    for ((d, a), b) in dst
        .data
        .iter_mut()
        .zip(a.data.iter())
        .zip(b.data.iter())
    {
        *d = lerp_u8(*a, *b, pct);
    }
    Ok(())
}

/// Blend `a` toward `b` by `mix` into a fresh frame.
pub fn blend(a: &FrameRGB, b: &FrameRGB, mix: MixFactor) -> MorphixResult<FrameRGB> {
    let mut dst = FrameRGB::new(a.width, a.height)?;
    blend_into(&mut dst, a, b, mix)?;
    Ok(dst)
}
