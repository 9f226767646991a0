use emses_toolbox_core::common::range::Range;
use plotters::style::RGBColor;

/// Colour for values that are not finite.
pub const MISSING: RGBColor = RGBColor(200, 200, 200);

/// The classic `jet` colormap, dark blue at 0 through green to dark red at 1.
pub fn jet(t: f64) -> RGBColor {
    if !t.is_finite() {
        return MISSING;
    }
    let t = t.clamp(0.0, 1.0);
    let channel = |offset: f64| {
        let c = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    RGBColor(channel(3.0), channel(2.0), channel(1.0))
}

/// Colour of `value` with `range` mapped onto the full colormap.
pub fn jet_in(range: Range<f64>, value: f64) -> RGBColor {
    if !value.is_finite() {
        return MISSING;
    }
    if range.width() <= 0.0 {
        return jet(0.5);
    }
    jet(range.map(value))
}
