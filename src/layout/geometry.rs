use eframe::egui::{Vec2, vec2};

/// Translation that moves the segment `point0 -> point1` sideways by
/// `target_distance`, whatever its slope.
///
/// Horizontal segments are shifted straight down (`(0, d)`). Two reciprocal
/// edges given opposite distances therefore bow apart symmetrically.
pub fn calc_translation(target_distance: f32, point0: Vec2, point1: Vec2) -> Vec2 {
    let dx = point1.x - point0.x;
    let dy = point1.y - point0.y;

    if dy == 0.0 {
        return vec2(0.0, target_distance);
    }

    let angle = (dx / dy).atan();
    vec2(-target_distance * angle.cos(), target_distance * angle.sin())
}

/// Keeps `value` within `[padding, extent - padding]`.
///
/// The low bound is tested first, so a viewport smaller than twice the
/// padding pins everything left of it to `padding` and the rest to
/// `extent - padding`.
pub fn clamp_axis(value: f32, extent: f32, padding: f32) -> f32 {
    if value <= padding {
        padding
    } else if value >= extent - padding {
        extent - padding
    } else {
        value
    }
}

/// Arrowhead triangle `(tip, left, right)` for a segment ending at `end`,
/// with the tip pulled back by `inset` along the segment.
pub fn arrowhead(start: Vec2, end: Vec2, inset: f32, size: f32) -> [Vec2; 3] {
    let delta = end - start;
    let length = delta.length();
    let direction = if length > 1e-6 {
        delta / length
    } else {
        vec2(1.0, 0.0)
    };
    let normal = vec2(-direction.y, direction.x);

    let tip = end - direction * inset;
    let base = tip - direction * size;
    let half_width = size * 0.5;

    [tip, base + normal * half_width, base - normal * half_width]
}
