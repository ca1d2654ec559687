//! Content placement within a bounding box
//!
//! This module handles the geometry of drawing one piece of content:
//! - Rotation-aware fit (90°/270° swap width and height before comparing)
//! - The user's scale percentage
//! - Centering, compensating for rotation pivoting around a corner

use crate::types::{Rotation, Scale};

use super::{Placement, Rect};

/// What happens when scaled content is larger than its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Content may grow past the box (a full page zoomed above 100%)
    Overflow,
    /// Content is shrunk until its rotated bounds fit the box (N-up cells)
    Contain,
}

/// Plan how content of a natural size is drawn inside `bounds`.
///
/// The content is first fitted so that its rotated outline fits the box
/// (never enlarged), then multiplied by the scale percentage. With
/// [`FitMode::Contain`] the result is shrunk again if the percentage pushed
/// it past the box. The returned origin keeps the visible, rotated content
/// centred on the box.
///
/// # Arguments
/// * `bounds` - The box to place into
/// * `content_width` - Natural width of the content in points
/// * `content_height` - Natural height of the content in points
/// * `scale` - User scale percentage
/// * `rotation` - Rotation applied around the content's centre
/// * `fit` - Whether the result must stay inside the box
pub fn plan_placement(
    bounds: &Rect,
    content_width: f32,
    content_height: f32,
    scale: Scale,
    rotation: Rotation,
    fit: FitMode,
) -> Placement {
    if content_width <= 0.0 || content_height <= 0.0 {
        return Placement {
            x: bounds.center_x(),
            y: bounds.center_y(),
            width: 0.0,
            height: 0.0,
            scale: 0.0,
            rotation,
        };
    }

    let (turned_width, turned_height) = if rotation.is_quarter_turn() {
        (content_height, content_width)
    } else {
        (content_width, content_height)
    };

    let rotation_fit = fit_factor(bounds, turned_width, turned_height);
    let mut factor = rotation_fit * scale.factor();

    if fit == FitMode::Contain {
        factor *= fit_factor(bounds, turned_width * factor, turned_height * factor);
    }

    let width = content_width * factor;
    let height = content_height * factor;
    let (x, y) = centered_origin(bounds, width, height, rotation);

    Placement {
        x,
        y,
        width,
        height,
        scale: factor,
        rotation,
    }
}

/// Largest factor ≤ 1 that fits `width × height` into `bounds`.
fn fit_factor(bounds: &Rect, width: f32, height: f32) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (bounds.width / width).min(bounds.height / height).clamp(0.0, 1.0)
}

/// Origin of the content's lower-left corner such that, once rotated about
/// that corner, the content's centre lands on the centre of `bounds`.
fn centered_origin(bounds: &Rect, width: f32, height: f32, rotation: Rotation) -> (f32, f32) {
    let (sin, cos) = rotation.sin_cos();
    let half_width = width / 2.0;
    let half_height = height / 2.0;

    let x = bounds.center_x() - (half_width * cos - half_height * sin);
    let y = bounds.center_y() - (half_width * sin + half_height * cos);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.001;

    fn page() -> Rect {
        Rect::new(0.0, 0.0, 600.0, 800.0)
    }

    fn pct(value: f32) -> Scale {
        Scale::new(value).unwrap()
    }

    /// Visible outline of a placement as (left, bottom, right, top)
    fn outline(p: &Placement) -> (f32, f32, f32, f32) {
        let m = p.matrix();
        let w = p.width / p.scale;
        let h = p.height / p.scale;
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
            .map(|(u, v)| (m[0] * u + m[2] * v + m[4], m[1] * u + m[3] * v + m[5]));
        let xs = corners.map(|c| c.0);
        let ys = corners.map(|c| c.1);
        (
            xs.iter().cloned().fold(f32::MAX, f32::min),
            ys.iter().cloned().fold(f32::MAX, f32::min),
            xs.iter().cloned().fold(f32::MIN, f32::max),
            ys.iter().cloned().fold(f32::MIN, f32::max),
        )
    }

    #[test]
    fn test_passthrough_is_identity() {
        let p = plan_placement(
            &page(),
            600.0,
            800.0,
            Scale::IDENTITY,
            Rotation::None,
            FitMode::Overflow,
        );
        assert_eq!(p.matrix(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!((p.width, p.height), (600.0, 800.0));
    }

    #[test]
    fn test_quarter_turn_fits_swapped_box() {
        let p = plan_placement(
            &page(),
            600.0,
            800.0,
            Scale::IDENTITY,
            Rotation::Clockwise90,
            FitMode::Overflow,
        );
        // Rotated outline is 800 wide, must fit 600 → factor 0.75
        assert!((p.scale - 0.75).abs() < EPS);
        let (w, h) = p.visible_size();
        assert!((w - 600.0).abs() < EPS);
        assert!((h - 450.0).abs() < EPS);
    }

    #[test]
    fn test_rotated_content_stays_centered() {
        for rotation in [
            Rotation::None,
            Rotation::Clockwise90,
            Rotation::Clockwise180,
            Rotation::Clockwise270,
        ] {
            let p = plan_placement(
                &page(),
                600.0,
                800.0,
                pct(50.0),
                rotation,
                FitMode::Overflow,
            );
            let (left, bottom, right, top) = outline(&p);
            assert!(((left + right) / 2.0 - 300.0).abs() < EPS, "{rotation:?}");
            assert!(((bottom + top) / 2.0 - 400.0).abs() < EPS, "{rotation:?}");
            assert!(left >= -EPS && right <= 600.0 + EPS, "{rotation:?}");
        }
    }

    #[test]
    fn test_overflow_allows_zoom() {
        let p = plan_placement(
            &page(),
            600.0,
            800.0,
            pct(200.0),
            Rotation::None,
            FitMode::Overflow,
        );
        assert_eq!((p.width, p.height), (1200.0, 1600.0));
        assert_eq!((p.x, p.y), (-300.0, -400.0));
    }

    #[test]
    fn test_contain_clamps_to_cell() {
        let cell = Rect::new(10.0, 10.0, 280.0, 380.0);
        let p = plan_placement(
            &cell,
            600.0,
            800.0,
            pct(200.0),
            Rotation::Clockwise270,
            FitMode::Contain,
        );
        let (left, bottom, right, top) = outline(&p);
        assert!(left >= cell.x - EPS && right <= cell.right() + EPS);
        assert!(bottom >= cell.y - EPS && top <= cell.top() + EPS);
    }

    #[test]
    fn test_small_content_not_enlarged() {
        let p = plan_placement(
            &page(),
            100.0,
            50.0,
            Scale::IDENTITY,
            Rotation::None,
            FitMode::Contain,
        );
        assert_eq!((p.width, p.height), (100.0, 50.0));
        assert_eq!((p.x, p.y), (250.0, 375.0));
    }

    #[test]
    fn test_degenerate_content() {
        let p = plan_placement(
            &page(),
            0.0,
            800.0,
            Scale::IDENTITY,
            Rotation::None,
            FitMode::Overflow,
        );
        assert_eq!(p.scale, 0.0);
    }
}
