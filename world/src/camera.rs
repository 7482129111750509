//! Viewport camera translating between screen and world coordinates.

use path_defence_core::{Rect, Vector2};

/// Smallest supported zoom factor.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest supported zoom factor.
pub const MAX_ZOOM: f32 = 3.0;

const FOLLOW_RATE: f32 = 0.1;
const REST_ZOOM: f32 = 1.0;

/// Camera with an upper-left origin and a zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    x: f32,
    y: f32,
    zoom: f32,
    width: f32,
    height: f32,
}

impl Camera {
    /// Creates a camera at the origin for a viewport of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: REST_ZOOM,
            width,
            height,
        }
    }

    /// Eases the camera so that `target` drifts towards the viewport centre.
    ///
    /// The zoom eases back towards 1 at the same rate.
    pub fn update(&mut self, target: Vector2) {
        self.x += (target.x - self.width / 2.0 / self.zoom - self.x) * FOLLOW_RATE;
        self.y += (target.y - self.height / 2.0 / self.zoom - self.y) * FOLLOW_RATE;
        self.zoom += (REST_ZOOM - self.zoom) * FOLLOW_RATE;
    }

    /// Sets the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Moves the camera opposite to a screen-space drag.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.x -= dx / self.zoom;
        self.y -= dy / self.zoom;
    }

    /// World position under a screen position.
    #[must_use]
    pub fn world_position(&self, screen: Vector2) -> Vector2 {
        Vector2::new(self.x + screen.x / self.zoom, self.y + screen.y / self.zoom)
    }

    /// Screen position of a world position.
    #[must_use]
    pub fn screen_position(&self, world: Vector2) -> Vector2 {
        Vector2::new((world.x - self.x) * self.zoom, (world.y - self.y) * self.zoom)
    }

    /// World-space rectangle covered by the viewport.
    #[must_use]
    pub fn visible_bounds(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width / self.zoom,
            self.height / self.zoom,
        )
    }

    /// Reports whether a point padded by `size` overlaps the visible bounds.
    #[must_use]
    pub fn is_visible(&self, point: Vector2, size: f32) -> bool {
        let bounds = self.visible_bounds();
        !(point.x + size < bounds.x
            || point.x - size > bounds.x + bounds.width
            || point.y + size < bounds.y
            || point.y - size > bounds.y + bounds.height)
    }

    /// Upper-left corner in world units.
    #[must_use]
    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Viewport size in screen units.
    #[must_use]
    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(10.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
        camera.set_zoom(0.1);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.set_zoom(f32::NAN);
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn screen_and_world_positions_are_inverse() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(2.0);
        camera.pan(-100.0, 40.0);

        let world = Vector2::new(123.0, -45.0);
        let round_trip = camera.world_position(camera.screen_position(world));
        assert!((round_trip.x - world.x).abs() < 1e-3);
        assert!((round_trip.y - world.y).abs() < 1e-3);
        assert_eq!(camera.origin(), Vector2::new(50.0, -20.0));
    }

    #[test]
    fn visible_bounds_match_world_position_of_corners() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(2.0);
        let bounds = camera.visible_bounds();

        assert_eq!(camera.world_position(Vector2::ZERO), Vector2::new(bounds.x, bounds.y));
        assert_eq!(
            camera.world_position(Vector2::new(800.0, 600.0)),
            Vector2::new(bounds.x + bounds.width, bounds.y + bounds.height)
        );
        assert!(camera.is_visible(Vector2::new(399.0, 299.0), 0.0));
        assert!(!camera.is_visible(Vector2::new(500.0, 10.0), 50.0));
        assert!(camera.is_visible(Vector2::new(420.0, 10.0), 25.0));
    }

    #[test]
    fn following_the_map_centre_settles_at_origin() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_zoom(3.0);
        camera.pan(300.0, 300.0);

        for _ in 0..300 {
            camera.update(Vector2::new(400.0, 300.0));
        }

        assert!((camera.zoom() - 1.0).abs() < 1e-3);
        assert!(camera.origin().x.abs() < 1e-2);
        assert!(camera.origin().y.abs() < 1e-2);
    }
}
