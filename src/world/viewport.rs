//! Window sizing: camera aspect and drawing-surface resolution.

/// Logical window size plus the pixel ratio the surface is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Builds a viewport from a logical size and the display's scale factor.
    ///
    /// The pixel ratio is capped at `max_pixel_ratio`, so very dense displays
    /// render at a reduced resolution.
    pub fn new(width: f64, height: f64, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: scale_factor.min(max_pixel_ratio),
        }
    }

    /// Same as [`Viewport::new`] but starting from the physical size reported by winit.
    pub fn from_physical(
        width: u32,
        height: u32,
        scale_factor: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        Self::new(
            width as f64 / scale_factor,
            height as f64 / scale_factor,
            scale_factor,
            max_pixel_ratio,
        )
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Drawing-surface size in physical pixels, never zero.
    pub fn surface_size(&self) -> (u32, u32) {
        let scale = |logical: f64| ((logical * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// A minimised window reports a zero dimension; nothing should be drawn then.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_is_width_over_height() {
        for (width, height) in [(1200.0, 800.0), (1920.0, 1080.0), (333.0, 777.0)] {
            let viewport = Viewport::new(width, height, 1.0, 2.0);
            assert_eq!(viewport.aspect(), (width / height) as f32);
        }
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        assert_eq!(Viewport::new(800.0, 600.0, 1.0, 2.0).pixel_ratio, 1.0);
        assert_eq!(Viewport::new(800.0, 600.0, 1.5, 2.0).pixel_ratio, 1.5);
        assert_eq!(Viewport::new(800.0, 600.0, 3.0, 2.0).pixel_ratio, 2.0);
    }

    #[test]
    fn test_surface_size_uses_clamped_ratio() {
        let viewport = Viewport::new(800.0, 600.0, 3.0, 2.0);
        assert_eq!(viewport.surface_size(), (1600, 1200));
    }

    #[test]
    fn test_from_physical_recovers_logical_size() {
        let viewport = Viewport::from_physical(2400, 1600, 2.0, 2.0);
        assert_eq!(viewport.width, 1200.0);
        assert_eq!(viewport.height, 800.0);
        assert_eq!(viewport.surface_size(), (2400, 1600));
        assert_eq!(viewport.aspect(), 1.5);
    }

    #[test]
    fn test_minimised_window_is_empty() {
        assert!(Viewport::new(0.0, 600.0, 1.0, 2.0).is_empty());
        assert!(!Viewport::new(1.0, 1.0, 1.0, 2.0).is_empty());
    }
}
