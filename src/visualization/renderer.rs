//! Paints a projected `Frame` onto a `Surface`.
//!
//! Draw order gives the layering, there is no depth buffer:
//! 1. clear, background gradient, backdrop lattice
//! 2. main sphere dots and their moons, inside the silhouette clip
//! 3. planet shells and moons
//! 4. big body shells and moons
//! 5. glow and halo overlays

use crate::device::profile::Viewport;
use crate::projection::frame::{Dot, Frame, GradientStop, Rgba};
use crate::projection::silhouette::ClipPath;
use crate::simulation::states::NVec2;

/// 2D drawing target
pub trait Surface {
    fn clear(&mut self, viewport: Viewport);
    /// Full-viewport radial gradient
    fn fill_rect_gradient(&mut self, viewport: Viewport, center: NVec2, radius: f64, stops: &[GradientStop]);
    fn fill_circle(&mut self, center: NVec2, radius: f64, color: Rgba);
    /// Ring-shaped radial gradient between `inner` and `outer`
    fn fill_circle_gradient(&mut self, center: NVec2, inner: f64, outer: f64, stops: &[GradientStop]);
    fn push_clip(&mut self, path: &ClipPath);
    fn pop_clip(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { viewport: Viewport },
    RectGradient { viewport: Viewport, center: NVec2, radius: f64, stops: Vec<GradientStop> },
    Circle { center: NVec2, radius: f64, color: Rgba, clipped: bool },
    CircleGradient { center: NVec2, inner: f64, outer: f64, stops: Vec<GradientStop> },
    PushClip { center: NVec2, max_radius: f64 },
    PopClip,
}

/// Records draw calls, dropping fills outside the active clip
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    clips: Vec<ClipPath>,
    culled: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Fills dropped by the clip since the last `clear`
    pub fn culled(&self) -> usize {
        self.culled
    }

    pub fn circle_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count()
    }

    fn visible(&mut self, center: NVec2) -> bool {
        match self.clips.last() {
            Some(clip) if !clip.contains(center) => {
                self.culled += 1;
                false
            }
            _ => true,
        }
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.commands.clear();
        self.clips.clear();
        self.culled = 0;
        self.commands.push(DrawCommand::Clear { viewport });
    }

    fn fill_rect_gradient(&mut self, viewport: Viewport, center: NVec2, radius: f64, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::RectGradient { viewport, center, radius, stops: stops.to_vec() });
    }

    fn fill_circle(&mut self, center: NVec2, radius: f64, color: Rgba) {
        if radius <= 0.0 || !self.visible(center) {
            return;
        }
        let clipped = !self.clips.is_empty();
        self.commands.push(DrawCommand::Circle { center, radius, color, clipped });
    }

    fn fill_circle_gradient(&mut self, center: NVec2, inner: f64, outer: f64, stops: &[GradientStop]) {
        if outer <= 0.0 || !self.visible(center) {
            return;
        }
        self.commands.push(DrawCommand::CircleGradient { center, inner, outer, stops: stops.to_vec() });
    }

    fn push_clip(&mut self, path: &ClipPath) {
        self.commands.push(DrawCommand::PushClip { center: path.center(), max_radius: path.max_radius() });
        self.clips.push(path.clone());
    }

    fn pop_clip(&mut self) {
        if self.clips.pop().is_some() {
            self.commands.push(DrawCommand::PopClip);
        }
    }
}

fn fill_dots<S: Surface + ?Sized>(surface: &mut S, dots: &[Dot]) {
    for d in dots {
        surface.fill_circle(d.center, d.radius, d.color);
    }
}

/// Issue every draw call of `frame`; never touches simulation state
pub fn render<S: Surface + ?Sized>(frame: &Frame, surface: &mut S) {
    let viewport = frame.viewport;
    let (cx, cy) = viewport.center();
    let half_diagonal = (cx * cx + cy * cy).sqrt();

    surface.clear(viewport);
    surface.fill_rect_gradient(viewport, NVec2::new(cx, cy), half_diagonal, &frame.background);
    fill_dots(surface, &frame.backdrop);

    surface.push_clip(&frame.clip);
    fill_dots(surface, &frame.sphere_dots);
    surface.pop_clip();

    fill_dots(surface, &frame.planets);
    fill_dots(surface, &frame.big_bodies);

    for glow in &frame.overlays {
        surface.fill_circle_gradient(glow.center, glow.inner, glow.outer, &glow.stops);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::SilhouetteConfig;

    #[test]
    fn clip_drops_outside_fills_until_popped() {
        let shape = SilhouetteConfig { bump_amplitude: 0.0, detail_amplitude: 0.0, breathing_amplitude: 0.0, ..Default::default() };
        let clip = ClipPath::sample(NVec2::new(0.0, 0.0), 10.0, 0.0, &shape);
        let white = Rgba::new(255, 255, 255, 1.0);

        let mut s = RecordingSurface::new();
        s.clear(Viewport::new(100.0, 100.0));
        s.push_clip(&clip);
        s.fill_circle(NVec2::new(5.0, 0.0), 1.0, white);
        s.fill_circle(NVec2::new(15.0, 0.0), 1.0, white);
        s.pop_clip();
        s.fill_circle(NVec2::new(15.0, 0.0), 1.0, white);

        assert_eq!(s.circle_count(), 2);
        assert_eq!(s.culled(), 1);
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut s = RecordingSurface::new();
        s.clear(Viewport::new(10.0, 10.0));
        s.fill_circle(NVec2::new(1.0, 1.0), 1.0, Rgba::new(0, 0, 0, 1.0));
        s.clear(Viewport::new(10.0, 10.0));
        assert_eq!(s.commands().len(), 1);
    }
}
