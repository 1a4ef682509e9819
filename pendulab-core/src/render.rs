//! Drawing capability for pendulum instances
//!
//! The core never touches a graphics API. A host implements `Canvas` for
//! whatever it draws on, and every `PendulumInstance` can then be drawn onto
//! it. Coordinates are relative to the pivot with y growing downward.

use crate::engine::bob_positions;
use crate::pendulum::PendulumInstance;
use glam::DVec2;

pub const BOB_DIAMETER: f64 = 20.0;
pub const TRAIL_WIDTH: f32 = 2.5;
pub const ARM_WIDTH: f32 = 2.0;

/// Parts of a drawn pendulum that a canvas picks default colours for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintRole {
    Trail,
    Arm,
    FirstBob,
    SecondBob,
}

/// An opaque render target owned by the host
pub trait Canvas {
    type Color: Copy;

    fn palette(&self, role: PaintRole) -> Self::Color;

    fn polyline(&mut self, points: &[DVec2], color: Self::Color, width: f32);

    fn line(&mut self, from: DVec2, to: DVec2, color: Self::Color, width: f32);

    fn circle(&mut self, center: DVec2, diameter: f64, color: Self::Color);
}

/// Something that can paint itself onto a canvas without side effects
pub trait Drawable<C: Canvas> {
    /// `color` overrides the trail and bob colours when given
    fn draw(&self, canvas: &mut C, color: Option<C::Color>);
}

impl<C: Canvas> Drawable<C> for PendulumInstance {
    fn draw(&self, canvas: &mut C, color: Option<C::Color>) {
        let settings = self.visualization();
        let (first, second) = bob_positions(self.state(), self.physical_parameters());

        if settings.show_trail && !self.trail().is_empty() {
            let points: Vec<DVec2> = self.trail().points().copied().collect();
            let trail_color = color.unwrap_or_else(|| canvas.palette(PaintRole::Trail));
            canvas.polyline(&points, trail_color, TRAIL_WIDTH);
        }

        if !settings.show_minimal {
            let arm_color = canvas.palette(PaintRole::Arm);
            canvas.line(DVec2::ZERO, first, arm_color, ARM_WIDTH);
            canvas.line(first, second, arm_color, ARM_WIDTH);

            let first_color = color.unwrap_or_else(|| canvas.palette(PaintRole::FirstBob));
            canvas.circle(first, BOB_DIAMETER, first_color);
        }

        // the terminal bob is drawn in every view
        let second_color = color.unwrap_or_else(|| canvas.palette(PaintRole::SecondBob));
        canvas.circle(second, BOB_DIAMETER, second_color);
    }
}
