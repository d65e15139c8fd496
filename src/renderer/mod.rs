//! Draw-list extraction
//!
//! The physics core never draws. After each `step`, a renderer pulls a
//! `Frame` of pixel-space instances that can go straight into a GPU buffer.

pub mod vertex;

pub use vertex::{CircleInstance, LineInstance, colors};

use crate::sim::{Body, Simulator};

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub background: [f32; 4],
    pub circles: Vec<CircleInstance>,
    pub lines: Vec<LineInstance>,
}

impl Frame {
    /// Raw bytes of the circle instances, ready for upload
    pub fn circle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.circles)
    }

    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }
}

/// Snapshot the world at `pixels_per_meter` scale
pub fn extract_frame(sim: &Simulator, pixels_per_meter: f32) -> Frame {
    let mut frame = Frame {
        background: colors::BACKGROUND,
        ..Default::default()
    };
    let ppm = pixels_per_meter as f64;

    for body in sim.bodies() {
        match body {
            Body::Movable(state) | Body::Fixed(state) => {
                let color = if state.generates_gravity {
                    colors::GRAVITY_SOURCE
                } else if body.is_movable() {
                    colors::MOVABLE
                } else {
                    colors::FIXED
                };
                let center = state.position * ppm;
                frame.circles.push(CircleInstance::new(
                    center.x as f32,
                    center.y as f32,
                    (state.radius * ppm) as f32,
                    color,
                ));
            }
            Body::Segment(segment) => {
                let tail = segment.tail * ppm;
                let tip = segment.tip * ppm;
                frame.lines.push(LineInstance::new(
                    [tail.x as f32, tail.y as f32],
                    [tip.x as f32, tip.y as f32],
                    (segment.width * ppm) as f32,
                    colors::SEGMENT,
                ));
            }
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Boundary;
    use glam::DVec2;

    #[test]
    fn test_extract_scales_to_pixels() {
        let bodies = vec![
            Body::movable(DVec2::new(25.0, 10.0), DVec2::new(10.0, 0.0), 1.0, 2.0).unwrap(),
            Body::fixed(DVec2::new(50.0, 50.0), 1.0, 5.0)
                .unwrap()
                .with_gravity_source(true),
            Body::segment(DVec2::new(0.0, 90.0), DVec2::new(40.0, 95.0), 1.0).unwrap(),
        ];
        let sim = Simulator::new(bodies, Boundary::new(0.0, 100.0, 0.0, 100.0).unwrap()).unwrap();
        let frame = extract_frame(&sim, 10.0);

        assert_eq!(frame.background, colors::BACKGROUND);
        assert_eq!(frame.circles.len(), 2);
        assert_eq!(frame.circles[0].center, [250.0, 100.0]);
        assert_eq!(frame.circles[0].radius, 20.0);
        assert_eq!(frame.circles[0].color, colors::MOVABLE);
        assert_eq!(frame.circles[1].color, colors::GRAVITY_SOURCE);

        assert_eq!(frame.lines.len(), 1);
        assert_eq!(frame.lines[0].tip, [400.0, 950.0]);
        assert_eq!(frame.lines[0].width, 10.0);
    }

    #[test]
    fn test_instance_bytes() {
        let frame = Frame {
            background: colors::BACKGROUND,
            circles: vec![CircleInstance::new(1.0, 2.0, 3.0, colors::MOVABLE); 3],
            lines: Vec::new(),
        };
        assert_eq!(std::mem::size_of::<CircleInstance>(), 32);
        assert_eq!(frame.circle_bytes().len(), 3 * 32);
        assert!(frame.line_bytes().is_empty());
    }
}
