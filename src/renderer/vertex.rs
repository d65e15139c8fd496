//! Instance types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// A filled circle, in pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [x, y],
            radius,
            _pad: 0.0,
            color,
        }
    }
}

/// A thick line, in pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub tail: [f32; 2],
    pub tip: [f32; 2],
    pub width: f32,
    pub _pad: [f32; 3],
    pub color: [f32; 4],
}

impl LineInstance {
    pub const fn new(tail: [f32; 2], tip: [f32; 2], width: f32, color: [f32; 4]) -> Self {
        Self {
            tail,
            tip,
            width,
            _pad: [0.0; 3],
            color,
        }
    }
}

/// Colors for world elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const MOVABLE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FIXED: [f32; 4] = [0.6, 0.6, 0.7, 1.0];
    pub const GRAVITY_SOURCE: [f32; 4] = [1.0, 0.8, 0.3, 1.0];
    pub const SEGMENT: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
}
