//! Error types.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Error>;

/// World axis, used to report which boundary axis is malformed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

#[derive(Debug)]
pub enum Error {
    /// Normalizing a vector with zero (or non-finite) length.
    ///
    /// This is the only numerical degeneracy surfaced as an error; the others
    /// are treated as "no event" inside a step.
    DegenerateVector,

    /// Pairwise gravity between two bodies at the same position.
    CoincidentBodies,

    /// Mass must be finite and strictly positive.
    InvalidMass(f64),

    /// Radius (or segment width) must be finite and non-negative.
    InvalidRadius(f64),

    /// A position or velocity had a non-finite component.
    InvalidVector,

    /// A line segment whose tail and tip coincide.
    DegenerateSegment,

    /// Boundary with `min >= max` (or non-finite bounds) on one axis.
    InvalidBoundary { axis: Axis, min: f64, max: f64 },

    /// A circle too large to ever fit between the walls.
    BodyDoesNotFit { index: usize, radius: f64 },

    /// Settings that fail validation.
    InvalidSettings(&'static str),

    /// Reading or parsing a settings file failed.
    Config(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Config(Box::new(error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Config(Box::new(error))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::DegenerateVector => f.write_str("cannot normalize a zero-length vector"),
            Error::CoincidentBodies => f.write_str("gravity between coincident bodies"),
            Error::InvalidMass(mass) => write!(f, "invalid mass {} (must be > 0)", mass),
            Error::InvalidRadius(radius) => write!(f, "invalid radius {} (must be >= 0)", radius),
            Error::InvalidVector => f.write_str("vector has a non-finite component"),
            Error::DegenerateSegment => f.write_str("segment tail and tip coincide"),
            Error::InvalidBoundary { axis, min, max } => {
                write!(f, "invalid boundary on {} axis: min {} must be < max {}", axis, min, max)
            }
            Error::BodyDoesNotFit { index, radius } => {
                write!(f, "body {} with radius {} does not fit inside the boundary", index, radius)
            }
            Error::InvalidSettings(msg) => write!(f, "invalid settings: {}", msg),
            Error::Config(error) => write!(f, "config error, {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(error) => Some(&**error),
            _ => None,
        }
    }
}
