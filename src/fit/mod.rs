//! Gradient-based least-squares fitting for the exponential curve families.

mod least_squares;

pub use least_squares::curve_fit;
