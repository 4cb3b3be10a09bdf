//! Angle normalization between radians and half-turns.
//!
//! The DAG side stores angles in radians; the vertex side stores numeric
//! angles as multiples of π. Symbolic expressions cross unchanged.

use std::f64::consts::PI;

use qbridge_ir::{Param, ParameterExpression};

/// One half-turn in radians.
pub const HALF_TURN: f64 = PI;

/// Radians to a vertex parameter.
pub fn normalize_in(expr: &ParameterExpression) -> Param {
    match expr.as_f64() {
        Some(radians) => Param::Numeric(radians / HALF_TURN),
        None => Param::Symbolic(expr.clone()),
    }
}

/// A vertex parameter to radians.
pub fn normalize_out(param: &Param) -> ParameterExpression {
    match param {
        Param::Numeric(half_turns) => ParameterExpression::constant(half_turns * HALF_TURN),
        Param::Symbolic(expr) => expr.clone(),
    }
}
