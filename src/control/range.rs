//! Output range selection.

use serde::{Deserialize, Serialize};

/// Selects which part of an output's span a logical input is projected onto.
///
/// `LowerHalf` and `UpperHalf` both start at the output midpoint and run
/// outward, letting one physical potentiometer drive two logical channels
/// (for example forward-only and reverse-only throttle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSelector {
    /// Map the input across the whole output span.
    #[default]
    FullWidth,
    /// Map the input from the midpoint down to the bottom of the span.
    LowerHalf,
    /// Map the input from the midpoint up to the top of the span.
    UpperHalf,
}
