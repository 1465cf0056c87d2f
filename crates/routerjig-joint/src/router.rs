//! Router bit, boards and cuts
//!
//! Everything is measured in increments of the bound [`UnitSystem`]. A cut
//! is a slot removed from the end of a board, `xmin..xmax` measured from
//! the board's left end, and is made with one or more router passes. Each
//! pass is the position of the bit centre along the board.

use crate::error::{JointError, JointResult};
use routerjig_core::UnitSystem;
use serde::{Deserialize, Serialize};

/// Straight or dovetail router bit
#[derive(Debug, Clone, PartialEq)]
pub struct RouterBit {
    pub units: UnitSystem,
    /// Cutting width, in increments
    pub width: i64,
    /// Cutting depth, in increments
    pub depth: i64,
    /// Dovetail angle in degrees; 0 for a straight bit
    pub angle: f64,
}

impl RouterBit {
    pub fn new(units: UnitSystem, width: i64, depth: i64, angle: f64) -> Self {
        Self {
            units,
            width,
            depth,
            angle,
        }
    }

    pub fn halfwidth(&self) -> i64 {
        self.width / 2
    }

    pub fn validate(&self) -> JointResult<()> {
        if self.width <= 0 {
            return Err(JointError::InvalidParameters(format!(
                "bit width must be positive, got {}",
                self.width
            )));
        }
        if self.depth <= 0 {
            return Err(JointError::InvalidParameters(format!(
                "bit depth must be positive, got {}",
                self.depth
            )));
        }
        if !(0.0..90.0).contains(&self.angle) {
            return Err(JointError::InvalidParameters(format!(
                "bit angle must be in [0, 90) degrees, got {}",
                self.angle
            )));
        }
        Ok(())
    }
}

/// One slot of the joint and the router passes that make it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cut {
    pub xmin: i64,
    pub xmax: i64,
    pub passes: Vec<i64>,
}

impl Cut {
    pub fn new(xmin: i64, xmax: i64) -> Self {
        Self {
            xmin,
            xmax,
            passes: Vec::new(),
        }
    }

    pub fn with_passes(xmin: i64, xmax: i64, passes: Vec<i64>) -> Self {
        Self { xmin, xmax, passes }
    }

    pub fn width(&self) -> i64 {
        self.xmax - self.xmin
    }

    /// Fill `passes` with evenly spaced bit positions, left to right, that
    /// clear the whole slot without any step wider than the bit.
    pub fn make_router_passes(&mut self, bit: &RouterBit) {
        let width = bit.width.max(1);
        let first = self.xmin.saturating_add(bit.halfwidth());
        let last = self.xmax.saturating_sub(width - bit.halfwidth());

        if last <= first {
            let mid = (i128::from(self.xmin) + i128::from(self.xmax)) / 2;
            self.passes = vec![mid as i64];
            return;
        }

        let span = i128::from(last) - i128::from(first);
        let steps = (span + i128::from(width) - 1) / i128::from(width);
        self.passes = (0..=steps)
            .map(|i| first.saturating_add(i64::try_from(span * i / steps).unwrap_or(i64::MAX)))
            .collect();
    }

    /// Same cut with passes computed for `bit`
    pub fn routed(mut self, bit: &RouterBit) -> Self {
        self.make_router_passes(bit);
        self
    }
}

/// A board whose end is cut to form one side of the joint
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub units: UnitSystem,
    /// Width across the joint, in increments
    pub width: i64,
    /// Whether the board takes part in the joint; only caul boards are
    /// ever inactive
    pub active: bool,
    pub top_cuts: Vec<Cut>,
    pub bottom_cuts: Vec<Cut>,
}

impl Board {
    pub fn new(bit: &RouterBit, width: i64) -> Self {
        Self {
            units: bit.units.clone(),
            width,
            active: true,
            top_cuts: Vec::new(),
            bottom_cuts: Vec::new(),
        }
    }

    /// An intermediate board that stays out of the joint until activated
    pub fn caul(bit: &RouterBit, width: i64) -> Self {
        Self {
            active: false,
            ..Self::new(bit, width)
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn top_pass_count(&self) -> usize {
        self.top_cuts.iter().map(|c| c.passes.len()).sum()
    }

    pub fn bottom_pass_count(&self) -> usize {
        self.bottom_cuts.iter().map(|c| c.passes.len()).sum()
    }
}

/// `count` board slots of `width`: the bottom and top boards are active,
/// any further slots are cauls.
pub fn board_set(bit: &RouterBit, width: i64, count: usize) -> Vec<Board> {
    (0..count)
        .map(|slot| {
            if slot < 2 {
                Board::new(bit, width)
            } else {
                Board::caul(bit, width)
            }
        })
        .collect()
}

/// The standard four slots: bottom board, top board, and two cauls
pub fn standard_boards(bit: &RouterBit, width: i64) -> Vec<Board> {
    board_set(bit, width, 4)
}

/// Slots left between `cuts` across a board of `board_width`, routed for
/// `bit`. These are the cuts on the mating board.
pub fn complementary_cuts(cuts: &[Cut], board_width: i64, bit: &RouterBit) -> Vec<Cut> {
    let mut sorted: Vec<&Cut> = cuts.iter().collect();
    sorted.sort_by_key(|c| c.xmin);

    let mut out = Vec::new();
    let mut x = 0;
    for cut in sorted {
        if cut.xmin > x {
            out.push(Cut::new(x, cut.xmin).routed(bit));
        }
        x = x.max(cut.xmax);
    }
    if x < board_width {
        out.push(Cut::new(x, board_width).routed(bit));
    }
    out
}
