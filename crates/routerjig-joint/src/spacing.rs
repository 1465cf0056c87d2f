//! Joint spacing strategies
//!
//! A spacing strategy decides where the cuts go on the bottom board. Equal
//! and Variable layouts derive their cuts from a small parameter record, so
//! the same record always yields the same cuts. Edit layouts carry a cut
//! list that was adjusted by hand and is kept exactly as given.
//!
//! Every strategy has a description whose first four characters (`Equa`,
//! `Vari`, `Edit`) identify it in saved designs.

use crate::error::{JointError, JointResult};
use crate::router::{complementary_cuts, Board, Cut, RouterBit};
use routerjig_settings::Config;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the tag taken from the front of a description
pub const TAG_LEN: usize = 4;

/// Widest board a layout accepts, in increments
pub const MAX_BOARD_WIDTH: i64 = 1_000_000;

/// Geometry shared by every strategy
#[derive(Debug, Clone, PartialEq)]
pub struct JointFrame {
    pub bit: RouterBit,
    /// Board width, in increments
    pub board_width: i64,
    /// Narrowest finger the layouts will leave, in increments
    pub min_finger_width: i64,
}

impl JointFrame {
    pub fn new(bit: RouterBit, board_width: i64, min_finger_width: i64) -> Self {
        Self {
            bit,
            board_width,
            min_finger_width,
        }
    }

    /// Frame for a board set; all boards share the width of the first.
    pub fn from_boards(bit: &RouterBit, boards: &[Board], config: &Config) -> JointResult<Self> {
        let first = boards
            .first()
            .ok_or_else(|| JointError::InvalidBoards("no boards to lay out".to_string()))?;
        Ok(Self::new(bit.clone(), first.width, config.min_finger_width))
    }

    /// Check the bit and board width before any layout is computed
    pub fn validate(&self) -> JointResult<()> {
        self.bit.validate()?;
        if !(1..=MAX_BOARD_WIDTH).contains(&self.board_width) {
            return Err(JointError::InvalidParameters(format!(
                "board width must be in 1..={}, got {}",
                MAX_BOARD_WIDTH, self.board_width
            )));
        }
        if self.bit.width > self.board_width {
            return Err(JointError::InvalidParameters(format!(
                "bit width {} exceeds board width {}",
                self.bit.width, self.board_width
            )));
        }
        if self.min_finger_width < 0 {
            return Err(JointError::InvalidParameters(format!(
                "minimum finger width must not be negative, got {}",
                self.min_finger_width
            )));
        }
        Ok(())
    }
}

/// Behaviour common to all layouts
pub trait JointSpacing {
    /// Human readable summary, starting with the layout's tag
    fn description(&self) -> String;

    /// Cuts on the bottom board, ordered left to right
    fn cuts(&self) -> &[Cut];

    fn tag(&self) -> String {
        self.description().chars().take(TAG_LEN).collect()
    }
}

/// Which layout a spacing uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingKind {
    Equal,
    Variable,
    Edit,
}

impl SpacingKind {
    pub fn tag(self) -> &'static str {
        match self {
            SpacingKind::Equal => "Equa",
            SpacingKind::Variable => "Vari",
            SpacingKind::Edit => "Edit",
        }
    }

    /// What a saved design of this kind stores as its payload
    pub fn payload_name(self) -> &'static str {
        match self {
            SpacingKind::Equal => "equal parameters",
            SpacingKind::Variable => "variable parameters",
            SpacingKind::Edit => "a cut list",
        }
    }

    /// Layout for a saved tag. Unrecognised tags fall back to Variable.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Edit" => SpacingKind::Edit,
            "Equa" => SpacingKind::Equal,
            _ => SpacingKind::Variable,
        }
    }
}

impl fmt::Display for SpacingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpacingKind::Equal => write!(f, "equal"),
            SpacingKind::Variable => write!(f, "variable"),
            SpacingKind::Edit => write!(f, "edit"),
        }
    }
}

/// Parameters of an equally spaced layout, in increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqualParams {
    /// Gap left between neighbouring cuts
    pub spacing: i64,
    /// Width of each cut; never less than the bit width
    pub width: i64,
    /// Centre the pattern on the board instead of starting at the left end
    pub centered: bool,
}

impl EqualParams {
    pub fn for_bit(bit: &RouterBit) -> Self {
        Self {
            spacing: bit.width,
            width: bit.width,
            centered: true,
        }
    }

    pub fn validate(&self, frame: &JointFrame) -> JointResult<()> {
        let board = frame.board_width;
        if !(1..=board).contains(&self.width) {
            return Err(JointError::InvalidParameters(format!(
                "cut width must be in 1..={}, got {}",
                board, self.width
            )));
        }
        if !(1..=board).contains(&self.spacing) {
            return Err(JointError::InvalidParameters(format!(
                "spacing must be in 1..={}, got {}",
                board, self.spacing
            )));
        }
        Ok(())
    }
}

/// Cuts of the same width separated by the same gap
#[derive(Debug, Clone, PartialEq)]
pub struct EqualSpacing {
    frame: JointFrame,
    params: EqualParams,
    cuts: Vec<Cut>,
}

impl EqualSpacing {
    pub fn new(frame: JointFrame) -> Self {
        let params = EqualParams::for_bit(&frame.bit);
        Self::with_params(frame, params)
    }

    pub fn with_params(frame: JointFrame, params: EqualParams) -> Self {
        let mut spacing = Self {
            frame,
            params,
            cuts: Vec::new(),
        };
        spacing.set_cuts();
        spacing
    }

    pub fn params(&self) -> &EqualParams {
        &self.params
    }

    pub fn set_params(&mut self, params: EqualParams) {
        self.params = params;
        self.set_cuts();
    }

    /// Recompute the cuts from the current parameters
    pub fn set_cuts(&mut self) {
        let frame = &self.frame;
        let board = frame.board_width;
        let width = self.params.width.max(frame.bit.width).max(1);
        let finger = self.params.spacing.max(frame.min_finger_width).max(1);
        let pitch = width.saturating_add(finger);

        let mut count = (board.saturating_add(finger) / pitch).max(1);
        let mut start = self.start(count, width, finger);
        while count > 1 && start > 0 && start < frame.min_finger_width {
            count -= 1;
            start = self.start(count, width, finger);
        }
        let start = start.max(0);

        self.cuts = (0..count)
            .map(|i| {
                let xmin = start + i * pitch;
                Cut::new(xmin, (xmin + width).min(board)).routed(&frame.bit)
            })
            .filter(|cut| cut.width() > 0)
            .collect();
    }

    fn start(&self, count: i64, width: i64, finger: i64) -> i64 {
        if !self.params.centered {
            return 0;
        }
        let total = count
            .saturating_mul(width)
            .saturating_add((count - 1).saturating_mul(finger));
        self.frame.board_width.saturating_sub(total) / 2
    }
}

impl JointSpacing for EqualSpacing {
    fn description(&self) -> String {
        let units = &self.frame.bit.units;
        format!(
            "Equally spaced (Width: {}, Spacing: {}{})",
            units.increments_to_string(self.params.width, true),
            units.increments_to_string(self.params.spacing, true),
            if self.params.centered { ", Centered" } else { "" }
        )
    }

    fn cuts(&self) -> &[Cut] {
        &self.cuts
    }
}

/// Parameters of a variable layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableParams {
    /// Number of fingers left between the cuts
    pub fingers: i64,
}

impl VariableParams {
    pub fn for_frame(frame: &JointFrame) -> Self {
        let bit_width = frame.bit.width.max(1);
        let fingers = (frame.board_width / (2 * bit_width) - 1) / 2;
        Self {
            fingers: fingers.clamp(1, Self::max_fingers(frame)),
        }
    }

    /// Most fingers that fit when every cut is one bit wide
    pub fn max_fingers(frame: &JointFrame) -> i64 {
        (frame.board_width / frame.bit.width.max(1)).max(1)
    }

    pub fn validate(&self, frame: &JointFrame) -> JointResult<()> {
        let max = Self::max_fingers(frame);
        if !(1..=max).contains(&self.fingers) {
            return Err(JointError::InvalidParameters(format!(
                "fingers must be in 1..={}, got {}",
                max, self.fingers
            )));
        }
        Ok(())
    }
}

/// Fingers that grow towards the centre of the board
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpacing {
    frame: JointFrame,
    params: VariableParams,
    cuts: Vec<Cut>,
}

impl VariableSpacing {
    pub fn new(frame: JointFrame) -> Self {
        let params = VariableParams::for_frame(&frame);
        Self::with_params(frame, params)
    }

    pub fn with_params(frame: JointFrame, params: VariableParams) -> Self {
        let mut spacing = Self {
            frame,
            params,
            cuts: Vec::new(),
        };
        spacing.set_cuts();
        spacing
    }

    pub fn params(&self) -> &VariableParams {
        &self.params
    }

    pub fn set_params(&mut self, params: VariableParams) {
        self.params = params;
        self.set_cuts();
    }

    /// Recompute the cuts from the current parameters.
    ///
    /// The board is split into `2 * fingers + 1` segments whose relative
    /// widths rise by one per step towards the middle. Even segments are
    /// cut, odd segments are fingers. The finger count is held to
    /// [`VariableParams::max_fingers`].
    pub fn set_cuts(&mut self) {
        let frame = &self.frame;
        let board = frame.board_width;
        let bit_width = frame.bit.width;
        let fingers = self
            .params
            .fingers
            .clamp(1, VariableParams::max_fingers(frame));
        let segments = 2 * fingers + 1;

        let weights: Vec<i128> = (0..segments)
            .map(|i| 1 + i128::from(i.min(segments - 1 - i)))
            .collect();
        let total: i128 = weights.iter().sum();

        let mut bounds = Vec::with_capacity(weights.len() + 1);
        let mut cumulative = 0i128;
        bounds.push(0i64);
        for w in &weights {
            cumulative += w;
            let bound = (2 * i128::from(board) * cumulative + total) / (2 * total);
            bounds.push(i64::try_from(bound).unwrap_or(board));
        }

        self.cuts = bounds
            .windows(2)
            .step_by(2)
            .filter_map(|pair| {
                let (mut xmin, mut xmax) = (pair[0], pair[1]);
                if xmax - xmin < bit_width {
                    xmax = (xmin + bit_width).min(board);
                    xmin = (xmax - bit_width).max(0);
                }
                (xmax > xmin).then(|| Cut::new(xmin, xmax).routed(&frame.bit))
            })
            .collect();
    }
}

impl JointSpacing for VariableSpacing {
    fn description(&self) -> String {
        format!("Variable spaced (Fingers: {})", self.params.fingers)
    }

    fn cuts(&self) -> &[Cut] {
        &self.cuts
    }
}

/// A hand adjusted layout
#[derive(Debug, Clone, PartialEq)]
pub struct EditSpacing {
    frame: JointFrame,
    cuts: Vec<Cut>,
}

impl EditSpacing {
    pub fn new(frame: JointFrame, cuts: Vec<Cut>) -> Self {
        Self { frame, cuts }
    }

    /// Replace the cuts, passes included, without recomputing anything
    pub fn set_cuts(&mut self, cuts: Vec<Cut>) {
        self.cuts = cuts;
    }

    /// Every cut and pass must lie on the board, `0..=board_width`
    pub fn check_cuts(frame: &JointFrame, cuts: &[Cut]) -> JointResult<()> {
        let board = frame.board_width;
        for (i, cut) in cuts.iter().enumerate() {
            if cut.xmin < 0 || cut.xmin > cut.xmax || cut.xmax > board {
                return Err(JointError::InvalidParameters(format!(
                    "cut {} spans {}..{}, outside 0..={}",
                    i + 1,
                    cut.xmin,
                    cut.xmax,
                    board
                )));
            }
            if let Some(pass) = cut.passes.iter().find(|p| !(0..=board).contains(*p)) {
                return Err(JointError::InvalidParameters(format!(
                    "cut {} has a pass at {}, outside 0..={}",
                    i + 1,
                    pass,
                    board
                )));
            }
        }
        Ok(())
    }
}

impl JointSpacing for EditSpacing {
    fn description(&self) -> String {
        format!("Edit spacing ({} cuts)", self.cuts.len())
    }

    fn cuts(&self) -> &[Cut] {
        &self.cuts
    }
}

/// Any of the layouts
#[derive(Debug, Clone, PartialEq)]
pub enum Spacing {
    Equal(EqualSpacing),
    Variable(VariableSpacing),
    Edit(EditSpacing),
}

impl Spacing {
    /// New layout of `kind` with default parameters. An Edit layout starts
    /// from the cuts of the default Variable layout.
    pub fn new(kind: SpacingKind, frame: JointFrame) -> Self {
        match kind {
            SpacingKind::Equal => Spacing::Equal(EqualSpacing::new(frame)),
            SpacingKind::Variable => Spacing::Variable(VariableSpacing::new(frame)),
            SpacingKind::Edit => {
                let cuts = VariableSpacing::new(frame.clone()).cuts;
                Spacing::Edit(EditSpacing::new(frame, cuts))
            }
        }
    }

    pub fn kind(&self) -> SpacingKind {
        match self {
            Spacing::Equal(_) => SpacingKind::Equal,
            Spacing::Variable(_) => SpacingKind::Variable,
            Spacing::Edit(_) => SpacingKind::Edit,
        }
    }

    pub fn frame(&self) -> &JointFrame {
        match self {
            Spacing::Equal(s) => &s.frame,
            Spacing::Variable(s) => &s.frame,
            Spacing::Edit(s) => &s.frame,
        }
    }

    /// With explicit cuts the layout becomes an Edit layout holding them.
    /// Without, Equal and Variable layouts recompute from their parameters
    /// and Edit layouts are left alone.
    pub fn set_cuts(&mut self, cuts: Option<Vec<Cut>>) {
        match (cuts, &mut *self) {
            (Some(cuts), Spacing::Edit(edit)) => edit.set_cuts(cuts),
            (Some(cuts), other) => {
                let frame = other.frame().clone();
                *other = Spacing::Edit(EditSpacing::new(frame, cuts));
            }
            (None, Spacing::Equal(s)) => s.set_cuts(),
            (None, Spacing::Variable(s)) => s.set_cuts(),
            (None, Spacing::Edit(_)) => {}
        }
    }

    /// Copy the layout onto the boards: the bottom board gets the cuts,
    /// the top board the slots between them. Caul boards take both.
    pub fn apply_to_boards(&self, boards: &mut [Board]) {
        let frame = self.frame();
        let cuts = self.cuts().to_vec();
        let mating = complementary_cuts(&cuts, frame.board_width, &frame.bit);

        for (slot, board) in boards.iter_mut().enumerate() {
            match slot {
                0 => board.bottom_cuts = cuts.clone(),
                1 => board.top_cuts = mating.clone(),
                _ => {
                    board.top_cuts = mating.clone();
                    board.bottom_cuts = cuts.clone();
                }
            }
        }
    }

    fn inner(&self) -> &dyn JointSpacing {
        match self {
            Spacing::Equal(s) => s,
            Spacing::Variable(s) => s,
            Spacing::Edit(s) => s,
        }
    }
}

impl JointSpacing for Spacing {
    fn description(&self) -> String {
        self.inner().description()
    }

    fn cuts(&self) -> &[Cut] {
        self.inner().cuts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routerjig_core::UnitSystem;

    fn frame(board_width: i64, bit_width: i64) -> JointFrame {
        let bit = RouterBit::new(UnitSystem::english(32), bit_width, 24, 0.0);
        JointFrame::new(bit, board_width, 2)
    }

    fn assert_within_board(cuts: &[Cut], board: i64) {
        for cut in cuts {
            assert!(cut.xmin >= 0 && cut.xmax <= board && cut.xmin < cut.xmax, "{:?}", cut);
            assert!(!cut.passes.is_empty());
        }
    }

    #[test]
    fn test_tags() {
        let f = frame(256, 16);
        assert_eq!(Spacing::new(SpacingKind::Equal, f.clone()).tag(), "Equa");
        assert_eq!(Spacing::new(SpacingKind::Variable, f.clone()).tag(), "Vari");
        assert_eq!(Spacing::new(SpacingKind::Edit, f).tag(), "Edit");
    }

    #[test]
    fn test_unknown_tag_is_variable() {
        assert_eq!(SpacingKind::from_tag("Equa"), SpacingKind::Equal);
        assert_eq!(SpacingKind::from_tag("Edit"), SpacingKind::Edit);
        assert_eq!(SpacingKind::from_tag("Vari"), SpacingKind::Variable);
        assert_eq!(SpacingKind::from_tag("Zzzz"), SpacingKind::Variable);
        assert_eq!(SpacingKind::from_tag(""), SpacingKind::Variable);
    }

    #[test]
    fn test_equal_layout() {
        // 8 inch board, 1/2 inch bit, 1/2 inch gaps, not centred
        let params = EqualParams {
            spacing: 16,
            width: 16,
            centered: false,
        };
        let spacing = EqualSpacing::with_params(frame(256, 16), params);
        let cuts = spacing.cuts();
        assert_eq!(cuts.len(), 8);
        assert_eq!((cuts[0].xmin, cuts[0].xmax), (0, 16));
        assert_eq!((cuts[7].xmin, cuts[7].xmax), (224, 240));
        assert!(cuts.iter().all(|c| c.width() == 16 && c.passes.len() == 1));
    }

    #[test]
    fn test_equal_layout_centred() {
        let spacing = EqualSpacing::new(frame(250, 16));
        let cuts = spacing.cuts();
        assert_within_board(cuts, 250);
        let left = cuts[0].xmin;
        let right = 250 - cuts[cuts.len() - 1].xmax;
        assert!((left - right).abs() <= 1);
    }

    #[test]
    fn test_equal_cut_width_at_least_bit() {
        let params = EqualParams {
            spacing: 8,
            width: 4,
            centered: true,
        };
        let spacing = EqualSpacing::with_params(frame(256, 16), params);
        assert!(spacing.cuts().iter().all(|c| c.width() >= 16));
    }

    #[test]
    fn test_variable_layout() {
        let spacing = VariableSpacing::with_params(frame(256, 8), VariableParams { fingers: 3 });
        let cuts = spacing.cuts();
        assert_eq!(cuts.len(), 4);
        assert_within_board(cuts, 256);
        assert_eq!(cuts[0].xmin, 0);
        assert_eq!(cuts[3].xmax, 256);
        assert!(cuts.windows(2).all(|w| w[0].xmax <= w[1].xmin));
    }

    #[test]
    fn test_variable_is_deterministic() {
        let a = VariableSpacing::new(frame(300, 12));
        let b = VariableSpacing::new(frame(300, 12));
        assert_eq!(a.cuts(), b.cuts());
        assert!(a.params().fingers >= 1);
    }

    #[test]
    fn test_set_cuts_converts_to_edit() {
        let mut spacing = Spacing::new(SpacingKind::Equal, frame(256, 16));
        let cuts = vec![Cut::with_passes(10, 40, vec![18, 32])];
        spacing.set_cuts(Some(cuts.clone()));
        assert_eq!(spacing.kind(), SpacingKind::Edit);
        assert_eq!(spacing.cuts(), cuts.as_slice());

        spacing.set_cuts(None);
        assert_eq!(spacing.cuts(), cuts.as_slice());
    }

    #[test]
    fn test_apply_to_boards() {
        let f = frame(256, 16);
        let spacing = Spacing::new(SpacingKind::Equal, f.clone());
        let mut boards = crate::router::standard_boards(&f.bit, 256);
        spacing.apply_to_boards(&mut boards);

        assert_eq!(boards[0].bottom_cuts, spacing.cuts());
        assert!(boards[0].top_cuts.is_empty());
        assert!(!boards[1].top_cuts.is_empty());
        assert!(boards[1].bottom_cuts.is_empty());
        assert_eq!(boards[2].top_cuts, boards[1].top_cuts);
        assert_eq!(boards[3].bottom_cuts, boards[0].bottom_cuts);
    }

    #[test]
    fn test_frame_validation() {
        assert!(frame(256, 16).validate().is_ok());
        assert!(frame(256, -2).validate().is_err());
        assert!(frame(0, 16).validate().is_err());
        assert!(frame(MAX_BOARD_WIDTH + 1, 16).validate().is_err());
        assert!(frame(8, 16).validate().is_err());
    }

    #[test]
    fn test_param_validation() {
        let f = frame(256, 16);
        assert!(EqualParams::for_bit(&f.bit).validate(&f).is_ok());
        let bad = EqualParams {
            spacing: -2,
            width: 16,
            centered: true,
        };
        assert!(bad.validate(&f).is_err());
        let bad = EqualParams {
            spacing: 16,
            width: 0,
            centered: true,
        };
        assert!(bad.validate(&f).is_err());

        assert_eq!(VariableParams::max_fingers(&f), 16);
        assert!(VariableParams { fingers: 16 }.validate(&f).is_ok());
        assert!(VariableParams { fingers: 17 }.validate(&f).is_err());
        assert!(VariableParams { fingers: 0 }.validate(&f).is_err());
        assert!(VariableParams::for_frame(&f).validate(&f).is_ok());
    }

    #[test]
    fn test_layouts_stay_on_board_with_extreme_params() {
        let f = frame(256, 16);
        let params = EqualParams {
            spacing: -2,
            width: -2,
            centered: true,
        };
        assert_within_board(EqualSpacing::with_params(f.clone(), params).cuts(), 256);

        let spacing = VariableSpacing::with_params(
            f,
            VariableParams {
                fingers: i64::MAX / 2 + 1,
            },
        );
        assert_within_board(spacing.cuts(), 256);
        assert!(spacing.cuts().len() <= 17);
    }

    #[test]
    fn test_edit_cuts_checked_against_board() {
        let f = frame(100, 16);
        assert!(EditSpacing::check_cuts(&f, &[Cut::with_passes(0, 16, vec![8])]).is_ok());
        assert!(EditSpacing::check_cuts(&f, &[Cut::with_passes(90, 120, vec![98])]).is_err());
        assert!(EditSpacing::check_cuts(&f, &[Cut::with_passes(40, 20, vec![30])]).is_err());
        assert!(EditSpacing::check_cuts(&f, &[Cut::with_passes(0, 16, vec![i64::MIN])]).is_err());
    }

    #[test]
    fn test_frame_requires_boards() {
        let f = frame(256, 16);
        let config = Config::default();
        assert!(JointFrame::from_boards(&f.bit, &[], &config).is_err());
        let boards = vec![Board::new(&f.bit, 200)];
        let built = JointFrame::from_boards(&f.bit, &boards, &config).unwrap();
        assert_eq!(built.board_width, 200);
        assert_eq!(built.min_finger_width, config.min_finger_width);
    }
}
