//! # RouterJig Joint
//!
//! Box joint model and its outputs.
//!
//! ## Contents
//!
//! - **Router**: router bit, boards, cuts and router pass generation
//! - **Spacing**: Equal, Variable and Edit joint layouts
//! - **Serialization**: the saved design format (JSON via serde)
//! - **Pass Table**: printable table of router pass locations

pub mod error;
pub mod pass_table;
pub mod router;
pub mod serialization;
pub mod spacing;

pub use error::{DecodeError, DecodeResult, JointError, JointResult};
pub use pass_table::{print_table, Cell, PassTable};
pub use router::{board_set, complementary_cuts, standard_boards, Board, Cut, RouterBit};
pub use serialization::{
    load_design, save_design, serialize, unserialize, DecodedDesign, DesignFile, SpacingPayload,
    FORMAT,
};
pub use spacing::{
    EditSpacing, EqualParams, EqualSpacing, JointFrame, JointSpacing, Spacing, SpacingKind,
    VariableParams, VariableSpacing, MAX_BOARD_WIDTH,
};
