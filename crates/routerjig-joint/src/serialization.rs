//! Saved design format
//!
//! A design is saved as a JSON document of [`DesignFile`]:
//!
//! ```text
//! format               "RJIG"
//! version              version of the program that wrote it
//! metric               bool
//! increments_per_inch  number     (English designs only)
//! bit_width            int
//! bit_depth            int
//! bit_angle            number
//! board_count          int
//! board_width          int
//! spacing_tag          first 4 characters of the spacing description
//! spacing_payload      list of cuts when the tag is "Edit", else a parameter record
//! ```
//!
//! A cut is `{"xmin": int, "xmax": int, "passes": [int, ...]}`.
//!
//! Decoded values are checked before any layout is recomputed from them.

use crate::error::{DecodeError, DecodeResult, JointError, JointResult};
use crate::router::{board_set, Board, Cut, RouterBit};
use crate::spacing::{
    EditSpacing, EqualParams, EqualSpacing, JointFrame, JointSpacing, Spacing, SpacingKind,
    VariableParams, VariableSpacing,
};
use routerjig_core::{MeasurementSystem, UnitSystem, VERSION};
use routerjig_settings::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Format name stored in every saved design
pub const FORMAT: &str = "RJIG";

/// Upper bound on the stored board count
const MAX_BOARDS: i64 = 1024;

/// On-disk form of a design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    pub format: String,
    pub version: String,
    pub metric: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increments_per_inch: Option<f64>,
    pub bit_width: i64,
    pub bit_depth: i64,
    pub bit_angle: f64,
    pub board_count: i64,
    pub board_width: i64,
    pub spacing_tag: String,
    pub spacing_payload: SpacingPayload,
}

/// What a layout needs to be rebuilt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpacingPayload {
    Cuts(Vec<Cut>),
    Equal(EqualParams),
    Variable(VariableParams),
}

impl SpacingPayload {
    fn name(&self) -> &'static str {
        match self {
            SpacingPayload::Cuts(_) => SpacingKind::Edit.payload_name(),
            SpacingPayload::Equal(_) => SpacingKind::Equal.payload_name(),
            SpacingPayload::Variable(_) => SpacingKind::Variable.payload_name(),
        }
    }
}

/// Everything restored from a saved design
#[derive(Debug, Clone)]
pub struct DecodedDesign {
    /// Version of the program that wrote the design
    pub version: String,
    pub bit: RouterBit,
    pub boards: Vec<Board>,
    pub spacing: Spacing,
    /// Spacing tag as stored, which may be one this program does not know
    pub tag: String,
}

impl DesignFile {
    /// Capture a design. Board width is taken from the first board.
    pub fn from_design(bit: &RouterBit, boards: &[Board], spacing: &Spacing) -> JointResult<Self> {
        let first = boards
            .first()
            .ok_or_else(|| JointError::Encode("a design needs at least one board".to_string()))?;

        let units = &bit.units;
        let spacing_payload = match spacing {
            Spacing::Edit(edit) => SpacingPayload::Cuts(edit.cuts().to_vec()),
            Spacing::Equal(equal) => SpacingPayload::Equal(*equal.params()),
            Spacing::Variable(variable) => SpacingPayload::Variable(*variable.params()),
        };

        Ok(Self {
            format: FORMAT.to_string(),
            version: VERSION.to_string(),
            metric: units.is_metric(),
            increments_per_inch: (!units.is_metric()).then(|| units.increments_per_inch()),
            bit_width: bit.width,
            bit_depth: bit.depth,
            bit_angle: bit.angle,
            board_count: boards.len() as i64,
            board_width: first.width,
            spacing_tag: spacing.tag(),
            spacing_payload,
        })
    }

    /// Check every field and rebuild the design.
    ///
    /// English designs get the separator from `config`. Equal and Variable
    /// layouts are rebuilt from their parameters; Edit layouts keep their
    /// cuts exactly. Tags other than `Edit` and `Equa` are read as Variable.
    pub fn into_design(self, config: &Config) -> DecodeResult<DecodedDesign> {
        let DesignFile {
            format,
            version,
            metric,
            increments_per_inch,
            bit_width,
            bit_depth,
            bit_angle,
            board_count,
            board_width,
            spacing_tag,
            spacing_payload,
        } = self;

        if format != FORMAT {
            return Err(DecodeError::BadMagic {
                expected: FORMAT,
                actual: format,
            });
        }
        if config.debug {
            debug!("unserialized version: {}", version);
        }

        let units = if metric {
            UnitSystem::new(MeasurementSystem::Metric, None)
        } else {
            let per_inch = increments_per_inch.ok_or_else(|| DecodeError::MissingField {
                record: "design".to_string(),
                field: "increments_per_inch".to_string(),
            })?;
            if !per_inch.is_finite() || per_inch < 1.0 || per_inch > u32::MAX as f64 {
                return Err(invalid(
                    "increments_per_inch",
                    format!("{} is not a usable increment count", per_inch),
                ));
            }
            UnitSystem::english(per_inch.round() as u32)
                .with_separator(&config.units.english_separator)
        };

        if !(1..=MAX_BOARDS).contains(&board_count) {
            return Err(invalid(
                "board_count",
                format!("{} boards, expected 1..={}", board_count, MAX_BOARDS),
            ));
        }

        let bit = RouterBit::new(units, bit_width, bit_depth, bit_angle);
        let frame = JointFrame::new(bit.clone(), board_width, config.min_finger_width);
        frame.validate().map_err(|err| rejected("geometry", err))?;
        let boards = board_set(&bit, board_width, board_count as usize);

        let spacing = match (SpacingKind::from_tag(&spacing_tag), spacing_payload) {
            (SpacingKind::Edit, SpacingPayload::Cuts(cuts)) => {
                EditSpacing::check_cuts(&frame, &cuts).map_err(|err| rejected("cuts", err))?;
                if config.debug {
                    debug!("unserialized edit spacing");
                }
                Spacing::Edit(EditSpacing::new(frame, cuts))
            }
            (SpacingKind::Equal, SpacingPayload::Equal(params)) => {
                params
                    .validate(&frame)
                    .map_err(|err| rejected("params", err))?;
                if config.debug {
                    debug!("unserialized {} {:?}", spacing_tag, params);
                }
                Spacing::Equal(EqualSpacing::with_params(frame, params))
            }
            (SpacingKind::Variable, SpacingPayload::Variable(params)) => {
                params
                    .validate(&frame)
                    .map_err(|err| rejected("params", err))?;
                if config.debug {
                    debug!("unserialized {} {:?}", spacing_tag, params);
                }
                Spacing::Variable(VariableSpacing::with_params(frame, params))
            }
            (kind, payload) => {
                return Err(DecodeError::PayloadMismatch {
                    tag: spacing_tag,
                    expected: kind.payload_name(),
                    found: payload.name(),
                })
            }
        };

        Ok(DecodedDesign {
            version,
            bit,
            boards,
            spacing,
            tag: spacing_tag,
        })
    }
}

fn invalid(field: &str, reason: String) -> DecodeError {
    DecodeError::InvalidValue {
        field: field.to_string(),
        reason,
    }
}

fn rejected(field: &str, err: JointError) -> DecodeError {
    match err {
        JointError::InvalidParameters(reason) => invalid(field, reason),
        other => invalid(field, other.to_string()),
    }
}

/// Encode a design. Board width is taken from the first board.
pub fn serialize(
    bit: &RouterBit,
    boards: &[Board],
    spacing: &Spacing,
    config: &Config,
) -> JointResult<Vec<u8>> {
    let file = DesignFile::from_design(bit, boards, spacing)?;
    if config.debug {
        debug!("serialize {}", file.spacing_tag);
    }

    let out = serde_json::to_vec_pretty(&file).map_err(|e| JointError::Encode(e.to_string()))?;
    if config.debug {
        debug!("size of saved design {}", out.len());
    }
    Ok(out)
}

/// Decode a design written by [`serialize`].
pub fn unserialize(bytes: &[u8], config: &Config) -> JointResult<DecodedDesign> {
    let file: DesignFile = serde_json::from_slice(bytes).map_err(DecodeError::from)?;
    Ok(file.into_design(config)?)
}

/// Serialize a design into `path`
pub fn save_design(
    path: &Path,
    bit: &RouterBit,
    boards: &[Board],
    spacing: &Spacing,
    config: &Config,
) -> JointResult<()> {
    let bytes = serialize(bit, boards, spacing, config)?;
    std::fs::write(path, bytes)?;
    debug!("saved design to {}", path.display());
    Ok(())
}

/// Read and decode the design in `path`
pub fn load_design(path: &Path, config: &Config) -> JointResult<DecodedDesign> {
    let bytes = std::fs::read(path)?;
    unserialize(&bytes, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shapes() {
        assert_eq!(
            serde_json::from_str::<SpacingPayload>("[]").unwrap(),
            SpacingPayload::Cuts(Vec::new())
        );
        assert_eq!(
            serde_json::from_str::<SpacingPayload>(r#"{"fingers": 3}"#).unwrap(),
            SpacingPayload::Variable(VariableParams { fingers: 3 })
        );
        assert_eq!(
            serde_json::from_str::<SpacingPayload>(
                r#"{"spacing": 16, "width": 16, "centered": false}"#
            )
            .unwrap(),
            SpacingPayload::Equal(EqualParams {
                spacing: 16,
                width: 16,
                centered: false,
            })
        );
        assert_eq!(
            serde_json::from_str::<SpacingPayload>(
                r#"[{"xmin": 1, "xmax": 2, "passes": [3]}]"#
            )
            .unwrap(),
            SpacingPayload::Cuts(vec![Cut::with_passes(1, 2, vec![3])])
        );
    }

    #[test]
    fn test_payload_rejects_mixed_records() {
        assert!(serde_json::from_str::<SpacingPayload>(r#"{"fingers": 3, "width": 1}"#).is_err());
        assert!(serde_json::from_str::<SpacingPayload>(r#"{"fingers": "3"}"#).is_err());
    }

    #[test]
    fn test_payload_names() {
        assert_eq!(SpacingPayload::Cuts(Vec::new()).name(), "a cut list");
        assert_eq!(
            SpacingPayload::Variable(VariableParams { fingers: 1 }).name(),
            "variable parameters"
        );
    }

    #[test]
    fn test_rejected_keeps_reason() {
        let err = rejected(
            "params",
            JointError::InvalidParameters("fingers must be in 1..=16, got 0".to_string()),
        );
        assert_eq!(
            err,
            DecodeError::InvalidValue {
                field: "params".to_string(),
                reason: "fingers must be in 1..=16, got 0".to_string(),
            }
        );
    }
}
