//! Router pass table
//!
//! Lists every router pass of a joint, one column per board edge, with
//! locations measured from the right end of the board. Each edge is worked
//! right to left, so passes are listed in reverse of their stored order.
//! Rows continue until every edge has run out of passes; exhausted edges
//! show `**`.

use crate::error::{JointError, JointResult};
use crate::router::{Board, Cut};
use routerjig_core::UnitSystem;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Labels of the columns after the first, which is always `A`
pub const COLUMN_LABELS: [&str; 5] = ["B", "C", "D", "E", "F"];

/// Cell text once a column has no passes left
pub const FILLER: &str = "**";

/// Walks one edge's passes back to front
struct Column<'a> {
    label: &'static str,
    cuts: &'a [Cut],
    /// Cuts not yet finished, counting from the front
    cut_index: usize,
    /// Passes already taken from the current cut
    pass_index: usize,
    taken: usize,
}

impl<'a> Column<'a> {
    fn new(label: &'static str, cuts: &'a [Cut]) -> Self {
        Self {
            label,
            cuts,
            cut_index: cuts.len(),
            pass_index: 0,
            taken: 0,
        }
    }

    /// Next pass, or None once the edge is finished
    fn next_pass(&mut self) -> Option<i64> {
        while self.cut_index > 0 {
            let passes = &self.cuts[self.cut_index - 1].passes;
            if self.pass_index < passes.len() {
                let pass = passes[passes.len() - 1 - self.pass_index];
                self.pass_index += 1;
                self.taken += 1;
                if self.pass_index == passes.len() {
                    self.cut_index -= 1;
                    self.pass_index = 0;
                }
                return Some(pass);
            }
            self.cut_index -= 1;
            self.pass_index = 0;
        }
        None
    }
}

/// One table cell: pass name and its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub label: String,
    pub location: String,
}

impl Cell {
    fn filler() -> Self {
        Self {
            label: FILLER.to_string(),
            location: FILLER.to_string(),
        }
    }

    fn render(&self) -> String {
        format!(" {:>4} {:>9} ", self.label, self.location)
    }
}

/// The pass table for a set of boards
#[derive(Debug, Clone, PartialEq)]
pub struct PassTable {
    labels: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
    units: UnitSystem,
}

impl PassTable {
    /// Build the table from board slots: 0 is the bottom board, 1 the top
    /// board, 2 and 3 optional cauls that only count when active.
    ///
    /// Columns are board 0 bottom (`A`), then board 3 top and bottom, then
    /// board 2 top and bottom, then board 1 top, labelled `B`.. in order.
    pub fn from_boards(boards: &[Board]) -> JointResult<Self> {
        if boards.len() < 2 {
            return Err(JointError::InvalidBoards(format!(
                "a pass table needs at least 2 boards, got {}",
                boards.len()
            )));
        }

        let mut edges: Vec<&[Cut]> = vec![boards[0].bottom_cuts.as_slice()];
        for slot in [3, 2] {
            if let Some(caul) = boards.get(slot).filter(|b| b.active) {
                edges.push(caul.top_cuts.as_slice());
                edges.push(caul.bottom_cuts.as_slice());
            }
        }
        edges.push(boards[1].top_cuts.as_slice());

        let labels: Vec<&'static str> = std::iter::once("A")
            .chain(COLUMN_LABELS.iter().copied())
            .take(edges.len())
            .collect();

        let units = boards[0].units.clone();
        let width = boards[0].width;

        let mut columns: Vec<Column<'_>> = labels
            .iter()
            .zip(&edges)
            .map(|(label, cuts)| Column::new(*label, *cuts))
            .collect();

        let mut rows = Vec::new();
        loop {
            let mut any = false;
            let row: Vec<Cell> = columns
                .iter_mut()
                .map(|column| match column.next_pass() {
                    Some(pass) => {
                        any = true;
                        let location = width.saturating_sub(pass);
                        Cell {
                            label: format!("{}{}", column.taken, column.label),
                            location: units.increments_to_string(location, false),
                        }
                    }
                    None => Cell::filler(),
                })
                .collect();
            if !any {
                break;
            }
            rows.push(row);
        }

        debug!("pass table has {} columns and {} rows", labels.len(), rows.len());
        Ok(Self { labels, rows, units })
    }

    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Full text of the table, headed by `title`
    pub fn render(&self, title: &str) -> String {
        let pass = self.units.tr("Pass");
        let location = self.units.tr("Location");
        let header: String = self
            .labels
            .iter()
            .map(|_| {
                Cell {
                    label: pass.clone(),
                    location: location.clone(),
                }
                .render()
            })
            .collect();
        let divider = "-".repeat(header.chars().count());

        let mut text = format!("{title}\n{divider}\n{header}\n{divider}\n");
        for row in &self.rows {
            let line: String = row.iter().map(Cell::render).collect();
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    /// Write the table to `path`
    pub fn write_to_file(&self, path: &Path, title: &str) -> JointResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.render(title).as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Write the pass table for `boards` to `path`
pub fn print_table(path: &Path, boards: &[Board], title: &str) -> JointResult<()> {
    PassTable::from_boards(boards)?.write_to_file(path, title)?;
    debug!("wrote pass table to {}", path.display());
    Ok(())
}
