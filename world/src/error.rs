//! Fatal errors raised while building levels.

use thiserror::Error;
use worldshift_core::CellCoord;

/// Errors that abort level construction. No partially built level survives one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The level source contained no rows once surrounding blank lines were removed.
    #[error("level source contains no rows")]
    EmptyLevel,
    /// A row's width differs from the first row's width.
    #[error("row {row} is {found} glyphs wide but the level is {expected} glyphs wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The level is too large for its pixel coordinates to fit in `i32`.
    #[error("level of {columns}x{rows} glyphs exceeds the addressable grid")]
    LevelTooLarge {
        /// Number of glyphs per row.
        columns: usize,
        /// Number of rows.
        rows: usize,
    },
    /// The source used a glyph the legend does not define.
    #[error("invalid level glyph {glyph:?} at column {column}, row {row}")]
    UnrecognizedGlyph {
        /// Offending glyph.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The source placed more than one player marker.
    #[error("second player marker at {second}, the first is at {first}")]
    DuplicatePlayer {
        /// Cell of the first marker encountered.
        first: CellCoord,
        /// Cell of the rejected marker.
        second: CellCoord,
    },
    /// The source placed no player marker at all.
    #[error("level has no player marker")]
    MissingPlayer,
    /// A custom glyph named a transfer kind that does not exist.
    #[error("unknown transfer kind {0:?}, expected \"next\" or \"first\"")]
    UnknownTransferKind(String),
    /// A custom glyph tried to claim a character reserved for row separation.
    #[error("glyph {0:?} cannot be assigned a rule")]
    ReservedGlyph(char),
    /// A level set was built from an empty list of levels.
    #[error("a level set needs at least one level")]
    NoLevels,
}
