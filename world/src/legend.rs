//! Glyph table used to translate level source text into cells.

use std::collections::{BTreeMap, BTreeSet};

use worldshift_core::{TransferKind, WorldTag};

use crate::{cell::Cell, error::LoadError};

/// Meaning assigned to a single level-source glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlyphRule {
    /// No cell; never walkable and never drawn.
    Void,
    /// Walkable ground.
    Floor,
    /// Solid wall.
    Wall,
    /// Door open only for the listed worlds.
    Accept(BTreeSet<WorldTag>),
    /// Pad rewriting the carried world tag.
    Change(BTreeMap<WorldTag, WorldTag>),
    /// Level transfer pad.
    Transfer(TransferKind),
    /// Player spawn marker standing on a floor cell.
    PlayerSpawn,
}

impl GlyphRule {
    /// Builds a door rule from world values.
    #[must_use]
    pub fn accept<I>(worlds: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self::Accept(worlds.into_iter().map(WorldTag::new).collect())
    }

    /// Builds a world-change rule from `(from, to)` world values.
    #[must_use]
    pub fn change<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        Self::Change(
            transitions
                .into_iter()
                .map(|(from, to)| (WorldTag::new(from), WorldTag::new(to)))
                .collect(),
        )
    }

    /// Builds a transfer rule from its textual name (`next` or `first`).
    pub fn transfer(name: &str) -> Result<Self, LoadError> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "next" => TransferKind::Next,
            "first" => TransferKind::First,
            _ => return Err(LoadError::UnknownTransferKind(name.to_owned())),
        };
        Ok(Self::Transfer(kind))
    }

    /// Creates the cell this rule places into the grid, if any.
    #[must_use]
    pub(crate) fn instantiate(&self) -> Option<Cell> {
        match self {
            Self::Void => None,
            Self::Floor | Self::PlayerSpawn => Some(Cell::Floor),
            Self::Wall => Some(Cell::Wall),
            Self::Accept(accepted) => Some(Cell::WorldAccept {
                accepted: accepted.clone(),
            }),
            Self::Change(transitions) => Some(Cell::WorldChange {
                transitions: transitions.clone(),
            }),
            Self::Transfer(kind) => Some(Cell::LevelTransfer { kind: *kind }),
        }
    }
}

/// Mapping from glyphs to rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Legend {
    rules: BTreeMap<char, GlyphRule>,
}

impl Legend {
    /// Default glyph table.
    ///
    /// | glyph | rule |
    /// |---|---|
    /// | `.` | void |
    /// | `,` | floor |
    /// | `#` | wall |
    /// | `0` `2` `4` | door open for world 0, 2, 4 |
    /// | `1` `3` `5` | world change 0→2, 2→4, 4→0 |
    /// | `@` | transfer to next level |
    /// | `$` | transfer to first level |
    /// | `P` | player spawn on floor |
    #[must_use]
    pub fn standard() -> Self {
        let rules = [
            ('.', GlyphRule::Void),
            (',', GlyphRule::Floor),
            ('#', GlyphRule::Wall),
            ('0', GlyphRule::accept([0])),
            ('2', GlyphRule::accept([2])),
            ('4', GlyphRule::accept([4])),
            ('1', GlyphRule::change([(0, 2)])),
            ('3', GlyphRule::change([(2, 4)])),
            ('5', GlyphRule::change([(4, 0)])),
            ('@', GlyphRule::Transfer(TransferKind::Next)),
            ('$', GlyphRule::Transfer(TransferKind::First)),
            ('P', GlyphRule::PlayerSpawn),
        ];

        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Adds or replaces the rule for `glyph`.
    ///
    /// Line-break characters separate rows and cannot carry a rule.
    pub fn define(&mut self, glyph: char, rule: GlyphRule) -> Result<(), LoadError> {
        if matches!(glyph, '\n' | '\r') {
            return Err(LoadError::ReservedGlyph(glyph));
        }

        let _ = self.rules.insert(glyph, rule);
        Ok(())
    }

    /// Retrieves the rule assigned to `glyph`.
    #[must_use]
    pub fn rule(&self, glyph: char) -> Option<&GlyphRule> {
        self.rules.get(&glyph)
    }

    /// Iterates over every defined glyph in character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &GlyphRule)> {
        self.rules.iter().map(|(glyph, rule)| (*glyph, rule))
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_maps_world_changes_one_way() {
        let legend = Legend::standard();
        assert_eq!(legend.rule('1'), Some(&GlyphRule::change([(0, 2)])));
        assert_eq!(legend.rule('3'), Some(&GlyphRule::change([(2, 4)])));
        assert_eq!(legend.rule('5'), Some(&GlyphRule::change([(4, 0)])));
    }

    #[test]
    fn player_marker_stands_on_floor() {
        assert_eq!(GlyphRule::PlayerSpawn.instantiate(), Some(Cell::Floor));
        assert_eq!(GlyphRule::Void.instantiate(), None);
    }

    #[test]
    fn transfer_names_are_case_insensitive() {
        assert_eq!(
            GlyphRule::transfer("Next"),
            Ok(GlyphRule::Transfer(TransferKind::Next))
        );
        assert_eq!(
            GlyphRule::transfer("first"),
            Ok(GlyphRule::Transfer(TransferKind::First))
        );
    }

    #[test]
    fn unknown_transfer_name_is_rejected() {
        assert_eq!(
            GlyphRule::transfer("sideways"),
            Err(LoadError::UnknownTransferKind("sideways".to_owned()))
        );
    }

    #[test]
    fn define_overrides_existing_glyph() {
        let mut legend = Legend::standard();
        legend
            .define('1', GlyphRule::change([(0, 2), (2, 0)]))
            .expect("define two-way pad");
        assert_eq!(legend.rule('1'), Some(&GlyphRule::change([(0, 2), (2, 0)])));
    }

    #[test]
    fn line_breaks_cannot_be_defined() {
        let mut legend = Legend::standard();
        assert_eq!(
            legend.define('\n', GlyphRule::Floor),
            Err(LoadError::ReservedGlyph('\n'))
        );
    }
}
