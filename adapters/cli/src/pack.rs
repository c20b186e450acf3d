//! Level packs: TOML manifests listing levels and custom glyphs, plus the built-in pack.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use worldshift_core::GAME_TITLE;
use worldshift_world::{GlyphRule, Legend, Level, LevelSet};

const BUILTIN_LEVELS: [(&str, &str); 3] = [
    ("crossroads", include_str!("../levels/01_crossroads.txt")),
    ("airlock", include_str!("../levels/02_airlock.txt")),
    ("homeward", include_str!("../levels/03_homeward.txt")),
];

/// Ordered, parsed levels ready to be handed to a level set.
#[derive(Clone, Debug)]
pub(crate) struct LevelPack {
    pub(crate) title: String,
    pub(crate) levels: Vec<Level>,
}

impl LevelPack {
    /// Pack compiled into the binary, parsed with the standard legend.
    pub(crate) fn builtin() -> Result<Self> {
        let legend = Legend::standard();
        let levels = BUILTIN_LEVELS
            .iter()
            .map(|(name, source)| {
                Level::parse(source, &legend)
                    .map(|level| level.with_name(*name))
                    .with_context(|| format!("built-in level {name:?} is invalid"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: GAME_TITLE.to_owned(),
            levels,
        })
    }

    /// Loads a manifest from disk. Level paths resolve against the manifest's directory.
    pub(crate) fn load_manifest(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level pack {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest_str(&text, base)
            .with_context(|| format!("invalid level pack {}", path.display()))
    }

    /// Parses manifest text, resolving relative level paths against `base`.
    pub(crate) fn from_manifest_str(text: &str, base: &Path) -> Result<Self> {
        let manifest: PackManifest = toml::from_str(text).context("malformed manifest")?;
        let legend = manifest.legend()?;

        let levels = manifest
            .levels
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.load(index, base, &legend))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: manifest.title.unwrap_or_else(|| GAME_TITLE.to_owned()),
            levels,
        })
    }

    /// Loads standalone level files in the given order with the standard legend.
    pub(crate) fn from_level_files(paths: &[PathBuf]) -> Result<Self> {
        let legend = Legend::standard();
        let levels = paths
            .iter()
            .map(|path| {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read level {}", path.display()))?;
                let level = Level::parse(&source, &legend)
                    .with_context(|| format!("invalid level {}", path.display()))?;
                Ok(match path.file_stem().and_then(|stem| stem.to_str()) {
                    Some(stem) => level.with_name(stem),
                    None => level,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: GAME_TITLE.to_owned(),
            levels,
        })
    }

    /// Moves the levels into a fresh level set.
    pub(crate) fn into_level_set(self) -> Result<LevelSet> {
        LevelSet::new(self.levels).context("level pack cannot be played")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackManifest {
    title: Option<String>,
    #[serde(default)]
    levels: Vec<LevelEntry>,
    #[serde(default)]
    legend: BTreeMap<String, GlyphDefinition>,
}

impl PackManifest {
    fn legend(&self) -> Result<Legend> {
        let mut legend = Legend::standard();
        for (key, definition) in &self.legend {
            let mut chars = key.chars();
            let glyph = match (chars.next(), chars.next()) {
                (Some(glyph), None) => glyph,
                _ => bail!("legend key {key:?} must be a single character"),
            };
            let rule = definition
                .to_rule()
                .with_context(|| format!("invalid rule for glyph {glyph:?}"))?;
            legend.define(glyph, rule)?;
        }
        Ok(legend)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelEntry {
    name: Option<String>,
    path: Option<PathBuf>,
    rows: Option<Vec<String>>,
}

impl LevelEntry {
    fn load(self, index: usize, base: &Path, legend: &Legend) -> Result<Level> {
        let source = match (self.path, self.rows) {
            (Some(path), None) => {
                let resolved = base.join(&path);
                fs::read_to_string(&resolved)
                    .with_context(|| format!("failed to read level {}", resolved.display()))?
            }
            (None, Some(rows)) => rows.join("\n"),
            (Some(_), Some(_)) => bail!("level {index} sets both `path` and `rows`"),
            (None, None) => bail!("level {index} needs either `path` or `rows`"),
        };

        let level = Level::parse(&source, legend).with_context(|| match &self.name {
            Some(name) => format!("invalid level {index} ({name})"),
            None => format!("invalid level {index}"),
        })?;
        Ok(match self.name {
            Some(name) => level.with_name(name),
            None => level,
        })
    }
}

/// Custom glyph meaning as written in a manifest's `[legend]` table.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum GlyphDefinition {
    Void,
    Floor,
    Wall,
    Spawn,
    Accept(Vec<i32>),
    Change(BTreeMap<String, i32>),
    Transfer(String),
}

impl GlyphDefinition {
    fn to_rule(&self) -> Result<GlyphRule> {
        Ok(match self {
            Self::Void => GlyphRule::Void,
            Self::Floor => GlyphRule::Floor,
            Self::Wall => GlyphRule::Wall,
            Self::Spawn => GlyphRule::PlayerSpawn,
            Self::Accept(worlds) => GlyphRule::accept(worlds.iter().copied()),
            Self::Change(map) => {
                let transitions = map
                    .iter()
                    .map(|(from, to)| {
                        from.trim()
                            .parse::<i32>()
                            .map(|from| (from, *to))
                            .map_err(|_| anyhow!("world {from:?} is not an integer"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                GlyphRule::change(transitions)
            }
            Self::Transfer(name) => GlyphRule::transfer(name)?,
        })
    }
}
