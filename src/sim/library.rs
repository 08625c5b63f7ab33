//! Level library: finds the raw text for each level number.
//!
//! ## Sources (priority order):
//!   1. `levels/` directory: `level1.txt`, `level2.txt`, ... read in
//!      order until the first missing number
//!   2. Built-in embedded levels
//!
//! The library only hands out text. Parsing and validation happen
//! when the session loads a level, so a broken file shows up as a
//! `LoadFailed` for that level rather than here.

use std::path::{Path, PathBuf};

/// Where the levels came from, for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelSource {
    Directory(PathBuf),
    Embedded,
}

#[derive(Clone, Debug)]
pub struct LevelLibrary {
    source: LevelSource,
    /// `levels[0]` is level 1.
    levels: Vec<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

impl LevelLibrary {
    /// Use the levels directory if it holds `level1.txt`, otherwise
    /// fall back to the embedded set.
    pub fn discover(dir: &Path) -> Self {
        let levels = load_from_directory(dir);
        if levels.is_empty() {
            log::info!("no level files in {}, using built-in levels", dir.display());
            return LevelLibrary::embedded();
        }
        log::info!("loaded {} level files from {}", levels.len(), dir.display());
        LevelLibrary {
            source: LevelSource::Directory(dir.to_path_buf()),
            levels,
        }
    }

    pub fn embedded() -> Self {
        LevelLibrary {
            source: LevelSource::Embedded,
            levels: EMBEDDED_LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Raw text for a 1-based level number.
    pub fn level_text(&self, level: u32) -> Option<&str> {
        let idx = (level as usize).checked_sub(1)?;
        self.levels.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn source(&self) -> &LevelSource {
        &self.source
    }

    pub fn source_name(&self) -> String {
        match &self.source {
            LevelSource::Directory(dir) => {
                let name = dir.file_name().unwrap_or_default().to_string_lossy();
                format!("{name}/ ({} levels)", self.levels.len())
            }
            LevelSource::Embedded => format!("Built-in ({} levels)", self.levels.len()),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Directory loading
// ══════════════════════════════════════════════════════════════

fn level_filename(level: usize) -> String {
    format!("level{level}.txt")
}

fn load_from_directory(dir: &Path) -> Vec<String> {
    let mut levels = vec![];
    if !dir.is_dir() {
        return levels;
    }

    for n in 1.. {
        let path = dir.join(level_filename(n));
        if !path.is_file() {
            break;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => levels.push(text),
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                break;
            }
        }
    }

    levels
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels (7 clues, 20 fragments each)
// ══════════════════════════════════════════════════════════════

const EMBEDDED_LEVELS: &[&str] = &[
    "\
HA|UNT|ED: Ghosts in residence
LE|PRO|SY: A Biblical skin disease
TW|ITT|ER: Short but sweet online chirping
OLI|VER: Has a lot to learn about Christmas
ELI|ZAB|ETH: Head of state, British style
SA|FAR|I: The zoological web
POR|TL|AND: Hipster heaven
",
    "\
GAR|DEN: Where the roses grow
PEN|GU|IN: Tuxedoed swimmer
VOL|CA|NO: Mountain with a temper
MAR|AT|HON: A very long run
BUT|TER|FLY: Once a caterpillar
TEL|ESC|OPE: Brings the stars closer
AN|CH|OR: Keeps a ship in place
",
    "\
CRO|COD|ILE: Never smile at one
OR|CHE|STRA: Many players, one conductor
KAN|GA|ROO: Bouncing marsupial
PY|RA|MID: Tomb with pointed ambitions
UMB|REL|LA: Rainy day companion
CAS|TLE: A king's home
HAR|MON|ICA: Pocket-sized wind instrument
",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::level;
    use crate::sim::session::DEFAULT_FRAGMENT_SLOTS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn embedded_levels_fit_the_default_slots() {
        let lib = LevelLibrary::embedded();
        assert_eq!(lib.len(), 3);
        for n in 1..=lib.len() as u32 {
            let def = level::parse(lib.level_text(n).unwrap(), &mut ChaCha8Rng::seed_from_u64(0)).unwrap();
            assert_eq!(def.fragments.len(), DEFAULT_FRAGMENT_SLOTS, "level {n}");
            assert_eq!(def.len(), 7, "level {n}");
        }
    }

    #[test]
    fn level_numbers_are_one_based() {
        let lib = LevelLibrary::embedded();
        assert!(lib.level_text(0).is_none());
        assert!(lib.level_text(1).unwrap().starts_with("HA|UNT|ED"));
        assert!(lib.level_text(4).is_none());
    }

    #[test]
    fn missing_directory_falls_back_to_embedded() {
        let lib = LevelLibrary::discover(Path::new("/definitely/not/here"));
        assert_eq!(lib.source(), &LevelSource::Embedded);
        assert_eq!(lib.source_name(), "Built-in (3 levels)");
    }

    #[test]
    fn directory_levels_load_in_order_until_a_gap() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("level1.txt"), "CAT: A feline").unwrap();
        std::fs::write(dir.path().join("level2.txt"), "DOG: A canine").unwrap();
        std::fs::write(dir.path().join("level4.txt"), "COW: Says moo").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let lib = LevelLibrary::discover(dir.path());
        assert_eq!(lib.source(), &LevelSource::Directory(dir.path().to_path_buf()));
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.level_text(1), Some("CAT: A feline"));
        assert_eq!(lib.level_text(2), Some("DOG: A canine"));
        assert_eq!(lib.level_text(3), None);
    }

    #[test]
    fn directory_without_level_one_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("level2.txt"), "DOG: A canine").unwrap();
        let lib = LevelLibrary::discover(dir.path());
        assert_eq!(lib.source(), &LevelSource::Embedded);
    }
}
