//! Level parser: raw level text → `LevelDefinition`.
//!
//! ## Level format:
//!   One entry per line, `ANSWER: clue text`.
//!   `|` inside ANSWER marks fragment boundaries:
//!   ```text
//!   HA|UNT|ED: Ghosts in residence
//!   OLI|VER: Has a lot to learn about Christmas
//!   ```
//!
//! Lines are shuffled before numbering, so the clue order (and the
//! numbers shown next to each clue) differs from play to play.
//! Blank lines are skipped.

use rand::seq::SliceRandom;
use rand::Rng;

/// Answer/clue separator. Only the first occurrence counts.
const SEPARATOR: &str = ": ";
/// Fragment boundary marker inside an answer.
const FRAGMENT_MARK: char = '|';

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("malformed level line (expected `ANSWER: clue`): {line:?}")]
    MalformedLine { line: String },
    #[error("level data contains no entries")]
    Empty,
}

/// A numbered clue, as displayed to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clue {
    /// 1-based display number.
    pub number: usize,
    pub text: String,
}

impl Clue {
    /// `"3. Ghosts in residence"`
    pub fn display(&self) -> String {
        format!("{}. {}", self.number, self.text)
    }
}

/// A parsed level.
///
/// `clues[i]` and `solutions[i]` describe the same entry.
/// `fragments` is every solution's fragment list, concatenated in
/// solution order. The pool shuffles them later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDefinition {
    pub clues: Vec<Clue>,
    pub solutions: Vec<String>,
    pub fragments: Vec<String>,
}

impl LevelDefinition {
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

/// Parse a level blob, shuffling the entry order with `rng`.
///
/// Any malformed line aborts the whole parse: a partial level is
/// never playable.
pub fn parse<R: Rng + ?Sized>(blob: &str, rng: &mut R) -> Result<LevelDefinition, LevelError> {
    let mut lines: Vec<&str> = blob
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(LevelError::Empty);
    }

    lines.shuffle(rng);

    let mut def = LevelDefinition {
        clues: Vec::with_capacity(lines.len()),
        solutions: Vec::with_capacity(lines.len()),
        fragments: Vec::new(),
    };

    for (index, line) in lines.iter().enumerate() {
        let (answer, clue) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| LevelError::MalformedLine { line: line.to_string() })?;

        def.clues.push(Clue { number: index + 1, text: clue.to_string() });
        def.solutions.push(answer.replace(FRAGMENT_MARK, ""));
        def.fragments.extend(answer.split(FRAGMENT_MARK).map(str::to_string));
    }

    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(8)
    }

    #[test]
    fn parses_whole_word_answers() {
        let def = parse("CAT: A feline\nDOG: A canine", &mut rng()).unwrap();
        assert_eq!(def.len(), 2);
        assert_eq!(def.clues.len(), def.solutions.len());

        let mut words = def.solutions.clone();
        words.sort();
        assert_eq!(words, vec!["CAT", "DOG"]);

        // No `|`: every answer is a single fragment.
        assert_eq!(def.fragments, def.solutions);
    }

    #[test]
    fn clues_stay_aligned_with_solutions() {
        let def = parse("CAT: A feline\nDOG: A canine\nCOW: Says moo", &mut rng()).unwrap();
        for (clue, word) in def.clues.iter().zip(&def.solutions) {
            let expected = match word.as_str() {
                "CAT" => "A feline",
                "DOG" => "A canine",
                "COW" => "Says moo",
                other => panic!("unexpected solution {other}"),
            };
            assert_eq!(clue.text, expected);
        }
        let numbers: Vec<usize> = def.clues.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn splits_fragments_in_answer_order() {
        let def = parse("HA|UNT|ED: Ghosts in residence", &mut rng()).unwrap();
        assert_eq!(def.solutions, vec!["HAUNTED"]);
        assert_eq!(def.fragments, vec!["HA", "UNT", "ED"]);
    }

    #[test]
    fn fragments_follow_shuffled_solution_order() {
        let def = parse("CAT|FISH: Whiskered swimmer\nDOG|FISH: Small shark", &mut rng()).unwrap();
        let rebuilt: Vec<String> = def.fragments.chunks(2).map(|c| c.concat()).collect();
        assert_eq!(rebuilt, def.solutions);
    }

    #[test]
    fn only_first_separator_splits() {
        let def = parse("RATIO: A: B", &mut rng()).unwrap();
        assert_eq!(def.solutions, vec!["RATIO"]);
        assert_eq!(def.clues[0].text, "A: B");
    }

    #[test]
    fn malformed_line_aborts_whole_parse() {
        let err = parse("CAT: A feline\nDOG - A canine", &mut rng()).unwrap_err();
        assert_eq!(err, LevelError::MalformedLine { line: "DOG - A canine".into() });
    }

    #[test]
    fn colon_without_space_is_malformed() {
        let err = parse("CAT:A feline", &mut rng()).unwrap_err();
        assert!(matches!(err, LevelError::MalformedLine { .. }));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let def = parse("CAT: A feline\r\n\r\nDOG: A canine\r\n", &mut rng()).unwrap();
        assert_eq!(def.len(), 2);
        assert!(def.clues.iter().all(|c| !c.text.ends_with('\r')));
    }

    #[test]
    fn empty_blob_is_an_error() {
        assert_eq!(parse("", &mut rng()), Err(LevelError::Empty));
        assert_eq!(parse("\n  \n", &mut rng()), Err(LevelError::Empty));
    }

    #[test]
    fn same_seed_same_order() {
        let blob = "A: 1\nB: 2\nC: 3\nD: 4\nE: 5\nF: 6";
        let a = parse(blob, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = parse(blob, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clue_display_is_numbered() {
        let clue = Clue { number: 3, text: "Ghosts in residence".into() };
        assert_eq!(clue.display(), "3. Ghosts in residence");
    }
}
