//! Parse natural language directives into structured intents
//!
//! Grammar/keyword based: an ordered table of `nom` patterns, most specific
//! first. Each pattern is searched for once across the whole directive and
//! its span is cut out before the next pattern runs, so a compound directive
//! ("patrol between B2 and B9 and shoot at anything in your sight") yields
//! one intent per clause without the move pattern swallowing the patrol.
//!
//! Parsing never fails. Unrecognized text is ignored; coordinates outside
//! the arena drop their intent (with a warning) and leave siblings intact.

use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{multispace1, satisfy};
use nom::combinator::{map, not, opt, recognize, value};
use nom::error::{Error, ErrorKind};
use nom::sequence::{preceded, terminated};
use nom::{IResult, Parser};

use crate::core::error::Result;
use crate::grid::{Compass, GridSpec};
use crate::command::intent::Intent;

// Synonym classes. Longest spellings first: a keyword only matches a whole
// word, so "to" can never eat the front of "towards".
const PATROL_VERBS: &[&str] = &["go back and forth", "alternate", "patrol", "circle", "loop"];
const MOVE_VERBS: &[&str] = &[
    "navigate", "proceed", "advance", "retreat", "travel", "drive", "head", "move", "go",
];
const GUARD_VERBS: &[&str] = &["protect", "defend", "secure", "guard", "hold", "camp"];
const FACE_VERBS: &[&str] = &["rotate", "point", "face", "turn", "look", "aim"];
const SHOOT_VERBS: &[&str] = &["shoot", "fire", "attack", "engage"];

const TO_PREPS: &[&str] = &["towards", "toward", "to", "at"];
const BETWEEN_PREPS: &[&str] = &["between", "from"];
const AND_CONJ: &[&str] = &["and", "to"];
const GUARD_QUALIFIERS: &[&str] = &["position", "area", "spot", "point", "the"];
const TARGET_NOUNS: &[&str] = &[
    "anything", "anyone", "anybody", "any", "enemies", "enemy", "targets", "target", "hostiles",
    "hostile", "contacts", "contact", "opponents", "opponent",
];
const SIGHT_WORDS: &[&str] = &["sight", "view", "range", "contact"];
/// Dropped from clauses on the fallback pass only
const FILLER_WORDS: &[&str] = &["the", "then", "please", "also", "now", "just"];

/// A pattern match before its coordinates are checked against the arena
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawIntent<'a> {
    MoveTo(&'a str),
    Face(Compass),
    ShootOnce,
    Patrol(&'a str, &'a str),
    Guard(&'a str),
    ShootOnSight,
}

impl RawIntent<'_> {
    fn resolve(self, spec: &GridSpec) -> Result<Intent> {
        Ok(match self {
            RawIntent::MoveTo(cell) => Intent::MoveTo {
                cell: spec.parse_coord(cell)?,
            },
            RawIntent::Face(direction) => Intent::Face { direction },
            RawIntent::ShootOnce => Intent::ShootOnce,
            RawIntent::Patrol(a, b) => Intent::Patrol {
                cell_a: spec.parse_coord(a)?,
                cell_b: spec.parse_coord(b)?,
            },
            RawIntent::Guard(cell) => Intent::Guard {
                cell: spec.parse_coord(cell)?,
            },
            RawIntent::ShootOnSight => Intent::ShootOnSight,
        })
    }
}

type PatternFn = for<'a> fn(&'a str) -> IResult<&'a str, RawIntent<'a>>;

/// Scan order matters: patrol before move, sight-fire before bare fire.
const PATTERNS: [(&str, PatternFn); 6] = [
    ("patrol", patrol),
    ("guard", guard),
    ("move_to", move_to),
    ("face", face),
    ("shoot_on_sight", shoot_on_sight),
    ("shoot_once", shoot_once),
];

/// Parse a directive against the default 18 x 12 arena
pub fn parse(text: &str) -> Vec<Intent> {
    parse_intents(text, &GridSpec::default())
}

/// Parse a directive into an ordered list of intents
///
/// Intents come out in pattern-table order. If no pattern matches anywhere
/// in the full text, the directive is split on "and" into clauses, filler
/// words ("the", "then", ...) are dropped from each clause, and each clause
/// yields at most one intent, in clause order.
pub fn parse_intents(text: &str, spec: &GridSpec) -> Vec<Intent> {
    let normalized = normalize(text);
    let mut matched: Vec<(&'static str, Result<Intent>)> = Vec::new();

    let mut remaining = normalized.clone();
    for (name, pattern) in PATTERNS {
        if let Some((start, end, raw)) = search(&remaining, pattern) {
            matched.push((name, raw.resolve(spec)));
            remaining = format!("{} {}", &remaining[..start], &remaining[end..]);
        }
    }

    if matched.is_empty() {
        for fragment in clauses(&normalized) {
            for (name, pattern) in PATTERNS {
                if let Some((_, _, raw)) = search(&fragment, pattern) {
                    matched.push((name, raw.resolve(spec)));
                    break;
                }
            }
        }
    }

    matched
        .into_iter()
        .filter_map(|(name, resolved)| match resolved {
            Ok(intent) => Some(intent),
            Err(err) => {
                tracing::warn!(pattern = name, directive = text, "dropping intent: {}", err);
                None
            }
        })
        .collect()
}

/// Lowercase and collapse runs of whitespace to single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn clauses(normalized: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in normalized.split(' ') {
        if word == "and" {
            if !current.is_empty() {
                fragments.push(current.join(" "));
                current.clear();
            }
        } else if !FILLER_WORDS.contains(&word) {
            current.push(word);
        }
    }
    if !current.is_empty() {
        fragments.push(current.join(" "));
    }
    fragments
}

/// Leftmost match of `pattern` starting at a word boundary
///
/// Returns the byte span of the match and the raw intent.
fn search<'a>(text: &'a str, pattern: PatternFn) -> Option<(usize, usize, RawIntent<'a>)> {
    let mut prev_alnum = false;
    for (idx, ch) in text.char_indices() {
        let alnum = ch.is_ascii_alphanumeric();
        let word_start = alnum && !prev_alnum;
        prev_alnum = alnum;
        if !word_start {
            continue;
        }
        if let Ok((rest, raw)) = pattern(&text[idx..]) {
            return Some((idx, text.len() - rest.len(), raw));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn no_match(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(input, ErrorKind::Tag))
}

/// Strip `word` from the front of `input` if it is followed by a word boundary
fn strip_word<'a>(input: &'a str, word: &str) -> Option<&'a str> {
    input
        .strip_prefix(word)
        .filter(|rest| !rest.starts_with(|c: char| c.is_ascii_alphanumeric()))
}

/// Any one whole word (or fixed phrase) from a synonym class
fn keyword<'a>(words: &'static [&'static str]) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        words
            .iter()
            .find_map(|word| strip_word(input, word).map(|rest| (rest, &input[..word.len()])))
            .ok_or_else(|| no_match(input))
    }
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace1(input)
}

fn word_end(input: &str) -> IResult<&str, ()> {
    not(satisfy(|c: char| c.is_ascii_alphanumeric())).parse(input)
}

/// Grid coordinate text, optionally preceded by "cell": one letter, 1-2 digits
///
/// Any letter is accepted here; arena bounds are checked on resolution.
fn cell(input: &str) -> IResult<&str, &str> {
    preceded(
        opt((tag("cell"), ws)),
        terminated(
            recognize((
                satisfy(|c: char| c.is_ascii_alphabetic()),
                take_while_m_n(1, 2, |c: char| c.is_ascii_digit()),
            )),
            word_end,
        ),
    )
    .parse(input)
}

fn compass(input: &str) -> IResult<&str, Compass> {
    Compass::ALIASES
        .iter()
        .find_map(|(alias, direction)| strip_word(input, alias).map(|rest| (rest, *direction)))
        .ok_or_else(|| no_match(input))
}

/// Lazily consume text up to and including the first sight word
fn through_sight_word(input: &str) -> IResult<&str, &str> {
    input
        .char_indices()
        .find_map(|(idx, _)| {
            SIGHT_WORDS
                .iter()
                .find(|word| input[idx..].starts_with(*word))
                .map(|word| idx + word.len())
        })
        .map(|end| (&input[end..], &input[..end]))
        .ok_or_else(|| no_match(input))
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// "patrol between B2 and B9", "go back and forth between B2 and B9", "loop from B2 to B9"
fn patrol(input: &str) -> IResult<&str, RawIntent<'_>> {
    map(
        (
            keyword(PATROL_VERBS),
            ws,
            keyword(BETWEEN_PREPS),
            ws,
            cell,
            ws,
            keyword(AND_CONJ),
            ws,
            cell,
        ),
        |(_, _, _, _, a, _, _, _, b)| RawIntent::Patrol(a, b),
    )
    .parse(input)
}

/// "guard E5", "defend position E5", "hold at cell E5"
fn guard(input: &str) -> IResult<&str, RawIntent<'_>> {
    map(
        (
            keyword(GUARD_VERBS),
            ws,
            opt((keyword(GUARD_QUALIFIERS), ws)),
            opt((keyword(TO_PREPS), ws)),
            cell,
        ),
        |(_, _, _, _, c)| RawIntent::Guard(c),
    )
    .parse(input)
}

/// "move to I6", "head towards cell I6", "retreat to A1"
fn move_to(input: &str) -> IResult<&str, RawIntent<'_>> {
    map(
        (keyword(MOVE_VERBS), ws, keyword(TO_PREPS), ws, cell),
        |(_, _, _, _, c)| RawIntent::MoveTo(c),
    )
    .parse(input)
}

/// "face north", "turn NE", "look southwest"
fn face(input: &str) -> IResult<&str, RawIntent<'_>> {
    map((keyword(FACE_VERBS), ws, compass), |(_, _, direction)| {
        RawIntent::Face(direction)
    })
    .parse(input)
}

/// "shoot at anything in your sight", "fire at enemies in view", "engage targets within range"
fn shoot_on_sight(input: &str) -> IResult<&str, RawIntent<'_>> {
    value(
        RawIntent::ShootOnSight,
        (
            keyword(SHOOT_VERBS),
            ws,
            opt((tag("at"), ws)),
            keyword(TARGET_NOUNS),
            through_sight_word,
        ),
    )
    .parse(input)
}

/// "shoot", "fire", "attack"
fn shoot_once(input: &str) -> IResult<&str, RawIntent<'_>> {
    value(RawIntent::ShootOnce, keyword(SHOOT_VERBS)).parse(input)
}
