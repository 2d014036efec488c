//! Loose version keys for git tag names
//!
//! Tag names in the wild rarely follow strict semver. A tag is accepted when
//! it matches the relaxed grammar
//!
//! ```text
//! [vV]? digits ( . digits )* [a-z]? ( -? [a-z.]+ digits* )?
//! ```
//!
//! and is then split into a [`VersionKey`]: digit runs become
//! [`Component::Int`], lowercase runs and any other separator (the `-` of a
//! pre-release suffix) become [`Component::Text`], dots are dropped.
//!
//! Keys compare component by component. When one key runs out first the
//! longer key is greater, so `1.2.3-alpha` > `1.2.3` > `1.2`. At a shared
//! position an integer always beats text, whatever its value.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?[0-9]+(\.[0-9]+)*[a-z]?(-?[a-z.]+[0-9]*)?$").unwrap()
});

/// One comparable piece of a version key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// Digit run without leading zeros, compared by numeric value
    Int(String),
    Text(String),
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Normalized digit strings: the longer one is the larger number.
            (Component::Int(a), Component::Int(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            // Mixed types: an integer outranks any text.
            (Component::Int(_), Component::Text(_)) => Ordering::Greater,
            (Component::Text(_), Component::Int(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parsed component sequence of a tag, used only for ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionKey(Vec<Component>);

impl VersionKey {
    /// Parse a tag name, returning `None` when it doesn't match the grammar.
    pub fn parse(tag: &str) -> Option<Self> {
        if !VERSION_GRAMMAR.is_match(tag) {
            return None;
        }
        Some(Self(split_components(strip_prefix(tag))))
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.0.iter();
        let mut right = other.0.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(a), Some(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    decided => return decided,
                },
            }
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A tag name that passed the grammar, paired with its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub key: VersionKey,
}

impl VersionTag {
    pub fn parse(name: &str) -> Option<Self> {
        VersionKey::parse(name).map(|key| Self {
            name: name.to_string(),
            key,
        })
    }
}

fn strip_prefix(tag: &str) -> &str {
    tag.strip_prefix(['v', 'V']).unwrap_or(tag)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Lower,
    Dot,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '0'..='9' => CharClass::Digit,
        'a'..='z' => CharClass::Lower,
        '.' => CharClass::Dot,
        _ => CharClass::Other,
    }
}

fn split_components(version: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut rest = version;

    while let Some(first) = rest.chars().next() {
        let class = classify(first);
        if class == CharClass::Dot {
            rest = &rest[1..];
            continue;
        }

        let end = rest
            .char_indices()
            .find(|&(_, c)| classify(c) != class)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(end);
        rest = tail;

        components.push(match class {
            CharClass::Digit => Component::Int(normalize_digits(run)),
            _ => Component::Text(run.to_string()),
        });
    }

    components
}

fn normalize_digits(run: &str) -> String {
    match run.trim_start_matches('0') {
        "" => "0".to_string(),
        digits => digits.to_string(),
    }
}
