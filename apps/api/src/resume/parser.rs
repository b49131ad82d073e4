//! Section parser: raw resume text → `ParsedResume`.
//!
//! Heuristic and line-oriented. Contact details come from regexes over the whole text;
//! everything after a section header (education / experience / skills) is attributed to
//! that section until the next header.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::resume::ParsedResume;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no text to parse")]
    NoText,
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").expect("phone pattern is valid")
});

/// "T E C H N I C A L" runs of single letters separated by one space or tab.
static SPACED_LETTERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z](?:[ \t][A-Za-z])+\b").expect("spaced letters pattern is valid")
});

static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("multi space pattern is valid"));

static SKILL_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z ]+:\s*").expect("skill label pattern is valid"));

/// Header lines are short; longer lines ending in "skills" are content.
const MAX_HEADER_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Education,
    Experience,
    Skills,
}

/// Repairs common PDF extraction damage: letter-spaced words and runs of spaces.
/// Line breaks are preserved.
pub fn normalize_text(text: &str) -> String {
    let joined = SPACED_LETTERS_RE.replace_all(text, |caps: &regex::Captures| {
        caps[0].chars().filter(|c| !c.is_whitespace()).collect::<String>()
    });
    MULTI_SPACE_RE.replace_all(&joined, " ").into_owned()
}

fn section_header(line: &str) -> Option<Section> {
    if line.split_whitespace().count() > MAX_HEADER_WORDS {
        return None;
    }
    let letters: String = line
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();

    if letters.ends_with("education") {
        Some(Section::Education)
    } else if letters.ends_with("experience") {
        Some(Section::Experience)
    } else if letters.ends_with("skills") {
        Some(Section::Skills)
    } else {
        None
    }
}

fn has_contact(line: &str) -> bool {
    EMAIL_RE.is_match(line) || PHONE_RE.is_match(line)
}

fn find_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn split_skills(line: &str) -> impl Iterator<Item = &str> {
    let without_label = match SKILL_LABEL_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    without_label
        .split([',', '•', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses raw resume text. Refuses blank input rather than returning an empty record.
pub fn parse_resume(text: &str) -> Result<ParsedResume, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::NoText);
    }

    let text = normalize_text(text);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut parsed = ParsedResume {
        name: lines
            .iter()
            .find(|l| !has_contact(l) && (2..=5).contains(&l.split_whitespace().count()))
            .map(|l| l.to_string())
            .unwrap_or_default(),
        email: find_all(&EMAIL_RE, &text),
        phone: find_all(&PHONE_RE, &text),
        ..Default::default()
    };

    let mut seen_skills: HashSet<String> = HashSet::new();
    let mut current: Option<Section> = None;

    for line in lines {
        if let Some(section) = section_header(line) {
            current = Some(section);
            continue;
        }
        match current {
            Some(Section::Skills) => {
                for skill in split_skills(line) {
                    if seen_skills.insert(skill.to_string()) {
                        parsed.skills.push(skill.to_string());
                    }
                }
            }
            Some(Section::Education) => parsed.education.push(line.to_string()),
            Some(Section::Experience) => parsed.experience.push(line.to_string()),
            None => {}
        }
    }

    Ok(parsed)
}
