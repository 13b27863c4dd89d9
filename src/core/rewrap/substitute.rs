//! Alias → canonical name substitution over a scanned buffer.

use regex::Regex;
use serde::Serialize;

use super::breaks::{BreakKind, BreakRecord, Scan, PARAGRAPH_PLACEHOLDER};
use super::width::str_width;
use crate::error::{Error, Result};

/// Canonical names and the aliases that should become them, in table order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<(String, Vec<String>)>,
    duplicates: Vec<DuplicateAlias>,
}

/// An alias listed under more than one canonical name. The first listing wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAlias {
    pub alias: String,
    pub kept: String,
    pub ignored: String,
}

impl MappingTable {
    pub fn new<I, K, V, A>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut table = MappingTable::default();

        for (canonical, aliases) in entries {
            let canonical = canonical.into();
            let mut kept = Vec::new();

            for alias in aliases {
                let alias = alias.into();
                validate_alias(&alias)?;

                if alias == canonical {
                    continue;
                }
                if let Some(owner) = table.owner_of(&alias).map(str::to_string) {
                    log_status!(
                        "config",
                        "Alias '{}' is listed under both '{}' and '{}'; using '{}'",
                        alias,
                        owner,
                        canonical,
                        owner
                    );
                    table.duplicates.push(DuplicateAlias {
                        alias,
                        kept: owner,
                        ignored: canonical.clone(),
                    });
                    continue;
                }
                if !kept.contains(&alias) {
                    kept.push(alias);
                }
            }

            table.entries.push((canonical, kept));
        }

        Ok(table)
    }

    /// The canonical name owning `alias`, first in table order.
    pub fn owner_of(&self, alias: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a == alias))
            .map(|(canonical, _)| canonical.as_str())
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn duplicates(&self) -> &[DuplicateAlias] {
        &self.duplicates
    }

    /// Every alias, longest first. Equal lengths keep table order.
    pub fn aliases_longest_first(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .entries
            .iter()
            .flat_map(|(_, aliases)| aliases.iter().map(String::as_str))
            .collect();
        aliases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        aliases
    }
}

fn validate_alias(alias: &str) -> Result<()> {
    let problem = if alias.is_empty() {
        "Aliases must not be empty"
    } else if alias.contains('\n') {
        "Aliases must not contain line breaks"
    } else if alias.contains(PARAGRAPH_PLACEHOLDER) {
        "Aliases must not contain U+2029 PARAGRAPH SEPARATOR"
    } else {
        return Ok(());
    };

    Err(Error::pattern_invalid(
        "alias",
        Some(alias.to_string()),
        problem,
    ))
}

/// One replacement, in offsets of the rewritten buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    /// Display width of the canonical name minus that of the alias.
    pub width_delta: isize,
}

#[derive(Debug, Clone)]
pub struct Substitution {
    pub buffer: String,
    pub breaks: Vec<BreakRecord>,
    pub edits: Vec<Edit>,
}

/// A mapping table compiled into one longest-first alternation.
#[derive(Debug, Clone)]
pub struct AliasMatcher {
    table: MappingTable,
    pattern: Option<Regex>,
}

impl AliasMatcher {
    pub fn new(table: &MappingTable) -> Result<Self> {
        let aliases = table.aliases_longest_first();

        let pattern = if aliases.is_empty() {
            None
        } else {
            let alternation = aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            let compiled = Regex::new(&alternation).map_err(|e| {
                Error::pattern_invalid("alias", None, e.to_string())
            })?;
            Some(compiled)
        };

        Ok(Self {
            table: table.clone(),
            pattern,
        })
    }

    /// Replace every alias in the scanned buffer and move the break records
    /// along with the text they sit in.
    ///
    /// Matching resumes after each inserted canonical name, so replacement
    /// text is never matched again.
    pub fn substitute(&self, scan: Scan) -> Substitution {
        let Scan { buffer, mut breaks } = scan;

        let Some(pattern) = &self.pattern else {
            return Substitution {
                buffer,
                breaks,
                edits: Vec::new(),
            };
        };

        let mut out = String::with_capacity(buffer.len());
        let mut spans = Vec::new();
        let mut edits = Vec::new();
        let mut last = 0;

        for m in pattern.find_iter(&buffer) {
            // Every alternative comes from the table, so an owner always exists.
            let Some(canonical) = self.table.owner_of(m.as_str()) else {
                continue;
            };

            out.push_str(&buffer[last..m.start()]);
            let start = out.len();
            out.push_str(canonical);
            let end = out.len();

            spans.push(MatchSpan {
                old_start: m.start(),
                old_end: m.end(),
                new_start: start,
                new_end: end,
            });
            edits.push(Edit {
                start,
                end,
                width_delta: str_width(canonical) as isize - str_width(m.as_str()) as isize,
            });
            last = m.end();
        }
        out.push_str(&buffer[last..]);

        relocate(&mut breaks, &spans);

        Substitution {
            buffer: out,
            breaks,
            edits,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MatchSpan {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

/// Move break records from pre-substitution to post-substitution offsets.
///
/// Records inside a replaced alias (the alias was wrapped across lines) end up
/// right after the canonical name. A joining record whose space was part of
/// the match loses the space and no longer joins.
fn relocate(breaks: &mut [BreakRecord], spans: &[MatchSpan]) {
    let mut next = 0;

    for record in breaks.iter_mut() {
        let p = record.position;
        while next < spans.len() && spans[next].old_end <= p {
            next += 1;
        }

        let shift = match next {
            0 => 0,
            i => spans[i - 1].new_end as isize - spans[i - 1].old_end as isize,
        };

        let Some(span) = spans.get(next).filter(|s| s.old_start <= p) else {
            record.position = (p as isize + shift) as usize;
            continue;
        };

        let joins = matches!(
            record.kind,
            BreakKind::SoftWrap {
                join_with_space: true
            }
        );
        if p == span.old_start && !joins {
            record.position = span.new_start;
        } else {
            record.position = span.new_end;
            record.kind = BreakKind::SoftWrap {
                join_with_space: false,
            };
        }
    }
}
