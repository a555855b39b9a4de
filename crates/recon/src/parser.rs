//! Group-block parser: raw roster text in, `GroupRecord`s out.
//!
//! The text is a sequence of blocks, each introduced by the delimiter
//! (`"Group No - "` by default):
//!
//! ```text
//! Group No - 7
//! Cooking Captains
//! John Doe,
//! 9876543210
//! 1. Alice
//! 2. DIL
//! 3. Bob
//! ```
//!
//! The line after the delimiter is the group number. A line containing the
//! captain marker opens the captain section; numbered `N.` lines are members
//! and close it. Blocks with an unreadable group number are skipped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::model::{GroupRecord, SkippedBlock};

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").expect("numbered line pattern"));

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub groups: Vec<GroupRecord>,
    pub skipped: Vec<SkippedBlock>,
}

/// Parse every group block in `text`.
///
/// Group numbers stay unique: a repeated number is folded into the first
/// record carrying it.
pub fn parse_groups(text: &str, config: &ParserConfig) -> ParseOutput {
    let mut output = ParseOutput::default();

    for (index, block) in text.split(config.delimiter.as_str()).skip(1).enumerate() {
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());

        let Some(header) = lines.next() else {
            continue;
        };

        let group_number = match header.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                debug!(index, header, "skipping block without a group number");
                output.skipped.push(SkippedBlock {
                    index,
                    header: header.to_string(),
                });
                continue;
            }
        };

        let record = parse_block(group_number, lines, config);
        if record.captains.is_empty() && record.members.is_empty() {
            continue;
        }

        match output
            .groups
            .iter_mut()
            .find(|g| g.group_number == group_number)
        {
            Some(existing) => {
                warn!(group_number, "group number repeated; merging into first block");
                existing.captains.extend(record.captains);
                existing.members.extend(record.members);
            }
            None => output.groups.push(record),
        }
    }

    output
}

fn parse_block<'a>(
    group_number: u32,
    lines: impl Iterator<Item = &'a str>,
    config: &ParserConfig,
) -> GroupRecord {
    let mut record = GroupRecord {
        group_number,
        captains: Vec::new(),
        members: Vec::new(),
    };
    let mut in_captains = false;

    for line in lines {
        if line.contains(config.captain_marker.as_str()) {
            in_captains = true;
            continue;
        }

        if let Some(prefix) = NUMBERED_LINE.find(line) {
            in_captains = false;
            let name = line[prefix.end()..].trim();
            if !name.is_empty() && !config.is_placeholder(name) {
                record.members.push(name.to_string());
            }
            continue;
        }

        if in_captains {
            if starts_with_phone_number(line, config.phone_digits)
                || line.chars().count() <= config.min_captain_len
            {
                continue;
            }
            let name = line.replace(',', "");
            let name = name.trim();
            if !name.is_empty() {
                record.captains.push(name.to_string());
            }
        }
    }

    record
}

/// Only the prefix is inspected, so a captain line that happens to begin with
/// a phone-length digit run is dropped along with real phone numbers.
fn starts_with_phone_number(line: &str, digits: usize) -> bool {
    let mut chars = line.chars();
    (0..digits).all(|_| chars.next().is_some_and(|c| c.is_ascii_digit()))
}
