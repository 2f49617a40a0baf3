// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic to relative path mapping
//!
//! Topics are slash-delimited, so `home/kitchen/power` is stored as nested
//! directories below the recorder root. Anything that could escape the root
//! or produce an unreadable file name is rejected.

use crate::error::TopicError;

/// Characters stripped from both ends of a topic
const TRIM_CHARS: &[char] = &['/', '.'];

/// Map a topic onto a relative, traversal-free path
pub fn sanitize(topic: &str) -> Result<&str, TopicError> {
    let trimmed = topic.trim_matches(TRIM_CHARS);

    if trimmed.is_empty() {
        return Err(TopicError::Empty(topic.to_string()));
    }
    if trimmed.contains("..") {
        return Err(TopicError::Traversal(trimmed.to_string()));
    }
    if !trimmed.chars().all(is_printable) {
        return Err(TopicError::NonPrintable(trimmed.to_string()));
    }

    Ok(trimmed)
}

/// Graphic characters plus the ASCII space
///
/// Control, whitespace, format, private-use and noncharacter code points are
/// rejected. Code points not yet assigned by Unicode are not looked up and
/// count as printable.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !is_format(c) && !is_private_use(c) && !is_noncharacter(c)
}

/// U+FDD0..U+FDEF and the last two code points of every plane
fn is_noncharacter(c: char) -> bool {
    let cp = u32::from(c);
    (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE
}

/// Invisible formatting characters (Unicode category Cf)
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;
