use super::MAX_LINE_LEN;
use crate::error;
use crate::lang::{Error, Line, LineNumber, Position};
use std::collections::{btree_map::Values, BTreeMap};
use std::ops::Bound;

/// ## Program lines in number order
///
/// Line 0 is the immediate line. It is kept apart so clearing the
/// program never takes away the statement being executed.

#[derive(Debug, Clone, Default)]
pub struct Listing {
    source: BTreeMap<LineNumber, Line>,
    direct: Option<Line>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn insert(&mut self, line: Line) -> Option<Line> {
        if line.is_direct() {
            return self.direct.replace(line);
        }
        self.source.insert(line.number(), line)
    }

    pub fn remove(&mut self, number: LineNumber) -> Option<Line> {
        self.source.remove(&number)
    }

    pub fn get(&self, number: LineNumber) -> Option<&Line> {
        if number == 0 {
            return self.direct.as_ref();
        }
        self.source.get(&number)
    }

    pub fn contains(&self, number: LineNumber) -> bool {
        self.source.contains_key(&number)
    }

    /// First program line numbered `number` or higher.
    pub fn first_from(&self, number: LineNumber) -> Option<LineNumber> {
        self.source.range(number..).next().map(|(n, _)| *n)
    }

    /// The immediate line has no successor.
    pub fn next_after(&self, number: LineNumber) -> Option<LineNumber> {
        if number == 0 {
            return None;
        }
        self.source
            .range((Bound::Excluded(number), Bound::Unbounded))
            .next()
            .map(|(n, _)| *n)
    }

    pub fn lines(&self) -> Values<'_, LineNumber, Line> {
        self.source.values()
    }

    /// `count` lines from `start`, all of them when `count` is zero.
    pub fn list(&self, start: LineNumber, count: usize) -> String {
        let count = if count == 0 { usize::MAX } else { count };
        self.source
            .range(start..)
            .take(count)
            .map(|(_, line)| format!("{}\n", line))
            .collect()
    }

    pub fn save_string(&self) -> String {
        self.list(0, 0)
    }

    /// Merges program text. Blank lines and lines starting with
    /// anything below `0`, such as `#` or control characters, are
    /// skipped. Errors carry the text line as their position.
    pub fn load_str(&mut self, text: &str) -> Result<usize, Error> {
        let mut count = 0;
        for (index, raw) in text.lines().enumerate() {
            let position = Position::new((index + 1) as LineNumber, 0);
            let s = raw.trim_start_matches(|c| c == ' ' || c == '\t');
            match s.chars().next() {
                None => continue,
                Some(c) if c < '0' => continue,
                Some(_) => {}
            }
            let s = match s.char_indices().nth(MAX_LINE_LEN) {
                Some((idx, _)) => &s[..idx],
                None => s,
            };
            let line = Line::new(s);
            if line.is_direct() {
                return Err(error!(LoadNoNumber, position));
            }
            if self.source.contains_key(&line.number()) {
                return Err(error!(LoadDuplicate, position));
            }
            if !line.is_empty() {
                self.insert(line);
                count += 1;
            }
        }
        Ok(count)
    }
}
