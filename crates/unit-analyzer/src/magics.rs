use std::borrow::Cow;

/// Remove IPython syntax the Python grammar cannot parse.
///
/// Returns `None` for cell magics (`%%time`, `%%bash`, ...): the whole cell is not Python.
/// Line magics and shell escapes are blanked so line numbers stay stable.
pub(crate) fn strip_magics(source: &str) -> Option<Cow<'_, str>> {
    let first = source.lines().find(|line| !line.trim().is_empty());
    if first.is_some_and(|line| line.trim_start().starts_with("%%")) {
        return None;
    }

    let mask = magic_lines(source);
    if !mask.contains(&true) {
        return Some(Cow::Borrowed(source));
    }

    let stripped = source
        .lines()
        .zip(mask)
        .map(|(line, magic)| if magic { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n");
    Some(Cow::Owned(stripped))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenString {
    Single(char),
    Triple(char),
}

/// Lexer state carried from one physical line to the next
#[derive(Debug, Default)]
struct LineState {
    depth: usize,
    string: Option<OpenString>,
    continued: bool,
}

impl LineState {
    fn at_logical_start(&self) -> bool {
        self.depth == 0 && self.string.is_none() && !self.continued
    }

    fn scan(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        let mut comment = false;

        while i < chars.len() {
            let c = chars[i];
            match self.string {
                Some(open) => {
                    if c == '\\' {
                        i += 2;
                        continue;
                    }
                    match open {
                        OpenString::Triple(q)
                            if c == q
                                && chars.get(i + 1) == Some(&q)
                                && chars.get(i + 2) == Some(&q) =>
                        {
                            self.string = None;
                            i += 3;
                            continue;
                        }
                        OpenString::Single(q) if c == q => self.string = None,
                        _ => {}
                    }
                }
                None => match c {
                    '#' => {
                        comment = true;
                        break;
                    }
                    '\'' | '"' => {
                        if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                            self.string = Some(OpenString::Triple(c));
                            i += 3;
                            continue;
                        }
                        self.string = Some(OpenString::Single(c));
                    }
                    '(' | '[' | '{' => self.depth += 1,
                    ')' | ']' | '}' => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                },
            }
            i += 1;
        }

        self.continued = !comment && line.ends_with('\\');
        // An unterminated single-quoted string ends with its line
        if matches!(self.string, Some(OpenString::Single(_))) && !self.continued {
            self.string = None;
        }
    }
}

/// For each line of `source` (as split by `str::lines`), whether it is an IPython line
/// magic or shell escape.
///
/// Only a `%` or `!` that opens a logical line counts: continuation lines inside brackets,
/// triple-quoted strings or after a trailing backslash are Python (`% count`, `!= new`).
pub fn magic_lines(source: &str) -> Vec<bool> {
    let mut state = LineState::default();
    let mut in_magic = false;
    let mut mask = Vec::new();

    for line in source.lines() {
        if in_magic {
            mask.push(true);
            in_magic = line.ends_with('\\');
            continue;
        }

        let trimmed = line.trim_start();
        if state.at_logical_start() && (trimmed.starts_with('%') || trimmed.starts_with('!')) {
            mask.push(true);
            in_magic = line.ends_with('\\');
            continue;
        }

        mask.push(false);
        state.scan(line);
    }

    mask
}
