//! Round-trip INI document.
//!
//! 3Dmigoto style `main.ini` files are large, hand-commented and full of
//! sections this package has no business touching. The document keeps every
//! line verbatim and only rewrites the `key = value` lines that [`IniDocument::set`]
//! actually changes, so an unmodified document serializes back byte for byte.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Section { raw: String, name: String },
    Entry { raw: String, key: String, value: String },
    Other(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.starts_with(';') || trimmed.starts_with('#') {
            return Line::Other(raw.to_string());
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            if let Some(end) = inner.find(']') {
                return Line::Section {
                    raw: raw.to_string(),
                    name: inner[..end].trim().to_string(),
                };
            }
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                return Line::Entry {
                    raw: raw.to_string(),
                    key: key.to_string(),
                    value: value.trim().to_string(),
                };
            }
        }

        Line::Other(raw.to_string())
    }

    fn raw(&self) -> &str {
        match self {
            Line::Section { raw, .. } | Line::Entry { raw, .. } | Line::Other(raw) => raw,
        }
    }

    fn is_blank(&self) -> bool {
        self.raw().trim().is_empty()
    }
}

/// Line-preserving INI document with case-insensitive section and key lookup.
#[derive(Debug, Clone)]
pub struct IniDocument {
    bom: bool,
    lines: Vec<Line>,
    newline: &'static str,
    trailing_newline: bool,
    modified: bool,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let (bom, text) = match text.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        Self {
            bom,
            lines: text.lines().map(Line::parse).collect(),
            newline,
            trailing_newline: text.is_empty() || text.ends_with('\n'),
            modified: false,
        }
    }

    /// True once any [`set`](Self::set) call changed a value.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Value of `key` in the first `[section]` block.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let (start, end) = self.section_range(section)?;
        self.lines[start..end].iter().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k.eq_ignore_ascii_case(key) => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    /// Set `key = value` in `[section]`.
    ///
    /// Existing keys keep their spelling and indentation. Missing keys go after
    /// the last non-blank line of the section; missing sections are appended at
    /// the end of the document. Setting a key to the value it already holds is
    /// a no-op.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let Some((start, end)) = self.section_range(section) else {
            if self.lines.last().is_some_and(|line| !line.is_blank()) {
                self.lines.push(Line::Other(String::new()));
            }
            self.lines.push(Line::Section {
                raw: format!("[{section}]"),
                name: section.to_string(),
            });
            self.lines.push(entry_line("", key, value));
            self.modified = true;
            return;
        };

        let existing = (start..end).find(|&i| {
            matches!(&self.lines[i], Line::Entry { key: k, .. } if k.eq_ignore_ascii_case(key))
        });
        if let Some(index) = existing {
            if let Line::Entry { raw, key: k, value: v } = &self.lines[index] {
                if v.as_str() != value {
                    let indent = &raw[..raw.len() - raw.trim_start().len()];
                    let replacement = entry_line(indent, k, value);
                    self.lines[index] = replacement;
                    self.modified = true;
                }
            }
            return;
        }

        let insert_at = (start..end)
            .rev()
            .find(|&i| !self.lines[i].is_blank())
            .map_or(end, |i| i + 1);
        self.lines.insert(insert_at, entry_line("", key, value));
        self.modified = true;
    }

    /// Header index and exclusive end of the first matching section body.
    fn section_range(&self, section: &str) -> Option<(usize, usize)> {
        let header = self.lines.iter().position(|line| {
            matches!(line, Line::Section { name, .. } if name.eq_ignore_ascii_case(section))
        })?;
        let end = self.lines[header + 1..]
            .iter()
            .position(|line| matches!(line, Line::Section { .. }))
            .map_or(self.lines.len(), |offset| header + 1 + offset);
        Some((header + 1, end))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bom {
            f.write_str("\u{feff}")?;
        }
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                f.write_str(self.newline)?;
            }
            f.write_str(line.raw())?;
        }
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str(self.newline)?;
        }
        Ok(())
    }
}

fn entry_line(indent: &str, key: &str, value: &str) -> Line {
    Line::Entry {
        raw: format!("{indent}{key} = {value}"),
        key: key.to_string(),
        value: value.to_string(),
    }
}
