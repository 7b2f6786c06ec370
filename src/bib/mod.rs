use crate::models::{Entry, EntryField};

/// One top-level item of a `.bib` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BibItem {
    Entry(Entry),
    StringDef { key: String, value: String },
    Comment(String),
    Preamble(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BibError {
    /// Block does not start with `@`.
    MissingAt,
    /// No `{` after the item type, or no closing `}`.
    Unbalanced(String),
    /// Entry has no `,` after its key.
    MissingKey(String),
    /// A field line without `=`.
    BadField(String),
}

impl std::fmt::Display for BibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BibError::MissingAt => write!(f, "item does not start with '@'"),
            BibError::Unbalanced(s) => write!(f, "unbalanced braces in: {s}"),
            BibError::MissingKey(s) => write!(f, "entry without key: {s}"),
            BibError::BadField(s) => write!(f, "field line without '=': {s}"),
        }
    }
}

pub(crate) type BibResult<T> = Result<T, BibError>;

/// Slice `text` into its top-level `@...{...}` blocks.
///
/// Depth is counted on raw braces; anything between blocks is skipped.
pub(crate) fn split_entries(text: &str) -> Vec<&str> {
    let mut out = vec![];
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        if depth == 0 && ch == '@' {
            start = i;
        }
        if ch == '{' {
            depth += 1;
        }
        if ch == '}' {
            depth -= 1;
            if depth == 0 {
                out.push(&text[start..=i]);
            }
        }
    }

    out
}

/// Trim a raw value, drop one trailing comma and one pair of delimiters.
pub(crate) fn parse_value(raw: &str) -> String {
    let mut v = raw.trim();
    if let Some(stripped) = v.strip_suffix(',') {
        v = stripped;
    }

    for (open, close) in [('{', '}'), ('"', '"')] {
        if v.len() >= 2 && v.starts_with(open) && v.ends_with(close) {
            return v[1..v.len() - 1].to_string();
        }
    }

    v.to_string()
}

pub(crate) fn parse_key_values(body: &str) -> BibResult<Vec<EntryField>> {
    let mut out = vec![];
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            return Err(BibError::BadField(line.to_string()));
        };
        out.push(EntryField {
            name: name.trim().to_lowercase(),
            value: parse_value(value),
        });
    }
    Ok(out)
}

pub(crate) fn read_entry(block: &str) -> BibResult<BibItem> {
    let block = block.trim();
    let rest = block.strip_prefix('@').ok_or(BibError::MissingAt)?;

    let (item_type, rest) = rest
        .split_once('{')
        .ok_or_else(|| BibError::Unbalanced(block.to_string()))?;
    let body = rest
        .strip_suffix('}')
        .ok_or_else(|| BibError::Unbalanced(block.to_string()))?;
    let item_type = item_type.trim();

    match item_type.to_lowercase().as_str() {
        "string" => {
            let first = parse_key_values(body)?
                .into_iter()
                .next()
                .ok_or_else(|| BibError::BadField(body.to_string()))?;
            Ok(BibItem::StringDef {
                key: first.name,
                value: first.value,
            })
        }
        "comment" => Ok(BibItem::Comment(body.to_string())),
        "preamble" => Ok(BibItem::Preamble(body.to_string())),
        _ => {
            let (key, inner) = body
                .split_once(',')
                .ok_or_else(|| BibError::MissingKey(block.to_string()))?;
            let mut entry = Entry::new(key.trim(), item_type);
            entry.fields = parse_key_values(inner)?;
            Ok(BibItem::Entry(entry))
        }
    }
}

pub(crate) fn read_str(text: &str) -> BibResult<Vec<BibItem>> {
    split_entries(text).into_iter().map(read_entry).collect()
}

/// Entries only; strings, comments and preambles are dropped.
pub(crate) fn read_entries(text: &str) -> BibResult<Vec<Entry>> {
    Ok(read_str(text)?
        .into_iter()
        .filter_map(|item| match item {
            BibItem::Entry(e) => Some(e),
            _ => None,
        })
        .collect())
}

pub(crate) fn write_entry(entry: &Entry) -> String {
    let mut s = format!("@{}{{{}", entry.entry_type, entry.key);
    for f in &entry.fields {
        s.push_str(&format!(",\n  {} = {{{}}}", f.name, f.value));
    }
    s.push_str("\n}");
    s
}

fn write_item(item: &BibItem) -> String {
    match item {
        BibItem::Entry(e) => write_entry(e),
        BibItem::StringDef { key, value } => format!("@string{{{key} = {{{value}}}}}"),
        BibItem::Comment(body) => format!("@comment{{{body}}}"),
        BibItem::Preamble(body) => format!("@preamble{{{body}}}"),
    }
}

pub(crate) fn write_str(items: &[BibItem]) -> String {
    items.iter().map(write_item).collect::<Vec<_>>().join("\n\n")
}
