use crate::models::Entry;
use leptos::prelude::*;
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Container the list view renders into.
pub(crate) const LIST_CONTAINER_ID: &str = "entries";

/// Columns the list view can search, sort and filter on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ValueName {
    Key,
    Tag,
    Author,
    Year,
    Title,
}

impl ValueName {
    pub fn value_of(self, entry: &Entry) -> &str {
        match self {
            ValueName::Key => &entry.key,
            other => entry.field(other.as_ref()).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ListQuery {
    pub search: String,
    pub sort: Option<(ValueName, SortOrder)>,
    pub filter: Option<(ValueName, String)>,
}

impl ListQuery {
    /// Sorting the same column twice flips the order; a new column starts ascending.
    pub fn toggle_sort(&mut self, name: ValueName) {
        self.sort = match self.sort {
            Some((current, SortOrder::Asc)) if current == name => Some((name, SortOrder::Desc)),
            _ => Some((name, SortOrder::Asc)),
        };
    }

    pub fn toggle_filter(&mut self, name: ValueName, value: &str) {
        if self.filter.as_ref() == Some(&(name, value.to_string())) {
            self.filter = None;
        } else {
            self.filter = Some((name, value.to_string()));
        }
    }
}

/// Compare two strings treating digit runs as numbers and the rest case-insensitively.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let mut xs = String::new();
                while let Some(c) = ai.peek().copied().filter(char::is_ascii_digit) {
                    xs.push(c);
                    ai.next();
                }
                let mut ys = String::new();
                while let Some(c) = bi.peek().copied().filter(char::is_ascii_digit) {
                    ys.push(c);
                    bi.next();
                }
                let xt = xs.trim_start_matches('0');
                let yt = ys.trim_start_matches('0');
                let ord = xt.len().cmp(&yt.len()).then_with(|| xt.cmp(yt));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

/// Searchable, sortable, filterable view over the page's entries.
///
/// Created once by the root component and shared through context.
#[derive(Clone, Copy)]
pub(crate) struct ListController {
    pub container_id: &'static str,
    value_names: StoredValue<Vec<ValueName>>,
    pub query: RwSignal<ListQuery>,
}

impl ListController {
    pub fn new(container_id: &'static str, value_names: impl IntoIterator<Item = ValueName>) -> Self {
        Self {
            container_id,
            value_names: StoredValue::new(value_names.into_iter().collect()),
            query: RwSignal::new(ListQuery::default()),
        }
    }

    pub fn value_names(&self) -> Vec<ValueName> {
        self.value_names.get_value()
    }

    fn knows(&self, name: ValueName) -> bool {
        self.value_names.with_value(|names| names.contains(&name))
    }

    pub fn search(&self, text: String) {
        self.query.update(|q| q.search = text);
    }

    pub fn sort(&self, name: ValueName) {
        if self.knows(name) {
            self.query.update(|q| q.toggle_sort(name));
        }
    }

    pub fn filter(&self, name: ValueName, value: &str) {
        if self.knows(name) {
            self.query.update(|q| q.toggle_filter(name, value));
        }
    }

    pub fn clear_filter(&self) {
        self.query.update(|q| q.filter = None);
    }

    /// Entries that pass the current search and filter, in the current sort order.
    pub fn visible(&self, entries: &[Entry]) -> Vec<Entry> {
        self.value_names
            .with_value(|names| self.query.with(|q| apply_query(q, names, entries)))
    }
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(LIST_CONTAINER_ID, ValueName::iter())
    }
}

fn matches_search(entry: &Entry, terms: &[String], value_names: &[ValueName]) -> bool {
    terms.iter().all(|term| {
        value_names
            .iter()
            .any(|n| n.value_of(entry).to_lowercase().contains(term.as_str()))
    })
}

pub(crate) fn apply_query(q: &ListQuery, value_names: &[ValueName], entries: &[Entry]) -> Vec<Entry> {
    let search = q.search.trim().to_lowercase();
    let terms: Vec<String> = search.split_whitespace().map(str::to_string).collect();

    let mut out: Vec<Entry> = entries
        .iter()
        .filter(|e| matches_search(e, &terms, value_names))
        .filter(|e| match &q.filter {
            Some((name, value)) if value_names.contains(name) => name.value_of(e) == value,
            _ => true,
        })
        .cloned()
        .collect();

    if let Some((name, order)) = q.sort {
        if value_names.contains(&name) {
            out.sort_by(|a, b| {
                let ord = natural_cmp(name.value_of(a), name.value_of(b));
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new("doe2001", "article")
                .with_field("author", "Doe, Jane")
                .with_field("year", "2001")
                .with_field("title", "Parsing Things")
                .with_field("tag", "parsing"),
            Entry::new("smith1999", "book")
                .with_field("author", "Smith, John")
                .with_field("year", "1999")
                .with_field("title", "Systems"),
            Entry::new("roe10", "misc")
                .with_field("author", "Roe, Richard")
                .with_field("year", "2010")
                .with_field("title", "More Parsing")
                .with_field("tag", "parsing"),
        ]
    }

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    fn all_names() -> Vec<ValueName> {
        ValueName::iter().collect()
    }

    #[test]
    fn test_value_names_serialize_lowercase() {
        let names: Vec<String> = ValueName::iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["key", "tag", "author", "year", "title"]);
    }

    #[test]
    fn test_empty_search_keeps_input_order() {
        let q = ListQuery::default();
        assert_eq!(
            keys(&apply_query(&q, &all_names(), &sample())),
            ["doe2001", "smith1999", "roe10"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_and_needs_every_term() {
        let q = ListQuery {
            search: "  PARSING roe ".to_string(),
            ..Default::default()
        };
        assert_eq!(keys(&apply_query(&q, &all_names(), &sample())), ["roe10"]);
    }

    #[test]
    fn test_search_only_looks_at_configured_names() {
        let q = ListQuery {
            search: "parsing".to_string(),
            ..Default::default()
        };
        let found = apply_query(&q, &[ValueName::Key, ValueName::Author], &sample());
        assert!(found.is_empty());
    }

    #[test]
    fn test_sort_toggles_between_orders() {
        let mut q = ListQuery::default();
        q.toggle_sort(ValueName::Year);
        assert_eq!(
            keys(&apply_query(&q, &all_names(), &sample())),
            ["smith1999", "doe2001", "roe10"]
        );
        q.toggle_sort(ValueName::Year);
        assert_eq!(q.sort, Some((ValueName::Year, SortOrder::Desc)));
        assert_eq!(
            keys(&apply_query(&q, &all_names(), &sample())),
            ["roe10", "doe2001", "smith1999"]
        );
        q.toggle_sort(ValueName::Author);
        assert_eq!(q.sort, Some((ValueName::Author, SortOrder::Asc)));
    }

    #[test]
    fn test_filter_by_tag_and_clear() {
        let mut q = ListQuery::default();
        q.toggle_filter(ValueName::Tag, "parsing");
        assert_eq!(
            keys(&apply_query(&q, &all_names(), &sample())),
            ["doe2001", "roe10"]
        );
        q.toggle_filter(ValueName::Tag, "parsing");
        assert!(q.filter.is_none());
    }

    #[test]
    fn test_natural_cmp_orders_digit_runs_numerically() {
        assert_eq!(natural_cmp("entry2", "entry10"), Ordering::Less);
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("b", "A"), Ordering::Greater);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut q = ListQuery::default();
        q.toggle_sort(ValueName::Tag);
        // smith1999 has no tag and sorts first; the two tagged entries keep their order.
        assert_eq!(
            keys(&apply_query(&q, &all_names(), &sample())),
            ["smith1999", "doe2001", "roe10"]
        );
    }
}
