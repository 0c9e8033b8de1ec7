//! List config entry
//!
//! A list holds an ordered sequence of values of one item type. Its text
//! form is controlled by a [`ListFormat`]:
//!
//! ```text
//! single line:  <begin><item><separator><item>...<end>     e.g. [1,2,3]
//! multi line:   one unframed string per item (the caller writes the lines)
//! ```
//!
//! Callers mutate a list through [`ListViewMut`], which only knows `append`,
//! `extend` and `remove`. Compound-append (`+=`) is deliberately absent: there
//! is no matching remove operator, so the view offers none of either.

use crate::entries::{ConfigEntry, ItemType, Serialized, TypedEntry};
use crate::error::{ConfigError, Result};
use std::any::Any;
use std::ops::Deref;

/// Textual framing of a list value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFormat {
    pub separator: String,
    pub begin: String,
    pub end: String,
    pub single_line: bool,
}

impl Default for ListFormat {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            begin: String::new(),
            end: String::new(),
            single_line: true,
        }
    }
}

impl ListFormat {
    /// Unframed single-line list split on `separator`
    pub fn separated(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
            ..Self::default()
        }
    }

    /// Single-line list wrapped in `begin`/`end`, e.g. `[a,b,c]`
    pub fn bracketed(begin: &str, separator: &str, end: &str) -> Self {
        Self {
            separator: separator.to_string(),
            begin: begin.to_string(),
            end: end.to_string(),
            single_line: true,
        }
    }

    /// One item per physical line
    ///
    /// The separator is a newline, so every line handed to
    /// `parse_from_text` is exactly one item.
    pub fn multi_line() -> Self {
        Self {
            separator: "\n".to_string(),
            single_line: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List<T: ItemType> {
    item: T,
    format: ListFormat,
    items: Vec<T::Value>,
}

impl<T: ItemType> List<T> {
    pub fn new(item: T, format: ListFormat) -> Self {
        Self {
            item,
            format,
            items: Vec::new(),
        }
    }

    pub fn format(&self) -> &ListFormat {
        &self.format
    }

    pub fn items(&self) -> &[T::Value] {
        &self.items
    }

    /// Replace the value with a single item
    pub fn set_item(&mut self, value: T::Value) {
        self.items = vec![value];
    }

    /// Read-only view over the stored items
    pub fn view(&self) -> ListView<'_, T::Value> {
        ListView { items: &self.items }
    }

    /// Read-write view over the stored items
    pub fn view_mut(&mut self) -> ListViewMut<'_, T::Value> {
        ListViewMut {
            items: &mut self.items,
        }
    }

    /// Separator used when this list is an item of another list
    ///
    /// A nested value has to fit on one line, so a multi-line format falls
    /// back to a single space.
    fn nested_separator(&self) -> &str {
        if self.format.single_line {
            &self.format.separator
        } else {
            " "
        }
    }

    /// Parse framed text into items without touching the stored value
    ///
    /// Framing is checked after trimming surrounding whitespace. Empty inner
    /// text parses to no items, so `begin + end` round-trips to `[]`.
    fn parse_items(&self, text: &str, separator: &str) -> Result<Vec<T::Value>> {
        let ListFormat { begin, end, .. } = &self.format;

        if separator.is_empty() {
            return Err(ConfigError::Format(
                "list separator must not be empty".to_string(),
            ));
        }

        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix(begin.as_str())
            .and_then(|rest| rest.strip_suffix(end.as_str()))
            .ok_or_else(|| {
                ConfigError::Format(format!(
                    "expected list framed as '{begin}...{end}', got '{trimmed}'"
                ))
            })?;

        if inner.is_empty() {
            return Ok(Vec::new());
        }

        inner
            .split(separator)
            .map(|token| self.item.parse_item(token))
            .collect()
    }

    fn serialize_items(&self, items: &[T::Value]) -> Vec<String> {
        items
            .iter()
            .map(|value| self.item.serialize_item(value))
            .collect()
    }

    fn frame(&self, texts: &[String], separator: &str) -> String {
        format!(
            "{}{}{}",
            self.format.begin,
            texts.join(separator),
            self.format.end
        )
    }
}

impl<T: ItemType> ConfigEntry for List<T> {
    fn is_set(&self) -> bool {
        !self.items.is_empty()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    /// Parsed items are appended, so repeated `key = item` lines accumulate.
    /// Nothing is appended when any item fails to parse.
    fn parse_from_text(&mut self, text: &str) -> Result<()> {
        let parsed = self.parse_items(text, &self.format.separator)?;
        self.items.extend(parsed);
        Ok(())
    }

    fn serialize_to_text(&self) -> Option<Serialized> {
        let texts = self.serialize_items(&self.items);
        if self.format.single_line {
            Some(Serialized::Line(self.frame(&texts, &self.format.separator)))
        } else {
            Some(Serialized::Lines(texts))
        }
    }

    fn type_name(&self) -> String {
        format!("List<{}>", self.item.name())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: ItemType> TypedEntry for List<T> {
    type Value = Vec<T::Value>;

    fn get_value(&self) -> Option<&Vec<T::Value>> {
        if self.items.is_empty() {
            None
        } else {
            Some(&self.items)
        }
    }

    fn set_value(&mut self, value: Vec<T::Value>) {
        self.items = value;
    }
}

/// Lists nest: a list item is always written on one line, with the inner
/// list's framing. An inner multi-line format is joined with a space.
impl<T: ItemType> ItemType for List<T> {
    type Value = Vec<T::Value>;

    fn parse_item(&self, text: &str) -> Result<Vec<T::Value>> {
        self.parse_items(text, self.nested_separator())
    }

    fn serialize_item(&self, value: &Vec<T::Value>) -> String {
        self.frame(&self.serialize_items(value), self.nested_separator())
    }

    fn name(&self) -> String {
        format!("List<{}>", self.item.name())
    }
}

/// Read-only view over a list's items
#[derive(Debug)]
pub struct ListView<'a, V> {
    items: &'a Vec<V>,
}

impl<V> Deref for ListView<'_, V> {
    type Target = [V];

    fn deref(&self) -> &[V] {
        self.items
    }
}

/// Read-write view over a list's items
///
/// Indexed access is read-only; items are added with [`append`](Self::append)
/// or [`extend`](Self::extend) and dropped with [`remove`](Self::remove).
/// The view has no `+=`:
///
/// ```compile_fail
/// use node_testkit::entries::{List, ListFormat, Str};
///
/// let mut list = List::new(Str, ListFormat::default());
/// let mut view = list.view_mut();
/// view += vec!["witness".to_string()];
/// ```
#[derive(Debug)]
pub struct ListViewMut<'a, V> {
    items: &'a mut Vec<V>,
}

impl<V: PartialEq + std::fmt::Debug> ListViewMut<'_, V> {
    pub fn append(&mut self, value: V) {
        self.items.push(value);
    }

    pub fn extend<I: IntoIterator<Item = V>>(&mut self, values: I) {
        self.items.extend(values);
    }

    /// Remove the first item equal to `value`
    pub fn remove(&mut self, value: &V) -> Result<()> {
        let idx = self
            .items
            .iter()
            .position(|item| item == value)
            .ok_or_else(|| ConfigError::ItemNotFound(format!("{value:?}")))?;
        self.items.remove(idx);
        Ok(())
    }

    /// Compound-append is not available on list views; always fails and
    /// leaves the items untouched.
    pub fn try_add_assign<I: IntoIterator<Item = V>>(&mut self, _values: I) -> Result<()> {
        Err(ConfigError::NotSupported(
            "Operator += is removed. Use methods \"append\" or \"extend\" instead.".to_string(),
        ))
    }
}

impl<V> Deref for ListViewMut<'_, V> {
    type Target = [V];

    fn deref(&self) -> &[V] {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{Integer, QuotedStr, Str};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_and_serialize_integers() {
        let mut list = List::new(Integer, ListFormat::bracketed("[", ",", "]"));
        list.parse_from_text("[1,2,3]").unwrap();

        assert_eq!(list.items(), &[1, 2, 3]);
        assert_eq!(
            list.serialize_to_text(),
            Some(Serialized::Line("[1,2,3]".to_string()))
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let mut list = List::new(Str, ListFormat::separated(","));
        list.parse_from_text("c,a,b").unwrap();
        assert_eq!(list.items(), strings(&["c", "a", "b"]).as_slice());
    }

    #[test]
    fn test_round_trip_with_framing() {
        let formats = [
            ListFormat::separated(" "),
            ListFormat::bracketed("(", ";", ")"),
            ListFormat::bracketed("{{", " | ", "}}"),
        ];

        for format in formats {
            let mut original = List::new(QuotedStr, format.clone());
            original.set_value(strings(&["alice", "bob", "carol"]));
            let text = original.serialize_to_text().unwrap().to_string();

            let mut parsed = List::new(QuotedStr, format);
            parsed.parse_from_text(&text).unwrap();
            assert_eq!(parsed.items(), original.items(), "{text}");
        }
    }

    #[test]
    fn test_missing_framing_is_format_error() {
        let mut list = List::new(Str, ListFormat::bracketed("(", ",", ")"));
        let result = list.parse_from_text("a,b,c");
        assert!(matches!(result, Err(ConfigError::Format(_))));
        assert!(!list.is_set());

        assert!(list.parse_from_text("(a,b,c").is_err());
        assert!(list.parse_from_text("a,b,c)").is_err());
        assert!(list.parse_from_text("(").is_err());
    }

    #[test]
    fn test_framing_tolerates_surrounding_whitespace() {
        let mut list = List::new(Integer, ListFormat::bracketed("[", ",", "]"));
        list.parse_from_text("  [4,5]\t").unwrap();
        assert_eq!(list.items(), &[4, 5]);
    }

    #[test]
    fn test_empty_inner_text_is_empty_list() {
        let mut list = List::new(Str, ListFormat::bracketed("[", ",", "]"));
        list.parse_from_text("[]").unwrap();
        assert!(list.items().is_empty());
        assert!(!list.is_set());

        // serializing the empty list gives back text that parses to the same thing
        let text = list.serialize_to_text().unwrap().to_string();
        assert_eq!(text, "[]");
        let mut reparsed = List::new(Str, ListFormat::bracketed("[", ",", "]"));
        reparsed.parse_from_text(&text).unwrap();
        assert!(reparsed.items().is_empty());

        let mut unframed = List::new(Str, ListFormat::default());
        unframed.parse_from_text("   ").unwrap();
        assert!(unframed.items().is_empty());

        // a single empty item writes the same text, so it reads back as no items
        let mut single_empty = List::new(Str, ListFormat::bracketed("[", ",", "]"));
        single_empty.set_value(strings(&[""]));
        assert!(single_empty.is_set());
        let text = single_empty.serialize_to_text().unwrap().to_string();
        assert_eq!(text, "[]");

        let mut reparsed = List::new(Str, ListFormat::bracketed("[", ",", "]"));
        reparsed.parse_from_text(&text).unwrap();
        assert!(reparsed.items().is_empty());
        assert!(!reparsed.is_set());
    }

    #[test]
    fn test_split_is_exact() {
        let mut list = List::new(Str, ListFormat::separated(","));
        list.parse_from_text("a,,b").unwrap();
        assert_eq!(list.items(), strings(&["a", "", "b"]).as_slice());
    }

    #[test]
    fn test_failed_item_parse_appends_nothing() {
        let mut list = List::new(Integer, ListFormat::separated(","));
        list.set_value(vec![9]);
        assert!(list.parse_from_text("1,x,3").is_err());
        assert_eq!(list.items(), &[9]);
    }

    #[test]
    fn test_parse_appends_to_existing_items() {
        let mut list = List::new(QuotedStr, ListFormat::multi_line());
        list.parse_from_text("\"initminer\"").unwrap();
        list.parse_from_text("\"alice\"").unwrap();
        assert_eq!(list.items(), strings(&["initminer", "alice"]).as_slice());
    }

    #[test]
    fn test_multi_line_serialization() {
        let mut list = List::new(QuotedStr, ListFormat::multi_line());
        list.set_value(strings(&["initminer", "alice"]));
        assert_eq!(
            list.serialize_to_text(),
            Some(Serialized::Lines(strings(&["\"initminer\"", "\"alice\""])))
        );
    }

    #[test]
    fn test_set_item_normalizes_to_singleton() {
        let mut list = List::new(Str, ListFormat::default());
        list.set_value(strings(&["a", "b"]));
        list.set_item("witness".to_string());

        assert_eq!(list.get_value(), Some(&strings(&["witness"])));
    }

    #[test]
    fn test_set_value_replaces() {
        let mut list = List::new(Integer, ListFormat::default());
        list.parse_from_text("1 2").unwrap();
        list.set_value(vec![3]);
        assert_eq!(list.items(), &[3]);
    }

    #[test]
    fn test_clear() {
        let mut list = List::new(Integer, ListFormat::default());
        list.parse_from_text("1 2 3").unwrap();
        assert!(list.is_set());

        list.clear();
        assert!(!list.is_set());
        assert_eq!(list.get_value(), None);
    }

    #[test]
    fn test_view_mut_append_extend_remove() {
        let mut list = List::new(Str, ListFormat::default());
        {
            let mut view = list.view_mut();
            view.append("witness".to_string());
            view.extend(strings(&["p2p", "account_by_key"]));
            view.remove(&"p2p".to_string()).unwrap();
            assert_eq!(view.len(), 2);
            assert_eq!(view[1], "account_by_key");
        }
        assert_eq!(list.items(), strings(&["witness", "account_by_key"]).as_slice());
    }

    #[test]
    fn test_view_mut_remove_missing_item() {
        let mut list = List::new(Integer, ListFormat::default());
        list.set_value(vec![1, 2]);
        let result = list.view_mut().remove(&5);
        assert_eq!(result, Err(ConfigError::ItemNotFound("5".to_string())));
        assert_eq!(list.items(), &[1, 2]);
    }

    #[test]
    fn test_compound_append_is_rejected() {
        let mut list = List::new(Integer, ListFormat::default());
        list.set_value(vec![1]);

        let err = list.view_mut().try_add_assign(vec![2]).unwrap_err();
        match err {
            ConfigError::NotSupported(msg) => {
                assert!(msg.contains("append"));
                assert!(msg.contains("extend"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(list.items(), &[1]);
    }

    #[test]
    fn test_read_only_view_shares_storage() {
        let mut list = List::new(Integer, ListFormat::default());
        list.view_mut().extend([3, 1, 2]);

        let view = list.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    }

    #[test]
    fn test_nested_lists() {
        let inner = List::new(QuotedStr, ListFormat::bracketed("[", ",", "]"));
        let mut ranges = List::new(inner, ListFormat::multi_line());

        ranges.parse_from_text("[\"alice\",\"bob\"]").unwrap();
        ranges.parse_from_text("[\"carol\",\"dave\"]").unwrap();

        assert_eq!(
            ranges.items(),
            &[strings(&["alice", "bob"]), strings(&["carol", "dave"])]
        );
        assert_eq!(
            ranges.serialize_to_text(),
            Some(Serialized::Lines(strings(&[
                "[\"alice\",\"bob\"]",
                "[\"carol\",\"dave\"]"
            ])))
        );
        assert_eq!(ConfigEntry::type_name(&ranges), "List<List<QuotedStr>>");
    }

    #[test]
    fn test_nested_multi_line_list_stays_on_one_line() {
        let inner = List::new(Str, ListFormat::multi_line());
        let mut outer = List::new(inner, ListFormat::bracketed("(", ";", ")"));
        outer.set_value(vec![strings(&["a", "b"]), strings(&["c"])]);

        let text = outer.serialize_to_text().unwrap().to_string();
        assert_eq!(text, "(a b;c)");
        assert!(!text.contains('\n'));

        let inner = List::new(Str, ListFormat::multi_line());
        let mut parsed = List::new(inner, ListFormat::bracketed("(", ";", ")"));
        parsed.parse_from_text(&text).unwrap();
        assert_eq!(parsed.items(), outer.items());
    }

    #[test]
    fn test_empty_separator_is_rejected() {
        let mut list = List::new(Str, ListFormat::separated(""));
        assert!(matches!(
            list.parse_from_text("abc"),
            Err(ConfigError::Format(_))
        ));
    }
}
