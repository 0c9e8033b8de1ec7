use crate::entries::{ConfigEntry, ItemType, Serialized, TypedEntry};
use crate::error::{ConfigError, Result};
use std::any::Any;

/// Bare token, surrounding whitespace trimmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Str;

impl ItemType for Str {
    type Value = String;

    fn parse_item(&self, text: &str) -> Result<String> {
        Ok(text.trim().to_string())
    }

    fn serialize_item(&self, value: &String) -> String {
        value.clone()
    }

    fn name(&self) -> String {
        "Str".to_string()
    }
}

/// String written between double quotes, e.g. `witness = "initminer"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotedStr;

impl ItemType for QuotedStr {
    type Value = String;

    fn parse_item(&self, text: &str) -> Result<String> {
        let trimmed = text.trim();
        trimmed
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Format(format!("expected quoted string, got '{trimmed}'")))
    }

    fn serialize_item(&self, value: &String) -> String {
        format!("\"{value}\"")
    }

    fn name(&self) -> String {
        "QuotedStr".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integer;

impl ItemType for Integer {
    type Value = i64;

    fn parse_item(&self, text: &str) -> Result<i64> {
        let trimmed = text.trim();
        trimmed
            .parse::<i64>()
            .map_err(|e| ConfigError::Format(format!("invalid integer '{trimmed}': {e}")))
    }

    fn serialize_item(&self, value: &i64) -> String {
        value.to_string()
    }

    fn name(&self) -> String {
        "Integer".to_string()
    }
}

/// Accepts the usual spellings, always writes `1` or `0`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl ItemType for Boolean {
    type Value = bool;

    fn parse_item(&self, text: &str) -> Result<bool> {
        let trimmed = text.trim();
        match trimmed.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Format(format!(
                "invalid boolean '{trimmed}'. Valid options: 1, 0, true, false, yes, no, on, off"
            ))),
        }
    }

    fn serialize_item(&self, value: &bool) -> String {
        let text = if *value { "1" } else { "0" };
        text.to_string()
    }

    fn name(&self) -> String {
        "Boolean".to_string()
    }
}

/// Config entry holding a single value of item type `T`
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T: ItemType> {
    item: T,
    value: Option<T::Value>,
}

impl<T: ItemType + Default> Default for Entry<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: ItemType> Entry<T> {
    pub fn new(item: T) -> Self {
        Self { item, value: None }
    }

    pub fn with_value(item: T, value: T::Value) -> Self {
        Self {
            item,
            value: Some(value),
        }
    }
}

impl<T: ItemType> ConfigEntry for Entry<T> {
    fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn clear(&mut self) {
        self.value = None;
    }

    fn parse_from_text(&mut self, text: &str) -> Result<()> {
        self.value = Some(self.item.parse_item(text)?);
        Ok(())
    }

    fn serialize_to_text(&self) -> Option<Serialized> {
        self.value
            .as_ref()
            .map(|value| Serialized::Line(self.item.serialize_item(value)))
    }

    fn type_name(&self) -> String {
        format!("Entry<{}>", self.item.name())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: ItemType> TypedEntry for Entry<T> {
    type Value = T::Value;

    fn get_value(&self) -> Option<&T::Value> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: T::Value) {
        self.value = Some(value);
    }
}
