// src/common/patch.rs

use serde::{Deserialize, Deserializer};

/// Distingue campo ausente (`None`) de `null` explícito (`Some(None)`) em updates parciais.
///
/// Usar junto com `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Texto aparado; vazio vira `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Aplica um campo anulável de um update parcial sobre o valor atual.
pub fn merge_nullable<T>(current: Option<T>, patch: Option<Option<T>>) -> Option<T> {
    match patch {
        Some(value) => value,
        None => current,
    }
}

/// Mesmo que `merge_nullable`, mas normalizando textos vazios para `None`.
pub fn merge_text(current: Option<String>, patch: Option<Option<String>>) -> Option<String> {
    match patch {
        Some(value) => blank_to_none(value),
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        address: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"address": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"address": " Rua A "}"#).unwrap();

        let current = Some("old".to_string());
        assert_eq!(merge_text(current.clone(), absent.address), Some("old".to_string()));
        assert_eq!(merge_text(current.clone(), null.address), None);
        assert_eq!(merge_text(current, value.address), Some("Rua A".to_string()));
    }

    #[test]
    fn blank_text_becomes_none() {
        assert_eq!(blank_to_none(Some("   ".into())), None);
        assert_eq!(blank_to_none(None), None);
    }
}
