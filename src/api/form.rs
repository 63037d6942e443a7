//! Urlencoded form bodies as ordered name/value pairs

use axum::extract::FromRequest;
use serde::Deserialize;

use super::error::AppError;

/// `axum::Form` whose rejections surface as [`AppError`] faults
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct FormBody<T>(pub T);

/// A submitted form
///
/// Kept as raw pairs so a field sent several times (a multi-select) keeps
/// every value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl FormData {
    /// First value submitted under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value submitted under `name`
    ///
    /// Absent yields an empty list and a single value a one-element list, so
    /// membership checks downstream never see an undefined field.
    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_multi_select_normalization() {
        let none = form(&[("title", "Dune")]);
        assert!(none.get_all("genre").is_empty());

        let one = form(&[("genre", "a")]);
        assert_eq!(one.get_all("genre"), vec!["a".to_string()]);

        let many = form(&[("genre", "a"), ("title", "Dune"), ("genre", "b")]);
        assert_eq!(many.get_all("genre"), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(many.get("genre"), Some("a"));
        assert_eq!(many.get("isbn"), None);
    }

    #[test]
    fn test_deserializes_repeated_keys() {
        let data: FormData =
            serde_json::from_str(r#"[["genre","a"],["genre","b"],["title","Dune"]]"#).unwrap();
        assert_eq!(data.get_all("genre").len(), 2);
        assert_eq!(data.get("title"), Some("Dune"));
    }
}
