//! Listing criteria and their URL query-parameter convention.

use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer};

use super::entity::EntityStatus;

/// Optional filter predicates for a listing query. Every present field must
/// match; absent, empty-string and empty-list fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
pub struct Criteria<S> {
    #[serde(rename = "codeLike", default)]
    pub code_like: Option<String>,
    #[serde(rename = "like_message_text", alias = "messageLike", default)]
    pub message_like: Option<String>,
    #[serde(
        rename = "in_statuses",
        alias = "statusIn",
        default,
        deserialize_with = "comma_separated"
    )]
    pub status_in: Option<Vec<S>>,
    #[serde(rename = "idNotIn", default, deserialize_with = "comma_separated")]
    pub id_not_in: Option<Vec<String>>,
}

impl<S> Default for Criteria<S> {
    fn default() -> Self {
        Self {
            code_like: None,
            message_like: None,
            status_in: None,
            id_not_in: None,
        }
    }
}

impl<S: EntityStatus> Criteria<S> {
    pub fn code_like(mut self, code: impl Into<String>) -> Self {
        self.code_like = Some(code.into());
        self
    }

    pub fn message_like(mut self, text: impl Into<String>) -> Self {
        self.message_like = Some(text.into());
        self
    }

    pub fn status_in(mut self, statuses: Vec<S>) -> Self {
        self.status_in = Some(statuses);
        self
    }

    pub fn id_not_in(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.id_not_in = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Copy of these criteria with the status condition replaced.
    pub fn with_statuses(&self, statuses: &[S]) -> Self {
        Self {
            status_in: Some(statuses.to_vec()),
            ..self.clone()
        }
    }

    /// Collapse empty values to `None` so equivalent criteria compare equal.
    pub fn normalized(&self) -> Self {
        Self {
            code_like: self.code_like.clone().filter(|s| !s.is_empty()),
            message_like: self.message_like.clone().filter(|s| !s.is_empty()),
            status_in: self.status_in.clone().filter(|s| !s.is_empty()),
            id_not_in: self.id_not_in.clone().filter(|s| !s.is_empty()),
        }
    }

    /// Query parameters understood by the remote listing endpoints.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let criteria = self.normalized();
        let mut pairs = Vec::new();

        if let Some(code) = criteria.code_like {
            pairs.push(("codeLike", code));
        }
        if let Some(text) = criteria.message_like {
            pairs.push(("like_message_text", text));
        }
        if let Some(statuses) = criteria.status_in {
            let joined = statuses
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("in_statuses", joined));
        }
        if let Some(ids) = criteria.id_not_in {
            pairs.push(("idNotIn", ids.join(",")));
        }

        pairs
    }
}

/// Parse `a,b,c` into a list, skipping blank entries.
pub fn comma_separated<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let item: StrDeserializer<'_, D::Error> = item.into_deserializer();
            T::deserialize(item)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
