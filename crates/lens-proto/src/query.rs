//! List queries and their flat key-value representation.
//!
//! A [`ListQuery`] is the search/status/sort context of one collection view.
//! It round-trips through a flat `String -> String` map (address-bar style
//! parameters) with [`encode`] and [`decode`]. Absent fields are never written,
//! so clearing a filter and sharing the link cannot bring the filter back.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::ResourceStatus;

/// Parameter key for the free-text search.
pub const SEARCH_KEY: &str = "search";
/// Parameter key for the status filter.
pub const STATUS_KEY: &str = "status";
/// Parameter key for the sort field.
pub const SORT_BY_KEY: &str = "sortBy";
/// Parameter key for the sort direction.
pub const DIRECTION_KEY: &str = "direction";

/// Every key [`encode`] may write. Other keys in a shared store belong to someone else.
pub const QUERY_KEYS: [&str; 4] = [SEARCH_KEY, STATUS_KEY, SORT_BY_KEY, DIRECTION_KEY];

/// A value that does not name any variant of a wire enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

/// Status filter applied to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Only enabled resources.
    Enabled,
    /// Only resources with warnings.
    Warning,
    /// Only disabled resources.
    Disabled,
}

impl StatusFilter {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Enabled => "enabled",
            Self::Warning => "warning",
            Self::Disabled => "disabled",
        }
    }

    /// Whether a resource with `status` passes this filter.
    #[must_use]
    pub fn matches(self, status: ResourceStatus) -> bool {
        match self {
            Self::All => true,
            Self::Enabled => status == ResourceStatus::Enabled,
            Self::Warning => status == ResourceStatus::Warning,
            Self::Disabled => status == ResourceStatus::Disabled,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "enabled" => Ok(Self::Enabled),
            "warning" => Ok(Self::Warning),
            "disabled" => Ok(Self::Disabled),
            _ => Err(UnknownVariant {
                kind: "status filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(UnknownVariant {
                kind: "sort direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Search, status and sort parameters for one collection view.
///
/// Built through the `with_*` methods, which normalise "empty" values to
/// absent: a blank search, a blank sort field and [`StatusFilter::All`] are all
/// stored as `None`. Equality is therefore structural over normalised values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ListQuery {
    search: Option<String>,
    status: Option<StatusFilter>,
    sort_by: Option<String>,
    direction: Option<SortDirection>,
}

impl ListQuery {
    /// An empty query: no search, all statuses, backend default ordering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Set the status filter.
    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = (status != StatusFilter::All).then_some(status);
        self
    }

    /// Set the sort field.
    #[must_use]
    pub fn with_sort_by(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.sort_by = (!field.is_empty()).then_some(field);
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Free-text search, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Effective status filter.
    #[must_use]
    pub fn status(&self) -> StatusFilter {
        self.status.unwrap_or_default()
    }

    /// Sort field, if any.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Sort direction, if explicitly set.
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// Form-url-encoded parameters, e.g. `search=api&status=enabled`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(encode(self))
            .finish()
    }

    /// Parse form-url-encoded parameters. Unknown keys are ignored.
    #[must_use]
    pub fn from_query_string(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let params: BTreeMap<String, String> = url::form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect();
        decode(&params)
    }
}

/// Encode a query as flat parameters. Absent fields produce no key.
#[must_use]
pub fn encode(query: &ListQuery) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    if let Some(search) = &query.search {
        params.insert(SEARCH_KEY.to_string(), search.clone());
    }
    if let Some(status) = query.status {
        params.insert(STATUS_KEY.to_string(), status.as_str().to_string());
    }
    if let Some(sort_by) = &query.sort_by {
        params.insert(SORT_BY_KEY.to_string(), sort_by.clone());
    }
    if let Some(direction) = query.direction {
        params.insert(DIRECTION_KEY.to_string(), direction.as_str().to_string());
    }
    params
}

/// Decode flat parameters into a query.
///
/// Unknown keys are ignored, and so are values that do not parse (an unknown
/// status or direction decodes as absent).
#[must_use]
pub fn decode(params: &BTreeMap<String, String>) -> ListQuery {
    let mut query = ListQuery::new();
    if let Some(search) = params.get(SEARCH_KEY) {
        query = query.with_search(search.as_str());
    }
    if let Some(status) = params.get(STATUS_KEY).and_then(|s| s.parse().ok()) {
        query = query.with_status(status);
    }
    if let Some(sort_by) = params.get(SORT_BY_KEY) {
        query = query.with_sort_by(sort_by.as_str());
    }
    if let Some(direction) = params.get(DIRECTION_KEY).and_then(|s| s.parse().ok()) {
        query = query.with_direction(direction);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query_encodes_to_nothing() {
        assert!(encode(&ListQuery::new()).is_empty());
    }

    #[test]
    fn test_cleared_fields_are_omitted() {
        let query = ListQuery::new()
            .with_search("api")
            .with_status(StatusFilter::Enabled)
            .with_search("")
            .with_status(StatusFilter::All);

        assert_eq!(query, ListQuery::new());
        assert!(encode(&query).is_empty());
    }

    #[test]
    fn test_encode_uses_wire_keys() {
        let query = ListQuery::new()
            .with_search("web")
            .with_status(StatusFilter::Warning)
            .with_sort_by("provider")
            .with_direction(SortDirection::Desc);

        let encoded = encode(&query);
        assert_eq!(
            encoded,
            params(&[
                ("search", "web"),
                ("status", "warning"),
                ("sortBy", "provider"),
                ("direction", "desc"),
            ])
        );
    }

    #[test]
    fn test_decode_ignores_unknown_keys_and_bad_values() {
        let decoded = decode(&params(&[
            ("search", "whoami"),
            ("status", "sideways"),
            ("direction", "up"),
            ("page", "4"),
        ]));

        assert_eq!(decoded, ListQuery::new().with_search("whoami"));
    }

    #[test_case("enabled", StatusFilter::Enabled)]
    #[test_case("WARNING", StatusFilter::Warning)]
    #[test_case("Disabled", StatusFilter::Disabled)]
    #[test_case("all", StatusFilter::All)]
    fn test_status_filter_parses(input: &str, expected: StatusFilter) {
        assert_eq!(input.parse::<StatusFilter>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_status_reports_value() {
        let err = "sideways".parse::<StatusFilter>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status filter: sideways");
    }

    #[test]
    fn test_query_string_round_trip_escapes_values() {
        let query = ListQuery::new()
            .with_search("Host(`a.b`) && Path")
            .with_sort_by("name");

        let encoded = query.to_query_string();
        assert!(!encoded.contains(' '));
        assert_eq!(ListQuery::from_query_string(&encoded), query);
        assert_eq!(ListQuery::from_query_string(&format!("?{encoded}")), query);
    }

    #[test]
    fn test_encode_only_writes_query_keys() {
        let query = ListQuery::new()
            .with_search("a")
            .with_status(StatusFilter::Disabled)
            .with_sort_by("b")
            .with_direction(SortDirection::Asc);

        assert!(encode(&query).keys().all(|k| QUERY_KEYS.contains(&k.as_str())));
        assert_eq!(encode(&query).len(), QUERY_KEYS.len());
    }

    #[test]
    fn test_status_filter_matching() {
        assert!(StatusFilter::All.matches(ResourceStatus::Disabled));
        assert!(StatusFilter::Enabled.matches(ResourceStatus::Enabled));
        assert!(!StatusFilter::Enabled.matches(ResourceStatus::Warning));
    }

    fn arb_query() -> impl Strategy<Value = ListQuery> {
        (
            proptest::option::of(".{0,24}"),
            proptest::option::of(prop_oneof![
                Just(StatusFilter::All),
                Just(StatusFilter::Enabled),
                Just(StatusFilter::Warning),
                Just(StatusFilter::Disabled),
            ]),
            proptest::option::of("[a-zA-Z]{0,12}"),
            proptest::option::of(prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]),
        )
            .prop_map(|(search, status, sort_by, direction)| {
                let mut query = ListQuery::new();
                if let Some(search) = search {
                    query = query.with_search(search);
                }
                if let Some(status) = status {
                    query = query.with_status(status);
                }
                if let Some(sort_by) = sort_by {
                    query = query.with_sort_by(sort_by);
                }
                if let Some(direction) = direction {
                    query = query.with_direction(direction);
                }
                query
            })
    }

    proptest! {
        #[test]
        fn test_prop_decode_inverts_encode(query in arb_query()) {
            prop_assert_eq!(decode(&encode(&query)), query);
        }

        #[test]
        fn test_prop_encoded_values_are_never_empty(query in arb_query()) {
            prop_assert!(encode(&query).values().all(|v| !v.is_empty()));
        }

        #[test]
        fn test_prop_query_string_round_trip(query in arb_query()) {
            prop_assert_eq!(ListQuery::from_query_string(&query.to_query_string()), query);
        }
    }
}
