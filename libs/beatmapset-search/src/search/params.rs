//! Search parameter parsing and normalization
//!
//! Listing parameters arrive untyped (query string or JSON). Normalization
//! never fails: every unparseable value falls back to a documented default,
//! and the sort field is always resolved, by policy when the request does
//! not name a valid one.

use crate::models::{ExtraFlag, GameMode, Rank};
use phf::phf_map;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Untyped parameter value as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    String(String),
    List(Vec<String>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        RawValue::List(values)
    }
}

/// Unordered, untrusted search parameters. Missing keys are absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: HashMap<String, RawValue>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Build from ordered query-string pairs. A repeated key keeps its last value.
    pub fn from_pairs(items: &[(String, String)]) -> Self {
        let mut params = Self::new();
        for (key, value) in items {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// Build from a JSON object. Scalars are stringified, arrays become lists,
    /// `null` and nested objects are treated as absent.
    pub fn from_json(value: &JsonValue) -> Self {
        let mut params = Self::new();
        let Some(object) = value.as_object() else {
            return params;
        };

        for (key, value) in object {
            match value {
                JsonValue::Array(items) => {
                    let list = items.iter().filter_map(json_scalar).collect::<Vec<_>>();
                    params.insert(key.clone(), list);
                }
                other => {
                    if let Some(s) = json_scalar(other) {
                        params.insert(key.clone(), s);
                    }
                }
            }
        }
        params
    }

    /// Scalar view of a parameter; lists yield their first element.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            RawValue::String(s) => Some(s.as_str()),
            RawValue::List(items) => items.first().map(String::as_str),
        }
    }

    /// Dot-delimited token view of a parameter; list elements are split too.
    fn tokens(&self, key: &str) -> Vec<&str> {
        match self.values.get(key) {
            None => Vec::new(),
            Some(RawValue::String(s)) => s.split('.').collect(),
            Some(RawValue::List(items)) => items.iter().flat_map(|s| s.split('.')).collect(),
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get_str(key).and_then(parse_int)
    }
}

fn json_scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

/// Lenient integer parsing: optional sign, decimal digits, surrounding
/// whitespace allowed. Anything else is absent.
pub(crate) fn parse_int(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Status codes whose listings default to most recently updated first.
const LAST_UPDATE_DEFAULT_STATUSES: [i64; 3] = [4, 5, 6];

/// Sortable fields, keyed by their public name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Artist,
    Creator,
    Difficulty,
    Nominations,
    Plays,
    Ranked,
    Rating,
    Relevance,
    Title,
    Updated,
}

static SORT_FIELDS: phf::Map<&'static str, SortField> = phf_map! {
    "artist" => SortField::Artist,
    "creator" => SortField::Creator,
    "difficulty" => SortField::Difficulty,
    "nominations" => SortField::Nominations,
    "plays" => SortField::Plays,
    "ranked" => SortField::Ranked,
    "rating" => SortField::Rating,
    "relevance" => SortField::Relevance,
    "title" => SortField::Title,
    "updated" => SortField::Updated,
};

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        SORT_FIELDS.get(name).copied()
    }

    /// Public name accepted in the `sort` parameter.
    pub fn name(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Creator => "creator",
            Self::Difficulty => "difficulty",
            Self::Nominations => "nominations",
            Self::Plays => "plays",
            Self::Ranked => "ranked",
            Self::Rating => "rating",
            Self::Relevance => "relevance",
            Self::Title => "title",
            Self::Updated => "updated",
        }
    }

    /// Indexed field the engine sorts on.
    pub fn engine_field(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Creator => "creator",
            Self::Difficulty => "difficulties.difficultyrating",
            Self::Nominations => "nominations",
            Self::Plays => "play_count",
            Self::Ranked => "approved_date",
            Self::Rating => "rating",
            Self::Relevance => "_score",
            Self::Title => "title",
            Self::Updated => "last_update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact lowercase spellings are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully typed search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalParams {
    /// Trimmed free text; never empty when present
    pub query_text: Option<String>,
    pub status: i64,
    pub genre: Option<i64>,
    pub language: Option<i64>,
    pub extra: BTreeSet<ExtraFlag>,
    pub mode: Option<GameMode>,
    pub ranks: BTreeSet<Rank>,
    /// Page size, within `[1, max_limit]`
    pub limit: usize,
    /// 1-based page number
    pub page: usize,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl CanonicalParams {
    /// Normalize raw parameters. `max_limit` is the configured page size cap.
    pub fn from_raw(raw: &RawParams, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);

        let query_text = raw
            .get_str("query")
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        let status = raw.get_int("status").unwrap_or(0);
        let genre = raw.get_int("genre");
        let language = raw.get_int("language");
        let mode = raw.get_int("mode").and_then(GameMode::from_id);

        let extra = raw
            .tokens("extra")
            .into_iter()
            .filter_map(ExtraFlag::parse)
            .collect();
        let ranks = raw
            .tokens("rank")
            .into_iter()
            .filter_map(Rank::parse)
            .collect();

        let limit = raw
            .get_int("limit")
            .map(|n| n.clamp(1, max_limit as i64) as usize)
            .unwrap_or(max_limit);
        let page = raw.get_int("page").unwrap_or(1).max(1) as usize;

        let (raw_field, raw_order) = match raw.get_str("sort") {
            Some(sort) => match sort.split_once('_') {
                Some((field, order)) => (Some(field), Some(order)),
                None => (Some(sort), None),
            },
            None => (None, None),
        };

        let requested_field = raw_field.and_then(SortField::parse);
        let requested_order = raw_order.and_then(SortOrder::parse).unwrap_or(SortOrder::Desc);

        let (sort_field, sort_order) = match requested_field {
            Some(field) => (field, requested_order),
            None => (default_sort_field(query_text.is_some(), status), SortOrder::Desc),
        };

        tracing::debug!(
            sort_field = sort_field.name(),
            sort_order = %sort_order,
            defaulted = requested_field.is_none(),
            limit,
            page,
            "Normalized search parameters"
        );

        Self {
            query_text,
            status,
            genre,
            language,
            extra,
            mode,
            ranks,
            limit,
            page,
            sort_field,
            sort_order,
        }
    }

    /// Raw form that normalizes back to these exact parameters.
    pub fn to_raw(&self) -> RawParams {
        let mut raw = RawParams::new()
            .with("status", self.status.to_string())
            .with("limit", self.limit.to_string())
            .with("page", self.page.to_string())
            .with(
                "sort",
                format!("{}_{}", self.sort_field.name(), self.sort_order.as_str()),
            );

        if let Some(query) = &self.query_text {
            raw.insert("query", query.clone());
        }
        if let Some(genre) = self.genre {
            raw.insert("genre", genre.to_string());
        }
        if let Some(language) = self.language {
            raw.insert("language", language.to_string());
        }
        if let Some(mode) = self.mode {
            raw.insert("mode", mode.id().to_string());
        }
        if !self.extra.is_empty() {
            let extra = self.extra.iter().map(|f| f.field()).collect::<Vec<_>>();
            raw.insert("extra", extra.join("."));
        }
        if !self.ranks.is_empty() {
            let ranks = self.ranks.iter().map(|r| r.as_str()).collect::<Vec<_>>();
            raw.insert("rank", ranks.join("."));
        }
        raw
    }
}

fn default_sort_field(has_query: bool, status: i64) -> SortField {
    if has_query {
        SortField::Relevance
    } else if LAST_UPDATE_DEFAULT_STATUSES.contains(&status) {
        SortField::Updated
    } else {
        SortField::Ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAX: usize = 50;

    fn normalize(pairs: &[(&str, &str)]) -> CanonicalParams {
        let items = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        CanonicalParams::from_raw(&RawParams::from_pairs(&items), MAX)
    }

    #[test]
    fn test_empty_params_use_defaults() {
        let params = normalize(&[]);
        assert_eq!(params.query_text, None);
        assert_eq!(params.status, 0);
        assert_eq!(params.genre, None);
        assert_eq!(params.language, None);
        assert_eq!(params.mode, None);
        assert!(params.extra.is_empty());
        assert!(params.ranks.is_empty());
        assert_eq!(params.limit, MAX);
        assert_eq!(params.page, 1);
        assert_eq!(params.sort_field, SortField::Ranked);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_query_is_trimmed_and_blank_is_absent() {
        assert_eq!(
            normalize(&[("query", "  night  ")]).query_text.as_deref(),
            Some("night")
        );
        assert_eq!(normalize(&[("query", " \t ")]).query_text, None);
    }

    #[test]
    fn test_unparseable_integers_fall_back() {
        let params = normalize(&[
            ("status", "ranked"),
            ("genre", "1.5"),
            ("language", ""),
            ("mode", "x"),
        ]);
        assert_eq!(params.status, 0);
        assert_eq!(params.genre, None);
        assert_eq!(params.language, None);
        assert_eq!(params.mode, None);

        let params = normalize(&[("genre", " 4 "), ("language", "-2")]);
        assert_eq!(params.genre, Some(4));
        assert_eq!(params.language, Some(-2));
    }

    #[test]
    fn test_mode_outside_enum_is_discarded() {
        assert_eq!(normalize(&[("mode", "3")]).mode, Some(GameMode::Mania));
        assert_eq!(normalize(&[("mode", "4")]).mode, None);
        assert_eq!(normalize(&[("mode", "-1")]).mode, None);
    }

    #[test]
    fn test_extra_flags_ignore_unknown_tokens() {
        let params = normalize(&[("extra", "video.bogus.storyboard.video")]);
        assert_eq!(
            params.extra.into_iter().collect::<Vec<_>>(),
            vec![ExtraFlag::Video, ExtraFlag::Storyboard]
        );
    }

    #[test]
    fn test_ranks_intersect_with_enum() {
        let params = normalize(&[("rank", "X.s.SH.X.F.XH")]);
        assert_eq!(
            params.ranks.into_iter().collect::<Vec<_>>(),
            vec![Rank::SH, Rank::X, Rank::XH]
        );
    }

    #[test]
    fn test_limit_and_page_bounds() {
        assert_eq!(normalize(&[("limit", "0")]).limit, 1);
        assert_eq!(normalize(&[("limit", "-10")]).limit, 1);
        assert_eq!(normalize(&[("limit", "1000")]).limit, MAX);
        assert_eq!(normalize(&[("limit", "20")]).limit, 20);
        assert_eq!(normalize(&[("limit", "lots")]).limit, MAX);

        assert_eq!(normalize(&[("page", "0")]).page, 1);
        assert_eq!(normalize(&[("page", "-3")]).page, 1);
        assert_eq!(normalize(&[("page", "7")]).page, 7);
    }

    #[test]
    fn test_zero_max_limit_still_yields_positive_limit() {
        let params = CanonicalParams::from_raw(&RawParams::new(), 0);
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn test_sort_split_on_first_separator() {
        let params = normalize(&[("sort", "artist_asc")]);
        assert_eq!(params.sort_field, SortField::Artist);
        assert_eq!(params.sort_order, SortOrder::Asc);

        let params = normalize(&[("sort", "plays_asc_extra")]);
        assert_eq!(params.sort_field, SortField::Plays);
        assert_eq!(params.sort_order, SortOrder::Desc);

        let params = normalize(&[("sort", "title")]);
        assert_eq!(params.sort_field, SortField::Title);
        assert_eq!(params.sort_order, SortOrder::Desc);

        let params = normalize(&[("sort", "rating_ASC")]);
        assert_eq!(params.sort_field, SortField::Rating);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_default_sort_prefers_relevance_with_query() {
        let params = normalize(&[("query", "night"), ("sort", "bogus_asc"), ("status", "5")]);
        assert_eq!(params.sort_field, SortField::Relevance);
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_default_sort_by_status() {
        for status in ["4", "5", "6"] {
            let params = normalize(&[("status", status)]);
            assert_eq!(params.sort_field, SortField::Updated, "status {status}");
            assert_eq!(params.sort_order, SortOrder::Desc);
        }
        for status in ["0", "1", "2", "3", "7", "8"] {
            let params = normalize(&[("status", status), ("sort", "_asc")]);
            assert_eq!(params.sort_field, SortField::Ranked, "status {status}");
            assert_eq!(params.sort_order, SortOrder::Desc);
        }
    }

    #[test]
    fn test_engine_field_mapping() {
        assert_eq!(SortField::Difficulty.engine_field(), "difficulties.difficultyrating");
        assert_eq!(SortField::Relevance.engine_field(), "_score");
        assert_eq!(SortField::Plays.engine_field(), "play_count");
        assert_eq!(SortField::Ranked.engine_field(), "approved_date");
        assert_eq!(SortField::Updated.engine_field(), "last_update");
        for (name, field) in SORT_FIELDS.entries() {
            assert_eq!(field.name(), *name);
        }
    }

    #[test]
    fn test_normalization_is_a_fixed_point() {
        let inputs = [
            normalize(&[]),
            normalize(&[("query", " night "), ("status", "1"), ("mode", "0"), ("sort", "artist_asc")]),
            normalize(&[
                ("status", "5"),
                ("genre", "3"),
                ("language", "2"),
                ("extra", "storyboard.video"),
                ("rank", "S.X"),
                ("limit", "12"),
                ("page", "4"),
            ]),
            normalize(&[("sort", "nominations_asc"), ("status", "9")]),
        ];

        for params in inputs {
            let again = CanonicalParams::from_raw(&params.to_raw(), MAX);
            assert_eq!(again, params);
        }
    }

    #[test]
    fn test_from_json_handles_scalars_and_lists() {
        let raw = RawParams::from_json(&json!({
            "query": "night",
            "status": 1,
            "mode": null,
            "rank": ["S", "X.XH"],
            "extra": {"nested": true},
        }));
        let params = CanonicalParams::from_raw(&raw, MAX);
        assert_eq!(params.query_text.as_deref(), Some("night"));
        assert_eq!(params.status, 1);
        assert_eq!(params.mode, None);
        assert_eq!(
            params.ranks.into_iter().collect::<Vec<_>>(),
            vec![Rank::S, Rank::X, Rank::XH]
        );
        assert!(params.extra.is_empty());
    }

    #[test]
    fn test_repeated_pair_keeps_last_value() {
        let params = normalize(&[("status", "1"), ("status", "5")]);
        assert_eq!(params.status, 5);
    }
}
