//! Sort clause generation
//!
//! Maps a resolved `(SortField, SortOrder)` pair to the ordered list of
//! engine sort clauses: text fields sort on their keyword sub-field,
//! multi-valued fields pick a representative value by direction, and
//! nomination counts get a tie-break on hype.

use super::params::{SortField, SortOrder};
use phf::phf_map;
use serde_json::{json, Map, Value as JsonValue};

/// Fields that need their non-analyzed sub-field for sorting.
static FIELD_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "artist" => "artist.raw",
    "creator" => "creator.raw",
    "title" => "title.raw",
};

/// How a multi-valued field is reduced to a single sort value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Min,
    Max,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

struct OrderModes {
    asc: SortMode,
    desc: SortMode,
}

/// Per-direction reduction for fields with one value per difficulty.
static ORDER_OPTIONS: phf::Map<&'static str, OrderModes> = phf_map! {
    "difficulties.difficultyrating" => OrderModes { asc: SortMode::Min, desc: SortMode::Max },
};

const TIE_BREAK_FIELD: &str = "hype";

/// Extra per-clause options; empty for most fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub mode: Option<SortMode>,
}

impl SortOptions {
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
    pub options: SortOptions,
}

impl SortClause {
    fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        body.insert("order".to_string(), json!(self.order.as_str()));
        if let Some(mode) = self.options.mode {
            body.insert("mode".to_string(), json!(mode.as_str()));
        }

        let mut clause = Map::new();
        clause.insert(self.field.clone(), JsonValue::Object(body));
        JsonValue::Object(clause)
    }
}

/// Ordered sort clauses, primary first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    clauses: Vec<SortClause>,
}

impl SortSpec {
    pub fn clauses(&self) -> &[SortClause] {
        &self.clauses
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.clauses.iter().map(SortClause::to_json).collect())
    }
}

/// Build the sort clauses for a resolved sort field and order.
pub fn normalize_sort(sort_field: SortField, order: SortOrder) -> SortSpec {
    let logical = sort_field.engine_field();
    let field = FIELD_ALIASES.get(logical).copied().unwrap_or(logical);
    let mode = ORDER_OPTIONS.get(logical).map(|modes| match order {
        SortOrder::Asc => modes.asc,
        SortOrder::Desc => modes.desc,
    });

    let mut clauses = vec![SortClause {
        field: field.to_string(),
        order,
        options: SortOptions { mode },
    }];

    if sort_field == SortField::Nominations {
        clauses.push(SortClause {
            field: TIE_BREAK_FIELD.to_string(),
            order,
            options: SortOptions::default(),
        });
    }

    SortSpec { clauses }
}
