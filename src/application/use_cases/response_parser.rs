//! Strict decoding of model replies into [`AnalysisPayload`]s.
//!
//! The model is asked for JSON but its reply is free text: it may wrap the
//! JSON in commentary or markdown fences. The parser locates the first
//! well-formed JSON value of the expected shape, then validates every field.
//! The outcome is either a fully typed payload or a [`ParseError`]; a
//! partially populated record is never produced.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{
    AnalysisPayload, CostPrediction, ResponsePrediction, TemplateRecommendation, UnknownLabel,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no JSON {0} found in model response")]
    NoJson(&'static str),

    #[error("malformed JSON in model response: {0}")]
    Malformed(String),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' has invalid value {value}")]
    InvalidValue { field: String, value: String },

    #[error("field '{field}' value {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ParseError>,
    },
}

/// What the caller expects the model to have returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// One JSON object.
    Single,
    /// A JSON array of objects.
    Bulk,
}

impl ReplyMode {
    fn open_delimiter(&self) -> char {
        match self {
            ReplyMode::Single => '{',
            ReplyMode::Bulk => '[',
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ReplyMode::Single => "object",
            ReplyMode::Bulk => "array",
        }
    }

    /// Only values that could hold analysis records qualify, so bracketed
    /// prose such as `[1, 2]` is skipped.
    fn accepts(&self, value: &Value) -> bool {
        match self {
            ReplyMode::Single => value.is_object(),
            ReplyMode::Bulk => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }
}

/// Parse a single-message reply.
pub fn parse_single(text: &str) -> Result<AnalysisPayload, ParseError> {
    first_decoded(text, ReplyMode::Single, decode_analysis)
}

/// Parse a combined-batch reply. Elements keep the order the model returned
/// them in; any invalid element fails the whole array.
pub fn parse_bulk(text: &str) -> Result<Vec<AnalysisPayload>, ParseError> {
    first_decoded(text, ReplyMode::Bulk, decode_batch)
}

fn decode_batch(value: &Value) -> Result<Vec<AnalysisPayload>, ParseError> {
    let elements = value.as_array().map(Vec::as_slice).unwrap_or_default();

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            decode_analysis(element).map_err(|e| ParseError::Element {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Well-formed JSON values starting at each opening delimiter of `mode`, in
/// text order. Syntax errors are yielded as their messages.
fn candidates(text: &str, mode: ReplyMode) -> impl Iterator<Item = Result<Value, String>> + '_ {
    text.match_indices(mode.open_delimiter())
        .filter_map(move |(start, _)| {
            serde_json::Deserializer::from_str(&text[start..])
                .into_iter::<Value>()
                .next()
        })
        .filter_map(move |next| match next {
            Ok(value) if mode.accepts(&value) => Some(Ok(value)),
            Ok(_) => None,
            Err(e) => Some(Err(e.to_string())),
        })
}

/// Decode the first candidate that passes `decode`. When none does, the first
/// schema error wins over the first syntax error.
fn first_decoded<T>(
    text: &str,
    mode: ReplyMode,
    decode: impl Fn(&Value) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let mut first_decode_error: Option<ParseError> = None;
    let mut first_syntax_error: Option<String> = None;

    for candidate in candidates(text, mode) {
        match candidate {
            Ok(value) => match decode(&value) {
                Ok(decoded) => return Ok(decoded),
                Err(e) => {
                    first_decode_error.get_or_insert(e);
                }
            },
            Err(e) => {
                first_syntax_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_decode_error {
        return Err(e);
    }
    match first_syntax_error {
        Some(e) => Err(ParseError::Malformed(e)),
        None => Err(ParseError::NoJson(mode.describe())),
    }
}

/// Return the first well-formed JSON value of the requested shape embedded in
/// `text`, ignoring any surrounding prose.
pub fn extract_json(text: &str, mode: ReplyMode) -> Result<Value, ParseError> {
    let mut first_error: Option<String> = None;

    for candidate in candidates(text, mode) {
        match candidate {
            Ok(value) => return Ok(value),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(ParseError::Malformed(e)),
        None => Err(ParseError::NoJson(mode.describe())),
    }
}

/// Validate one JSON object against the analysis schema.
pub fn decode_analysis(value: &Value) -> Result<AnalysisPayload, ParseError> {
    let root = Fields::root(value)?;

    let cost = root.object("cost_prediction")?;
    let response = root.object("response_prediction")?;
    let template = root.object("template_recommendation")?;

    Ok(AnalysisPayload {
        sentiment: root.label("sentiment")?,
        confidence_score: root.float_in_range("confidence_score", 0.0, 1.0)?,
        reasoning: root.text("reasoning")?,
        alert_level: root.label("alert_level")?,

        churn_probability: root.percent("churn_probability")?,
        revenue_risk: root.label("revenue_risk")?,
        purchase_intent: root.percent("purchase_intent")?,
        customer_value_tier: root.label("customer_value_tier")?,
        retention_action: root.label("retention_action")?,

        cost_prediction: CostPrediction {
            optimal_conversation_type: cost.label("optimal_conversation_type")?,
            predicted_cost: cost.text("predicted_cost")?,
            cost_saved: cost.text("cost_saved")?,
            reasoning: cost.text("reasoning")?,
        },
        response_prediction: ResponsePrediction {
            success_probability: response.percent("success_probability")?,
            best_response_time: response.label("best_response_time")?,
            escalation_probability: response.percent("escalation_probability")?,
            resolution_likelihood: response.label("resolution_likelihood")?,
        },
        template_recommendation: TemplateRecommendation {
            primary_category: template.label("primary_category")?,
            confidence: template.percent("confidence")?,
            cost_impact: template.text("cost_impact")?,
            avoid_categories: template.string_set("avoid_categories")?,
            reasoning: template.text("reasoning")?,
        },
    })
}

/// A JSON object plus its dotted path, used to name offending fields.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                path: String::new(),
            }),
            other => Err(ParseError::InvalidValue {
                field: "<root>".to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn field_name(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn invalid(&self, key: &str, value: &Value) -> ParseError {
        ParseError::InvalidValue {
            field: self.field_name(key),
            value: value.to_string(),
        }
    }

    fn get(&self, key: &str) -> Result<&'a Value, ParseError> {
        match self.map.get(key) {
            Some(Value::Null) | None => Err(ParseError::MissingField(self.field_name(key))),
            Some(value) => Ok(value),
        }
    }

    fn object(&self, key: &str) -> Result<Fields<'a>, ParseError> {
        match self.get(key)? {
            Value::Object(map) => Ok(Fields {
                map,
                path: self.field_name(key),
            }),
            other => Err(self.invalid(key, other)),
        }
    }

    fn text(&self, key: &str) -> Result<String, ParseError> {
        match self.get(key)? {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.invalid(key, other)),
        }
    }

    fn label<T>(&self, key: &str) -> Result<T, ParseError>
    where
        T: FromStr<Err = UnknownLabel>,
    {
        match self.get(key)? {
            Value::String(s) => s.parse::<T>().map_err(|e| ParseError::InvalidValue {
                field: self.field_name(key),
                value: e.value,
            }),
            other => Err(self.invalid(key, other)),
        }
    }

    fn number(&self, key: &str) -> Result<f64, ParseError> {
        let value = self.get(key)?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.invalid(key, value))
    }

    fn float_in_range(&self, key: &str, min: f64, max: f64) -> Result<f64, ParseError> {
        let value = self.number(key)?;
        if value < min || value > max {
            return Err(ParseError::OutOfRange {
                field: self.field_name(key),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    /// Integer percentage in 0..=100; fractional values are truncated toward zero.
    fn percent(&self, key: &str) -> Result<u8, ParseError> {
        let value = self.number(key)?.trunc();
        if !(0.0..=100.0).contains(&value) {
            return Err(ParseError::OutOfRange {
                field: self.field_name(key),
                value,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(value as u8)
    }

    fn string_set(&self, key: &str) -> Result<BTreeSet<String>, ParseError> {
        match self.get(key)? {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.trim().to_lowercase()),
                    other => Err(self.invalid(key, other)),
                })
                .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
                .collect(),
            other => Err(self.invalid(key, other)),
        }
    }
}
