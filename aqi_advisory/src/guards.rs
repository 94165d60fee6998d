//! Request boundary: the only layer that turns bad input into errors.
//!
//! Payloads are plain JSON objects. An advisory request carries `aqi` and an
//! optional `group`; an estimate request carries `pollutants` (positional
//! array or object keyed by pollutant name) and an optional `group`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use thiserror::Error;

use crate::config::Advisor;
use crate::estimator::{AqiEstimator, PollutantVector};
use crate::types::AdvisoryResult;

/// Client errors at the request boundary. All map to HTTP 400.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("missing '{0}' in request data")]
    MissingField(&'static str),
    #[error("invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RequestError {
    pub fn status_code(&self) -> u16 {
        400
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            status: self.status_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

/// Validated advisory payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryRequest {
    pub aqi: f64,
    pub group: Option<String>,
}

/// Validated estimate payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    pub pollutants: PollutantVector,
    pub group: Option<String>,
}

/// Estimate plus the advisory composed for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResponse {
    pub predicted_aqi: f64,
    #[serde(flatten)]
    pub advisory: AdvisoryResult,
}

impl EstimateResponse {
    /// Predicted AQI line followed by [`AdvisoryResult::status_text`].
    pub fn status_text(&self) -> String {
        format!(
            "Predicted AQI: {:.1}\n{}",
            self.predicted_aqi,
            self.advisory.status_text()
        )
    }
}

/// Top-level fields of a request object, each kept as unparsed JSON text.
#[derive(Debug)]
pub struct Payload {
    fields: BTreeMap<String, Box<RawValue>>,
}

impl Payload {
    /// True when `key` is present, even as `null`.
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// True when `key` is present with a non-null value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Raw JSON text of `key`; explicit `null` counts as absent.
    fn raw(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|raw| raw.get().trim())
            .filter(|raw| *raw != "null")
    }

    fn value(&self, key: &str) -> Result<Option<Value>, RequestError> {
        match self.raw(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }
}

/// InputGuard: structural checks on raw payloads. Numeric range is not
/// checked here; out-of-range AQI is a valid request with an `Unknown` answer.
pub struct InputGuard;

impl InputGuard {
    pub fn parse_object(body: &str) -> Result<Payload, RequestError> {
        let raw: &RawValue = serde_json::from_str(body)?;
        if !raw.get().trim_start().starts_with('{') {
            return Err(RequestError::NotAnObject);
        }
        Ok(Payload {
            fields: serde_json::from_str(raw.get())?,
        })
    }

    pub fn advisory_request(payload: &Payload) -> Result<AdvisoryRequest, RequestError> {
        if payload.contains_key("pollutants") {
            return Err(RequestError::InvalidField {
                field: "pollutants",
                reason: "send either 'aqi' or 'pollutants', not both".into(),
            });
        }
        Ok(AdvisoryRequest {
            aqi: Self::aqi(payload)?,
            group: Self::group(payload)?,
        })
    }

    pub fn estimate_request(payload: &Payload) -> Result<EstimateRequest, RequestError> {
        if payload.contains_key("aqi") {
            return Err(RequestError::InvalidField {
                field: "aqi",
                reason: "send either 'aqi' or 'pollutants', not both".into(),
            });
        }
        let pollutants = match payload.value("pollutants")? {
            None => return Err(RequestError::MissingField("pollutants")),
            Some(Value::Array(values)) => PollutantVector::from_json_values(&values),
            Some(Value::Object(named)) => PollutantVector::from_json_object(&named),
            Some(other) => {
                return Err(RequestError::InvalidField {
                    field: "pollutants",
                    reason: format!("expected an array or object, got {other}"),
                })
            }
        };
        Ok(EstimateRequest {
            pollutants,
            group: Self::group(payload)?,
        })
    }

    /// Reads the JSON number text directly so literals beyond f64 range
    /// become infinite instead of failing to parse.
    fn aqi(payload: &Payload) -> Result<f64, RequestError> {
        let raw = payload.raw("aqi").ok_or(RequestError::MissingField("aqi"))?;
        if !raw.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            return Err(RequestError::InvalidField {
                field: "aqi",
                reason: format!("AQI must be a number, got {raw}"),
            });
        }
        raw.parse::<f64>().map_err(|err| RequestError::InvalidField {
            field: "aqi",
            reason: err.to_string(),
        })
    }

    fn group(payload: &Payload) -> Result<Option<String>, RequestError> {
        match payload.value("group")? {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(RequestError::InvalidField {
                field: "group",
                reason: format!("group must be a string, got {other}"),
            }),
        }
    }
}

/// Maps validated requests onto one advisor.
#[derive(Debug, Clone, Copy)]
pub struct RequestHandler<'a> {
    advisor: &'a Advisor,
}

impl RequestHandler<'static> {
    pub fn canonical() -> Self {
        Self::new(Advisor::canonical())
    }
}

impl<'a> RequestHandler<'a> {
    pub fn new(advisor: &'a Advisor) -> Self {
        Self { advisor }
    }

    pub fn advisory(&self, req: &AdvisoryRequest) -> AdvisoryResult {
        self.advisor.composer.compose(req.aqi, req.group.as_deref())
    }

    pub fn estimate(&self, req: &EstimateRequest) -> EstimateResponse {
        let predicted_aqi = self.advisor.estimator.estimate(&req.pollutants);
        EstimateResponse {
            predicted_aqi,
            advisory: self.advisor.composer.compose(predicted_aqi, req.group.as_deref()),
        }
    }

    /// Dispatch on payload shape: `pollutants` means estimate, otherwise
    /// advisory. A null field counts as absent; non-null `aqi` together with
    /// non-null `pollutants` is rejected.
    pub fn handle_json(&self, body: &str) -> Result<Value, RequestError> {
        let payload = InputGuard::parse_object(body)?;
        let estimate = payload.contains_key("pollutants")
            || (payload.has_field("pollutants") && !payload.contains_key("aqi"));
        let response = if estimate {
            let req = InputGuard::estimate_request(&payload)?;
            serde_json::to_value(self.estimate(&req))?
        } else {
            let req = InputGuard::advisory_request(&payload)?;
            serde_json::to_value(self.advisory(&req))?
        };
        Ok(response)
    }
}

/// `RequestHandler::canonical().handle_json(body)`.
pub fn handle_json(body: &str) -> Result<Value, RequestError> {
    RequestHandler::canonical().handle_json(body)
}
