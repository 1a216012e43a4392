pub mod frame;
pub mod profile;
pub mod stats;

pub use frame::{
    Button,
    ButtonAction,
    FrameActionPayload,
    FrameResponse,
    FrameState,
    ViewKind,
};
pub use profile::{FarscoreResponse, UserProfileRecord};
pub use stats::StatsRecord;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON string or number and yields it as a string.
/// Any other shape, including `null`, becomes `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a JSON number or a numeric string. Anything else becomes `None`.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Accepts an unsigned integer as a JSON number or numeric string. Values out
/// of range for `T`, and any other shape, become `None`.
pub(crate) fn lenient_uint<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(raw.and_then(|n| T::try_from(n).ok()))
}
