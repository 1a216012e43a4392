use serde::{Deserialize, Serialize};

use super::{lenient_amount, lenient_string};

/// Tip statistics for one user as reported by the stats API.
///
/// Every field is optional. The default value is the "empty record" used when
/// the stats API can't be reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub tip_allowance: Option<f64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub remaining_allowance: Option<f64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub received: Option<f64>,
}
