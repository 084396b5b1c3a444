// src/model/ext.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNICORN_BIDDER_NAME: &str = "unicorn";
pub const UNICORN_SOURCE_STYPE: &str = "prebid_uncn";
pub const UNICORN_APP_SOURCE: &str = "prebid-mobile";

/// source.ext
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UnicornSourceExt {
    pub stype: String,
    pub bidder: String,
}

impl Default for UnicornSourceExt {
    fn default() -> Self {
        Self {
            stype: UNICORN_SOURCE_STYPE.to_string(),
            bidder: UNICORN_BIDDER_NAME.to_string(),
        }
    }
}

/// 顶层 ext：`{"prebid": {...}, "accountId": N}`
///
/// 只保留 prebid 与 accountId，其它顶层键不转发给 UNICORN。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UnicornExt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prebid: Option<ExtPrebid>,
    #[serde(rename = "accountId", default, skip_serializing_if = "is_zero")]
    pub account_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtPrebid {
    #[serde(default)]
    pub data: ExtPrebidData,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtPrebidData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bidder: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl UnicornExt {
    /// 标记 bidder 名称，prebid 下原有的其它字段保持不变
    pub fn stamp_bidder(&mut self, bidder: &str) {
        self.prebid
            .get_or_insert_with(ExtPrebid::default)
            .data
            .bidder = bidder.to_string();
    }
}

/// app.ext：`{"prebid": {"version": ..., "source": "prebid-mobile"}}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UnicornAppExt {
    pub prebid: AppExtPrebid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppExtPrebid {
    pub version: String,
    pub source: String,
}

impl UnicornAppExt {
    pub fn new(version: &str) -> Self {
        Self {
            prebid: AppExtPrebid {
                version: version.to_string(),
                source: UNICORN_APP_SOURCE.to_string(),
            },
        }
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
