// src/model/placements.rs

use serde::{Deserialize, Serialize};

use crate::openrtb::request::null_as_default;

/// UNICORN 广告位配置（imp.ext.bidder）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtImpUnicorn {
    #[serde(rename = "placementId", default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub placement_id: String, // 广告位 ID，为空时回退到 imp.tagid
    #[serde(rename = "publisherId", default, deserialize_with = "null_as_default", skip_serializing_if = "is_zero")]
    pub publisher_id: i64, // 媒体方 ID
    #[serde(rename = "mediaId", default, deserialize_with = "null_as_default")]
    pub media_id: String, // 媒体 ID
    #[serde(rename = "accountId", default, deserialize_with = "null_as_default")]
    pub account_id: i64, // 账户 ID
}

/// imp.ext 的整体结构：`{"bidder": {...}}`，bidder 为 null 时按空配置处理
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UnicornImpExt {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bidder: ExtImpUnicorn,
}

impl UnicornImpExt {
    /// 解析广告位 ID：配置值为空时使用 tag_id，否则保留配置值，并回写到 ext 中
    pub fn resolve_placement_id(&mut self, tag_id: &str) -> &str {
        if self.bidder.placement_id.is_empty() {
            self.bidder.placement_id = tag_id.to_string();
        }
        &self.bidder.placement_id
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
