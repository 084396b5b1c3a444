// src/openrtb/request.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// OpenRTB 2.x BidRequest 结构体
///
/// 只对适配器需要读写的字段做强类型建模；site / device / user 以及各类媒体描述
/// 原样保存为 JSON 值；其余未建模的字段收进 `other`，出站时原样回写。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BidRequest {
    pub id: String,

    /// 广告展示请求列表
    #[serde(default)]
    pub imp: Vec<Imp>,

    /// 网站信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Value>,

    /// 应用信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,

    /// 设备信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Value>,

    /// 用户信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    /// 请求来源信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    /// 隐私法规信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regs: Option<Regs>,

    // 其它简单字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allimps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlang: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badv: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    /// 未建模字段，原样转发
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// imp 数组中的单个广告位
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Imp {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmp: Option<Value>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tagid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<i8>,

    /// 各 bidder 的私有配置，unicorn 为 `{"bidder": {...}}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storeurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fd: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pchain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Regs {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub coppa: i8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// regs.ext 中与隐私相关的字段
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExtRegs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdpr: Option<i8>,
    /// null 与缺失等同于空串
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub us_privacy: String,
}

fn is_zero(v: &i8) -> bool {
    *v == 0
}

/// JSON null 按类型默认值处理
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Imp {
    pub fn has_banner(&self) -> bool {
        self.banner.is_some()
    }

    pub fn has_native(&self) -> bool {
        self.native.is_some()
    }
}

impl Regs {
    /// 解析 regs.ext；缺失或结构不符时返回 None
    pub fn ext_regs(&self) -> Option<ExtRegs> {
        let ext = self.ext.as_ref()?;
        serde_json::from_value(ext.clone()).ok()
    }
}
