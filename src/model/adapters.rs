// src/model/adapters.rs

use http::{HeaderMap, Method, StatusCode};

use crate::error::AdapterError;
use crate::model::bids::BidderResponse;
use crate::openrtb::request::BidRequest;

/// 宿主与 bidder 适配器之间的接口
///
/// 两个方法都是纯函数：不做 I/O，不持有跨调用的可变状态。
pub trait Bidder: Send + Sync {
    /// 把宿主的 BidRequest 改写成上游需要的请求，返回要发出的 HTTP 调用
    fn make_requests(
        &self,
        request: &mut BidRequest,
        request_info: &ExtraRequestInfo,
    ) -> (Vec<RequestData>, Vec<AdapterError>);

    /// 把上游的 HTTP 响应转换成带类型的出价
    fn make_bids(
        &self,
        request: &BidRequest,
        request_data: &RequestData,
        response_data: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>);
}

/// 出站 HTTP 调用描述，由宿主负责真正发送
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: Method,
    pub uri: String,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

/// 宿主完成 HTTP 交换后交回的响应
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl ResponseData {
    pub fn new(status_code: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
            headers: HeaderMap::new(),
        }
    }
}

/// 宿主附带的请求信息，适配器只透传不读取
#[derive(Debug, Clone, Default)]
pub struct ExtraRequestInfo {
    pub pbs_entry_point: Option<String>,
    pub global_privacy_control: bool,
}
