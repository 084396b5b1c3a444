// src/bidding/unicorn.rs

use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::model::adapters::{Bidder, ExtraRequestInfo, RequestData, ResponseData};
use crate::model::bids::{BidType, BidderResponse, TypedBid};
use crate::model::ext::{UnicornAppExt, UnicornExt, UnicornSourceExt, UNICORN_BIDDER_NAME};
use crate::model::placements::UnicornImpExt;
use crate::openrtb::request::{BidRequest, Imp, Regs, Source};
use crate::openrtb::response::BidResponse;

/// UNICORN 适配器
#[derive(Debug, Clone)]
pub struct UnicornAdapter {
    endpoint: String,
    currency: String,
    auction_type: i32,
    stamp_app_ext: bool,
}

/// 宿主注册 bidder 时调用的构造入口
pub fn builder(bidder_name: &str, config: AdapterConfig) -> AdapterResult<UnicornAdapter> {
    config.validate()?;
    debug!(bidder = bidder_name, endpoint = %config.endpoint, "unicorn adapter built");
    Ok(UnicornAdapter::new(config))
}

impl UnicornAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            endpoint: config.endpoint,
            currency: config.currency,
            auction_type: config.auction_type,
            stamp_app_ext: config.stamp_app_ext,
        }
    }

    fn build_request(&self, request: &mut BidRequest) -> AdapterResult<RequestData> {
        request.at = Some(self.auction_type);

        set_imps(&mut request.imp)?;

        request.cur = Some(vec![self.currency.clone()]);

        request.source.get_or_insert_with(Source::default).ext =
            Some(serde_json::to_value(UnicornSourceExt::default())?);

        if self.stamp_app_ext {
            set_app_ext(request)?;
        }

        request.ext = Some(set_ext(request)?);

        let body = serde_json::to_vec(request)?;

        Ok(RequestData {
            method: Method::POST,
            uri: self.endpoint.clone(),
            body,
            headers: HeaderMap::new(),
        })
    }
}

impl Bidder for UnicornAdapter {
    fn make_requests(
        &self,
        request: &mut BidRequest,
        _request_info: &ExtraRequestInfo,
    ) -> (Vec<RequestData>, Vec<AdapterError>) {
        if let Some(regs) = &request.regs {
            if opted_out(regs) {
                debug!(request_id = %request.id, "privacy signals present, skipping unicorn");
                return (Vec::new(), Vec::new());
            }
        }

        match self.build_request(request) {
            Ok(request_data) => {
                debug!(
                    request_id = %request.id,
                    imps = request.imp.len(),
                    bytes = request_data.body.len(),
                    "unicorn request built"
                );
                (vec![request_data], Vec::new())
            }
            Err(err) => {
                warn!(request_id = %request.id, error = %err, "unicorn request rejected");
                (Vec::new(), vec![err])
            }
        }
    }

    fn make_bids(
        &self,
        request: &BidRequest,
        _request_data: &RequestData,
        response_data: &ResponseData,
    ) -> (Option<BidderResponse>, Vec<AdapterError>) {
        let status = response_data.status_code;

        if status == StatusCode::NO_CONTENT {
            return (None, Vec::new());
        }

        if status == StatusCode::BAD_REQUEST {
            warn!(request_id = %request.id, status = status.as_u16(), "unicorn rejected request");
            return (
                None,
                vec![AdapterError::bad_input(
                    "Unexpected status code: 400. Bad request from publisher. Run with request.debug = 1 for more info.",
                )],
            );
        }

        if status != StatusCode::OK {
            warn!(request_id = %request.id, status = status.as_u16(), "unexpected unicorn status");
            return (
                None,
                vec![AdapterError::bad_server_response(format!(
                    "Unexpected status code: {}. Run with request.debug = 1 for more info.",
                    status.as_u16()
                ))],
            );
        }

        let response: BidResponse = match serde_json::from_slice(&response_data.body) {
            Ok(response) => response,
            Err(err) => {
                warn!(request_id = %request.id, error = %err, "failed to decode unicorn response");
                return (None, vec![err.into()]);
            }
        };

        let mut bidder_response = BidderResponse::with_bids_capacity(request.imp.len());
        bidder_response.currency = response.cur.unwrap_or_default();
        for seat_bid in response.seatbid {
            for bid in seat_bid.bid {
                let bid_type = bid_type_for(&request.imp, &bid.impid);
                bidder_response.bids.push(TypedBid { bid, bid_type });
            }
        }

        debug!(
            request_id = %request.id,
            bids = bidder_response.bids.len(),
            currency = %bidder_response.currency,
            "unicorn bids decoded"
        );
        (Some(bidder_response), Vec::new())
    }
}

/// COPPA、GDPR 或 US Privacy 任一生效即不参与竞价
fn opted_out(regs: &Regs) -> bool {
    if regs.coppa == 1 {
        return true;
    }
    match regs.ext_regs() {
        Some(ext) => ext.gdpr == Some(1) || !ext.us_privacy.is_empty(),
        None => false,
    }
}

/// 逐个解析 imp.ext；任意一个失败则整个请求作废
fn set_imps(imps: &mut [Imp]) -> AdapterResult<()> {
    for (i, imp) in imps.iter_mut().enumerate() {
        let raw = imp.ext.clone().unwrap_or(Value::Null);
        let mut ext: UnicornImpExt = serde_json::from_value(raw).map_err(|err| {
            warn!(imp_index = i, imp_id = %imp.id, "invalid unicorn imp ext");
            AdapterError::bad_input(format!("Error while decoding imp[{}].ext, err: {}", i, err))
        })?;

        let placement_id = ext.resolve_placement_id(&imp.tagid).to_string();

        imp.ext = Some(serde_json::to_value(&ext).map_err(|err| {
            AdapterError::bad_input(format!("Error while encoding imp[{}].ext, err: {}", i, err))
        })?);
        imp.secure = Some(1);
        imp.tagid = placement_id;
    }
    Ok(())
}

fn set_app_ext(request: &mut BidRequest) -> AdapterResult<()> {
    if let Some(app) = request.app.as_mut() {
        let version = app.ver.clone().unwrap_or_default();
        app.ext = Some(serde_json::to_value(UnicornAppExt::new(&version)).map_err(|err| {
            AdapterError::bad_input(format!("Error while encoding app.ext, err: {}", err))
        })?);
    }
    Ok(())
}

fn set_ext(request: &BidRequest) -> AdapterResult<Value> {
    let account_id = request
        .imp
        .first()
        .and_then(account_id_of)
        .unwrap_or(0);

    let mut ext: UnicornExt = match &request.ext {
        Some(raw) => serde_json::from_value(raw.clone()).map_err(|err| {
            AdapterError::bad_input(format!("Error while decoding ext, err: {}", err))
        })?,
        None => UnicornExt::default(),
    };
    ext.stamp_bidder(UNICORN_BIDDER_NAME);
    ext.account_id = account_id;

    serde_json::to_value(&ext)
        .map_err(|err| AdapterError::bad_input(format!("Error while encoding ext, err: {}", err)))
}

/// imp.ext.bidder.accountId，取不到时返回 None
fn account_id_of(imp: &Imp) -> Option<i64> {
    imp.ext.as_ref()?.pointer("/bidder/accountId")?.as_i64()
}

/// 按 impid 在所有 imp 中查找，后匹配的覆盖先匹配的；native 优先于 banner
fn bid_type_for(imps: &[Imp], imp_id: &str) -> Option<BidType> {
    let mut bid_type = None;
    for imp in imps.iter().filter(|imp| imp.id == imp_id) {
        if imp.has_banner() {
            bid_type = Some(BidType::Banner);
        }
        if imp.has_native() {
            bid_type = Some(BidType::Native);
        }
    }
    bid_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter() -> UnicornAdapter {
        UnicornAdapter::new(AdapterConfig::new("https://ds.uncn.jp/pb/0/bid.json"))
    }

    fn request(value: Value) -> BidRequest {
        serde_json::from_value(value).unwrap()
    }

    fn imp(id: &str, tagid: &str, ext: Value) -> Value {
        json!({"id": id, "tagid": tagid, "banner": {"w": 300, "h": 250}, "ext": ext})
    }

    fn body_of(data: &RequestData) -> Value {
        serde_json::from_slice(&data.body).unwrap()
    }

    #[test]
    fn coppa_gdpr_and_us_privacy_skip_silently() {
        let cases = [
            json!({"coppa": 1}),
            json!({"ext": {"gdpr": 1}}),
            json!({"ext": {"us_privacy": "1YNN"}}),
            json!({"ext": {"gdpr": 1, "us_privacy": null}}),
        ];
        for regs in cases {
            let mut req = request(json!({
                "id": "r",
                "imp": [imp("1", "t", json!({"bidder": {}}))],
                "regs": regs
            }));
            let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
            assert!(calls.is_empty());
            assert!(errs.is_empty());
        }
    }

    #[test]
    fn gdpr_zero_and_garbled_regs_ext_still_bid() {
        for regs in [json!({"ext": {"gdpr": 0}}), json!({"ext": {"gdpr": "yes"}})] {
            let mut req = request(json!({
                "id": "r",
                "imp": [imp("1", "t", json!({"bidder": {}}))],
                "regs": regs
            }));
            let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
            assert_eq!(calls.len(), 1);
            assert!(errs.is_empty());
        }
    }

    #[test]
    fn rewrites_request_for_unicorn() {
        let mut req = request(json!({
            "id": "r",
            "at": 2,
            "cur": ["USD", "EUR"],
            "imp": [
                imp("1", "tag-a", json!({"bidder": {"placementId": "", "accountId": 199578}})),
                imp("2", "tag-b", json!({"bidder": {"placementId": "pl-b", "mediaId": "m"}}))
            ],
            "source": {"tid": "tid-1"},
            "ext": {"prebid": {"targeting": {}}}
        }));

        let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        assert!(errs.is_empty());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].uri, "https://ds.uncn.jp/pb/0/bid.json");
        assert!(calls[0].headers.is_empty());

        let body = body_of(&calls[0]);
        assert_eq!(body["at"], 1);
        assert_eq!(body["cur"], json!(["JPY"]));
        assert_eq!(body["imp"][0]["tagid"], "tag-a");
        assert_eq!(body["imp"][0]["ext"]["bidder"]["placementId"], "tag-a");
        assert_eq!(body["imp"][0]["secure"], 1);
        assert_eq!(body["imp"][1]["tagid"], "pl-b");
        assert_eq!(body["imp"][1]["ext"]["bidder"]["placementId"], "pl-b");
        assert_eq!(body["source"], json!({"tid": "tid-1", "ext": {"stype": "prebid_uncn", "bidder": "unicorn"}}));
        assert_eq!(
            body["ext"],
            json!({"prebid": {"targeting": {}, "data": {"bidder": "unicorn"}}, "accountId": 199578})
        );

        // 请求在原地被改写
        assert_eq!(req.imp[0].tagid, "tag-a");
        assert_eq!(req.at, Some(1));
    }

    #[test]
    fn bad_imp_ext_aborts_whole_request() {
        let mut req = request(json!({
            "id": "r",
            "imp": [
                imp("1", "t", json!({"bidder": {}})),
                imp("2", "t", json!({"bidder": {}})),
                imp("3", "t", json!({"bidder": {"placementId": 7}}))
            ]
        }));
        let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        assert!(calls.is_empty());
        assert_eq!(errs.len(), 1);
        assert!(errs[0].is_bad_input());
        assert!(errs[0].to_string().starts_with("Error while decoding imp[2].ext"));
    }

    #[test]
    fn null_bidder_config_falls_back_to_tag_id() {
        let mut req = request(json!({
            "id": "r",
            "imp": [imp("1", "tag-null", json!({"bidder": null}))]
        }));
        let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        assert!(errs.is_empty());
        let body = body_of(&calls[0]);
        assert_eq!(body["imp"][0]["tagid"], "tag-null");
        assert_eq!(body["imp"][0]["ext"]["bidder"]["placementId"], "tag-null");
    }

    #[test]
    fn malformed_top_level_ext_is_bad_input() {
        let mut req = request(json!({
            "id": "r",
            "imp": [imp("1", "t", json!({"bidder": {}}))],
            "ext": {"prebid": "nope"}
        }));
        let (calls, errs) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        assert!(calls.is_empty());
        assert!(errs[0].is_bad_input());
        assert!(errs[0].to_string().starts_with("Error while decoding ext"));
    }

    #[test]
    fn account_id_defaults_to_zero() {
        let mut req = request(json!({
            "id": "r",
            "imp": [imp("1", "t", json!({"bidder": {}}))]
        }));
        let (calls, _) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        let body = body_of(&calls[0]);
        assert!(body["ext"].get("accountId").is_none());
        assert_eq!(body["ext"]["prebid"]["data"]["bidder"], "unicorn");

        let mut empty = request(json!({"id": "r", "imp": []}));
        let (calls, errs) = adapter().make_requests(&mut empty, &ExtraRequestInfo::default());
        assert_eq!(calls.len(), 1);
        assert!(errs.is_empty());
    }

    #[test]
    fn app_ext_only_when_enabled() {
        let raw = json!({
            "id": "r",
            "imp": [imp("1", "t", json!({"bidder": {}}))],
            "app": {"bundle": "jp.example", "ver": "2.1.0", "ext": {"foo": 1}}
        });

        let mut req = request(raw.clone());
        let (calls, _) = adapter().make_requests(&mut req, &ExtraRequestInfo::default());
        assert_eq!(body_of(&calls[0])["app"]["ext"], json!({"foo": 1}));

        let stamping = UnicornAdapter::new(
            AdapterConfig::new("https://ds.uncn.jp/pb/0/bid.json").with_app_ext(true),
        );
        let mut req = request(raw);
        let (calls, _) = stamping.make_requests(&mut req, &ExtraRequestInfo::default());
        assert_eq!(
            body_of(&calls[0])["app"]["ext"],
            json!({"prebid": {"version": "2.1.0", "source": "prebid-mobile"}})
        );
    }

    #[test]
    fn bid_type_is_last_match_wins() {
        let imps: Vec<Imp> = serde_json::from_value(json!([
            {"id": "a", "banner": {}},
            {"id": "b", "native": {}},
            {"id": "c", "banner": {}, "native": {}},
            {"id": "d", "video": {}},
            {"id": "e", "native": {}},
            {"id": "e", "banner": {}}
        ]))
        .unwrap();
        assert_eq!(bid_type_for(&imps, "a"), Some(BidType::Banner));
        assert_eq!(bid_type_for(&imps, "b"), Some(BidType::Native));
        assert_eq!(bid_type_for(&imps, "c"), Some(BidType::Native));
        assert_eq!(bid_type_for(&imps, "d"), None);
        assert_eq!(bid_type_for(&imps, "e"), Some(BidType::Banner));
        assert_eq!(bid_type_for(&imps, "zzz"), None);
    }

    #[test]
    fn status_codes_map_to_errors() {
        let req = BidRequest::default();
        let call = RequestData {
            method: Method::POST,
            uri: String::new(),
            body: Vec::new(),
            headers: HeaderMap::new(),
        };

        let (resp, errs) = adapter().make_bids(&req, &call, &ResponseData::new(StatusCode::NO_CONTENT, ""));
        assert!(resp.is_none() && errs.is_empty());

        let (resp, errs) = adapter().make_bids(&req, &call, &ResponseData::new(StatusCode::BAD_REQUEST, ""));
        assert!(resp.is_none());
        assert!(errs[0].is_bad_input());

        let (resp, errs) =
            adapter().make_bids(&req, &call, &ResponseData::new(StatusCode::INTERNAL_SERVER_ERROR, ""));
        assert!(resp.is_none());
        assert!(errs[0].is_bad_server_response());
        assert!(errs[0].to_string().contains("500"));

        let (resp, errs) = adapter().make_bids(&req, &call, &ResponseData::new(StatusCode::OK, "{not json"));
        assert!(resp.is_none());
        assert!(matches!(errs[0], AdapterError::Serialization(_)));
    }

    #[test]
    fn builder_validates_config() {
        assert!(builder("unicorn", AdapterConfig::new("")).is_err());
        let adapter = builder("unicorn", AdapterConfig::new("https://ds.uncn.jp/pb/0/bid.json")).unwrap();
        let mut req = request(json!({"id": "r", "imp": []}));
        let (calls, _) = adapter.make_requests(&mut req, &ExtraRequestInfo::default());
        assert_eq!(calls[0].uri, "https://ds.uncn.jp/pb/0/bid.json");
    }
}
