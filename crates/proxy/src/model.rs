//! Request and response shapes for the four proxied endpoints.
//!
//! Field declaration order is the serialization order, and therefore the
//! order that ends up in the signed canonical body. Missing request fields
//! bind to their zero value rather than failing.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Number;

/// Body of `POST /v1/faas/pay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(default = "zero_amount", deserialize_with = "number_or_string")]
    pub amount: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayResponse {
    pub url: String,
}

/// Receipt filters sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl ReceiptRequest {
    /// Backend query parameters, in send order.
    ///
    /// `offset` is only sent when negative. Backend deployments depend on
    /// this exact inclusion rule, so it is kept as-is.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(order_id) = &self.order_id {
            params.push(("order_id", order_id.clone()));
        }
        if let Some(currency) = &self.currency {
            params.push(("currency", currency.clone()));
        }
        if let Some(start_date) = self.start_date {
            params.push(("start_date", start_date.to_string()));
        }
        if let Some(end_date) = self.end_date {
            params.push(("end_date", end_date.to_string()));
        }
        if self.limit > 0 {
            params.push(("limit", self.limit.to_string()));
        }
        if self.offset < 0 {
            params.push(("offset", self.offset.to_string()));
        }
        params
    }
}

/// Receipt filters as bound from one source (query string or body).
///
/// Unlike [`ReceiptRequest`] this keeps track of which fields were given,
/// so the body can override the query string field by field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReceiptFilters {
    pub order_id: Option<String>,
    pub currency: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ReceiptFilters {
    /// Fields present in `over` win.
    pub fn overlay(self, over: ReceiptFilters) -> Self {
        Self {
            order_id: over.order_id.or(self.order_id),
            currency: over.currency.or(self.currency),
            start_date: over.start_date.or(self.start_date),
            end_date: over.end_date.or(self.end_date),
            limit: over.limit.or(self.limit),
            offset: over.offset.or(self.offset),
        }
    }
}

impl From<ReceiptFilters> for ReceiptRequest {
    fn from(filters: ReceiptFilters) -> Self {
        Self {
            order_id: filters.order_id,
            currency: filters.currency,
            start_date: filters.start_date,
            end_date: filters.end_date,
            limit: filters.limit.unwrap_or_default(),
            offset: filters.offset.unwrap_or_default(),
        }
    }
}

/// Body of `POST /v1/mine/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MineQueryRequest {
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Body of `POST /v1/mine/share`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineShareRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(default = "zero_amount", deserialize_with = "number_or_string")]
    pub amount: Number,
}

fn zero_amount() -> Number {
    Number::from(0)
}

/// Accepts a JSON number or its decimal text. Form-encoded bodies only
/// carry strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(Number),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(number) => Ok(number),
        Amount::Text(text) => serde_json::from_str(text.trim())
            .map_err(|_| de::Error::custom(format!("invalid amount: {text:?}"))),
    }
}

/// Backend response envelope.
///
/// Every field is optional so error bodies (which usually omit `data`)
/// still decode and can be relayed with their original status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receipt {
    pub order_id: String,
    pub currency: String,
    pub amount: Option<Number>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineAddress {
    pub address: String,
    pub is_bitgin_address: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineShareResult {
    pub order_id: String,
    pub status: String,
}

pub type ReceiptResponse = ApiResponse<Vec<Receipt>>;
pub type MineQueryResponse = ApiResponse<Vec<MineAddress>>;
pub type MineShareResponse = ApiResponse<MineShareResult>;

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn positive_limit_and_zero_offset() {
        let request = ReceiptRequest {
            limit: 5,
            offset: 0,
            ..Default::default()
        };
        assert_eq!(request.query_params(), vec![("limit", "5".to_string())]);
    }

    #[test]
    fn offset_only_sent_when_negative() {
        let positive = ReceiptRequest {
            offset: 10,
            ..Default::default()
        };
        assert!(positive.query_params().is_empty());

        let negative = ReceiptRequest {
            offset: -3,
            ..Default::default()
        };
        assert_eq!(negative.query_params(), vec![("offset", "-3".to_string())]);
    }

    #[test]
    fn all_filters_in_order() {
        let request = ReceiptRequest {
            order_id: Some("ord-1".into()),
            currency: Some("BTC".into()),
            start_date: Some(1_700_000_000),
            end_date: Some(1_700_086_400),
            limit: 20,
            offset: -1,
        };
        let params = request.query_params();
        assert_eq!(
            keys(&params),
            ["order_id", "currency", "start_date", "end_date", "limit", "offset"]
        );
        assert_eq!(params[2].1, "1700000000");
        assert_eq!(params[3].1, "1700086400");
    }

    #[test]
    fn receipt_binds_from_query_string() {
        let request: ReceiptRequest =
            serde_urlencoded::from_str("currency=ETH&limit=5&start_date=1700000000").unwrap();
        assert_eq!(request.currency.as_deref(), Some("ETH"));
        assert_eq!(request.limit, 5);
        assert_eq!(request.start_date, Some(1_700_000_000));
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn body_filters_override_query_filters() {
        let query: ReceiptFilters =
            serde_urlencoded::from_str("currency=ETH&limit=5&offset=-1").unwrap();
        let body: ReceiptFilters = serde_json::from_str(r#"{"currency":"BTC","limit":9}"#).unwrap();
        let request = ReceiptRequest::from(query.overlay(body));
        assert_eq!(request.currency.as_deref(), Some("BTC"));
        assert_eq!(request.limit, 9);
        assert_eq!(request.offset, -1);
        assert_eq!(request.order_id, None);
    }

    #[test]
    fn missing_filters_default_to_zero() {
        let request = ReceiptRequest::from(ReceiptFilters::default());
        assert_eq!(request, ReceiptRequest::default());
    }

    #[test]
    fn pay_request_zero_fills_missing_fields() {
        let request: PayRequest = serde_json::from_str(r#"{"amount":100}"#).unwrap();
        assert_eq!(request.order_id, "");
        assert_eq!(request.currency, "");
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"amount":100}"#);

        let empty: PayRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"amount":0}"#);
    }

    #[test]
    fn form_amount_binds_as_number() {
        let request: PayRequest =
            serde_urlencoded::from_str("order_id=A1&currency=USDT&amount=100.5").unwrap();
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"order_id":"A1","currency":"USDT","amount":100.5}"#
        );
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let result: Result<MineShareRequest, _> = serde_urlencoded::from_str("amount=lots");
        assert!(result.is_err());
    }

    #[test]
    fn mine_query_without_addresses_binds_empty() {
        let request: MineQueryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.addresses.is_empty());
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> ApiResponse<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn envelope_decodes_for_any_payload_type() {
        let body: ApiResponse<MineShareResult> =
            decode(r#"{"code":0,"data":{"order_id":"s1","status":"accepted"}}"#);
        assert_eq!(body.data.unwrap().status, "accepted");
    }

    #[test]
    fn error_envelope_without_data_decodes() {
        let body: ReceiptResponse =
            serde_json::from_str(r#"{"code":503,"msg":"maintenance"}"#).unwrap();
        assert_eq!(body.code, Some(503));
        assert!(body.data.is_none());
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"code":503,"msg":"maintenance"}"#
        );
    }

    #[test]
    fn pay_request_serializes_in_declaration_order() {
        let request: PayRequest =
            serde_json::from_str(r#"{"amount":100,"currency":"USDT","order_id":"A1"}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"order_id":"A1","currency":"USDT","amount":100}"#
        );
    }
}
