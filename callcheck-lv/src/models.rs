//! Wire types for the verification pipeline
//!
//! Inbound lead shape plus the request/response payloads exchanged with the
//! voice provider and the lead receiver. Outbound payloads are built by
//! explicit builder functions rather than merging loose maps, so a campaign
//! field can never silently shadow a lead field (or vice versa).

use callcheck_common::config::{CampaignProfile, VoiceTemplate};
use serde::{Deserialize, Serialize};

/// Caller-supplied lead, as posted to `/callVerification`
///
/// Only `to` is mandatory (checked by the input validator before any network
/// call); every other field defaults to the empty string.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadRequest {
    /// Destination phone number for the verification call
    #[serde(default)]
    pub to: Option<String>,
    #[serde(flatten)]
    pub fields: LeadFields,
}

/// Lead identity/contact/consent fields carried through all three stages and
/// forwarded to the lead receiver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFields {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub email: String,
    pub phone_home: String,
    pub electric_bill: String,
    #[serde(rename = "electricUtilityProviderText")]
    pub electric_utility_provider_text: String,
    pub ip_address: String,
    pub universal_leadid: String,
    #[serde(rename = "xxTrustedFormCertUrl")]
    pub trusted_form_cert_url: String,
    pub s1: String,
    pub s2: String,
    pub s3: String,
}

/// POST body for the voice provider's send endpoint
#[derive(Debug, Serialize)]
pub struct VoiceSendRequest<'a> {
    messages: Vec<VoiceMessage<'a>>,
    /// Auxiliary campaign data attached to the call, echoed back by the
    /// provider; the provider does not interpret these fields
    cee: Vec<&'a LeadFields>,
}

/// One scripted call in a voice-send request
#[derive(Debug, Serialize)]
struct VoiceMessage<'a> {
    to: &'a str,
    body: &'a str,
    lang: &'a str,
    voice: &'a str,
    machine_detection: u8,
}

impl<'a> VoiceSendRequest<'a> {
    /// Build the single-call send request from the destination number, the
    /// fixed voice template, and the lead's fields
    pub fn build(to: &'a str, template: &'a VoiceTemplate, fields: &'a LeadFields) -> Self {
        Self {
            messages: vec![VoiceMessage {
                to,
                body: &template.body,
                lang: &template.lang,
                voice: &template.voice,
                machine_detection: template.machine_detection,
            }],
            cee: vec![fields],
        }
    }
}

/// Voice provider response envelope for a send request
///
/// The provider wraps its payload in an envelope whose `http_code` can differ
/// from the transport status; both must be 200 for a placed call.
#[derive(Debug, Deserialize)]
pub struct VoiceSendResponse {
    pub http_code: Option<i64>,
    pub data: Option<VoiceSendData>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceSendData {
    #[serde(default)]
    pub messages: Vec<PlacedCall>,
}

/// Per-call record inside a send response
#[derive(Debug, Deserialize)]
pub struct PlacedCall {
    /// Provider-assigned timestamp; also the key for the history lookup
    pub date_added: Option<i64>,
}

/// Voice provider response envelope for a history query
#[derive(Debug, Deserialize)]
pub struct VoiceHistoryResponse {
    pub http_code: Option<i64>,
    pub data: Option<VoiceHistoryPage>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceHistoryPage {
    #[serde(default)]
    pub data: Vec<CallRecord>,
}

/// One entry in the provider's call history
#[derive(Debug, Deserialize)]
pub struct CallRecord {
    /// Delivery status; `"Sent"` means the call was delivered
    pub status: Option<String>,
    /// `0` = human pickup, `1` = answering machine
    pub machine_detected: Option<i64>,
}

/// Lead receiver response
#[derive(Debug, Deserialize)]
pub struct ReceiverResponse {
    /// `"POST_VALID"` marks acceptance; anything else is a rejection
    pub status: Option<String>,
}

/// Form payload posted to the lead receiver: every lead field plus the fixed
/// campaign profile
#[derive(Debug, Serialize)]
pub struct ForwardPayload<'a> {
    #[serde(flatten)]
    lead: &'a LeadFields,
    campid: &'a str,
    roof_shade: &'a str,
    solar_electric: &'a str,
    property_ownership: &'a str,
    credit_rating: &'a str,
}

impl<'a> ForwardPayload<'a> {
    pub fn build(lead: &'a LeadFields, campaign: &'a CampaignProfile) -> Self {
        Self {
            lead,
            campid: &campaign.campid,
            roof_shade: &campaign.roof_shade,
            solar_electric: &campaign.solar_electric,
            property_ownership: &campaign.property_ownership,
            credit_rating: &campaign.credit_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_request_defaults_optional_fields() {
        let lead: LeadRequest =
            serde_json::from_str(r#"{"to": "+15551234567", "first_name": "Ada"}"#).unwrap();
        assert_eq!(lead.to.as_deref(), Some("+15551234567"));
        assert_eq!(lead.fields.first_name, "Ada");
        assert_eq!(lead.fields.last_name, "");
        assert_eq!(lead.fields.s3, "");
    }

    #[test]
    fn test_lead_request_renamed_fields() {
        let lead: LeadRequest = serde_json::from_str(
            r#"{"to": "1", "electricUtilityProviderText": "Acme Power", "xxTrustedFormCertUrl": "https://cert.example/x"}"#,
        )
        .unwrap();
        assert_eq!(lead.fields.electric_utility_provider_text, "Acme Power");
        assert_eq!(lead.fields.trusted_form_cert_url, "https://cert.example/x");
    }

    #[test]
    fn test_voice_send_request_shape() {
        let template = VoiceTemplate::default();
        let fields = LeadFields {
            first_name: "Ada".to_string(),
            ..LeadFields::default()
        };
        let request = VoiceSendRequest::build("+15551234567", &template, &fields);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["to"], "+15551234567");
        assert_eq!(value["messages"][0]["lang"], "en-us");
        assert_eq!(value["messages"][0]["machine_detection"], 1);
        assert_eq!(value["cee"][0]["first_name"], "Ada");
        assert_eq!(value["cee"][0]["xxTrustedFormCertUrl"], "");
    }

    #[test]
    fn test_forward_payload_carries_lead_and_campaign() {
        let fields = LeadFields {
            email: "ada@example.com".to_string(),
            ..LeadFields::default()
        };
        let campaign = CampaignProfile::default();
        let payload = ForwardPayload::build(&fields, &campaign);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["campid"], "BAB35AD7CF58F4F0");
        assert_eq!(value["roof_shade"], "No Shade");
        assert_eq!(value["solar_electric"], "TRUE");
        assert_eq!(value["property_ownership"], "OWN");
        assert_eq!(value["credit_rating"], "Good");
    }

    #[test]
    fn test_send_response_envelope_parsing() {
        let response: VoiceSendResponse = serde_json::from_str(
            r#"{"http_code": 200, "data": {"messages": [{"date_added": 1700000000}]}}"#,
        )
        .unwrap();
        assert_eq!(response.http_code, Some(200));
        assert_eq!(response.data.unwrap().messages[0].date_added, Some(1700000000));
    }
}
