//! Verification pipeline
//!
//! One run per request, strictly linear:
//!
//! Dial → (timed gate) → Confirm → Forward
//!
//! Each stage makes exactly one gateway call and either produces the next
//! stage's input or terminates the run with a classified outcome. No stage
//! retries. Failures on the voice-provider side (dial rejected, call not
//! delivered, answering machine) classify as `LeadFailed`; failures on the
//! lead-receiver side classify as `LeadFailedClient`; transport-level
//! unavailability of the voice provider classifies as `Internal`.
//!
//! The gate between Dial and Confirm is a fixed sleep, not a poll: the
//! provider's history record is not queryable immediately after placement,
//! and if the provider takes longer than the configured delay the lead fails
//! Confirm. Known limitation, kept configurable via `confirm_delay_secs`.

use callcheck_common::{AppConfig, Error};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    ForwardPayload, LeadFields, LeadRequest, ReceiverResponse, VoiceHistoryResponse,
    VoiceSendRequest, VoiceSendResponse,
};
use crate::services::{Gateway, GatewayError, GatewayRequest};

/// Provider history status for a delivered call
const STATUS_SENT: &str = "Sent";
/// Receiver acceptance token
const STATUS_POST_VALID: &str = "POST_VALID";

/// Call placed by the Dial stage, input to Confirm
///
/// Only constructible from a dial response carrying envelope code 200 and a
/// timestamp, so Confirm can rely on `date_added` being real.
pub struct CallSession {
    token: String,
    date_added: i64,
    fields: LeadFields,
}

impl CallSession {
    fn from_dial(token: &str, response: VoiceSendResponse, fields: LeadFields) -> Option<Self> {
        if response.http_code != Some(200) {
            return None;
        }
        let date_added = response.data?.messages.into_iter().next()?.date_added?;
        Some(Self {
            token: token.to_string(),
            date_added,
            fields,
        })
    }
}

/// Human-answered call confirmed by the Confirm stage, input to Forward
///
/// Only constructible from a history record with `status == "Sent"` and
/// `machine_detected == 0`.
pub struct ForwardInput {
    token: String,
    fields: LeadFields,
}

impl ForwardInput {
    fn from_confirm(session: CallSession, response: VoiceHistoryResponse) -> Option<Self> {
        if response.http_code != Some(200) {
            return None;
        }
        let record = response.data?.data.into_iter().next()?;
        if record.status.as_deref() != Some(STATUS_SENT) || record.machine_detected != Some(0) {
            return None;
        }
        Some(Self {
            token: session.token,
            fields: session.fields,
        })
    }
}

/// Pipeline stage, carrying the prior stage's output
enum Stage {
    Dial(LeadRequest),
    Confirm(CallSession),
    Forward(ForwardInput),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Dial(_) => "dial",
            Stage::Confirm(_) => "confirm",
            Stage::Forward(_) => "forward",
        }
    }
}

/// Result of one stage attempt
enum Transition {
    Next(Stage),
    Accepted,
}

/// Verification pipeline driver
pub struct Pipeline {
    config: Arc<AppConfig>,
    gateway: Arc<dyn Gateway>,
}

impl Pipeline {
    pub fn new(config: Arc<AppConfig>, gateway: Arc<dyn Gateway>) -> Self {
        Self { config, gateway }
    }

    /// Drive one lead through Dial, Confirm, and Forward
    ///
    /// Returns `Ok(())` when the receiver accepts the lead; any stage failure
    /// terminates the run with its classified outcome.
    pub async fn run(&self, token: &str, lead: LeadRequest) -> Result<(), Error> {
        let run_id = Uuid::new_v4();
        let mut stage = Stage::Dial(lead);

        loop {
            tracing::info!(run_id = %run_id, stage = stage.name(), "Entering pipeline stage");

            let transition = match stage {
                Stage::Dial(lead) => self.dial(run_id, token, lead).await?,
                Stage::Confirm(session) => self.confirm(run_id, session).await?,
                Stage::Forward(input) => self.forward(run_id, input).await?,
            };

            match transition {
                Transition::Next(next) => stage = next,
                Transition::Accepted => {
                    tracing::info!(run_id = %run_id, "Lead accepted");
                    return Ok(());
                }
            }
        }
    }

    /// Dial: place the automated voice call
    async fn dial(&self, run_id: Uuid, token: &str, lead: LeadRequest) -> Result<Transition, Error> {
        // Validated before the pipeline starts; absence here is a server bug
        let to = lead.to.as_deref().ok_or(Error::Internal)?;

        let payload = VoiceSendRequest::build(to, &self.config.voice, &lead.fields);
        let body = serde_json::to_value(&payload).map_err(|_| Error::Internal)?;
        let url = format!("{}/voice/send", self.config.voice_base_url);

        let response = self
            .gateway
            .invoke(GatewayRequest::post_json(url, token, body))
            .await
            .map_err(|e| classify_provider_failure(run_id, "dial", e))?;

        let response: VoiceSendResponse =
            serde_json::from_value(response).map_err(|_| Error::LeadFailed)?;

        match CallSession::from_dial(token, response, lead.fields) {
            Some(session) => Ok(Transition::Next(Stage::Confirm(session))),
            None => {
                tracing::warn!(run_id = %run_id, "Dial response carried no placed call");
                Err(Error::LeadFailed)
            }
        }
    }

    /// Confirm: after the timed gate, check the call was delivered to a human
    async fn confirm(&self, run_id: Uuid, session: CallSession) -> Result<Transition, Error> {
        // Timed gate: give the provider time to record the call before the
        // history window is queried
        let delay = self.config.confirm_delay();
        if !delay.is_zero() {
            tracing::debug!(run_id = %run_id, delay_secs = delay.as_secs(), "Waiting for call history");
            tokio::time::sleep(delay).await;
        }

        let url = format!(
            "{}/voice/history?date_from={}&date_to={}",
            self.config.voice_base_url, session.date_added, session.date_added
        );

        let response = self
            .gateway
            .invoke(GatewayRequest::get(url, &session.token))
            .await
            .map_err(|e| classify_provider_failure(run_id, "confirm", e))?;

        let response: VoiceHistoryResponse =
            serde_json::from_value(response).map_err(|_| Error::LeadFailed)?;

        match ForwardInput::from_confirm(session, response) {
            Some(input) => Ok(Transition::Next(Stage::Forward(input))),
            None => {
                tracing::warn!(run_id = %run_id, "Call not delivered to a human");
                Err(Error::LeadFailed)
            }
        }
    }

    /// Forward: post the merged lead + campaign payload to the receiver
    ///
    /// Every failure in this stage, including payload construction, classifies
    /// as `LeadFailedClient`: the problem is on the receiver side, not the
    /// voice provider's.
    async fn forward(&self, run_id: Uuid, input: ForwardInput) -> Result<Transition, Error> {
        let payload = ForwardPayload::build(&input.fields, &self.config.campaign);
        let body = serde_json::to_value(&payload).map_err(|_| Error::LeadFailedClient)?;

        let response = self
            .gateway
            .invoke(GatewayRequest::post_form(
                self.config.receiver_url.clone(),
                &input.token,
                body,
            ))
            .await
            .map_err(|e| {
                tracing::warn!(run_id = %run_id, error = %e, "Lead receiver unreachable or rejecting");
                Error::LeadFailedClient
            })?;

        let response: ReceiverResponse =
            serde_json::from_value(response).map_err(|_| Error::LeadFailedClient)?;

        if response.status.as_deref() == Some(STATUS_POST_VALID) {
            Ok(Transition::Accepted)
        } else {
            tracing::warn!(run_id = %run_id, status = ?response.status, "Lead receiver declined the lead");
            Err(Error::LeadFailedClient)
        }
    }
}

/// Map a gateway failure during Dial/Confirm onto the outcome taxonomy:
/// provider rejections fail the lead, provider unavailability is a server
/// error
fn classify_provider_failure(run_id: Uuid, stage: &'static str, error: GatewayError) -> Error {
    tracing::warn!(run_id = %run_id, stage = stage, error = %error, "Voice provider call failed");
    match error {
        GatewayError::Rejected { .. } => Error::LeadFailed,
        GatewayError::Unavailable(_) => Error::Internal,
    }
}

/// Check the minimum fields required to attempt a call: a non-empty
/// authorization token and a non-empty destination number. Runs once, before
/// Dial; makes no network calls.
pub fn validate(token: &str, lead: &LeadRequest) -> Result<(), Error> {
    if token.is_empty() {
        return Err(Error::InvalidInput);
    }
    match lead.to.as_deref() {
        Some(to) if !to.is_empty() => Ok(()),
        _ => Err(Error::InvalidInput),
    }
}
