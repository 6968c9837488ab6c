//! Witnessing pages.
//!
//! After signing, the donor enters the code sent to their certificate
//! provider, and to their independent witness if they have one. Codes can be
//! resent once a minute.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use make_lpa_core::{LpaId, Provided, WitnessingActor, check_witness_code_with};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::messages::field_error;
use crate::state::AppState;

/// Body of the witness code form.
#[derive(Debug, Default, Deserialize)]
pub struct WitnessCodeInput {
    #[serde(rename = "witness-code", default)]
    pub witness_code: String,
}

/// The witnessing page.
#[derive(Template, WebTemplate)]
#[template(path = "witnessing.html")]
pub struct WitnessingTemplate {
    pub title: String,
    pub witness_name: String,
    pub resend_path: String,
    pub error: Option<String>,
}

pub async fn certificate_provider(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
) -> Result<Response> {
    show_page(&state, LpaId::new(lpa_id), WitnessingActor::CertificateProvider).await
}

pub async fn certificate_provider_submit(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Form(input): Form<WitnessCodeInput>,
) -> Result<Response> {
    submit_page(
        &state,
        LpaId::new(lpa_id),
        WitnessingActor::CertificateProvider,
        &input,
    )
    .await
}

pub async fn independent_witness(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
) -> Result<Response> {
    show_page(&state, LpaId::new(lpa_id), WitnessingActor::IndependentWitness).await
}

pub async fn independent_witness_submit(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Form(input): Form<WitnessCodeInput>,
) -> Result<Response> {
    submit_page(
        &state,
        LpaId::new(lpa_id),
        WitnessingActor::IndependentWitness,
        &input,
    )
    .await
}

/// Send a new code to a witness.
///
/// POST /lpa/{lpa_id}/resend-witness-code/{actor}
///
/// A code is only generated if the last one is at least a minute old.
#[instrument(skip(state), fields(lpa_id = %lpa_id))]
pub async fn resend(
    State(state): State<AppState>,
    Path((lpa_id, actor)): Path<(String, String)>,
) -> Result<Response> {
    let actor: WitnessingActor = actor
        .parse()
        .map_err(|err| AppError::NotFound(format!("{err}")))?;

    let lpa_id = LpaId::new(lpa_id);
    let mut provided = state.store().get(&lpa_id).await?;
    let now = state.now();

    let codes = match actor {
        WitnessingActor::CertificateProvider => &mut provided.certificate_provider_codes,
        WitnessingActor::IndependentWitness => &mut provided.independent_witness_codes,
    };

    if codes.can_request(now) {
        codes.generate(&mut rand::rng(), now);
        state.store().put(&mut provided, now).await?;
        tracing::info!(witness = %actor, "witness code created");
    } else {
        tracing::debug!(witness = %actor, "witness code requested too soon");
    }

    Ok(Redirect::to(&page_path(&lpa_id, actor)).into_response())
}

fn page_path(lpa_id: &LpaId, actor: WitnessingActor) -> String {
    format!("/lpa/{lpa_id}/witnessing-as-{actor}")
}

/// Where to go once the code is accepted.
fn next_path(lpa_id: &LpaId, actor: WitnessingActor) -> String {
    match actor {
        WitnessingActor::CertificateProvider => {
            format!("/lpa/{lpa_id}/you-have-submitted-your-lpa")
        }
        WitnessingActor::IndependentWitness => page_path(lpa_id, WitnessingActor::CertificateProvider),
    }
}

fn render(
    provided: &Provided,
    actor: WitnessingActor,
    error: Option<String>,
) -> WitnessingTemplate {
    let (title, witness) = match actor {
        WitnessingActor::CertificateProvider => (
            "Confirm your certificate provider witnessed you signing",
            &provided.certificate_provider,
        ),
        WitnessingActor::IndependentWitness => (
            "Confirm your independent witness witnessed you signing",
            &provided.independent_witness,
        ),
    };

    WitnessingTemplate {
        title: title.to_string(),
        witness_name: witness.full_name(),
        resend_path: format!("/lpa/{}/resend-witness-code/{actor}", provided.lpa_id),
        error,
    }
}

#[instrument(skip(state), fields(lpa_id = %lpa_id))]
async fn show_page(state: &AppState, lpa_id: LpaId, actor: WitnessingActor) -> Result<Response> {
    let provided = state.store().get(&lpa_id).await?;
    Ok(render(&provided, actor, None).into_response())
}

#[instrument(skip(state, input), fields(lpa_id = %lpa_id))]
async fn submit_page(
    state: &AppState,
    lpa_id: LpaId,
    actor: WitnessingActor,
    input: &WitnessCodeInput,
) -> Result<Response> {
    let mut provided = state.store().get(&lpa_id).await?;
    let now = state.now();
    let limits = state.config().witness_code.limiter();

    let result = check_witness_code_with(&mut provided, actor, &input.witness_code, now, || limits);

    // The limiter has changed whatever the outcome.
    state.store().put(&mut provided, now).await?;

    match result {
        Ok(()) => {
            add_breadcrumb(
                "witnessing",
                "Witness code accepted",
                &[("lpa_id", lpa_id.as_str()), ("witness", actor.as_str())],
            );
            tracing::info!(witness = %actor, "witness code accepted");

            Ok(Redirect::to(&next_path(&lpa_id, actor)).into_response())
        }
        Err(error) => {
            tracing::info!(witness = %actor, reason = %error, "witness code rejected");
            Ok(render(&provided, actor, Some(field_error(&error))).into_response())
        }
    }
}
