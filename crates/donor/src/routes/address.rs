//! Address page handlers.
//!
//! The donor, certificate provider, independent witness and each attorney
//! get the same address page. Each handler works out whose address is being
//! edited and hands over to [`show_page`] or [`submit_page`], which run the
//! address workflow and either save the address or render the page again.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use make_lpa_core::{
    AddressAction, AddressActor, AddressForm, AddressFormInput, AddressPage, AddressWorkflow,
    ActorUid, LpaId, Provided, Resolution,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::messages::{ErrorView, error_views};
use crate::services::PlaceClient;
use crate::state::AppState;

/// Query string accepted when the page is first shown.
#[derive(Debug, Default, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub action: String,
}

/// One editable address field.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
    pub autocomplete: &'static str,
}

/// An address offered in a list.
#[derive(Debug, Clone)]
pub struct AddressOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// The address page.
#[derive(Template, WebTemplate)]
#[template(path = "choose_address.html")]
pub struct ChooseAddressTemplate {
    pub title: String,
    pub action: &'static str,
    pub lookup_postcode: String,
    pub can_reuse: bool,
    pub fields: Vec<FieldView>,
    pub addresses: Vec<AddressOption>,
    pub errors: Vec<ErrorView>,
}

impl ChooseAddressTemplate {
    /// The message for `field`, or an empty string.
    pub fn error_for(&self, field: &str) -> &str {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map_or("", |error| error.message.as_str())
    }
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

pub async fn donor(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Query(query): Query<AddressQuery>,
) -> Result<Response> {
    show_page(&state, LpaId::new(lpa_id), AddressActor::Donor, &query).await
}

pub async fn donor_submit(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Form(input): Form<AddressFormInput>,
) -> Result<Response> {
    submit_page(&state, LpaId::new(lpa_id), AddressActor::Donor, &input).await
}

pub async fn certificate_provider(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Query(query): Query<AddressQuery>,
) -> Result<Response> {
    show_page(
        &state,
        LpaId::new(lpa_id),
        AddressActor::CertificateProvider,
        &query,
    )
    .await
}

pub async fn certificate_provider_submit(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Form(input): Form<AddressFormInput>,
) -> Result<Response> {
    submit_page(
        &state,
        LpaId::new(lpa_id),
        AddressActor::CertificateProvider,
        &input,
    )
    .await
}

pub async fn independent_witness(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Query(query): Query<AddressQuery>,
) -> Result<Response> {
    show_page(
        &state,
        LpaId::new(lpa_id),
        AddressActor::IndependentWitness,
        &query,
    )
    .await
}

pub async fn independent_witness_submit(
    State(state): State<AppState>,
    Path(lpa_id): Path<String>,
    Form(input): Form<AddressFormInput>,
) -> Result<Response> {
    submit_page(
        &state,
        LpaId::new(lpa_id),
        AddressActor::IndependentWitness,
        &input,
    )
    .await
}

pub async fn attorney(
    State(state): State<AppState>,
    Path((lpa_id, uid)): Path<(String, Uuid)>,
    Query(query): Query<AddressQuery>,
) -> Result<Response> {
    let actor = AddressActor::Attorney(ActorUid::from_uuid(uid));
    show_page(&state, LpaId::new(lpa_id), actor, &query).await
}

pub async fn attorney_submit(
    State(state): State<AppState>,
    Path((lpa_id, uid)): Path<(String, Uuid)>,
    Form(input): Form<AddressFormInput>,
) -> Result<Response> {
    let actor = AddressActor::Attorney(ActorUid::from_uuid(uid));
    submit_page(&state, LpaId::new(lpa_id), actor, &input).await
}

pub async fn replacement_attorney(
    State(state): State<AppState>,
    Path((lpa_id, uid)): Path<(String, Uuid)>,
    Query(query): Query<AddressQuery>,
) -> Result<Response> {
    let actor = AddressActor::ReplacementAttorney(ActorUid::from_uuid(uid));
    show_page(&state, LpaId::new(lpa_id), actor, &query).await
}

pub async fn replacement_attorney_submit(
    State(state): State<AppState>,
    Path((lpa_id, uid)): Path<(String, Uuid)>,
    Form(input): Form<AddressFormInput>,
) -> Result<Response> {
    let actor = AddressActor::ReplacementAttorney(ActorUid::from_uuid(uid));
    submit_page(&state, LpaId::new(lpa_id), actor, &input).await
}

// -------------------------------------------------------------------------
// Shared page flow
// -------------------------------------------------------------------------

fn workflow(state: &AppState, actor: AddressActor) -> AddressWorkflow<'_, PlaceClient> {
    AddressWorkflow::new(state.places())
        .labels(actor.labels())
        .postcode_rule(state.postcode_rule().clone())
}

fn missing_actor(actor: AddressActor) -> AppError {
    AppError::NotFound(format!("{} on this LPA", actor_name(actor)))
}

#[instrument(skip(state, query), fields(lpa_id = %lpa_id, actor = actor_name(actor)))]
async fn show_page(
    state: &AppState,
    lpa_id: LpaId,
    actor: AddressActor,
    query: &AddressQuery,
) -> Result<Response> {
    let provided = state.store().get(&lpa_id).await?;
    let existing = &provided
        .actor(actor)
        .ok_or_else(|| missing_actor(actor))?
        .address;

    let requested: AddressAction = query.action.parse().unwrap_or_default();
    let page = workflow(state, actor).show(existing, requested);

    Ok(render(&provided, actor, page).into_response())
}

#[instrument(skip(state, input), fields(lpa_id = %lpa_id, actor = actor_name(actor), action = %input.action))]
async fn submit_page(
    state: &AppState,
    lpa_id: LpaId,
    actor: AddressActor,
    input: &AddressFormInput,
) -> Result<Response> {
    let mut provided = state.store().get(&lpa_id).await?;
    let existing = provided
        .actor(actor)
        .ok_or_else(|| missing_actor(actor))?
        .address
        .clone();
    let reusable = provided.actor_addresses();

    let resolution = workflow(state, actor)
        .resolve(AddressForm::read(input), &existing, &reusable)
        .await;

    match resolution {
        Resolution::Done(address) => {
            if actor == AddressActor::Donor && address == existing {
                tracing::debug!("donor address unchanged");
            } else {
                provided
                    .actor_mut(actor)
                    .ok_or_else(|| missing_actor(actor))?
                    .address = address;
                state.store().put(&mut provided, state.now()).await?;

                add_breadcrumb(
                    "address",
                    "Address saved",
                    &[("lpa_id", lpa_id.as_str()), ("actor", actor_name(actor))],
                );
                tracing::info!("address saved");
            }

            Ok(Redirect::to(&next_path(&lpa_id, actor)).into_response())
        }
        Resolution::Redisplay(page) => Ok(render(&provided, actor, page).into_response()),
    }
}

/// Where to go once the address is saved.
fn next_path(lpa_id: &LpaId, actor: AddressActor) -> String {
    let page = match actor {
        AddressActor::Donor => "can-you-sign-your-lpa",
        AddressActor::CertificateProvider | AddressActor::IndependentWitness => "task-list",
        AddressActor::Attorney(_) => "choose-attorneys-summary",
        AddressActor::ReplacementAttorney(_) => "choose-replacement-attorneys-summary",
    };

    format!("/lpa/{lpa_id}/{page}")
}

const fn actor_name(actor: AddressActor) -> &'static str {
    match actor {
        AddressActor::Donor => "donor",
        AddressActor::CertificateProvider => "certificate provider",
        AddressActor::IndependentWitness => "independent witness",
        AddressActor::Attorney(_) => "attorney",
        AddressActor::ReplacementAttorney(_) => "replacement attorney",
    }
}

fn title(provided: &Provided, actor: AddressActor) -> String {
    if actor == AddressActor::Donor {
        return "What is your address?".to_string();
    }

    let name = provided
        .actor(actor)
        .map(make_lpa_core::Actor::full_name)
        .unwrap_or_default();

    if name.is_empty() {
        "What is their address?".to_string()
    } else {
        format!("What is {name}’s address?")
    }
}

fn render(provided: &Provided, actor: AddressActor, page: AddressPage) -> ChooseAddressTemplate {
    let AddressPage {
        form,
        addresses,
        errors,
    } = page;

    let errors = error_views(&errors);
    let error = |field: &str| {
        errors
            .iter()
            .find(|view| view.field == field)
            .map(|view| view.message.clone())
    };

    let names = form.field_names;
    let address = form.address.clone().unwrap_or_default();
    let selected = form.address.as_ref().map(make_lpa_core::Address::encode);

    let fields = vec![
        FieldView {
            name: names.line1,
            label: "Address line 1",
            value: address.line1.clone(),
            error: error(names.line1),
            autocomplete: "address-line1",
        },
        FieldView {
            name: names.line2,
            label: "Address line 2 (optional)",
            value: address.line2.clone(),
            error: error(names.line2),
            autocomplete: "address-line2",
        },
        FieldView {
            name: names.line3,
            label: "Address line 3 (optional)",
            value: address.line3.clone(),
            error: error(names.line3),
            autocomplete: "address-line3",
        },
        FieldView {
            name: names.town_or_city,
            label: "Town or city",
            value: address.town_or_city.clone(),
            error: error(names.town_or_city),
            autocomplete: "address-level2",
        },
        FieldView {
            name: names.postcode,
            label: "Postcode",
            value: address.postcode.clone(),
            error: error(names.postcode),
            autocomplete: "postal-code",
        },
    ];

    let addresses = addresses
        .iter()
        .map(|option| {
            let value = option.encode();
            AddressOption {
                selected: selected.as_deref() == Some(value.as_str()),
                text: option.to_string(),
                value,
            }
        })
        .collect();

    ChooseAddressTemplate {
        title: title(provided, actor),
        action: form.action.as_str(),
        lookup_postcode: form.lookup_postcode,
        can_reuse: form.action == AddressAction::Initial && !provided.actor_addresses().is_empty(),
        fields,
        addresses,
        errors,
    }
}
