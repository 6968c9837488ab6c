//! The address entry workflow.
//!
//! Every page that asks for an address (the donor's own, the certificate
//! provider's, each attorney's) runs the same steps. [`AddressWorkflow`]
//! takes the submitted [`AddressForm`] and decides whether the page is done,
//! giving back the address to save, or must be shown again with a list of
//! addresses and any errors.
//!
//! The workflow never saves anything; saving a finished address is up to the
//! page.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, info};

use crate::form::{AddressAction, AddressForm, AddressLabels, UnknownAction};
use crate::types::{Address, PostcodeRule};
use crate::validation::{FieldError, ValidationErrors};

/// Why a postcode lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The lookup service rejected the postcode.
    #[error("invalid postcode ({status_code}): {message}")]
    InvalidPostcode { status_code: u16, message: String },

    /// Anything else, such as the service being unavailable.
    #[error("postcode lookup failed: {0}")]
    Failed(String),
}

/// Finds the addresses at a postcode.
pub trait PostcodeLookup {
    fn lookup_postcode(
        &self,
        postcode: &str,
    ) -> impl Future<Output = Result<Vec<Address>, LookupError>> + Send;
}

/// Everything needed to render the address page again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressPage {
    pub form: AddressForm,
    /// Addresses to choose from, either lookup results or reusable addresses.
    pub addresses: Vec<Address>,
    pub errors: ValidationErrors,
}

impl AddressPage {
    const fn new(form: AddressForm) -> Self {
        Self {
            form,
            addresses: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }
}

/// Outcome of a submitted address form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The address is final and should be saved.
    Done(Address),
    /// The page should be shown again.
    Redisplay(AddressPage),
}

/// The address entry state machine for one page.
#[derive(Debug)]
pub struct AddressWorkflow<'a, L> {
    lookup: &'a L,
    labels: AddressLabels,
    postcode_rule: PostcodeRule,
}

impl<'a, L> AddressWorkflow<'a, L>
where
    L: PostcodeLookup + Sync,
{
    #[must_use]
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            labels: AddressLabels::default(),
            postcode_rule: PostcodeRule::default(),
        }
    }

    /// Use the wording for the donor's own address.
    #[must_use]
    pub const fn labels(mut self, labels: AddressLabels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn postcode_rule(mut self, rule: PostcodeRule) -> Self {
        self.postcode_rule = rule;
        self
    }

    /// The page as first shown, before anything is submitted.
    ///
    /// An address already saved is shown ready to edit. Otherwise asking for
    /// `manual` gives empty address fields, and anything else gives the
    /// choice between lookup and manual entry.
    #[must_use]
    pub fn show(&self, existing: &Address, requested: AddressAction) -> AddressPage {
        if !existing.is_zero() {
            return AddressPage::new(AddressForm::manual(existing.clone()));
        }

        if requested == AddressAction::Manual {
            return AddressPage::new(AddressForm::manual(Address::default()));
        }

        AddressPage::new(AddressForm::new())
    }

    /// Decide what a submitted form leads to.
    pub async fn resolve(
        &self,
        form: Result<AddressForm, UnknownAction>,
        existing: &Address,
        reusable: &[Address],
    ) -> Resolution {
        let form = match form {
            Ok(form) => form,
            Err(UnknownAction(action)) => {
                debug!(action = %action, "unknown address action");
                let mut page = AddressPage::new(AddressForm::new());
                page.errors.add(
                    page.form.field_names.action,
                    FieldError::select("ifUsePreviousAddressOrEnterNew"),
                );
                return Resolution::Redisplay(page);
            }
        };

        let errors = form.validate(self.labels, &self.postcode_rule);

        match form.action {
            AddressAction::Initial => Resolution::Redisplay(self.show(existing, form.action)),

            AddressAction::Manual if errors.is_empty() => {
                Resolution::Done(form.address.unwrap_or_default())
            }

            AddressAction::Manual | AddressAction::Postcode => {
                Resolution::Redisplay(AddressPage {
                    form,
                    addresses: Vec::new(),
                    errors,
                })
            }

            AddressAction::PostcodeLookup => {
                let mut page = AddressPage {
                    form,
                    addresses: Vec::new(),
                    errors,
                };

                if page.errors.any() {
                    page.form.action = AddressAction::Postcode;
                } else {
                    self.lookup_into(&mut page).await;
                }

                Resolution::Redisplay(page)
            }

            AddressAction::PostcodeSelect => {
                if errors.is_empty() {
                    let selected = AddressForm {
                        action: AddressAction::Manual,
                        ..form
                    };
                    return Resolution::Redisplay(AddressPage::new(selected));
                }

                let mut page = AddressPage {
                    form,
                    addresses: Vec::new(),
                    errors,
                };
                self.lookup_into(&mut page).await;
                Resolution::Redisplay(page)
            }

            AddressAction::Reuse => {
                let addresses = reusable_addresses(reusable);
                if addresses.is_empty() {
                    return Resolution::Redisplay(self.show(existing, AddressAction::Initial));
                }

                Resolution::Redisplay(AddressPage {
                    form,
                    addresses,
                    errors,
                })
            }

            AddressAction::ReuseSelect => match form.address {
                Some(address) if errors.is_empty() => Resolution::Done(address),
                _ => Resolution::Redisplay(AddressPage {
                    form,
                    addresses: reusable_addresses(reusable),
                    errors,
                }),
            },
        }
    }

    /// Look up the form's postcode and put the results, or the reason there
    /// are none, on the page.
    async fn lookup_into(&self, page: &mut AddressPage) {
        let field = page.form.field_names.lookup_postcode;

        match self.lookup.lookup_postcode(&page.form.lookup_postcode).await {
            Ok(addresses) if addresses.is_empty() => {
                page.errors
                    .add(field, FieldError::custom(self.labels.no_addresses_found()));
                page.form.action = AddressAction::Postcode;
            }
            Ok(addresses) => {
                page.addresses = addresses;
            }
            Err(error) => {
                info!(error = %error, "postcode lookup");

                let problem = match error {
                    LookupError::InvalidPostcode { .. } => FieldError::enter("invalidPostcode"),
                    LookupError::Failed(_) => FieldError::custom("couldNotLookupPostcode"),
                };
                page.errors.add(field, problem);
                page.form.action = AddressAction::Postcode;
            }
        }
    }
}

/// The addresses that can be offered for reuse, in the order given.
///
/// Empty addresses and exact duplicates are left out.
pub fn reusable_addresses<'a>(addresses: impl IntoIterator<Item = &'a Address>) -> Vec<Address> {
    let mut reusable: Vec<Address> = Vec::new();

    for address in addresses {
        if address.lines().is_empty() || reusable.contains(address) {
            continue;
        }
        reusable.push(address.clone());
    }

    reusable
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::form::AddressFormInput;

    /// A lookup returning a canned response and recording what it was asked.
    struct FakeLookup {
        response: Result<Vec<Address>, LookupError>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn returning(response: Result<Vec<Address>, LookupError>) -> Self {
            Self {
                response,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PostcodeLookup for FakeLookup {
        async fn lookup_postcode(&self, postcode: &str) -> Result<Vec<Address>, LookupError> {
            self.calls.lock().unwrap().push(postcode.to_string());
            self.response.clone()
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Captured {
        level: Level,
        message: String,
        error: Option<String>,
    }

    #[derive(Default)]
    struct CaptureVisitor {
        message: String,
        error: Option<String>,
    }

    impl Visit for CaptureVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            match field.name() {
                "message" => self.message = format!("{value:?}"),
                "error" => self.error = Some(format!("{value:?}")),
                _ => {}
            }
        }
    }

    #[derive(Clone, Default)]
    struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = CaptureVisitor::default();
            event.record(&mut visitor);
            self.0.lock().unwrap().push(Captured {
                level: *event.metadata().level(),
                message: visitor.message,
                error: visitor.error,
            });
        }
    }

    impl CaptureLayer {
        fn info_events(&self) -> Vec<Captured> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|event| event.level == Level::INFO)
                .cloned()
                .collect()
        }
    }

    fn capture_logs() -> (CaptureLayer, tracing::subscriber::DefaultGuard) {
        let layer = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (layer, guard)
    }

    fn test_address() -> Address {
        Address {
            line1: "a".to_string(),
            line2: "b".to_string(),
            line3: "c".to_string(),
            town_or_city: "d".to_string(),
            postcode: "E".to_string(),
            country: "GB".to_string(),
        }
    }

    fn form(input: AddressFormInput) -> Result<AddressForm, UnknownAction> {
        AddressForm::read(&input)
    }

    fn input(action: &str) -> AddressFormInput {
        AddressFormInput {
            action: action.to_string(),
            ..AddressFormInput::default()
        }
    }

    fn redisplayed(resolution: Resolution) -> AddressPage {
        match resolution {
            Resolution::Redisplay(page) => page,
            Resolution::Done(address) => panic!("expected redisplay, got done with {address:?}"),
        }
    }

    fn no_lookup() -> FakeLookup {
        FakeLookup::returning(Err(LookupError::Failed("should not be called".to_string())))
    }

    #[test]
    fn test_show_existing_address_is_editable() {
        let lookup = no_lookup();
        let page = AddressWorkflow::new(&lookup).show(&test_address(), AddressAction::Initial);

        assert_eq!(page.form, AddressForm::manual(test_address()));
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_show_manual_requested() {
        let lookup = no_lookup();
        let page = AddressWorkflow::new(&lookup).show(&Address::default(), AddressAction::Manual);

        assert_eq!(page.form, AddressForm::manual(Address::default()));
    }

    #[test]
    fn test_show_initial() {
        let lookup = no_lookup();
        let page = AddressWorkflow::new(&lookup).show(&Address::default(), AddressAction::Reuse);

        assert_eq!(page.form, AddressForm::new());
    }

    #[tokio::test]
    async fn test_manual_valid_is_done() {
        let lookup = no_lookup();
        let resolution = AddressWorkflow::new(&lookup)
            .resolve(
                form(AddressFormInput {
                    line1: "3 Elm St".to_string(),
                    town_or_city: "Springfield".to_string(),
                    postcode: "SP1 2AB".to_string(),
                    ..input("manual")
                }),
                &Address::default(),
                &[],
            )
            .await;

        assert_eq!(
            resolution,
            Resolution::Done(Address {
                line1: "3 Elm St".to_string(),
                town_or_city: "Springfield".to_string(),
                postcode: "SP1 2AB".to_string(),
                country: "GB".to_string(),
                ..Address::default()
            })
        );
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_manual_fields_kept_exactly() {
        let lookup = no_lookup();
        let resolution = AddressWorkflow::new(&lookup)
            .postcode_rule(PostcodeRule::lenient())
            .resolve(
                form(AddressFormInput {
                    line1: "a".to_string(),
                    line2: "b".to_string(),
                    line3: "c".to_string(),
                    town_or_city: "d".to_string(),
                    postcode: "e".to_string(),
                    ..input("manual")
                }),
                &Address::default(),
                &[],
            )
            .await;

        assert_eq!(resolution, Resolution::Done(test_address()));
    }

    #[tokio::test]
    async fn test_manual_missing_line1_redisplays() {
        let lookup = no_lookup();
        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        line2: "b".to_string(),
                        town_or_city: "Springfield".to_string(),
                        postcode: "SP1 2AB".to_string(),
                        ..input("manual")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Manual);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("address-line-1", FieldError::enter("addressLine1"))
        );
        assert_eq!(
            page.form.address.map(|address| address.line2),
            Some("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_manual_errors_use_own_address_labels() {
        let lookup = no_lookup();
        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .labels(AddressLabels::Yours)
                .resolve(form(input("manual")), &Address::default(), &[])
                .await,
        );

        assert_eq!(
            page.errors.get("address-postcode"),
            Some(&FieldError::enter("yourPostcode"))
        );
    }

    #[tokio::test]
    async fn test_postcode_lookup_success_lists_addresses() {
        let addresses = vec![
            Address {
                line1: "1 Road Way".to_string(),
                town_or_city: "Townville".to_string(),
                postcode: "NG1".to_string(),
                country: "GB".to_string(),
                ..Address::default()
            },
            Address {
                line1: "2 Road Way".to_string(),
                town_or_city: "Townville".to_string(),
                postcode: "NG1".to_string(),
                country: "GB".to_string(),
                ..Address::default()
            },
        ];
        let lookup = FakeLookup::returning(Ok(addresses.clone()));

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "NG1".to_string(),
                        ..input("postcode-lookup")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::PostcodeLookup);
        assert_eq!(page.form.lookup_postcode, "NG1");
        assert_eq!(page.addresses, addresses);
        assert!(page.errors.is_empty());
        assert_eq!(lookup.calls(), ["NG1"]);
    }

    #[tokio::test]
    async fn test_postcode_lookup_no_results() {
        let lookup = FakeLookup::returning(Ok(Vec::new()));
        let (logs, _guard) = capture_logs();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "XYZ".to_string(),
                        ..input("postcode-lookup")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Postcode);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("lookup-postcode", FieldError::custom("noAddressesFound"))
        );
        assert!(logs.info_events().is_empty());
    }

    #[tokio::test]
    async fn test_postcode_lookup_no_results_own_address() {
        let lookup = FakeLookup::returning(Ok(Vec::new()));

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .labels(AddressLabels::Yours)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "XYZ".to_string(),
                        ..input("postcode-lookup")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(
            page.errors.get("lookup-postcode"),
            Some(&FieldError::custom("noYourAddressesFound"))
        );
    }

    #[tokio::test]
    async fn test_postcode_lookup_invalid_postcode() {
        let lookup = FakeLookup::returning(Err(LookupError::InvalidPostcode {
            status_code: 400,
            message: "Requested postcode must contain a minimum of the sector plus 1 digit of the district e.g. SO1. Requested postcode was INVALID".to_string(),
        }));
        let (logs, _guard) = capture_logs();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "INVALID".to_string(),
                        ..input("postcode-lookup")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Postcode);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("lookup-postcode", FieldError::enter("invalidPostcode"))
        );

        let events = logs.info_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "postcode lookup");
        assert!(
            events[0]
                .error
                .as_deref()
                .is_some_and(|error| error.contains("invalid postcode (400)"))
        );
    }

    #[tokio::test]
    async fn test_postcode_lookup_failure() {
        let lookup = FakeLookup::returning(Err(LookupError::Failed("err".to_string())));
        let (logs, _guard) = capture_logs();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "NG1".to_string(),
                        ..input("postcode-lookup")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Postcode);
        assert_eq!(
            page.errors,
            ValidationErrors::new()
                .with("lookup-postcode", FieldError::custom("couldNotLookupPostcode"))
        );
        assert!(page.addresses.is_empty());

        let events = logs.info_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].error.as_deref(),
            Some("postcode lookup failed: err")
        );
    }

    #[tokio::test]
    async fn test_postcode_lookup_missing_postcode_skips_lookup() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(form(input("postcode-lookup")), &Address::default(), &[])
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Postcode);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("lookup-postcode", FieldError::enter("aPostcode"))
        );
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_postcode_select_prefills_manual_form() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "NG1".to_string(),
                        select_address: test_address().encode(),
                        ..input("postcode-select")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Manual);
        assert_eq!(page.form.address, Some(test_address()));
        assert!(page.errors.is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_postcode_select_without_selection_relists() {
        let addresses = vec![test_address()];
        let lookup = FakeLookup::returning(Ok(addresses.clone()));

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "NG1".to_string(),
                        select_address: "garbage".to_string(),
                        ..input("postcode-select")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::PostcodeSelect);
        assert_eq!(page.addresses, addresses);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("select-address", FieldError::select("anAddressFromTheList"))
        );
        assert_eq!(lookup.calls(), ["NG1"]);
    }

    #[tokio::test]
    async fn test_postcode_select_without_selection_lookup_fails() {
        let lookup = FakeLookup::returning(Err(LookupError::Failed("err".to_string())));

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        lookup_postcode: "NG1".to_string(),
                        ..input("postcode-select")
                    }),
                    &Address::default(),
                    &[],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Postcode);
        assert_eq!(
            page.errors,
            ValidationErrors::new()
                .with("select-address", FieldError::select("anAddressFromTheList"))
                .with("lookup-postcode", FieldError::custom("couldNotLookupPostcode"))
        );
    }

    #[tokio::test]
    async fn test_reuse_lists_addresses() {
        let lookup = no_lookup();
        let other = Address {
            line1: "x".to_string(),
            ..test_address()
        };

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(input("reuse")),
                    &Address::default(),
                    &[test_address(), test_address(), other.clone()],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::Reuse);
        assert_eq!(page.addresses, [test_address(), other]);
    }

    #[tokio::test]
    async fn test_reuse_with_nothing_to_reuse_falls_back() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(form(input("reuse")), &Address::default(), &[])
                .await,
        );

        assert_eq!(page, AddressPage::new(AddressForm::new()));
    }

    #[tokio::test]
    async fn test_reuse_select_is_done() {
        let lookup = no_lookup();

        let resolution = AddressWorkflow::new(&lookup)
            .resolve(
                form(AddressFormInput {
                    select_address: test_address().encode(),
                    ..input("reuse-select")
                }),
                &Address::default(),
                &[test_address()],
            )
            .await;

        assert_eq!(resolution, Resolution::Done(test_address()));
    }

    #[tokio::test]
    async fn test_reuse_select_without_selection() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .labels(AddressLabels::Yours)
                .resolve(form(input("reuse-select")), &Address::default(), &[test_address()])
                .await,
        );

        assert_eq!(page.form.action, AddressAction::ReuseSelect);
        assert_eq!(page.addresses, [test_address()]);
        assert_eq!(
            page.errors,
            ValidationErrors::new()
                .with("select-address", FieldError::select("yourAddressFromTheList"))
        );
    }

    #[tokio::test]
    async fn test_reuse_select_incomplete_address() {
        let lookup = no_lookup();
        let incomplete = Address {
            line1: "x".to_string(),
            ..Address::default()
        };

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(
                    form(AddressFormInput {
                        select_address: incomplete.encode(),
                        ..input("reuse-select")
                    }),
                    &Address::default(),
                    &[test_address()],
                )
                .await,
        );

        assert_eq!(page.form.action, AddressAction::ReuseSelect);
        assert_eq!(page.addresses, [test_address()]);
        assert_eq!(
            page.errors,
            ValidationErrors::new().with("select-address", FieldError::select("anAddressFromTheList"))
        );
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(form(input("teleport")), &test_address(), &[])
                .await,
        );

        assert_eq!(page.form, AddressForm::new());
        assert_eq!(
            page.errors,
            ValidationErrors::new()
                .with("action", FieldError::select("ifUsePreviousAddressOrEnterNew"))
        );
    }

    #[tokio::test]
    async fn test_initial_submission_shows_existing() {
        let lookup = no_lookup();

        let page = redisplayed(
            AddressWorkflow::new(&lookup)
                .resolve(form(input("")), &test_address(), &[])
                .await,
        );

        assert_eq!(page.form, AddressForm::manual(test_address()));
    }

    #[test]
    fn test_reusable_addresses() {
        let a = test_address();
        let b = Address {
            line1: "b".to_string(),
            ..test_address()
        };
        let lower = Address {
            line1: "A".to_string(),
            ..test_address()
        };
        let abroad = Address {
            country: "FR".to_string(),
            ..test_address()
        };
        let country_only = Address {
            country: "GB".to_string(),
            ..Address::default()
        };
        let no_country = Address {
            country: String::new(),
            ..b.clone()
        };

        let addresses = [
            Address::default(),
            a.clone(),
            country_only,
            abroad.clone(),
            b.clone(),
            a.clone(),
            lower.clone(),
            no_country.clone(),
        ];

        assert_eq!(
            reusable_addresses(&addresses),
            [a, abroad, b, lower, no_country]
        );
    }
}
