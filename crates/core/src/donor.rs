//! The details a donor has provided for their LPA.
//!
//! Only the parts read or written by the address and witnessing pages are
//! modelled here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::form::AddressLabels;
use crate::limiter::Limiter;
use crate::types::{ActorUid, Address, LpaId};
use crate::witness::WitnessCodes;
use crate::workflow::reusable_addresses;

/// A person named on the LPA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Actor {
    pub uid: ActorUid,
    pub first_names: String,
    pub last_name: String,
    pub address: Address,
}

impl Actor {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_name)
            .trim()
            .to_string()
    }
}

/// The donor's LPA application as saved in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provided {
    pub lpa_id: LpaId,
    pub donor: Actor,
    pub certificate_provider: Actor,
    pub attorneys: Vec<Actor>,
    pub replacement_attorneys: Vec<Actor>,
    pub independent_witness: Actor,
    pub certificate_provider_codes: WitnessCodes,
    pub independent_witness_codes: WitnessCodes,
    pub witnessed_by_certificate_provider_at: Option<DateTime<Utc>>,
    pub witnessed_by_independent_witness_at: Option<DateTime<Utc>>,
    /// Guards witness code attempts; `None` until the first attempt.
    pub witness_code_limiter: Option<Limiter>,
    pub updated_at: DateTime<Utc>,
}

/// Whose address an address page is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressActor {
    Donor,
    CertificateProvider,
    IndependentWitness,
    Attorney(ActorUid),
    ReplacementAttorney(ActorUid),
}

impl AddressActor {
    /// The donor's own address pages talk about "your address".
    #[must_use]
    pub const fn labels(self) -> AddressLabels {
        match self {
            Self::Donor => AddressLabels::Yours,
            _ => AddressLabels::Theirs,
        }
    }
}

impl Provided {
    #[must_use]
    pub fn new(lpa_id: LpaId) -> Self {
        Self {
            lpa_id,
            ..Self::default()
        }
    }

    /// Addresses already on the LPA that can be offered for reuse: the
    /// donor's, the certificate provider's, then each attorney's and
    /// replacement attorney's.
    #[must_use]
    pub fn actor_addresses(&self) -> Vec<Address> {
        let addresses = [&self.donor, &self.certificate_provider]
            .into_iter()
            .chain(&self.attorneys)
            .chain(&self.replacement_attorneys)
            .map(|actor| &actor.address);

        reusable_addresses(addresses)
    }

    #[must_use]
    pub fn actor(&self, actor: AddressActor) -> Option<&Actor> {
        match actor {
            AddressActor::Donor => Some(&self.donor),
            AddressActor::CertificateProvider => Some(&self.certificate_provider),
            AddressActor::IndependentWitness => Some(&self.independent_witness),
            AddressActor::Attorney(uid) => self.attorneys.iter().find(|a| a.uid == uid),
            AddressActor::ReplacementAttorney(uid) => {
                self.replacement_attorneys.iter().find(|a| a.uid == uid)
            }
        }
    }

    /// The actor whose address slot `actor` refers to, if they exist.
    pub fn actor_mut(&mut self, actor: AddressActor) -> Option<&mut Actor> {
        match actor {
            AddressActor::Donor => Some(&mut self.donor),
            AddressActor::CertificateProvider => Some(&mut self.certificate_provider),
            AddressActor::IndependentWitness => Some(&mut self.independent_witness),
            AddressActor::Attorney(uid) => self.attorneys.iter_mut().find(|a| a.uid == uid),
            AddressActor::ReplacementAttorney(uid) => {
                self.replacement_attorneys.iter_mut().find(|a| a.uid == uid)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(line1: &str) -> Address {
        Address {
            line1: line1.to_string(),
            town_or_city: "Town".to_string(),
            postcode: "B14 7ET".to_string(),
            country: "GB".to_string(),
            ..Address::default()
        }
    }

    fn actor(line1: &str) -> Actor {
        Actor {
            uid: ActorUid::new(),
            address: address(line1),
            ..Actor::default()
        }
    }

    #[test]
    fn test_actor_addresses_order_and_dedup() {
        let provided = Provided {
            donor: actor("donor"),
            certificate_provider: actor("cp"),
            attorneys: vec![actor("a1"), actor("donor"), Actor::default()],
            replacement_attorneys: vec![actor("r1")],
            independent_witness: actor("witness"),
            ..Provided::default()
        };

        assert_eq!(
            provided.actor_addresses(),
            [
                address("donor"),
                address("cp"),
                address("a1"),
                address("r1")
            ]
        );
    }

    #[test]
    fn test_actor_addresses_skips_non_uk() {
        let mut abroad = actor("abroad");
        abroad.address.country = "FR".to_string();

        let provided = Provided {
            donor: abroad,
            ..Provided::default()
        };

        assert!(provided.actor_addresses().is_empty());
    }

    #[test]
    fn test_actor_mut() {
        let attorney = actor("a1");
        let uid = attorney.uid;
        let mut provided = Provided {
            attorneys: vec![attorney],
            ..Provided::default()
        };

        provided
            .actor_mut(AddressActor::Attorney(uid))
            .unwrap()
            .address = address("moved");

        assert_eq!(provided.attorneys[0].address, address("moved"));
        assert!(provided.actor_mut(AddressActor::Attorney(ActorUid::new())).is_none());
        assert!(
            provided
                .actor_mut(AddressActor::ReplacementAttorney(uid))
                .is_none()
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(AddressActor::Donor.labels(), AddressLabels::Yours);
        assert_eq!(
            AddressActor::CertificateProvider.labels(),
            AddressLabels::Theirs
        );
    }

    #[test]
    fn test_full_name() {
        let actor = Actor {
            first_names: "Sam".to_string(),
            last_name: "Smith".to_string(),
            ..Actor::default()
        };
        assert_eq!(actor.full_name(), "Sam Smith");
        assert_eq!(Actor::default().full_name(), "");
    }

    #[test]
    fn test_serde_roundtrip() {
        let provided = Provided {
            lpa_id: LpaId::new("lpa-id"),
            donor: actor("donor"),
            witness_code_limiter: Some(Limiter::witness_code()),
            ..Provided::default()
        };

        let json = serde_json::to_string(&provided).unwrap();
        assert!(json.contains("\"witnessCodeLimiter\""));
        assert_eq!(serde_json::from_str::<Provided>(&json).unwrap(), provided);
    }
}
