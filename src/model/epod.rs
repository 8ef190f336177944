//! Electronic proof of delivery.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::photo::Photo;

/// The proof-of-delivery record the driver fills in at the dropoff.
///
/// Accepted once it carries at least one photo and a signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epod {
    /// Head count handed over, as typed by the driver.
    pub delivered_quantity: String,

    /// Whether the livestock arrived in good health.
    pub livestock_healthy: bool,
    pub signature: Option<Signature>,
    pub photos: Vec<Photo>,
}

/// Receiver's sign-off on the delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub name: String,
    pub signed_at: Timestamp,
}

impl Epod {
    pub fn new() -> Self {
        Self {
            livestock_healthy: true,
            ..Self::default()
        }
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    pub fn is_signed(&self) -> bool {
        self.signature
            .as_ref()
            .is_some_and(|s| !s.name.trim().is_empty())
    }

    /// The delivered head count, if the driver typed a number.
    pub fn delivered_count(&self) -> Option<u32> {
        self.delivered_quantity.trim().parse().ok()
    }

    /// How many head fewer than loaded were delivered, if any.
    ///
    /// `None` when the delivered count is missing, unparsable, or not short.
    pub fn shortfall(&self, loaded: u32) -> Option<u32> {
        self.delivered_count()
            .filter(|&delivered| delivered < loaded)
            .map(|delivered| loaded - delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_assumes_healthy_and_is_empty() {
        let epod = Epod::new();
        assert!(epod.livestock_healthy);
        assert!(!epod.has_photos());
        assert!(!epod.is_signed());
    }

    #[test]
    fn blank_signature_does_not_count() {
        let mut epod = Epod::new();
        epod.signature = Some(Signature {
            name: "   ".into(),
            signed_at: Timestamp::now(),
        });
        assert!(!epod.is_signed());
    }

    #[test]
    fn shortfall_against_loaded_count() {
        let mut epod = Epod::new();
        assert_eq!(epod.shortfall(45), None);

        epod.delivered_quantity = " 43 ".into();
        assert_eq!(epod.delivered_count(), Some(43));
        assert_eq!(epod.shortfall(45), Some(2));

        epod.delivered_quantity = "45".into();
        assert_eq!(epod.shortfall(45), None);

        epod.delivered_quantity = "forty".into();
        assert_eq!(epod.shortfall(45), None);
    }
}
