//! Pre-trip checklist: inspections that gate departure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::photo::Photo;

/// A named inspection on the pre-trip checklist.
///
/// Every item is required. Some also need photo evidence before they can
/// be checked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistItem {
    VehicleInspection,
    Ventilation,
    WaterSupply,
    LoadingRamp,
    AnimalFitness,
    TransportDocuments,
}

impl ChecklistItem {
    /// All items in display order.
    pub const ALL: [Self; 6] = [
        Self::VehicleInspection,
        Self::Ventilation,
        Self::WaterSupply,
        Self::LoadingRamp,
        Self::AnimalFitness,
        Self::TransportDocuments,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::VehicleInspection => "Vehicle inspection",
            Self::Ventilation => "Ventilation working",
            Self::WaterSupply => "Water supply filled",
            Self::LoadingRamp => "Loading ramp secured",
            Self::AnimalFitness => "Animals fit to travel",
            Self::TransportDocuments => "Transport documents on board",
        }
    }

    /// Whether checking this item off needs an attached photo.
    pub fn requires_photo(self) -> bool {
        matches!(self, Self::VehicleInspection | Self::AnimalFitness)
    }
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of a single checklist entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemState {
    pub checked: bool,
    pub photo: Option<Photo>,
}

/// The pre-trip checklist.
///
/// Mutation goes through [`crate::controller::TripController`], which refuses
/// edits once the trip has left `scheduled`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    items: BTreeMap<ChecklistItem, ItemState>,
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            items: ChecklistItem::ALL
                .into_iter()
                .map(|item| (item, ItemState::default()))
                .collect(),
        }
    }
}

impl Checklist {
    pub fn is_checked(&self, item: ChecklistItem) -> bool {
        self.items.get(&item).is_some_and(|s| s.checked)
    }

    pub fn photo(&self, item: ChecklistItem) -> Option<&Photo> {
        self.items.get(&item).and_then(|s| s.photo.as_ref())
    }

    /// Whether every item has been checked off.
    pub fn all_complete(&self) -> bool {
        self.items.values().all(|s| s.checked)
    }

    /// Items still unchecked, in display order.
    pub fn outstanding(&self) -> Vec<ChecklistItem> {
        self.items
            .iter()
            .filter(|(_, s)| !s.checked)
            .map(|(item, _)| *item)
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.items.values().filter(|s| s.checked).count()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Iterates items with their state in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ChecklistItem, &ItemState)> {
        self.items.iter().map(|(item, state)| (*item, state))
    }

    /// Sets an item's checked flag. Returns `false` (and changes nothing)
    /// when checking a photo-required item that has no photo yet.
    pub(crate) fn set_checked(&mut self, item: ChecklistItem, checked: bool) -> bool {
        let state = self.items.entry(item).or_default();
        if checked && item.requires_photo() && state.photo.is_none() {
            return false;
        }
        state.checked = checked;
        true
    }

    /// Attaches a photo to an item, replacing any earlier one.
    pub(crate) fn attach_photo(&mut self, item: ChecklistItem, photo: Photo) {
        self.items.entry(item).or_default().photo = Some(photo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checklist_has_every_item_unchecked() {
        let checklist = Checklist::default();
        assert_eq!(checklist.item_count(), ChecklistItem::ALL.len());
        assert_eq!(checklist.completed_count(), 0);
        assert!(!checklist.all_complete());
        assert_eq!(checklist.outstanding(), ChecklistItem::ALL.to_vec());
    }

    #[test]
    fn photo_required_item_cannot_be_checked_without_photo() {
        let mut checklist = Checklist::default();
        assert!(!checklist.set_checked(ChecklistItem::VehicleInspection, true));
        assert!(!checklist.is_checked(ChecklistItem::VehicleInspection));

        checklist.attach_photo(ChecklistItem::VehicleInspection, Photo::capture(vec![1, 2]));
        assert!(checklist.set_checked(ChecklistItem::VehicleInspection, true));
        assert!(checklist.is_checked(ChecklistItem::VehicleInspection));
    }

    #[test]
    fn unchecking_never_needs_a_photo() {
        let mut checklist = Checklist::default();
        assert!(checklist.set_checked(ChecklistItem::AnimalFitness, false));
    }

    #[test]
    fn all_complete_once_every_item_is_checked() {
        let mut checklist = Checklist::default();
        for item in ChecklistItem::ALL {
            if item.requires_photo() {
                checklist.attach_photo(item, Photo::capture(vec![0xFF]));
            }
            assert!(checklist.set_checked(item, true));
        }
        assert!(checklist.all_complete());
        assert!(checklist.outstanding().is_empty());
    }

    #[test]
    fn attaching_a_photo_replaces_the_previous_one() {
        let mut checklist = Checklist::default();
        let first = Photo::capture(vec![1]);
        let second = Photo::capture(vec![2]);
        checklist.attach_photo(ChecklistItem::AnimalFitness, first);
        checklist.attach_photo(ChecklistItem::AnimalFitness, second.clone());
        assert_eq!(checklist.photo(ChecklistItem::AnimalFitness), Some(&second));
    }
}
