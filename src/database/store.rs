//! Contract between the review driver and whatever persists cards.
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Card, CardId, LearnerId, Slot};

pub trait CardStore {
    /// Cards of `owner_id` with `last_review <= today`, lowest slot first.
    fn fetch_due(&self, owner_id: LearnerId, today: NaiveDate) -> Result<Vec<Card>, StoreError>;

    /// Overwrites the slot and review date of one card. Writing the same
    /// values twice leaves the card unchanged.
    fn persist_slot_and_date(
        &self,
        card_id: CardId,
        slot: Slot,
        last_review: NaiveDate,
    ) -> Result<(), StoreError>;
}
