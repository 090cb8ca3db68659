//! Recipient models: owner, pet, and visit.
//!
//! Owners are read-only input to the dispatch engine — they are maintained by
//! the clinic's owner-management system and arrive here as a snapshot of the
//! owner/pet/visit graph.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::ChannelPreference;

/// A clinic visit, referenced from schedules by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: i32,
    pub date: Date,
    pub description: String,
}

/// A pet with its recorded visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Pet {
    /// Looks up a visit of this pet by id.
    pub fn visit(&self, visit_id: i32) -> Option<&Visit> {
        self.visits.iter().find(|visit| visit.id == visit_id)
    }
}

/// A pet owner and reminder recipient.
///
/// Contact fields may be absent or blank; the channel senders validate them
/// before attempting delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    pub notification_preference: ChannelPreference,
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl Owner {
    /// Looks up a pet of this owner by id.
    pub fn pet(&self, pet_id: i32) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == pet_id)
    }

    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The owner's email address, if present and non-blank.
    pub fn email_address(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// The owner's phone number, if present and non-blank.
    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.telephone.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
