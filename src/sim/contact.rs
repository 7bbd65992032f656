//! Entity tags and the contact classifier
//!
//! Every physics body carries one category bit. The classifier turns the
//! (unordered) pair of tags from a contact-begin event into a gameplay outcome.

use serde::{Deserialize, Serialize};

/// What kind of entity a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Obstacle,
    Ground,
    ScoreTrigger,
}

impl EntityTag {
    pub const ALL: [EntityTag; 4] = [
        EntityTag::Player,
        EntityTag::Obstacle,
        EntityTag::Ground,
        EntityTag::ScoreTrigger,
    ];

    /// Category bit used by the physics backend
    pub const fn category(self) -> u32 {
        match self {
            EntityTag::Player => 1,
            EntityTag::Obstacle => 2,
            EntityTag::Ground => 4,
            EntityTag::ScoreTrigger => 8,
        }
    }

    /// Map a body's category bits back to a tag
    pub fn from_category(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.category() == bits)
    }

    /// Categories that produce contact-begin events with this tag
    pub const fn contact_mask(self) -> u32 {
        match self {
            EntityTag::Player => {
                EntityTag::Obstacle.category()
                    | EntityTag::Ground.category()
                    | EntityTag::ScoreTrigger.category()
            }
            EntityTag::ScoreTrigger => EntityTag::Player.category(),
            EntityTag::Obstacle | EntityTag::Ground => 0,
        }
    }

    /// Categories this tag is physically pushed out of
    pub const fn collision_mask(self) -> u32 {
        match self {
            EntityTag::Player => EntityTag::Obstacle.category() | EntityTag::Ground.category(),
            EntityTag::Obstacle | EntityTag::Ground | EntityTag::ScoreTrigger => 0,
        }
    }
}

/// Gameplay result of two bodies touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// The player hit something solid
    TerminateRun,
    /// The player passed through a pair
    IncrementScore,
    Ignore,
}

/// Classify an unordered pair of tags
pub fn classify(a: EntityTag, b: EntityTag) -> ContactOutcome {
    use EntityTag::*;

    match (a, b) {
        (Player, Obstacle) | (Obstacle, Player) | (Player, Ground) | (Ground, Player) => {
            ContactOutcome::TerminateRun
        }
        (Player, ScoreTrigger) | (ScoreTrigger, Player) => ContactOutcome::IncrementScore,
        _ => ContactOutcome::Ignore,
    }
}
