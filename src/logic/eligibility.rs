//! Gender eligibility: whether a player may join one side of a match,
//! given the match discipline and who is already on that side.

use crate::models::{player_gender, Gender, MatchType, Player, PlayerId};

/// Doubles: each side fields exactly this many players.
pub const PLAYERS_PER_SIDE: usize = 2;

/// Eligibility rejection reasons. Messages are shown to the user verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EligibilityError {
    MenOnly,
    WomenOnly,
    MixedPairGender,
    SideFull(MatchType),
}

impl std::fmt::Display for EligibilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EligibilityError::MenOnly => {
                write!(f, "Men's Doubles matches can only include male players")
            }
            EligibilityError::WomenOnly => {
                write!(f, "Women's Doubles matches can only include female players")
            }
            EligibilityError::MixedPairGender => write!(
                f,
                "Mixed Doubles requires one male and one female player per team"
            ),
            EligibilityError::SideFull(kind) => {
                write!(f, "{} can only have 2 players per team", kind)
            }
        }
    }
}

/// Check whether a candidate of the given gender may be added to a match
/// side that already holds `existing_side`. Looks only at the target side;
/// round-wide constraints are layered on by the round assignment rules.
pub fn validate_player_gender_for_match(
    kind: MatchType,
    candidate_gender: Gender,
    existing_side: &[PlayerId],
    all_players: &[Player],
) -> Result<(), EligibilityError> {
    // Unknown ids (deleted players) contribute no gender constraint.
    let existing_genders: Vec<Gender> = existing_side
        .iter()
        .filter_map(|&id| player_gender(all_players, id))
        .collect();

    match kind {
        MatchType::MensDoubles => {
            if candidate_gender != Gender::M
                || existing_genders.iter().any(|&g| g != Gender::M)
            {
                return Err(EligibilityError::MenOnly);
            }
        }
        MatchType::WomensDoubles => {
            if candidate_gender != Gender::F
                || existing_genders.iter().any(|&g| g != Gender::F)
            {
                return Err(EligibilityError::WomenOnly);
            }
        }
        MatchType::MixedDoubles => match existing_side.len() {
            // First player on a side may be either gender.
            0 => {}
            // Second player must be the opposite gender of the first.
            1 => {
                if existing_genders.first() == Some(&candidate_gender) {
                    return Err(EligibilityError::MixedPairGender);
                }
            }
            // Unreachable through the normal flow (callers cap sides at 2).
            _ => return Err(EligibilityError::SideFull(kind)),
        },
    }

    Ok(())
}
