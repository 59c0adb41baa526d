use serde::{Deserialize, Serialize};

/// One division of a national pyramid. Tier 1 is the top flight; the
/// tier directly below a league is `tier + 1` in the same country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: u32,
    pub name: String,
    pub country_id: u32,
    pub tier: u8,
    pub relegation_spots: u8,
    pub promotion_spots: u8,
}

impl League {
    pub fn new(
        id: u32,
        name: String,
        country_id: u32,
        tier: u8,
        relegation_spots: u8,
        promotion_spots: u8,
    ) -> Self {
        League {
            id,
            name,
            country_id,
            tier,
            relegation_spots,
            promotion_spots,
        }
    }

    pub fn is_top_tier(&self) -> bool {
        self.tier == 1
    }
}
