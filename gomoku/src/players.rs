use serde::{Deserialize, Serialize};

use crate::{InvalidPlayerNames, Player};

/// The names of the two players of a game.
///
/// Both names are trimmed, non-empty, and different from each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PlayerNames")]
pub struct Players {
    player_x: String,
    player_o: String,
}

// The unvalidated form, as found in storage.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerNames {
    player_x: String,
    player_o: String,
}

impl TryFrom<PlayerNames> for Players {
    type Error = InvalidPlayerNames;

    fn try_from(names: PlayerNames) -> Result<Self, Self::Error> {
        Players::new(&names.player_x, &names.player_o)
    }
}

impl Players {
    pub fn new(player_x: &str, player_o: &str) -> Result<Self, InvalidPlayerNames> {
        let (player_x, player_o) = (player_x.trim(), player_o.trim());
        if player_x.is_empty() || player_o.is_empty() {
            return Err(InvalidPlayerNames::Empty);
        }
        if player_x == player_o {
            return Err(InvalidPlayerNames::Duplicate);
        }
        Ok(Self {
            player_x: String::from(player_x),
            player_o: String::from(player_o),
        })
    }

    pub fn player_x(&self) -> &str {
        &self.player_x
    }

    pub fn player_o(&self) -> &str {
        &self.player_o
    }

    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::X => &self.player_x,
            Player::O => &self.player_o,
        }
    }
}
