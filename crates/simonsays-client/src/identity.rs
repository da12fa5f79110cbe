//! Player identity.
//!
//! Identifiers are a fixed prefix plus a random number. Two players drawing
//! the same number at the same time is unlikely but possible; no
//! cryptographic guarantee is made.

use rand::Rng;
use simonsays_proto::{PlayerId, ProtocolError};

/// Human-readable prefix of generated identifiers.
pub const PLAYER_ID_PREFIX: &str = "Player-";

/// Generated numbers are drawn uniformly from `0..PLAYER_NUMBER_RANGE`.
pub const PLAYER_NUMBER_RANGE: u32 = 100_000;

/// Generate a player identifier from `rng`.
pub fn generate_player_id<R: Rng + ?Sized>(rng: &mut R) -> PlayerId {
    let number = rng.gen_range(0..PLAYER_NUMBER_RANGE);
    PlayerId::numbered(PLAYER_ID_PREFIX, number)
}

/// Identity of the local player for one session attempt.
///
/// Created by the entry point and handed to the session at join time, so the
/// session itself stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    player_id: PlayerId,
}

impl PlayerIdentity {
    /// Identity with a freshly generated identifier from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { player_id: generate_player_id(rng) }
    }

    /// Identity with a generated identifier from the thread RNG.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Identity with a user-chosen name.
    pub fn named(name: &str) -> Result<Self, ProtocolError> {
        Ok(Self { player_id: PlayerId::new(name)? })
    }

    /// User-chosen name if it is usable, otherwise a generated identifier.
    pub fn named_or_random(name: Option<&str>) -> Self {
        match name.map(Self::named) {
            Some(Ok(identity)) => identity,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "unusable player name, generating one");
                Self::random()
            },
            None => Self::random(),
        }
    }

    /// Identifier sent with the join request.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }
}
