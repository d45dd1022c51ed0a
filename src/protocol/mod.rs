//! Wire-facing message types
//!
//! The transport delivers raw text payloads; parsing happens inside the tick
//! loop and a malformed payload is discarded without touching player state.

use uuid::Uuid;

/// Errors from parsing an inbound control payload
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ControlParseError {
    #[error("expected 3 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("field {0} is not an integer")]
    BadField(usize),

    #[error("fire flag must be 0 or 1, got {0}")]
    BadFireFlag(i32),
}

/// A parsed per-player control tuple
///
/// Wire format: `rotationVelocity,forwardVelocity,fireFlag`. The client sends
/// -1/0/1 for the first two fields; larger values are clamped rather than
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInput {
    /// Turn input: -1 counterclockwise, 1 clockwise
    pub turn: i32,
    /// Throttle input: -1 forward (up key), 1 backward
    pub throttle: i32,
    /// Fire key held
    pub fire: bool,
}

impl ControlInput {
    pub fn parse(payload: &str) -> Result<Self, ControlParseError> {
        let fields: Vec<&str> = payload.split(',').collect();
        if fields.len() != 3 {
            return Err(ControlParseError::FieldCount(fields.len()));
        }

        let mut values = [0i32; 3];
        for (i, field) in fields.iter().enumerate() {
            values[i] = field
                .trim()
                .parse()
                .map_err(|_| ControlParseError::BadField(i))?;
        }

        let fire = match values[2] {
            0 => false,
            1 => true,
            other => return Err(ControlParseError::BadFireFlag(other)),
        };

        Ok(Self {
            turn: values[0].clamp(-1, 1),
            throttle: values[1].clamp(-1, 1),
            fire,
        })
    }
}

/// An element of an arena's inbound queue
///
/// Joins and leaves travel the same queue as control messages so that all
/// roster mutation happens on the arena's own tick task.
#[derive(Debug, Clone)]
pub enum ArenaMsg {
    /// A reserved slot joining the roster
    Join(Uuid),
    /// A player disconnecting or leaving
    Leave(Uuid),
    /// A raw control payload from a player
    Control { player: Uuid, text: String },
}
