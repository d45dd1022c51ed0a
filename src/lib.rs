//! Arena Game Server - authoritative simulation core
//!
//! Owns per-match world state and advances it on a fixed 25 ms tick:
//! substepped player movement, deflecting projectiles, rotating spiked walls,
//! and area-denial bombs. Each match instance runs on its own task and shares
//! only its inbound/outbound message queues with the outside world; the wire
//! transport is an external collaborator that talks to the [`pool`] and
//! [`arena`] handles.

pub mod arena;
pub mod collision;
pub mod config;
pub mod entities;
pub mod geom;
pub mod pool;
pub mod protocol;
pub mod util;
