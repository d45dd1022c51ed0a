//! Arena pool - creates match instances and routes players to them
//!
//! The transport layer holds a pool and uses it to place connecting players
//! into the first arena with room, forward their raw control payloads, and
//! pump outbound snapshots. Arenas recycle themselves; the pool consumes the
//! reset signal to drop stale player routes.

use std::time::Duration;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::arena::{Arena, ArenaHandle};
use crate::config::Config;

/// Handles to every arena instance plus player routing
pub struct ArenaPool {
    arenas: Vec<ArenaHandle>,
    /// Map of player -> arena index for message routing
    player_arenas: DashMap<Uuid, usize>,
}

impl ArenaPool {
    /// Build arenas from config and spawn one tick task per instance
    pub fn spawn(config: &Config) -> Self {
        let mut arenas = Vec::with_capacity(config.arena_count);
        let join_timeout = Duration::from_secs(config.join_timeout_secs);

        for _ in 0..config.arena_count {
            let id = Uuid::new_v4();
            let seed = rand::random::<u64>();
            let (arena, handle) = Arena::new(id, seed, config.max_players, join_timeout);
            tokio::spawn(arena.run());
            arenas.push(handle);
        }

        info!(arenas = arenas.len(), "Arena pool started");
        Self::from_handles(arenas)
    }

    /// Build a pool over externally driven arenas
    pub fn from_handles(arenas: Vec<ArenaHandle>) -> Self {
        Self {
            arenas,
            player_arenas: DashMap::new(),
        }
    }

    /// Assign a player to the first arena accepting players
    ///
    /// Returns the handle of the arena joined, or None if every instance is
    /// full or live.
    pub fn try_join(&self, player: Uuid) -> Option<ArenaHandle> {
        if self.player_arenas.contains_key(&player) {
            return None;
        }

        for (idx, handle) in self.arenas.iter().enumerate() {
            if handle.try_join(player) {
                self.player_arenas.insert(player, idx);
                info!(player = %player, arena_id = %handle.id, "Player assigned to arena");
                return Some(handle.clone());
            }
        }
        None
    }

    /// Remove a player from its arena; idempotent
    pub fn leave(&self, player: Uuid) {
        if let Some((_, idx)) = self.player_arenas.remove(&player) {
            self.arenas[idx].leave(player);
        }
    }

    /// Route a raw control payload to the player's arena
    pub fn send_control(&self, player: Uuid, text: impl Into<String>) -> bool {
        match self.player_arenas.get(&player) {
            Some(entry) => {
                self.arenas[*entry].send_control(player, text);
                true
            }
            None => false,
        }
    }

    /// Drain pending snapshots for one arena, for broadcast to its players
    ///
    /// Also consumes the arena's reset signal, dropping routes of players
    /// whose match has finished.
    pub fn drain_outbound(&self, arena_idx: usize) -> Vec<String> {
        let handle = &self.arenas[arena_idx];
        if handle.take_reset_signal() {
            self.player_arenas.retain(|_, idx| *idx != arena_idx);
            info!(arena_id = %handle.id, "Cleared player routes for recycled arena");
        }
        handle.drain_outbound()
    }

    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Total slots claimed across all arenas
    pub fn total_players(&self) -> usize {
        self.arenas.iter().map(|a| a.player_count()).sum()
    }

    pub fn handle(&self, arena_idx: usize) -> &ArenaHandle {
        &self.arenas[arena_idx]
    }
}
