//! Arena state and authoritative tick loop
//!
//! An arena is one independent match instance. It owns every entity in its
//! match and advances them on a fixed 25 ms tick. The only structures shared
//! with other tasks are the inbound/outbound queues behind a single lock and
//! a few atomics; simulation state is touched exclusively by the arena's own
//! task.

pub mod bombs;
pub mod snapshot;
pub mod walls;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collision::{Collisions, SegmentHit};
use crate::entities::{Player, PlayerColor, Projectile, Wall, WallPhase};
use crate::geom::{self, Point, Polygon, Vect};
use crate::protocol::{ArenaMsg, ControlInput};
use crate::util::time::tick_duration;

use bombs::BombManager;
use walls::WallManager;

/// Dimensions of the game screen
pub const SCREEN_WIDTH: f64 = 960.0;
pub const SCREEN_HEIGHT: f64 = 640.0;

/// Maximum number of players allowed in an arena
pub const MAX_PLAYERS: usize = 4;

/// Substeps per player movement tick; equals pixels moved at full throttle
const SUBSTEPS: u32 = 5;

/// Combined radius for projectile-vs-wall segment tests
const WALL_HIT_RADIUS: f64 = Projectile::RADIUS + Wall::WIDTH / 2.0;

/// Snapshots retained while the transport is not draining
const OUTBOUND_CAP: usize = 256;

/// Match instance lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaState {
    /// Gathering players up to the cap or the join timeout
    AcceptingPlayers,
    /// Match in progress
    Active,
    /// Match over, teardown pending
    Ended,
    /// Recycling for the next match
    Resetting,
}

#[derive(Debug, Default)]
struct ArenaQueues {
    inbound: VecDeque<ArenaMsg>,
    outbound: VecDeque<String>,
}

/// State shared between the arena task and external producers
#[derive(Debug)]
struct ArenaShared {
    /// The single per-instance lock over both queues
    queues: Mutex<ArenaQueues>,
    accepting: AtomicBool,
    /// Slots claimed by `try_join`, including joins not yet drained
    reserved: AtomicUsize,
    /// Set when the arena finishes recycling; consumed by the pool
    reset_signal: AtomicBool,
    max_players: usize,
}

/// Handle to a running arena, held by the pool and the transport
#[derive(Clone)]
pub struct ArenaHandle {
    pub id: Uuid,
    shared: Arc<ArenaShared>,
}

impl ArenaHandle {
    /// Try to claim a slot for a player; false if full or not accepting
    pub fn try_join(&self, player: Uuid) -> bool {
        let mut queues = self.shared.queues.lock();

        if !self.shared.accepting.load(Ordering::Acquire) {
            return false;
        }
        let reserved = self.shared.reserved.load(Ordering::Acquire);
        if reserved >= self.shared.max_players {
            return false;
        }

        self.shared.reserved.store(reserved + 1, Ordering::Release);
        if reserved + 1 >= self.shared.max_players {
            self.shared.accepting.store(false, Ordering::Release);
        }
        queues.inbound.push_back(ArenaMsg::Join(player));
        true
    }

    /// Remove a player mid-match; safe to call repeatedly
    pub fn leave(&self, player: Uuid) {
        self.shared
            .queues
            .lock()
            .inbound
            .push_back(ArenaMsg::Leave(player));
    }

    /// Enqueue a raw control payload from a player
    pub fn send_control(&self, player: Uuid, text: impl Into<String>) {
        self.shared.queues.lock().inbound.push_back(ArenaMsg::Control {
            player,
            text: text.into(),
        });
    }

    /// Pop the oldest pending snapshot
    pub fn pop_outbound(&self) -> Option<String> {
        self.shared.queues.lock().outbound.pop_front()
    }

    /// Drain every pending snapshot
    pub fn drain_outbound(&self) -> Vec<String> {
        self.shared.queues.lock().outbound.drain(..).collect()
    }

    pub fn is_accepting(&self) -> bool {
        self.shared.accepting.load(Ordering::Acquire)
    }

    pub fn player_count(&self) -> usize {
        self.shared.reserved.load(Ordering::Acquire)
    }

    /// Consume the recycled-arena signal, if raised
    pub fn take_reset_signal(&self) -> bool {
        self.shared.reset_signal.swap(false, Ordering::AcqRel)
    }
}

/// The authoritative match instance
pub struct Arena {
    id: Uuid,
    state: ArenaState,

    /// Roster in join order; dead players stay, flagged, until teardown
    players: Vec<Player>,
    projectiles: Vec<Projectile>,
    walls: WallManager,
    bombs: BombManager,

    rng: ChaCha8Rng,
    shared: Arc<ArenaShared>,

    join_timeout: Duration,
    join_deadline: Instant,

    tick: u64,
}

impl Arena {
    /// Create a new arena and its shared handle
    pub fn new(id: Uuid, seed: u64, max_players: usize, join_timeout: Duration) -> (Self, ArenaHandle) {
        let max_players = max_players.clamp(1, MAX_PLAYERS);
        let shared = Arc::new(ArenaShared {
            queues: Mutex::default(),
            accepting: AtomicBool::new(true),
            reserved: AtomicUsize::new(0),
            reset_signal: AtomicBool::new(false),
            max_players,
        });
        let handle = ArenaHandle {
            id,
            shared: shared.clone(),
        };

        let arena = Self {
            id,
            state: ArenaState::AcceptingPlayers,
            players: Vec::new(),
            projectiles: Vec::new(),
            walls: WallManager::new(),
            bombs: BombManager::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            shared,
            join_timeout,
            join_deadline: Instant::now() + join_timeout,
            tick: 0,
        };

        (arena, handle)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ArenaState {
        self.state
    }

    /// Players in the roster, live and dead
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Players still alive
    pub fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Run the fixed-tick loop forever, recycling between matches
    ///
    /// The interval's default missed-tick behavior advances the reference
    /// deadline by exactly one period per tick, so a slow frame is paid back
    /// instead of accumulating drift.
    pub async fn run(mut self) {
        info!(arena_id = %self.id, "Arena task started");

        let mut tick_interval = interval(tick_duration());
        loop {
            tick_interval.tick().await;
            self.step();
        }
    }

    /// Advance the state machine by one frame
    pub fn step(&mut self) {
        match self.state {
            ArenaState::AcceptingPlayers => self.step_accepting(),
            ArenaState::Active => self.run_tick(),
            ArenaState::Ended => {
                self.teardown();
                self.state = ArenaState::Resetting;
            }
            ArenaState::Resetting => self.reset_for_next_match(),
        }
    }

    /// One frame of the pre-match gathering phase
    fn step_accepting(&mut self) {
        let messages = self.drain_inbound();
        self.process_lobby_messages(messages);

        let cap_reached = self.players.len() >= self.shared.max_players;
        if !cap_reached && Instant::now() < self.join_deadline {
            return;
        }

        // close joins and admit any straggler already queued
        let stragglers: Vec<ArenaMsg> = {
            let mut queues = self.shared.queues.lock();
            self.shared.accepting.store(false, Ordering::Release);
            queues.inbound.drain(..).collect()
        };
        self.process_lobby_messages(stragglers);

        self.setup();
    }

    /// Get everything initialized right before the game loop begins
    fn setup(&mut self) {
        self.init_player_positions();
        self.state = ArenaState::Active;
        info!(
            arena_id = %self.id,
            players = self.players.len(),
            "Match started"
        );

        // first snapshot shows the starting positions
        self.push_snapshot();
    }

    /// Give every player a random starting position clear of the others and
    /// of the wall layout
    fn init_player_positions(&mut self) {
        let half_w = Player::WIDTH / 2.0;
        let half_h = Player::HEIGHT / 2.0;

        for i in 0..self.players.len() {
            loop {
                let x = self.rng.gen_range(half_w..SCREEN_WIDTH - half_w);
                let y = self.rng.gen_range(half_h..SCREEN_HEIGHT - half_h);

                let near_player = self.players[..i].iter().any(|other| {
                    (x - other.x).abs() <= Player::WIDTH && (y - other.y).abs() <= Player::HEIGHT
                });
                if near_player {
                    continue;
                }

                let body = Polygon::rect(Point::new(x, y), Player::WIDTH, Player::HEIGHT, 0);
                if self
                    .walls
                    .walls
                    .iter()
                    .any(|w| Collisions::polygon_collision(&body, &w.body))
                {
                    continue;
                }

                let player = &mut self.players[i];
                player.x = x;
                player.y = y;
                player.rotation = 0;
                player.reset_temp_vars();
                player.update_body();
                break;
            }
        }
    }

    /// One simulation tick of an active match
    fn run_tick(&mut self) {
        self.tick += 1;

        let messages = self.drain_inbound();
        self.process_messages(messages);

        self.update_player_positions();
        self.update_projectiles();
        self.update_walls();
        self.bombs.tick(&mut self.rng);

        self.push_snapshot();
        self.check_end_condition();
    }

    /// Drain the inbound queue under the instance lock
    fn drain_inbound(&self) -> Vec<ArenaMsg> {
        self.shared.queues.lock().inbound.drain(..).collect()
    }

    /// Handle queued joins and leaves while gathering players
    fn process_lobby_messages(&mut self, messages: Vec<ArenaMsg>) {
        for msg in messages {
            match msg {
                ArenaMsg::Join(id) => self.admit_player(id),
                ArenaMsg::Leave(id) => {
                    if let Some(pos) = self.players.iter().position(|p| p.id == id) {
                        let player = self.players.remove(pos);
                        self.shared.reserved.fetch_sub(1, Ordering::AcqRel);
                        info!(
                            arena_id = %self.id,
                            color = %player.color,
                            "Player left before start"
                        );
                    }
                }
                // control input is meaningless until the match starts
                ArenaMsg::Control { .. } => {}
            }
        }
    }

    /// Add a joining player to the roster with the next unused color
    fn admit_player(&mut self, id: Uuid) {
        let color = PlayerColor::PALETTE
            .iter()
            .copied()
            .find(|c| !self.players.iter().any(|p| p.color == *c));
        let Some(color) = color else {
            warn!(arena_id = %self.id, player = %id, "No free color, rejecting join");
            self.shared.reserved.fetch_sub(1, Ordering::AcqRel);
            return;
        };

        self.players.push(Player::new(id, color));
        info!(
            arena_id = %self.id,
            player = %id,
            %color,
            players = self.players.len(),
            "Player joined arena"
        );
    }

    /// Handle queued messages during an active match
    fn process_messages(&mut self, messages: Vec<ArenaMsg>) {
        for msg in messages {
            match msg {
                ArenaMsg::Join(id) => {
                    // joins are closed before the match goes active
                    warn!(arena_id = %self.id, player = %id, "Join ignored on live match");
                    self.shared.reserved.fetch_sub(1, Ordering::AcqRel);
                }
                ArenaMsg::Leave(id) => self.eliminate_on_leave(id),
                ArenaMsg::Control { player, text } => self.apply_control(player, &text),
            }
        }
    }

    /// Parse and apply a control payload; malformed payloads are discarded
    /// and leave the player's control state unchanged
    fn apply_control(&mut self, player: Uuid, text: &str) {
        let input = match ControlInput::parse(text) {
            Ok(input) => input,
            Err(err) => {
                debug!(
                    arena_id = %self.id,
                    player = %player,
                    error = %err,
                    "Discarding malformed control payload"
                );
                return;
            }
        };

        if let Some(p) = self.players.iter_mut().find(|p| p.id == player && p.alive) {
            p.apply_control(&input);
        }
    }

    /// A disconnect mid-match counts as a forced elimination
    fn eliminate_on_leave(&mut self, id: Uuid) {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            if player.alive {
                player.alive = false;
                player.disconnected = true;
                info!(
                    arena_id = %self.id,
                    color = %player.color,
                    "Player disconnected, eliminated"
                );
            }
        }
    }

    /// Move every live player through its substeps, halting on the first
    /// blocked candidate, then fire queued shots
    fn update_player_positions(&mut self) {
        for i in 0..self.players.len() {
            if !self.players[i].alive {
                continue;
            }
            self.players[i].reset_temp_vars();

            for _ in 0..SUBSTEPS {
                let (cand_x, cand_y, cand_rot) = {
                    let p = &self.players[i];
                    let rot = geom::normalize_deg(p.new_rotation + p.rotation_vel);
                    let theta = f64::from(rot).to_radians();
                    let step = p.vel / f64::from(SUBSTEPS);
                    (
                        p.new_x + step * theta.sin(),
                        p.new_y - step * theta.cos(),
                        rot,
                    )
                };
                let body = Polygon::rect(
                    Point::new(cand_x, cand_y),
                    Player::WIDTH,
                    Player::HEIGHT,
                    cand_rot,
                );

                if Self::out_of_bounds(&body) {
                    break;
                }

                let players = &self.players;
                if players.iter().enumerate().any(|(j, other)| {
                    j != i && other.alive && Collisions::polygon_collision(&body, &other.body)
                }) {
                    break;
                }

                if self
                    .walls
                    .walls
                    .iter()
                    .any(|w| Collisions::polygon_collision(&body, &w.body))
                {
                    break;
                }

                let bomb_hit = self.bombs.bombs.iter().any(|b| {
                    b.is_armed()
                        && Collisions::circle_rect_collision(Point::new(b.x, b.y), b.radius, &body)
                });
                if bomb_hit {
                    let player = &mut self.players[i];
                    player.alive = false;
                    info!(
                        arena_id = %self.id,
                        color = %player.color,
                        "Player eliminated by bomb"
                    );
                    break;
                }

                let player = &mut self.players[i];
                player.new_x = cand_x;
                player.new_y = cand_y;
                player.new_rotation = cand_rot;
            }

            let player = &mut self.players[i];
            player.commit_move();
            player.update_body();
        }

        self.fire_projectiles();
    }

    /// Spawn a projectile for every fire-ready player holding the fire key
    fn fire_projectiles(&mut self) {
        let mut fired = Vec::new();
        for player in &mut self.players {
            if player.alive && player.shoot_intent && player.ready_to_shoot {
                fired.push(Projectile::new(player));
                player.ready_to_shoot = false;
                debug!(arena_id = %self.id, color = %player.color, "Projectile fired");
            }
        }
        self.projectiles.extend(fired);
    }

    /// Advance every projectile through its substeps and resolve hits
    fn update_projectiles(&mut self) {
        let mut destroyed: Vec<usize> = Vec::new();

        for idx in 0..self.projectiles.len() {
            let mut proj = self.projectiles[idx];
            let mut survived = true;

            'substeps: for _ in 0..Projectile::SPEED {
                proj.x += proj.vel.x;
                proj.y += proj.vel.y;

                // elastic bounce off the arena boundary
                if proj.x - Projectile::RADIUS < 0.0 || proj.x + Projectile::RADIUS > SCREEN_WIDTH {
                    proj.vel.x = -proj.vel.x;
                }
                if proj.y - Projectile::RADIUS < 0.0 || proj.y + Projectile::RADIUS > SCREEN_HEIGHT {
                    proj.vel.y = -proj.vel.y;
                }

                let center = Point::new(proj.x, proj.y);

                for wall in &self.walls.walls {
                    let (p1, p2) = wall.segment();
                    match Collisions::segment_circle_hit(p1, p2, center, WALL_HIT_RADIUS) {
                        SegmentHit::Endpoint => {
                            // spike tips destroy
                            survived = false;
                            break 'substeps;
                        }
                        SegmentHit::Interior => {
                            let dir = Vect::new(p2.x - p1.x, p2.y - p1.y);
                            let normal = Vect::new(dir.y, -dir.x).normalized();
                            let side = Vect::new(center.x - p1.x, center.y - p1.y).dot(normal);
                            // deflect only a projectile moving into the wall,
                            // not one still leaving the contact radius
                            if side * proj.vel.dot(normal) < 0.0 {
                                proj.vel = Collisions::reflect(proj.vel, dir);
                                proj.ticks_since_deflection = 0;
                            }
                        }
                        SegmentHit::Miss => {}
                    }
                }

                let mut hit_player: Option<usize> = None;
                for (pi, player) in self.players.iter().enumerate() {
                    if !player.alive {
                        continue;
                    }
                    if !Collisions::circle_rect_collision(center, Projectile::RADIUS, &player.body)
                    {
                        continue;
                    }
                    // a fresh projectile cannot strike its own shooter
                    if proj.age <= Projectile::SELF_IMMUNITY_TICKS && player.color == proj.color {
                        continue;
                    }
                    hit_player = Some(pi);
                    break;
                }
                if let Some(pi) = hit_player {
                    let victim = &mut self.players[pi];
                    victim.alive = false;
                    info!(
                        arena_id = %self.id,
                        color = %victim.color,
                        by = %proj.color,
                        "Player eliminated by projectile"
                    );
                    survived = false;
                    break 'substeps;
                }
            }

            if survived {
                proj.age += 1;
                proj.ticks_since_deflection += 1;
                self.projectiles[idx] = proj;
            } else {
                destroyed.push(idx);
            }
        }

        // remove destroyed projectiles in reverse to keep indices stable
        for idx in destroyed.into_iter().rev() {
            self.projectiles.remove(idx);
        }
    }

    /// Drive wall promotion and rotation, blocking increments that would
    /// overlap a live player or a projectile
    fn update_walls(&mut self) {
        self.walls.tick_promotions(&mut self.rng);

        for wall in &mut self.walls.walls {
            if wall.phase != WallPhase::Rotating {
                continue;
            }

            let next = geom::normalize_deg(wall.rotation + wall.rotation_vel);
            let body = Wall::body_at(wall.x, wall.y, next);
            let (p1, p2) = wall.segment_at(next);

            let blocks_player = self
                .players
                .iter()
                .any(|p| p.alive && Collisions::polygon_collision(&body, &p.body));
            let blocks_projectile = self.projectiles.iter().any(|proj| {
                Collisions::segment_circle_hit(p1, p2, Point::new(proj.x, proj.y), WALL_HIT_RADIUS)
                    != SegmentHit::Miss
            });

            wall.can_rotate = !(blocks_player || blocks_projectile);
        }

        self.walls.advance_rotations();
    }

    /// End the match on the tick that leaves at most one live player
    fn check_end_condition(&mut self) {
        if self.live_count() <= 1 {
            let winner = self
                .players
                .iter()
                .find(|p| p.alive)
                .map(|p| p.color.as_str())
                .unwrap_or("none");
            info!(arena_id = %self.id, winner, ticks = self.tick, "Match ended");
            self.state = ArenaState::Ended;
        }
    }

    /// Serialize the world and append it to the outbound queue
    fn push_snapshot(&self) {
        let snapshot = snapshot::build(
            &self.players,
            &self.walls.walls,
            &self.bombs.bombs,
            &self.projectiles,
        );

        let mut queues = self.shared.queues.lock();
        queues.outbound.push_back(snapshot);
        // drop the oldest snapshots if the transport stalls
        while queues.outbound.len() > OUTBOUND_CAP {
            queues.outbound.pop_front();
        }
    }

    /// Drain both queues and free every entity; idempotent
    ///
    /// Holds the instance lock for the whole duration so no producer observes
    /// a half-cleared arena.
    fn teardown(&mut self) {
        let mut queues = self.shared.queues.lock();
        queues.inbound.clear();
        queues.outbound.clear();

        self.projectiles.clear();
        self.walls.reset();
        self.bombs.reset();
        self.players.clear();
    }

    /// Reset counters and flags, signal the pool, and accept players again
    fn reset_for_next_match(&mut self) {
        let _queues = self.shared.queues.lock();

        self.tick = 0;
        self.join_deadline = Instant::now() + self.join_timeout;
        self.shared.reserved.store(0, Ordering::Release);
        self.shared.accepting.store(true, Ordering::Release);
        self.shared.reset_signal.store(true, Ordering::Release);
        self.state = ArenaState::AcceptingPlayers;

        info!(arena_id = %self.id, "Arena reset, accepting players");
    }

    fn out_of_bounds(body: &Polygon) -> bool {
        body.points.iter().any(|p| {
            p.x < 0.0 || p.x > SCREEN_WIDTH || p.y < 0.0 || p.y > SCREEN_HEIGHT
        })
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // cleanup must run even if the match was live
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bomb, BombPhase};

    const SQRT_HALF: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn start_match(cap: usize, joins: usize) -> (Arena, ArenaHandle, Vec<Uuid>) {
        let (mut arena, handle) = Arena::new(Uuid::new_v4(), 42, cap, Duration::from_secs(60));
        let ids: Vec<Uuid> = (0..joins).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            assert!(handle.try_join(*id));
        }
        arena.step();
        assert_eq!(arena.state(), ArenaState::Active);
        (arena, handle, ids)
    }

    fn place(arena: &mut Arena, idx: usize, x: f64, y: f64, rotation: i32) {
        let player = &mut arena.players[idx];
        player.x = x;
        player.y = y;
        player.rotation = rotation;
        player.vel = 0.0;
        player.rotation_vel = 0;
        player.reset_temp_vars();
        player.update_body();
    }

    #[test]
    fn forward_movement_matches_trig_substeps() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 100.0, 100.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);
        arena.players[0].vel = 10.0;

        arena.step();

        // five substeps of -2 along y
        assert!((arena.players[0].x - 100.0).abs() < 1e-9);
        assert!((arena.players[0].y - 90.0).abs() < 1e-9);
    }

    #[test]
    fn substeps_halt_at_the_arena_boundary() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 100.0, 52.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);
        arena.players[0].vel = 10.0;

        arena.step();

        // one substep fits before a corner would leave the arena
        assert!((arena.players[0].y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn live_players_never_overlap_after_a_tick() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 300.0, 320.0, 90);
        place(&mut arena, 1, 405.0, 320.0, 270);
        arena.players[0].vel = 10.0;
        arena.players[1].vel = 10.0;

        arena.step();

        assert!(!Collisions::polygon_collision(
            &arena.players[0].body,
            &arena.players[1].body,
        ));
    }

    #[test]
    fn warning_bomb_never_eliminates() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);
        arena.bombs.bombs.push(Bomb::new(480.0, 320.0));

        arena.step();

        assert!(arena.players[0].alive);
        assert_eq!(arena.state(), ArenaState::Active);
    }

    #[test]
    fn detonated_bomb_eliminates_on_contact() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);
        let mut bomb = Bomb::new(480.0, 320.0);
        bomb.phase = BombPhase::Detonated;
        arena.bombs.bombs.push(bomb);

        arena.step();

        assert!(!arena.players[0].alive);
    }

    #[test]
    fn wall_rotation_blocked_by_player() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 210.0, 500.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);
        arena.walls.walls[0].start_rotating(1);

        arena.step();
        assert_eq!(arena.walls.walls[0].rotation, Wall::INITIAL_ROTATION);

        // clear the blockage and the wall resumes
        place(&mut arena, 0, 480.0, 320.0, 0);
        arena.step();
        assert_eq!(arena.walls.walls[0].rotation, Wall::INITIAL_ROTATION + 1);
    }

    #[test]
    fn projectile_deflects_off_wall_interior() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);

        // aimed square at the middle of the wall at (210, 500), 40 px out
        // along the wall normal
        let mut proj = Projectile::new(&arena.players[0]);
        proj.x = 210.0 + 40.0 * SQRT_HALF;
        proj.y = 500.0 + 40.0 * SQRT_HALF;
        proj.vel = Vect::new(-SQRT_HALF, -SQRT_HALF);
        proj.age = 5;
        arena.projectiles.push(proj);

        arena.step();
        arena.step();

        assert_eq!(arena.projectiles.len(), 1);
        let after = arena.projectiles[0];
        // normal component flipped: now moving away from the wall line
        assert!(after.vel.x > 0.0);
        assert!(after.vel.y > 0.0);
    }

    #[test]
    fn projectile_destroyed_at_wall_endpoint() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);

        // approaching the spike tip of the wall at (210, 500) head-on
        let reach = Wall::HEIGHT / 2.0 + Wall::SPIKE_HEIGHT + 40.0;
        let mut proj = Projectile::new(&arena.players[0]);
        proj.x = 210.0 + reach * SQRT_HALF;
        proj.y = 500.0 - reach * SQRT_HALF;
        proj.vel = Vect::new(-SQRT_HALF, SQRT_HALF);
        proj.age = 5;
        arena.projectiles.push(proj);

        arena.step();
        arena.step();

        assert!(arena.projectiles.is_empty());
    }

    #[test]
    fn fresh_projectile_spares_its_shooter() {
        let (mut arena, _handle, _) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);

        let mut proj = Projectile::new(&arena.players[0]);
        proj.x = 480.0;
        proj.y = 320.0;
        proj.vel = Vect::new(0.0, -1.0);
        arena.projectiles.push(proj);

        // ages 0..=2 are inside the self-immunity window
        for _ in 0..3 {
            arena.step();
            assert!(arena.players[0].alive);
        }

        // the window closes; the literal rule lets the shot connect
        arena.step();
        assert!(!arena.players[0].alive);
    }

    #[test]
    fn match_ends_on_the_tick_the_live_set_shrinks_to_one() {
        let (mut arena, handle, ids) = start_match(2, 2);
        place(&mut arena, 0, 300.0, 320.0, 0);
        place(&mut arena, 1, 600.0, 320.0, 0);

        let mut proj = Projectile::new(&arena.players[0]);
        proj.x = 600.0;
        proj.y = 255.0;
        proj.vel = Vect::new(0.0, 1.0);
        proj.age = 10;
        arena.projectiles.push(proj);

        arena.step();

        assert!(!arena.players[1].alive);
        assert_eq!(arena.live_count(), 1);
        assert_eq!(arena.state(), ArenaState::Ended);
        assert!(arena.projectiles.is_empty());

        // teardown and recycle back to accepting
        arena.step();
        assert_eq!(arena.state(), ArenaState::Resetting);
        arena.step();
        assert_eq!(arena.state(), ArenaState::AcceptingPlayers);
        assert_eq!(arena.num_players(), 0);
        assert!(handle.is_accepting());
        assert!(handle.try_join(ids[0]));
    }

    #[test]
    fn fire_latch_spawns_one_projectile_per_press() {
        let (mut arena, handle, ids) = start_match(2, 2);
        place(&mut arena, 0, 480.0, 320.0, 0);
        place(&mut arena, 1, 700.0, 320.0, 0);

        handle.send_control(ids[0], "0,0,1");
        arena.step();
        assert_eq!(arena.projectiles.len(), 1);

        // holding the key must not fire again
        for _ in 0..3 {
            handle.send_control(ids[0], "0,0,1");
            arena.step();
            assert_eq!(arena.projectiles.len(), 1);
        }

        // release rearms the latch
        handle.send_control(ids[0], "0,0,0");
        arena.step();
        handle.send_control(ids[0], "0,0,1");
        arena.step();
        assert_eq!(arena.projectiles.len(), 2);
    }

    #[test]
    fn disconnect_is_a_forced_elimination() {
        let (mut arena, handle, ids) = start_match(3, 3);
        place(&mut arena, 0, 150.0, 320.0, 0);
        place(&mut arena, 1, 480.0, 320.0, 0);
        place(&mut arena, 2, 800.0, 320.0, 0);

        handle.leave(ids[1]);
        // repeated leaves are idempotent
        handle.leave(ids[1]);
        arena.step();

        assert_eq!(arena.num_players(), 3);
        assert_eq!(arena.live_count(), 2);
        assert!(arena.players[1].disconnected);
        assert_eq!(arena.state(), ArenaState::Active);
    }
}
