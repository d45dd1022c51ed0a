//! Snapshot building
//!
//! One ASCII string per tick, four `/`-separated sections: players, walls,
//! bombs, projectiles. Positions round to the nearest integer for
//! transmission; rotations are already-normalized integer degrees.

use crate::entities::{Bomb, BombPhase, Player, Projectile, Wall};

/// Token occupying the bomb section when no bombs exist, so the
/// slash-delimited structure never collapses
const EMPTY_SECTION: &str = "-";

/// Build the per-tick broadcast snapshot
pub fn build(players: &[Player], walls: &[Wall], bombs: &[Bomb], projectiles: &[Projectile]) -> String {
    let player_section = players
        .iter()
        .filter(|p| p.alive)
        .map(|p| {
            format!(
                "{},{},{},{}",
                p.color,
                round(p.x),
                round(p.y),
                p.rotation
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    let wall_section = walls
        .iter()
        .map(|w| format!("{},{},{}", round(w.x), round(w.y), w.rotation))
        .collect::<Vec<_>>()
        .join(",");

    let bomb_section = if bombs.is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        bombs
            .iter()
            .map(|b| {
                let warning = if b.phase == BombPhase::Warning { 1 } else { 0 };
                format!("{},{},{},{}", round(b.x), round(b.y), round(b.radius), warning)
            })
            .collect::<Vec<_>>()
            .join(",")
    };

    let projectile_section = projectiles
        .iter()
        .map(|p| format!("{},{}", round(p.x), round(p.y)))
        .collect::<Vec<_>>()
        .join(",");

    format!("{player_section}/{wall_section}/{bomb_section}/{projectile_section}")
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlayerColor;
    use uuid::Uuid;

    #[test]
    fn snapshot_has_four_sections() {
        let snapshot = build(&[], &[], &[], &[]);
        assert_eq!(snapshot.split('/').count(), 4);
    }

    #[test]
    fn empty_bomb_section_uses_placeholder() {
        let snapshot = build(&[], &[], &[], &[]);
        let sections: Vec<&str> = snapshot.split('/').collect();
        assert_eq!(sections[2], EMPTY_SECTION);
    }

    #[test]
    fn player_groups_round_positions() {
        let mut player = Player::new(Uuid::new_v4(), PlayerColor::Blue);
        player.x = 100.6;
        player.y = 99.4;
        player.rotation = 270;

        let snapshot = build(&[player], &[], &[], &[]);
        let sections: Vec<&str> = snapshot.split('/').collect();
        assert_eq!(sections[0], "blue,101,99,270");
    }

    #[test]
    fn dead_players_are_omitted() {
        let alive = Player::new(Uuid::new_v4(), PlayerColor::Blue);
        let mut dead = Player::new(Uuid::new_v4(), PlayerColor::Green);
        dead.alive = false;

        let snapshot = build(&[alive, dead], &[], &[], &[]);
        let sections: Vec<&str> = snapshot.split('/').collect();
        assert!(sections[0].starts_with("blue"));
        assert!(!sections[0].contains("green"));
    }

    #[test]
    fn bomb_groups_carry_warning_flag() {
        let mut armed = Bomb::new(90.0, 300.0);
        armed.phase = BombPhase::Detonated;
        armed.radius = 25.5;
        let warning = Bomb::new(870.0, 300.0);

        let snapshot = build(&[], &[], &[armed, warning], &[]);
        let sections: Vec<&str> = snapshot.split('/').collect();
        assert_eq!(sections[2], "90,300,26,0,870,300,10,1");
    }

    #[test]
    fn wall_and_projectile_groups_are_flat_lists() {
        let wall = Wall::new(210.0, 500.0);
        let mut shooter = Player::new(Uuid::new_v4(), PlayerColor::Red);
        shooter.x = 480.0;
        shooter.y = 320.0;
        let projectile = Projectile::new(&shooter);

        let snapshot = build(&[], &[wall], &[], &[projectile]);
        let sections: Vec<&str> = snapshot.split('/').collect();
        assert_eq!(sections[1], "210,500,45");
        assert_eq!(sections[3], "480,270");
    }
}
