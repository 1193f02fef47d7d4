//! Dice-driven PvP, player-placed trap consumption, and the running combat log.

use serde::Serialize;
use slotmap::SlotMap;

use crate::map::Chamber;
use crate::player::Player;
use crate::rng::Roller;
use crate::types::PlayerId;

pub const STEAL_PERCENT: u32 = 25;
pub const ATTACK_DAMAGE: (u32, u32) = (10, 19);
pub const COUNTER_DAMAGE: (u32, u32) = (5, 12);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatKind {
    Trap,
    Pvp,
    Damage,
    Clash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombatLogEntry {
    pub kind: CombatKind,
    pub message: String,
    pub target: Option<String>,
    pub winner: Option<String>,
}

impl CombatLogEntry {
    fn new(kind: CombatKind, message: String) -> Self {
        Self { kind, message, target: None, winner: None }
    }

    fn target(mut self, name: &str) -> Self {
        self.target = Some(name.to_string());
        self
    }

    fn winner(mut self, name: &str) -> Self {
        self.winner = Some(name.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrapTrigger {
    pub owner: PlayerId,
    pub damage: i32,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PvpOutcome {
    AttackerWon { attack_roll: u32, defend_roll: u32, stolen: u32, damage: i32 },
    DefenderWon { attack_roll: u32, defend_roll: u32, damage: i32 },
    Clash { roll: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PvpReport {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub outcome: PvpOutcome,
    pub entries: Vec<CombatLogEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct CombatResolver {
    log: Vec<CombatLogEntry>,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Springs a trap owned by someone else and consumes it.
    pub fn check_player_traps(
        &mut self,
        chamber: &mut Chamber,
        player: &mut Player,
    ) -> Option<TrapTrigger> {
        if chamber.player_trap.as_ref().is_none_or(|trap| trap.owner == player.id) {
            return None;
        }
        let trap = chamber.player_trap.take()?;
        let damage = player.take_damage(trap.damage);
        player.traps_triggered += 1;
        let message = format!("{} (-{damage} HP)", trap.message);
        self.log.push(CombatLogEntry::new(CombatKind::Trap, message.clone()).target(&player.name));
        Some(TrapTrigger { owner: trap.owner, damage, message })
    }

    /// Attacker rolls first, then defender, then the loser's damage.
    pub fn pvp_encounter(
        &mut self,
        attacker: &mut Player,
        defender: &mut Player,
        roller: &mut impl Roller,
    ) -> PvpReport {
        let attack_roll = roller.roll_d20();
        let defend_roll = roller.roll_d20();
        let mut entries = Vec::new();

        let outcome = if attack_roll > defend_roll {
            let stolen = defender.remove_gold(defender.gold * STEAL_PERCENT / 100);
            if stolen > 0 {
                attacker.add_gold(stolen);
                entries.push(
                    CombatLogEntry::new(
                        CombatKind::Pvp,
                        format!(
                            "{} overpowers {} and steals {stolen} gold! ({attack_roll} vs {defend_roll})",
                            attacker.name, defender.name
                        ),
                    )
                    .winner(&attacker.name),
                );
            }
            let damage =
                defender.take_damage(roller.roll(ATTACK_DAMAGE.0, ATTACK_DAMAGE.1) as i32);
            entries.push(
                CombatLogEntry::new(
                    CombatKind::Damage,
                    format!("{} takes {damage} damage!", defender.name),
                )
                .target(&defender.name),
            );
            PvpOutcome::AttackerWon { attack_roll, defend_roll, stolen, damage }
        } else if defend_roll > attack_roll {
            let damage =
                attacker.take_damage(roller.roll(COUNTER_DAMAGE.0, COUNTER_DAMAGE.1) as i32);
            entries.push(
                CombatLogEntry::new(
                    CombatKind::Pvp,
                    format!(
                        "{} defends and counter-attacks {} for {damage} damage! ({defend_roll} vs {attack_roll})",
                        defender.name, attacker.name
                    ),
                )
                .winner(&defender.name)
                .target(&attacker.name),
            );
            PvpOutcome::DefenderWon { attack_roll, defend_roll, damage }
        } else {
            entries.push(CombatLogEntry::new(
                CombatKind::Clash,
                format!(
                    "{} and {} clash but neither gains ground! (Tied at {attack_roll})",
                    attacker.name, defender.name
                ),
            ));
            PvpOutcome::Clash { roll: attack_roll }
        };

        tracing::debug!(attacker = %attacker.name, defender = %defender.name, ?outcome, "pvp");
        self.log.extend(entries.iter().cloned());
        PvpReport { attacker: attacker.id, defender: defender.id, outcome, entries }
    }

    /// One encounter per other living player on the mover's tile, in arena order.
    /// Stops early once the mover falls.
    pub fn check_pvp_on_tile(
        &mut self,
        mover: PlayerId,
        players: &mut SlotMap<PlayerId, Player>,
        roller: &mut impl Roller,
    ) -> Vec<PvpReport> {
        let Some(origin) = players.get(mover).map(|player| player.pos) else {
            return Vec::new();
        };
        let opponents: Vec<PlayerId> = players
            .iter()
            .filter(|(id, other)| *id != mover && other.alive && other.pos == origin)
            .map(|(id, _)| id)
            .collect();

        let mut reports = Vec::new();
        for opponent in opponents {
            let Some([attacker, defender]) = players.get_disjoint_mut([mover, opponent]) else {
                continue;
            };
            if !attacker.alive {
                break;
            }
            reports.push(self.pvp_encounter(attacker, defender, roller));
        }
        reports
    }

    pub fn recent(&self, count: usize) -> &[CombatLogEntry] {
        &self.log[self.log.len().saturating_sub(count)..]
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Map, PlayerTrap};
    use crate::rng::ScriptedRoller;
    use crate::types::{Control, Item, ItemKind, Pos, Strategy};

    fn bot(id: PlayerId, name: &str, strategy: Strategy) -> Player {
        Player::new(id, name, "#FF4444", Control::Bot(strategy), 8)
    }

    fn arena() -> (SlotMap<PlayerId, Player>, PlayerId, PlayerId) {
        let mut players = SlotMap::with_key();
        let attacker = players.insert_with_key(|id| bot(id, "Red Rogue", Strategy::Aggressive));
        let defender =
            players.insert_with_key(|id| Player::new(id, "You", "#44AAFF", Control::Human, 8));
        (players, attacker, defender)
    }

    #[test]
    fn winning_roll_steals_a_quarter_of_gold_and_wounds() {
        let (mut players, a, d) = arena();
        players[d].add_gold(47);
        let [attacker, defender] = players.get_disjoint_mut([a, d]).unwrap();
        let mut resolver = CombatResolver::new();

        let mut roller = ScriptedRoller::new([20, 1, 13]);
        let report = resolver.pvp_encounter(attacker, defender, &mut roller);
        assert_eq!(
            report.outcome,
            PvpOutcome::AttackerWon { attack_roll: 20, defend_roll: 1, stolen: 11, damage: 13 }
        );
        assert_eq!(players[d].gold, 36);
        assert_eq!(players[a].gold, 11);
        assert_eq!(players[d].health, 87);
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn poor_defender_loses_no_gold_but_still_bleeds() {
        let (mut players, a, d) = arena();
        players[d].add_gold(3);
        let [attacker, defender] = players.get_disjoint_mut([a, d]).unwrap();
        let mut roller = ScriptedRoller::new([15, 4]);
        let report = CombatResolver::new().pvp_encounter(attacker, defender, &mut roller);
        let PvpOutcome::AttackerWon { stolen, damage, .. } = report.outcome else {
            panic!("attacker should win, got {:?}", report.outcome);
        };
        assert_eq!(stolen, 0);
        assert_eq!(damage, 10);
        assert_eq!(players[d].gold, 3);
        assert_eq!(report.entries.len(), 1);
    }

    #[test]
    fn defender_counter_attacks_on_higher_roll() {
        let (mut players, a, d) = arena();
        let [attacker, defender] = players.get_disjoint_mut([a, d]).unwrap();
        let mut roller = ScriptedRoller::new([3, 18, 12]);
        let report = CombatResolver::new().pvp_encounter(attacker, defender, &mut roller);
        assert_eq!(
            report.outcome,
            PvpOutcome::DefenderWon { attack_roll: 3, defend_roll: 18, damage: 12 }
        );
        assert_eq!(players[a].health, 88);
        assert_eq!(players[d].health, 100);
    }

    #[test]
    fn tie_is_a_clash_with_no_effect() {
        let (mut players, a, d) = arena();
        players[d].add_gold(40);
        let [attacker, defender] = players.get_disjoint_mut([a, d]).unwrap();
        let mut roller = ScriptedRoller::new([9, 9]);
        let report = CombatResolver::new().pvp_encounter(attacker, defender, &mut roller);
        assert_eq!(report.outcome, PvpOutcome::Clash { roll: 9 });
        assert_eq!(players[d].gold, 40);
        assert_eq!((players[a].health, players[d].health), (100, 100));
    }

    #[test]
    fn tile_check_fights_every_living_occupant() {
        let (mut players, a, d) = arena();
        let third = players.insert_with_key(|id| bot(id, "Blue Mage", Strategy::Cautious));
        let fourth = players.insert_with_key(|id| bot(id, "Gold Knight", Strategy::Balanced));
        players[fourth].alive = false;
        players[third].spawn(Pos::new(0, 0));
        players[d].spawn(Pos::new(0, 0));
        players[a].spawn(Pos::new(0, 0));

        let mut resolver = CombatResolver::new();
        let mut roller = ScriptedRoller::new([9, 9, 9, 9]);
        let reports = resolver.check_pvp_on_tile(a, &mut players, &mut roller);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|report| report.attacker == a && report.defender != fourth));
        assert_eq!(resolver.recent(1).len(), 1);
        assert_eq!(resolver.recent(10).len(), 2);
    }

    #[test]
    fn player_trap_spares_owner_and_fires_once_for_others() {
        let (mut players, owner, victim) = arena();
        players[victim].inventory.add(Item::of(ItemKind::Shield)).unwrap();
        let mut map = Map::new(3, 3);
        let chamber = map.chamber_mut(Pos::new(1, 1)).unwrap();
        chamber.player_trap =
            Some(PlayerTrap { owner, damage: 15, message: "A hidden trap snaps shut!".to_string() });

        let mut resolver = CombatResolver::new();
        assert_eq!(resolver.check_player_traps(chamber, &mut players[owner]), None);
        assert!(chamber.player_trap.is_some());

        let trigger = resolver.check_player_traps(chamber, &mut players[victim]).unwrap();
        assert_eq!(trigger.damage, 7);
        assert_eq!(players[victim].traps_triggered, 1);
        assert!(chamber.player_trap.is_none());
        assert_eq!(resolver.check_player_traps(chamber, &mut players[victim]), None);

        resolver.clear();
        assert!(resolver.is_empty());
    }
}
