//! Chamber grid, per-player fog of war, and move enumeration.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::types::{ChamberKind, Direction, Item, KeyId, PlayerId, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerTrap {
    pub owner: PlayerId,
    pub damage: i32,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chamber {
    pub pos: Pos,
    pub kind: ChamberKind,
    pub item: Option<Item>,
    pub required_key: Option<KeyId>,
    pub player_trap: Option<PlayerTrap>,
    explored: BTreeSet<PlayerId>,
}

impl Chamber {
    fn new(pos: Pos) -> Self {
        Self {
            pos,
            kind: ChamberKind::Empty,
            item: None,
            required_key: None,
            player_trap: None,
            explored: BTreeSet::new(),
        }
    }

    pub fn is_explored_by(&self, player: PlayerId) -> bool {
        self.explored.contains(&player)
    }

    /// Locked and still waiting for a key.
    pub fn is_blocking(&self) -> bool {
        self.kind == ChamberKind::Locked && self.required_key.is_some()
    }

    /// Clears a lock once its key has been used.
    pub fn unlock(&mut self) {
        self.kind = ChamberKind::Empty;
        self.required_key = None;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Move<'a> {
    pub target: Pos,
    pub direction: Direction,
    pub chamber: &'a Chamber,
    pub blocked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChamberView {
    pub pos: Pos,
    pub kind: ChamberKind,
    pub item: Option<Item>,
    pub explored: bool,
    pub own_trap: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapView {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<ChamberView>,
}

impl MapView {
    pub fn cell(&self, pos: Pos) -> Option<&ChamberView> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height
        {
            return None;
        }
        self.cells.get(pos.y as usize * self.width + pos.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    chambers: Vec<Chamber>,
    pub goal: Pos,
    pub spawns: Vec<Pos>,
}

impl Map {
    /// Every cell starts empty and unexplored. The goal defaults to the centre cell.
    pub fn new(width: usize, height: usize) -> Self {
        let mut chambers = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                chambers.push(Chamber::new(Pos::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            chambers,
            goal: Pos::new((width / 2) as i32, (height / 2) as i32),
            spawns: Vec::new(),
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.y as usize * self.width + pos.x as usize)
    }

    pub fn chamber(&self, pos: Pos) -> Option<&Chamber> {
        self.index(pos).map(|index| &self.chambers[index])
    }

    pub fn chamber_mut(&mut self, pos: Pos) -> Option<&mut Chamber> {
        self.index(pos).map(move |index| &mut self.chambers[index])
    }

    pub fn chambers(&self) -> impl Iterator<Item = &Chamber> {
        self.chambers.iter()
    }

    pub fn kind_at(&self, pos: Pos) -> Option<ChamberKind> {
        self.chamber(pos).map(|chamber| chamber.kind)
    }

    pub fn set_kind(&mut self, pos: Pos, kind: ChamberKind) {
        if let Some(chamber) = self.chamber_mut(pos) {
            chamber.kind = kind;
        }
    }

    pub fn count_kind(&self, kind: ChamberKind) -> usize {
        self.chambers.iter().filter(|chamber| chamber.kind == kind).count()
    }

    pub fn is_corner(&self, pos: Pos) -> bool {
        let right = self.width as i32 - 1;
        let bottom = self.height as i32 - 1;
        (pos.x == 0 || pos.x == right) && (pos.y == 0 || pos.y == bottom)
    }

    /// Cells within Chebyshev distance 1 of the goal.
    pub fn is_center_block(&self, pos: Pos) -> bool {
        pos.chebyshev(self.goal) <= 1
    }

    /// Marks every in-bounds cell within `radius` of `center` as explored by `player`.
    /// Returns how many cells were newly explored.
    pub fn reveal(&mut self, player: PlayerId, center: Pos, radius: i32) -> usize {
        let mut newly = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = Pos::new(center.x + dx, center.y + dy);
                if let Some(chamber) = self.chamber_mut(pos)
                    && chamber.explored.insert(player)
                {
                    newly += 1;
                }
            }
        }
        newly
    }

    pub fn is_explored(&self, player: PlayerId, pos: Pos) -> bool {
        self.chamber(pos).is_some_and(|chamber| chamber.is_explored_by(player))
    }

    pub fn explored_count(&self, player: PlayerId) -> usize {
        self.chambers.iter().filter(|chamber| chamber.is_explored_by(player)).count()
    }

    /// On-grid cardinal neighbours in north, south, east, west order.
    pub fn valid_moves(&self, pos: Pos) -> Vec<Move<'_>> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let target = pos.step(direction);
                self.chamber(target).map(|chamber| Move {
                    target,
                    direction,
                    chamber,
                    blocked: chamber.is_blocking(),
                })
            })
            .collect()
    }

    /// Fog-filtered copy: unexplored cells read as unknown and expose no item.
    pub fn visible_view(&self, player: PlayerId) -> MapView {
        let cells = self
            .chambers
            .iter()
            .map(|chamber| {
                let explored = chamber.is_explored_by(player);
                ChamberView {
                    pos: chamber.pos,
                    kind: if explored { chamber.kind } else { ChamberKind::Unknown },
                    item: if explored { chamber.item } else { None },
                    explored,
                    own_trap: chamber.player_trap.as_ref().is_some_and(|trap| trap.owner == player),
                }
            })
            .collect();
        MapView { width: self.width, height: self.height, cells }
    }

    /// Breadth-first reachability over 4-directional adjacency.
    /// `from` is always entered; every other cell must satisfy `passable`.
    pub fn path_exists(&self, from: Pos, to: Pos, passable: impl Fn(&Chamber) -> bool) -> bool {
        let Some(start) = self.index(from) else {
            return false;
        };
        if !self.in_bounds(to) {
            return false;
        }
        let mut seen = vec![false; self.chambers.len()];
        seen[start] = true;
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for direction in Direction::ALL {
                let next = current.step(direction);
                let Some(index) = self.index(next) else {
                    continue;
                };
                if seen[index] || !passable(&self.chambers[index]) {
                    continue;
                }
                seen[index] = true;
                queue.push_back(next);
            }
        }
        false
    }
}
