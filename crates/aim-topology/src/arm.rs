//! Approach arms, movement groups, and routes.
//!
//! The four arms are named after the compass-style directions a vehicle
//! approaches *from*, in right-hand cyclic order: the arm to the right of
//! `Down` is `Right`, and so on around the junction.  That order is load
//! bearing — right-of-way arbitration and right-turn classification both
//! derive from it.

use std::fmt;
use std::str::FromStr;

use crate::{TopologyError, TopologyResult};

// ── Arm ───────────────────────────────────────────────────────────────────────

/// One of the four incoming approaches, in right-hand cyclic order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arm {
    Down  = 0,
    Right = 1,
    Up    = 2,
    Left  = 3,
}

impl Arm {
    /// All arms in right-hand cyclic order.
    pub const ALL: [Arm; 4] = [Arm::Down, Arm::Right, Arm::Up, Arm::Left];

    /// Position in the cyclic order, usable as an array index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The arm immediately to this arm's right.
    ///
    /// A vehicle turning right from this arm exits onto its right neighbor;
    /// a vehicle approaching on the right neighbor has right-hand precedence
    /// over this arm.
    #[inline]
    pub fn right_neighbor(self) -> Arm {
        Arm::ALL[(self.index() + 1) % 4]
    }

    /// The facing arm (through-movement target).
    #[inline]
    pub fn opposite(self) -> Arm {
        Arm::ALL[(self.index() + 2) % 4]
    }

    /// The mutually exclusive movement group this arm belongs to.
    #[inline]
    pub fn group(self) -> MovementGroup {
        match self {
            Arm::Down | Arm::Up    => MovementGroup::Vertical,
            Arm::Left | Arm::Right => MovementGroup::Horizontal,
        }
    }

    /// Single-letter code used in route codes ("du", "rl", …).
    pub fn code(self) -> char {
        match self {
            Arm::Down  => 'd',
            Arm::Right => 'r',
            Arm::Up    => 'u',
            Arm::Left  => 'l',
        }
    }

    fn from_code(c: char) -> Option<Arm> {
        match c {
            'd' => Some(Arm::Down),
            'r' => Some(Arm::Right),
            'u' => Some(Arm::Up),
            'l' => Some(Arm::Left),
            _ => None,
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ── MovementGroup ─────────────────────────────────────────────────────────────

/// One of the two mutually exclusive movement groups used by phase-based
/// arbitration: vertical (Down/Up approaches) vs. horizontal (Left/Right).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementGroup {
    Vertical,
    Horizontal,
}

impl MovementGroup {
    /// The conflicting group.
    #[inline]
    pub fn other(self) -> MovementGroup {
        match self {
            MovementGroup::Vertical   => MovementGroup::Horizontal,
            MovementGroup::Horizontal => MovementGroup::Vertical,
        }
    }

    /// The two arms belonging to this group.
    pub fn arms(self) -> [Arm; 2] {
        match self {
            MovementGroup::Vertical   => [Arm::Down, Arm::Up],
            MovementGroup::Horizontal => [Arm::Right, Arm::Left],
        }
    }
}

impl fmt::Display for MovementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MovementGroup::Vertical   => "vertical",
            MovementGroup::Horizontal => "horizontal",
        })
    }
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// Movement classification with strictly decreasing precedence.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    /// Right turn — highest precedence (class 1).
    Right,
    /// Through movement (class 2).
    Straight,
    /// Crossing / left turn — lowest precedence (class 3).
    Crossing,
}

impl Turn {
    /// Numeric precedence class: right 1 < straight 2 < crossing 3.
    /// The larger class yields.
    #[inline]
    pub fn class(self) -> u8 {
        match self {
            Turn::Right    => 1,
            Turn::Straight => 2,
            Turn::Crossing => 3,
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One of the twelve canonical (entry, exit) movements across the junction.
///
/// Entry and exit are always distinct arms; U-turns do not exist in this
/// topology.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    entry: Arm,
    exit:  Arm,
}

impl Route {
    /// All twelve canonical routes, grouped by entry arm.
    pub const ALL: [Route; 12] = {
        const fn r(entry: Arm, exit: Arm) -> Route {
            Route { entry, exit }
        }
        [
            r(Arm::Down, Arm::Up),    r(Arm::Down, Arm::Left),  r(Arm::Down, Arm::Right),
            r(Arm::Left, Arm::Down),  r(Arm::Left, Arm::Right), r(Arm::Left, Arm::Up),
            r(Arm::Up, Arm::Left),    r(Arm::Up, Arm::Down),    r(Arm::Up, Arm::Right),
            r(Arm::Right, Arm::Up),   r(Arm::Right, Arm::Left), r(Arm::Right, Arm::Down),
        ]
    };

    /// Build a route from distinct entry and exit arms.
    pub fn new(entry: Arm, exit: Arm) -> Option<Route> {
        (entry != exit).then_some(Route { entry, exit })
    }

    /// The arm the vehicle approaches on.  Every route maps to exactly one
    /// entry edge; this is the route → entry-edge mapping.
    #[inline]
    pub fn entry(self) -> Arm {
        self.entry
    }

    /// The arm the vehicle leaves on.
    #[inline]
    pub fn exit(self) -> Arm {
        self.exit
    }

    /// Classify this movement for precedence arbitration.
    pub fn turn(self) -> Turn {
        if self.exit == self.entry.right_neighbor() {
            Turn::Right
        } else if self.exit == self.entry.opposite() {
            Turn::Straight
        } else {
            Turn::Crossing
        }
    }

    /// Two-character route code ("du" = enter from Down, exit Up).
    pub fn code(self) -> String {
        format!("{}{}", self.entry.code(), self.exit.code())
    }
}

impl FromStr for Route {
    type Err = TopologyError;

    fn from_str(s: &str) -> TopologyResult<Route> {
        let bad = || TopologyError::BadRouteCode(s.to_string());
        let mut chars = s.chars();
        let entry = chars.next().and_then(Arm::from_code).ok_or_else(bad)?;
        let exit = chars.next().and_then(Arm::from_code).ok_or_else(bad)?;
        if chars.next().is_some() {
            return Err(bad());
        }
        Route::new(entry, exit).ok_or_else(bad)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.entry.code(), self.exit.code())
    }
}
