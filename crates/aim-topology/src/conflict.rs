//! Per-route conflict bitmaps.
//!
//! The junction interior is decomposed into a 2×2 grid of conflict cells.
//! Each canonical route occupies a fixed subset of those cells for the whole
//! time it crosses; two movements conflict iff their cell sets overlap.
//! Opposite through-movements occupy complementary columns/rows, which is
//! what lets grid reservation run them concurrently.
//!
//! Cell (row, col) layout, looking down at the junction with the Down arm
//! at the bottom:
//!
//! ```text
//!         Up
//!      ┌───┬───┐
//! Left │0,0│0,1│ Right
//!      ├───┼───┤
//!      │1,0│1,1│
//!      └───┴───┘
//!        Down
//! ```

use crate::{Arm, Route};

/// Which of the four junction cells a movement occupies, packed into the low
/// nibble of a `u8` (bit = row * 2 + col).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConflictMask(u8);

impl ConflictMask {
    pub const EMPTY: ConflictMask = ConflictMask(0);
    pub const FULL:  ConflictMask = ConflictMask(0b1111);

    /// Number of cells per side of the junction grid.
    pub const SIDE: usize = 2;
    /// Total conflict cells.
    pub const CELLS: usize = Self::SIDE * Self::SIDE;

    /// Build from a row-major cell matrix.
    pub const fn from_cells(cells: [[bool; 2]; 2]) -> ConflictMask {
        let mut bits = 0u8;
        if cells[0][0] { bits |= 1 << 0 }
        if cells[0][1] { bits |= 1 << 1 }
        if cells[1][0] { bits |= 1 << 2 }
        if cells[1][1] { bits |= 1 << 3 }
        ConflictMask(bits)
    }

    /// Does this movement occupy cell (row, col)?
    #[inline]
    pub fn contains(self, row: usize, col: usize) -> bool {
        self.0 & (1 << (row * Self::SIDE + col)) != 0
    }

    /// Do two movements occupy at least one common cell?
    #[inline]
    pub fn overlaps(self, other: ConflictMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of occupied cells.
    #[inline]
    pub fn cell_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate the flat bit indices (row * 2 + col) of occupied cells.
    pub fn cells(self) -> impl Iterator<Item = usize> {
        (0..Self::CELLS).filter(move |&i| self.0 & (1 << i) != 0)
    }

    /// Mirror across the main diagonal — relates a movement to the
    /// perpendicular one (e.g. down→up maps to left→right).
    #[inline]
    pub const fn transpose(self) -> ConflictMask {
        let b = self.0;
        // Swap bits 1 (0,1) and 2 (1,0); diagonal bits stay put.
        ConflictMask((b & 0b1001) | ((b & 0b0010) << 1) | ((b & 0b0100) >> 1))
    }

    /// Complement — relates a movement to its opposite (down→up vs. up→down).
    #[inline]
    pub const fn invert(self) -> ConflictMask {
        ConflictMask(!self.0 & 0b1111)
    }
}

// ── Canonical route masks ─────────────────────────────────────────────────────

const DOWN_UP:    ConflictMask = ConflictMask::from_cells([[false, true],  [false, true]]);
const UP_DOWN:    ConflictMask = DOWN_UP.invert();
const LEFT_RIGHT: ConflictMask = DOWN_UP.transpose();
const RIGHT_LEFT: ConflictMask = UP_DOWN.transpose();

const DOWN_RIGHT: ConflictMask = ConflictMask::from_cells([[false, false], [false, true]]);
const DOWN_LEFT:  ConflictMask = ConflictMask::from_cells([[true,  true],  [false, true]]);
const RIGHT_UP:   ConflictMask = ConflictMask::from_cells([[false, true],  [false, false]]);
const RIGHT_DOWN: ConflictMask = ConflictMask::from_cells([[true,  true],  [true,  false]]);
const LEFT_DOWN:  ConflictMask = ConflictMask::from_cells([[false, false], [true,  false]]);
const LEFT_UP:    ConflictMask = ConflictMask::from_cells([[false, true],  [true,  true]]);
const UP_LEFT:    ConflictMask = ConflictMask::from_cells([[true,  false], [false, false]]);
const UP_RIGHT:   ConflictMask = ConflictMask::from_cells([[true,  false], [true,  true]]);

impl Route {
    /// The conflict bitmap this route occupies while crossing.
    ///
    /// Every canonical route maps to exactly one mask.
    pub fn mask(self) -> ConflictMask {
        use Arm::*;
        match (self.entry(), self.exit()) {
            (Down, Up)     => DOWN_UP,
            (Up, Down)     => UP_DOWN,
            (Left, Right)  => LEFT_RIGHT,
            (Right, Left)  => RIGHT_LEFT,
            (Down, Right)  => DOWN_RIGHT,
            (Down, Left)   => DOWN_LEFT,
            (Right, Up)    => RIGHT_UP,
            (Right, Down)  => RIGHT_DOWN,
            (Left, Down)   => LEFT_DOWN,
            (Left, Up)     => LEFT_UP,
            (Up, Left)     => UP_LEFT,
            (Up, Right)    => UP_RIGHT,
            // Route::new rejects entry == exit.
            _ => unreachable!("no canonical route {self}"),
        }
    }
}
