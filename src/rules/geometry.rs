//! Movement geometry by face color.
//!
//! Displacements are measured from the cell the move started on. A chained
//! move also passes the displacement of the previous landing so the next
//! hop can be checked for direction.

use crate::pieces::Face;

/// Whether a stack showing `face` with takeoff `height` may stop at
/// displacement `(dx, dy)` from its starting cell.
///
/// `previous` is the displacement of the last landing when the move has
/// already hopped at least once.
#[must_use]
pub fn legal_displacement(face: Face, height: usize, (dx, dy): (i32, i32), previous: Option<(i32, i32)>) -> bool {
    let (adx, ady) = (dx.unsigned_abs() as usize, dy.unsigned_abs() as usize);

    if let Some((pdx, pdy)) = previous {
        if face == Face::Orange {
            // at most one square from the previous landing
            if (dx - pdx).abs() > 1 || (dy - pdy).abs() > 1 {
                return false;
            }
        } else if pdx.signum() != dx.signum() || pdy.signum() != dy.signum() {
            return false;
        }
        if adx < pdx.unsigned_abs() as usize || ady < pdy.unsigned_abs() as usize {
            return false;
        }
    }

    match face {
        Face::Blank => adx.max(ady) <= height && (adx == ady || adx == 0 || ady == 0),
        Face::Red => (adx == 0 || ady == 0) && adx + ady <= height,
        Face::Blue => adx == ady && adx <= height,
        Face::Orange => match (adx, ady) {
            (0, d) | (d, 0) => d <= 1,
            (1, 2) | (2, 1) => true,
            _ => false,
        },
        Face::Unknown => false,
    }
}

/// Every displacement a move could reach in one more hop, ignoring the
/// board edge. Used to enumerate candidate drop cells.
#[must_use]
pub fn reachable_displacements(face: Face, height: usize, previous: Option<(i32, i32)>) -> Vec<(i32, i32)> {
    let reach = match face {
        Face::Orange => 2,
        _ => height as i32,
    };
    let mut out = Vec::new();
    for dx in -reach..=reach {
        for dy in -reach..=reach {
            if (dx, dy) == (0, 0) || Some((dx, dy)) == previous {
                continue;
            }
            if legal_displacement(face, height, (dx, dy), previous) {
                out.push((dx, dy));
            }
        }
    }
    out
}

/// The displacement is a finished Orange dogleg.
#[must_use]
pub fn is_knight_move((dx, dy): (i32, i32)) -> bool {
    dx.abs() + dy.abs() == 3 && dx != 0 && dy != 0
}
