//! Plain-text picture of the intersection.
//!
//! ```text
//! T12  R1 GREEN  R2 RED
//! R1 LEFT   ....1...|..|..........
//! R1 RIGHT  ..0.....|2.|.....3....
//! R2 LEFT   ........|..|..........
//! R2 RIGHT  .1......|..|....5.....
//! ```
//!
//! Each cell is `.` when empty, otherwise the occupant's velocity (`+` above
//! 9, `X` if collided).  `|` marks the intersection edges.

use std::fmt::Write;

use ix_core::{Lane, RandomSource, Road};
use ix_sim::{IntersectionSim, VehicleView};

/// Render all four lanes of `sim`, one line each, under a header line.
pub fn render_roads<R: RandomSource>(sim: &IntersectionSim<R>) -> String {
    let geometry = sim.geometry();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  R1 {}  R2 {}",
        sim.time_step(),
        sim.light(Road::R1),
        sim.light(Road::R2),
    );

    for road in Road::ALL {
        for lane in Lane::ALL {
            let _ = write!(out, "{road} {:<6} ", lane.as_str());
            for cell in 0..geometry.l_total {
                if cell == geometry.intersection_start || cell == geometry.intersection_end {
                    out.push('|');
                }
                out.push(sim.occupant(road, lane, cell).map_or('.', cell_glyph));
            }
            out.push('\n');
        }
    }
    out
}

fn cell_glyph(v: VehicleView) -> char {
    if v.collided {
        'X'
    } else {
        char::from_digit(v.velocity, 10).unwrap_or('+')
    }
}
