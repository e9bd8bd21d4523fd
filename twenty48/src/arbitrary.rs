use quickcheck::{Arbitrary, Gen};

use crate::Direction;

/// A random grid with bounded dimensions, as input for property tests.
#[derive(Clone, Debug)]
pub struct GridInput {
    pub grid: Vec<Vec<u32>>,
}

impl Arbitrary for GridInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let rows = usize::arbitrary(g) % 5 + 1;
        let columns = usize::arbitrary(g) % 5 + 1;
        let mut grid = Vec::with_capacity(rows);
        for _ in 0..rows {
            let mut row = Vec::with_capacity(columns);
            for _ in 0..columns {
                // Exponent 0 stands for an empty cell, so merges and slides
                // both come up regularly.
                let exponent = u32::arbitrary(g) % 6;
                row.push(if exponent == 0 { 0 } else { 1u32 << exponent });
            }
            grid.push(row);
        }
        GridInput { grid }
    }
}

impl Arbitrary for Direction {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}
