use ndarray::Array2;

pub type Coord = u8;
pub type CellCount = u16;

/// `(row, col)`
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub trait GridExt {
    fn neighbors(&self, center: Coord2) -> Neighbors;
}

impl<T> GridExt for Array2<T> {
    fn neighbors(&self, center: Coord2) -> Neighbors {
        let (rows, cols) = self.dim();
        // grids are sized from a `BoardConfig`, so both dims fit a `Coord`
        Neighbors::new(center, (rows as Coord, cols as Coord))
    }
}

/// Row-major walk over the 3x3 window around `center`, clipped to the board and skipping the
/// center itself.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    first_col: Coord,
    last: Coord2,
    cursor: Option<Coord2>,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        let (row, col) = center;
        let (rows, cols) = size;
        let first = (row.saturating_sub(1), col.saturating_sub(1));
        let last = (
            row.saturating_add(1).min(rows.saturating_sub(1)),
            col.saturating_add(1).min(cols.saturating_sub(1)),
        );

        Self {
            center,
            first_col: first.1,
            last,
            cursor: (row < rows && col < cols).then_some(first),
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Coord2> {
        while let Some(pos @ (row, col)) = self.cursor {
            self.cursor = if col < self.last.1 {
                Some((row, col + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if pos != self.center {
                return Some(pos);
            }
        }
        None
    }
}
