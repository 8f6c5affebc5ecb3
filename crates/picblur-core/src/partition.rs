//! Decompositions of an image's coordinate space into independent tasks.
//!
//! Every partition covers `[0, width) × [0, height)` exactly once. Sector
//! tiles at the right and bottom edges may nominally extend past the image;
//! [`Task::for_each_coord`] skips the out-of-range part instead of clamping.

use crate::BlurError;
use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

/// A coordinate range handed to one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Every row of column `x`.
    Column { x: u32 },
    /// Every column of row `y`.
    Row { y: u32 },
    /// A single coordinate.
    Pixel { x: u32, y: u32 },
    /// The `size × size` square with top-left corner `(x0, y0)`.
    Sector { x0: u32, y0: u32, size: NonZeroU32 },
}

impl Task {
    /// Visit the in-bounds coordinates of this task, row by row.
    pub fn for_each_coord(&self, width: u32, height: u32, mut f: impl FnMut(u32, u32)) {
        match *self {
            Task::Column { x } => {
                if x < width {
                    for y in 0..height {
                        f(x, y);
                    }
                }
            }
            Task::Row { y } => {
                if y < height {
                    for x in 0..width {
                        f(x, y);
                    }
                }
            }
            Task::Pixel { x, y } => {
                if x < width && y < height {
                    f(x, y);
                }
            }
            Task::Sector { x0, y0, size } => {
                let x1 = x0.saturating_add(size.get()).min(width);
                let y1 = y0.saturating_add(size.get()).min(height);
                for y in y0..y1 {
                    for x in x0..x1 {
                        f(x, y);
                    }
                }
            }
        }
    }
}

/// Strategy for splitting a picture into tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    Column,
    Row,
    Pixel,
    Sector { size: NonZeroU32 },
}

impl Partition {
    /// Sector partition with tiles of side `size`.
    pub fn sector(size: u32) -> Result<Self, BlurError> {
        NonZeroU32::new(size)
            .map(|size| Partition::Sector { size })
            .ok_or_else(|| BlurError::InvalidStrategy(format!("sector_{size}")))
    }

    /// Number of tasks generated for a `width × height` picture.
    pub fn task_count(&self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match *self {
            Partition::Column => w,
            Partition::Row => h,
            Partition::Pixel => w * h,
            Partition::Sector { size } => {
                let (tx, ty) = tiles(width, height, size);
                tx * ty
            }
        }
    }

    /// Tasks in submission order: ascending column, ascending row, row-major
    /// pixels, or row-major tile origins.
    pub fn tasks(&self, width: u32, height: u32) -> Tasks {
        Tasks {
            partition: *self,
            width,
            height,
            next: 0,
            len: self.task_count(width, height),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Column => f.write_str("column"),
            Partition::Row => f.write_str("row"),
            Partition::Pixel => f.write_str("parallel"),
            Partition::Sector { size } => write!(f, "sector_{size}"),
        }
    }
}

impl FromStr for Partition {
    type Err = BlurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "column" => Ok(Partition::Column),
            "row" => Ok(Partition::Row),
            "parallel" | "pixel" => Ok(Partition::Pixel),
            other => other
                .strip_prefix("sector_")
                .and_then(|n| n.parse::<u32>().ok())
                .and_then(NonZeroU32::new)
                .map(|size| Partition::Sector { size })
                .ok_or_else(|| BlurError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Iterator over the tasks of one partition, computed on the fly so pixel
/// partitions of large images are never materialized.
#[derive(Clone, Debug)]
pub struct Tasks {
    partition: Partition,
    width: u32,
    height: u32,
    next: usize,
    len: usize,
}

impl Iterator for Tasks {
    type Item = Task;

    fn next(&mut self) -> Option<Task> {
        if self.next >= self.len {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let task = match self.partition {
            Partition::Column => Task::Column { x: i as u32 },
            Partition::Row => Task::Row { y: i as u32 },
            Partition::Pixel => {
                let w = self.width as usize;
                Task::Pixel {
                    x: (i % w) as u32,
                    y: (i / w) as u32,
                }
            }
            Partition::Sector { size } => {
                let (tx, _) = tiles(self.width, self.height, size);
                Task::Sector {
                    x0: (i % tx) as u32 * size.get(),
                    y0: (i / tx) as u32 * size.get(),
                    size,
                }
            }
        };
        Some(task)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.len - self.next;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for Tasks {}

fn tiles(width: u32, height: u32, size: NonZeroU32) -> (usize, usize) {
    (
        width.div_ceil(size.get()) as usize,
        height.div_ceil(size.get()) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(n: u32) -> Partition {
        Partition::sector(n).unwrap()
    }

    #[test]
    fn task_counts_match_iterators() {
        for p in [
            Partition::Column,
            Partition::Row,
            Partition::Pixel,
            sector(1),
            sector(3),
            sector(4096),
        ] {
            let tasks = p.tasks(7, 5);
            assert_eq!(tasks.len(), p.task_count(7, 5), "{p}");
            assert_eq!(tasks.count(), p.task_count(7, 5), "{p}");
        }
        assert_eq!(Partition::Pixel.task_count(7, 5), 35);
        assert_eq!(sector(3).task_count(7, 5), 3 * 2);
        assert_eq!(sector(4096).task_count(7, 5), 1);
    }

    #[test]
    fn submission_order_is_deterministic() {
        let cols: Vec<_> = Partition::Column.tasks(3, 2).collect();
        assert_eq!(
            cols,
            vec![
                Task::Column { x: 0 },
                Task::Column { x: 1 },
                Task::Column { x: 2 }
            ]
        );

        let px: Vec<_> = Partition::Pixel.tasks(2, 2).collect();
        assert_eq!(
            px,
            vec![
                Task::Pixel { x: 0, y: 0 },
                Task::Pixel { x: 1, y: 0 },
                Task::Pixel { x: 0, y: 1 },
                Task::Pixel { x: 1, y: 1 },
            ]
        );

        let size = NonZeroU32::new(2).unwrap();
        let sec: Vec<_> = sector(2).tasks(3, 3).collect();
        assert_eq!(
            sec,
            vec![
                Task::Sector { x0: 0, y0: 0, size },
                Task::Sector { x0: 2, y0: 0, size },
                Task::Sector { x0: 0, y0: 2, size },
                Task::Sector { x0: 2, y0: 2, size },
            ]
        );
    }

    #[test]
    fn edge_sector_is_clipped() {
        let size = NonZeroU32::new(4).unwrap();
        let mut seen = Vec::new();
        Task::Sector { x0: 4, y0: 4, size }.for_each_coord(5, 6, |x, y| seen.push((x, y)));
        assert_eq!(seen, vec![(4, 4), (4, 5)]);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for p in [Partition::Column, Partition::Row, Partition::Pixel, sector(128)] {
            assert_eq!(p.to_string().parse::<Partition>().unwrap(), p);
        }
        assert_eq!(Partition::Pixel.to_string(), "parallel");
        assert_eq!("pixel".parse::<Partition>().unwrap(), Partition::Pixel);
        assert!("sector_0".parse::<Partition>().is_err());
        assert!("diagonal".parse::<Partition>().is_err());
        assert!(Partition::sector(0).is_err());
    }
}
