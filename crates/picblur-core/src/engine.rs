//! Blur orchestration: partition, dispatch to a worker pool, swap result.

use crate::canvas::Canvas;
use crate::kernel::{blur_pixel, blurred_pixel};
use crate::partition::Partition;
use crate::pool::WorkerPool;
use crate::{BlurError, Picture};
use core::fmt;
use core::str::FromStr;
use std::thread;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Worker count used by the reference benchmark.
pub const DEFAULT_WORKERS: usize = 16;

/// How a blur pass is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlurStrategy {
    /// Single-threaded pass over every pixel; the baseline for comparisons.
    Sequential,
    /// Tasks from the given partition executed by a [`WorkerPool`].
    Partitioned(Partition),
    /// Rows blurred on rayon's global pool.
    #[cfg(feature = "rayon")]
    Rayon,
}

impl fmt::Display for BlurStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlurStrategy::Sequential => f.write_str("sequential"),
            BlurStrategy::Partitioned(p) => fmt::Display::fmt(p, f),
            #[cfg(feature = "rayon")]
            BlurStrategy::Rayon => f.write_str("rayon"),
        }
    }
}

impl FromStr for BlurStrategy {
    type Err = BlurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(BlurStrategy::Sequential),
            #[cfg(feature = "rayon")]
            "rayon" => Ok(BlurStrategy::Rayon),
            _ => s.parse().map(BlurStrategy::Partitioned),
        }
    }
}

impl From<Partition> for BlurStrategy {
    fn from(p: Partition) -> Self {
        BlurStrategy::Partitioned(p)
    }
}

/// Runs blur passes with a fixed number of workers per pass.
#[derive(Clone, Debug)]
pub struct BlurEngine {
    workers: usize,
}

impl Default for BlurEngine {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl BlurEngine {
    pub fn new(workers: usize) -> Result<Self, BlurError> {
        if workers == 0 {
            return Err(BlurError::NoWorkers);
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Blur `picture` with `strategy`.
    ///
    /// The result is computed entirely from the picture as it was on entry and
    /// installed with [`Picture::overwrite`] once every worker has finished.
    /// On error the picture is left untouched.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, picture, strategy),
            fields(width = picture.width(), height = picture.height(), strategy = %strategy)
        )
    )]
    pub fn blur(&self, picture: &mut Picture, strategy: BlurStrategy) -> Result<(), BlurError> {
        match strategy {
            BlurStrategy::Sequential => {
                blur_sequential(picture);
                Ok(())
            }
            BlurStrategy::Partitioned(partition) => self.blur_partitioned(picture, partition),
            #[cfg(feature = "rayon")]
            BlurStrategy::Rayon => {
                blur_rayon(picture);
                Ok(())
            }
        }
    }

    fn blur_partitioned(
        &self,
        picture: &mut Picture,
        partition: Partition,
    ) -> Result<(), BlurError> {
        let (w, h) = picture.dimensions();
        let canvas = Canvas::like(picture);
        let source: &Picture = picture;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            tasks = partition.task_count(w, h),
            workers = self.workers,
            "dispatching blur tasks"
        );

        thread::scope(|scope| -> Result<(), BlurError> {
            let pool = WorkerPool::new(scope, self.workers)?;
            for task in partition.tasks(w, h) {
                let canvas = &canvas;
                pool.submit(move || {
                    task.for_each_coord(w, h, |x, y| blur_pixel(x, y, source, canvas));
                })?;
            }
            pool.drain();
            pool.shutdown();
            Ok(())
        })?;

        picture.overwrite(canvas.into_picture());
        Ok(())
    }
}

/// Blur on the calling thread, column by column.
pub fn blur_sequential(picture: &mut Picture) {
    let (w, h) = picture.dimensions();
    let mut out = Picture::from_parts(w, h, vec![0; picture.as_raw().len()]);
    for x in 0..w {
        for y in 0..h {
            out.put_pixel(x, y, blurred_pixel(x, y, picture));
        }
    }
    picture.overwrite(out);
}

#[cfg(feature = "rayon")]
fn blur_rayon(picture: &mut Picture) {
    use rayon::prelude::*;

    let (w, h) = picture.dimensions();
    let mut data = vec![0u8; picture.as_raw().len()];
    let source: &Picture = picture;
    data.par_chunks_mut(w as usize * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, dst) in row.chunks_exact_mut(3).enumerate() {
                dst.copy_from_slice(&blurred_pixel(x as u32, y as u32, source).to_rgb());
            }
        });
    picture.overwrite(Picture::from_parts(w, h, data));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pixel;

    fn gradient(w: u32, h: u32) -> Picture {
        let mut pic = Picture::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                pic.put_pixel(
                    x,
                    y,
                    Pixel::new((x * 13 % 256) as u8, (y * 7 % 256) as u8, ((x + y) % 256) as u8),
                );
            }
        }
        pic
    }

    #[test]
    fn strategy_names_round_trip() {
        for s in [
            BlurStrategy::Sequential,
            BlurStrategy::Partitioned(Partition::Row),
            BlurStrategy::Partitioned(Partition::sector(64).unwrap()),
        ] {
            assert_eq!(s.to_string().parse::<BlurStrategy>().unwrap(), s);
        }
        assert!("nope".parse::<BlurStrategy>().is_err());
    }

    #[test]
    fn zero_worker_engine_is_rejected() {
        assert!(matches!(BlurEngine::new(0), Err(BlurError::NoWorkers)));
        assert_eq!(BlurEngine::default().workers(), DEFAULT_WORKERS);
    }

    #[test]
    fn partitioned_blur_matches_sequential_exactly() {
        let base = gradient(23, 17);
        let mut expected = base.clone();
        blur_sequential(&mut expected);

        let engine = BlurEngine::new(3).unwrap();
        for p in [
            Partition::Column,
            Partition::Row,
            Partition::Pixel,
            Partition::sector(4).unwrap(),
        ] {
            let mut pic = base.clone();
            engine.blur(&mut pic, p.into()).unwrap();
            assert_eq!(pic, expected, "{p}");
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn rayon_blur_matches_sequential() {
        let base = gradient(19, 11);
        let mut expected = base.clone();
        blur_sequential(&mut expected);
        let mut pic = base;
        BlurEngine::default()
            .blur(&mut pic, BlurStrategy::Rayon)
            .unwrap();
        assert_eq!(pic, expected);
    }
}
