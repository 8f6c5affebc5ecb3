use picblur_core::kernel::blur_pixel;
use picblur_core::{
    blur_sequential, compare_pictures, BlurEngine, BlurStrategy, Comparison, Partition, Picture,
    Pixel, PixelSink, WorkerPool, DEFAULT_TOLERANCE,
};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;

/// Sink that only counts how often each cell is written.
struct CountingSink {
    width: u32,
    height: u32,
    writes: Vec<AtomicU32>,
    out_of_range: AtomicUsize,
}

impl CountingSink {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            writes: (0..width * height).map(|_| AtomicU32::new(0)).collect(),
            out_of_range: AtomicUsize::new(0),
        }
    }

    fn counts(&self) -> Vec<u32> {
        self.writes.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }
}

impl PixelSink for CountingSink {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put(&self, x: u32, y: u32, _pixel: Pixel) {
        if x >= self.width || y >= self.height {
            self.out_of_range.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.writes[(y * self.width + x) as usize].fetch_add(1, Ordering::Relaxed);
    }
}

fn noise(w: u32, h: u32, seed: u32) -> Picture {
    let mut pic = Picture::new(w, h).unwrap();
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(1);
    for y in 0..h {
        for x in 0..w {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let [r, g, b, _] = state.to_le_bytes();
            pic.put_pixel(x, y, Pixel::new(r, g, b));
        }
    }
    pic
}

fn all_partitions() -> Vec<Partition> {
    let mut out = vec![Partition::Column, Partition::Row, Partition::Pixel];
    for shift in 1..=12 {
        out.push(Partition::sector(1 << shift).unwrap());
    }
    out.push(Partition::sector(1).unwrap());
    out.push(Partition::sector(3).unwrap());
    out.push(Partition::sector(7).unwrap());
    out
}

fn engine() -> BlurEngine {
    BlurEngine::new(4).unwrap()
}

#[test]
fn every_strategy_matches_sequential_within_tolerance() {
    let base = noise(37, 29, 7);
    let mut expected = base.clone();
    blur_sequential(&mut expected);

    for p in all_partitions() {
        let mut pic = base.clone();
        engine().blur(&mut pic, p.into()).unwrap();
        assert_eq!(
            compare_pictures(&expected, &pic, DEFAULT_TOLERANCE),
            Comparison::Identical,
            "partition {p}"
        );
    }
}

#[test]
fn boundary_pixels_are_untouched_by_every_strategy() {
    let base = noise(16, 9, 3);
    let (w, h) = base.dimensions();
    let mut strategies: Vec<BlurStrategy> = all_partitions().into_iter().map(Into::into).collect();
    strategies.push(BlurStrategy::Sequential);

    for s in strategies {
        let mut pic = base.clone();
        engine().blur(&mut pic, s).unwrap();
        for x in 0..w {
            assert_eq!(pic.pixel(x, 0), base.pixel(x, 0), "{s} top ({x})");
            assert_eq!(pic.pixel(x, h - 1), base.pixel(x, h - 1), "{s} bottom ({x})");
        }
        for y in 0..h {
            assert_eq!(pic.pixel(0, y), base.pixel(0, y), "{s} left ({y})");
            assert_eq!(pic.pixel(w - 1, y), base.pixel(w - 1, y), "{s} right ({y})");
        }
    }
}

#[test]
fn partitions_cover_each_coordinate_exactly_once() {
    for (w, h) in [(1, 1), (5, 3), (17, 31), (64, 64)] {
        let pic = Picture::new(w, h).unwrap();
        for p in all_partitions() {
            let sink = CountingSink::new(w, h);
            for task in p.tasks(w, h) {
                task.for_each_coord(w, h, |x, y| blur_pixel(x, y, &pic, &sink));
            }
            assert_eq!(sink.out_of_range.load(Ordering::Relaxed), 0, "{p} {w}x{h}");
            assert!(
                sink.counts().iter().all(|&c| c == 1),
                "{p} on {w}x{h} wrote some cell zero or several times"
            );
        }
    }
}

#[test]
fn sector_tiles_never_visit_coordinates_past_the_edge() {
    let (w, h) = (10, 6);
    for size in [3, 4, 7, 16, 4096] {
        let p = Partition::sector(size).unwrap();
        for task in p.tasks(w, h) {
            task.for_each_coord(w, h, |x, y| {
                assert!(x < w && y < h, "sector_{size} visited ({x}, {y})");
            });
        }
    }
}

#[test]
fn oversized_sector_yields_one_task() {
    let p = Partition::sector(4096).unwrap();
    let tasks: Vec<_> = p.tasks(30, 20).collect();
    assert_eq!(tasks.len(), 1);
    let mut visited = 0;
    tasks[0].for_each_coord(30, 20, |_, _| visited += 1);
    assert_eq!(visited, 600);
}

#[test]
fn partitioning_is_deterministic() {
    for p in all_partitions() {
        let a: Vec<_> = p.tasks(21, 13).collect();
        let b: Vec<_> = p.tasks(21, 13).collect();
        assert_eq!(a, b, "{p}");
    }
}

#[test]
fn drain_counts_every_task_invocation() {
    for (w, h) in [(1, 1), (9, 4), (50, 33)] {
        for p in all_partitions() {
            let invoked = AtomicUsize::new(0);
            thread::scope(|s| {
                let pool = WorkerPool::new(s, 8).unwrap();
                for task in p.tasks(w, h) {
                    let invoked = &invoked;
                    pool.submit(move || {
                        task.for_each_coord(w, h, |_, _| {});
                        invoked.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                }
                pool.drain();
                assert_eq!(
                    invoked.load(Ordering::Relaxed),
                    p.task_count(w, h),
                    "{p} {w}x{h}"
                );
                pool.shutdown();
            });
        }
    }
}

#[test]
fn uniform_picture_is_unchanged() {
    let base = Picture::from_pixel(4, 4, Pixel::new(100, 100, 100)).unwrap();
    let mut pic = base.clone();
    blur_sequential(&mut pic);
    assert_eq!(pic, base);
}

#[test]
fn single_bright_pixel_spreads_over_its_neighborhood() {
    let mut base = Picture::new(5, 5).unwrap();
    base.put_pixel(2, 2, Pixel::new(255, 0, 0));

    let mut strategies: Vec<BlurStrategy> = vec![BlurStrategy::Sequential];
    strategies.extend(all_partitions().into_iter().map(BlurStrategy::from));

    for s in strategies {
        let mut pic = base.clone();
        engine().blur(&mut pic, s).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    Pixel::new(255 / 9, 0, 0)
                } else {
                    Pixel::BLACK
                };
                assert_eq!(pic.pixel(x, y), expected, "{s} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn comparing_a_picture_with_itself_succeeds() {
    let pic = noise(12, 8, 1);
    assert!(compare_pictures(&pic, &pic, DEFAULT_TOLERANCE).is_match());
}

#[test]
fn different_dimensions_are_reported() {
    let a = Picture::new(4, 3).unwrap();
    let b = Picture::new(3, 4).unwrap();
    assert_eq!(
        compare_pictures(&a, &b, DEFAULT_TOLERANCE),
        Comparison::DimensionMismatch {
            baseline: (4, 3),
            candidate: (3, 4),
        }
    );
}

#[test]
fn repeated_blurs_stay_in_agreement() {
    let base = noise(20, 14, 11);
    let mut expected = base.clone();
    let mut sectored = base.clone();
    let e = engine();
    for _ in 0..10 {
        blur_sequential(&mut expected);
        e.blur(&mut sectored, Partition::sector(8).unwrap().into())
            .unwrap();
    }
    assert!(compare_pictures(&expected, &sectored, DEFAULT_TOLERANCE).is_match());
}
