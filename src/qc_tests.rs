use crate::{BitRowSet, BitmapPolicy, Item, RowSet};

use std::collections::BTreeSet;
use quickcheck_macros::quickcheck;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

fn bitmap_of(rows: &BTreeSet<u32>) -> RowSet {
    let (min, max) = match (rows.iter().next(), rows.iter().next_back()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => (0, 0),
    };
    let mut s = RowSet::bitmap(min, max).unwrap();
    for &r in rows {
        s.add(r).unwrap();
    }
    s
}

fn sorted(s: &RowSet) -> Vec<u32> {
    let mut v: Vec<u32> = s.iter().collect();
    v.sort();
    v
}

struct Simulation<R: Rng> {
    rng: R,
    rows: Vec<Vec<i32>>,
}

impl<R: Rng> Simulation<R> {
    fn new(mut rng: R) -> Self {
        // A small table with few distinct codes so items actually match.
        let num_rows = rng.gen_range(1, 400);
        let rows = (0..num_rows)
            .map(|_| (0..3).map(|_| rng.gen_range(0, 3)).collect::<Vec<i32>>())
            .collect();
        Self { rng, rows }
    }

    fn sample_set(&mut self) -> (BTreeSet<u32>, RowSet) {
        let n = self.rows.len() as u32;
        let lo = self.rng.gen_range(1, n + 1);
        let hi = self.rng.gen_range(lo, n + 1);
        let expected = self.rng.gen_range(0, hi - lo + 2);

        let mut model = BTreeSet::new();
        for _ in 0..expected {
            model.insert(self.rng.gen_range(lo, hi + 1));
        }
        let mut set = RowSet::with_expected(lo, hi, expected, &BitmapPolicy::default()).unwrap();
        for &r in &model {
            set.add(r).unwrap();
        }
        (model, set)
    }

    fn sample_item(&mut self) -> Item {
        Item::new(self.rng.gen_range(0, 3), self.rng.gen_range(0, 3))
    }

    fn step(&mut self) {
        let (ma, a) = self.sample_set();
        let (mb, b) = self.sample_set();

        assert_eq!(a.len(), ma.len());
        for r in 0..=self.rows.len() as u32 + 64 {
            assert_eq!(a.contains(r), ma.contains(&r), "row {} in {:?}", r, a);
        }

        let shared: Vec<u32> = ma.intersection(&mb).cloned().collect();
        let ab = a.intersect_with(&b);
        let ba = b.intersect_with(&a);
        assert_eq!(sorted(&ab), shared);
        assert_eq!(sorted(&ba), shared);
        assert_eq!(ab.len(), shared.len());
        assert_eq!(ba.len(), shared.len());

        assert_eq!(a.is_support_row_present(&b), shared.len() == 1);
        assert_eq!(b.is_support_row_present(&a), shared.len() == 1);

        let items: Vec<Item> = (0..self.rng.gen_range(0, 3)).map(|_| self.sample_item()).collect();
        let reference = self.sample_item();
        let expected = ma.iter().any(|&r| {
            let row = &self.rows[r as usize - 1];
            items.iter().all(|i| row[i.column] == i.value) && row[reference.column] != reference.value
        });
        assert_eq!(a.contains_special_row(&items, &reference, &self.rows), expected);
    }
}

#[test]
fn test_simulation() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    for i in 0..200 {
        let seed = rand::thread_rng().gen();
        if i % 50 == 0 {
            eprintln!("Using seed {:?}", seed);
        }
        let mut s = Simulation::new(StdRng::seed_from_u64(seed));
        for _ in 0..20 {
            s.step();
        }
    }
}

#[quickcheck]
fn qc_add_contains(rows: Vec<u16>) -> bool {
    let model: BTreeSet<u32> = rows.into_iter().map(u32::from).collect();
    let s = bitmap_of(&model);
    s.len() == model.len()
        && model.iter().all(|&r| s.contains(r))
        && s.iter().eq(model.iter().cloned())
}

#[quickcheck]
fn qc_duplicates_rejected(rows: Vec<u16>) -> bool {
    let mut s = BitRowSet::new(0, u32::from(u16::MAX)).unwrap();
    let mut model = BTreeSet::new();
    for r in rows.into_iter().map(u32::from) {
        if s.add(r).is_ok() != model.insert(r) {
            return false;
        }
    }
    s.len() == model.len()
}

#[quickcheck]
fn qc_intersect(a: Vec<u16>, b: Vec<u16>, shift: u16) -> bool {
    let ma: BTreeSet<u32> = a.into_iter().map(u32::from).collect();
    let mb: BTreeSet<u32> = b.into_iter().map(|r| u32::from(r) + u32::from(shift)).collect();
    let shared: Vec<u32> = ma.intersection(&mb).cloned().collect();

    let (a, b) = (bitmap_of(&ma), bitmap_of(&mb));
    let ab = a.intersect_with(&b);
    let ba = b.intersect_with(&a);
    sorted(&ab) == shared
        && sorted(&ba) == shared
        && ab.len() == shared.len()
        && a.is_support_row_present(&b) == (shared.len() == 1)
        && b.is_support_row_present(&a) == (shared.len() == 1)
}

#[quickcheck]
fn qc_support_row(a: Vec<u8>, shared: u8) -> bool {
    let shared = u32::from(shared);
    let mut ma: BTreeSet<u32> = a.into_iter().map(|r| u32::from(r) * 2 + 1).collect();
    let mut mb: BTreeSet<u32> = ma.iter().map(|r| r + 1).collect();
    ma.insert(shared * 2);
    mb.insert(shared * 2);
    bitmap_of(&ma).is_support_row_present(&bitmap_of(&mb))
}
