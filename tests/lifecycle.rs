//! Whole-run scenarios through the public API: build, seed, step, stop.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use toroidal_life::{
    config::{Command, Config},
    draw::{drive, render_frame, Controls},
    grid::{Cell, Grid},
    proc::{Engine, Outcome},
    GridError,
};

use std::time::Duration;

fn seeded(size: usize, cells: usize, seed: u64) -> Grid {
    let mut g = Grid::new(size).unwrap();
    g.seed(cells, &mut StdRng::seed_from_u64(seed));
    g
}

fn run_to_end(engine: &mut Engine) {
    while !engine.is_terminal() {
        engine.step();
    }
}

#[test]
fn empty_seed_is_terminal_before_any_step() {
    let e = Engine::new(seeded(3, 0, 1), Some(5));
    assert!(e.is_terminal());
    assert!(e.is_extinct());
    assert_eq!(e.generation_count(), 0);
}

#[test]
fn still_life_runs_to_the_cap() {
    let mut g = Grid::new(6).unwrap();
    for (r, c) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
        g.set(r, c, Cell::Alive);
    }
    let mut e = Engine::new(g, Some(10));
    run_to_end(&mut e);
    assert_eq!(e.generation_count(), 10);
    assert!(!e.is_extinct());
    assert_eq!(e.outcome(), Some(Outcome::CapReached { generation: 10 }));
}

#[test]
fn zero_cap_stops_immediately() {
    let e = Engine::new(seeded(10, 30, 9), Some(0));
    assert!(e.is_terminal());
    assert_eq!(e.generation_count(), 0);
}

#[test]
fn zero_size_fails_at_construction() {
    let c = match Config::parse(["-s", "0"]).unwrap() {
        Command::Run(c) => c,
        Command::Help => unreachable!(),
    };
    assert_eq!(
        Grid::new(c.size),
        Err(GridError::InvalidDimension { size: 0 })
    );
}

#[test]
fn same_seed_same_history() {
    let mut a = Engine::new(seeded(25, 200, 1234), Some(30));
    let mut b = Engine::new(seeded(25, 200, 1234), Some(30));
    assert_eq!(a.grid(), b.grid());
    for _ in 0..30 {
        a.step();
        b.step();
        assert_eq!(a.grid(), b.grid());
    }
}

#[test]
fn driver_reports_cap() {
    let g: Grid = "______\n______\n__oo__\n__oo__\n______\n______\n".parse().unwrap();
    let mut e = Engine::new(g, Some(100));
    let mut last = String::new();
    let s = drive(&mut e, &Controls::new(Duration::ZERO), |g, _| {
        last = render_frame(g);
        Ok(())
    })
    .unwrap();
    assert_eq!(s.to_string(), "100 generations");
    assert_eq!(last.matches(" o ").count(), 4);
}

proptest! {
    #[test]
    fn extinct_stays_extinct(size in 1usize..12, cells in 0usize..20, seed in any::<u64>()) {
        let mut e = Engine::new(seeded(size, cells, seed), Some(40));
        let mut extinct = e.is_extinct();
        while e.generation_count() < 40 {
            e.step();
            if extinct {
                prop_assert!(e.is_extinct());
            }
            extinct = e.is_extinct();
        }
    }

    #[test]
    fn runs_end_by_extinction_or_cap(
        size in 1usize..10,
        cells in 0usize..30,
        cap in 0u64..20,
        seed in any::<u64>(),
    ) {
        let mut e = Engine::new(seeded(size, cells, seed), Some(cap));
        run_to_end(&mut e);
        prop_assert!(e.generation_count() <= cap);
        match e.outcome() {
            Some(Outcome::Extinct { generation }) => prop_assert!(e.is_extinct() && generation < cap),
            Some(Outcome::CapReached { generation }) => prop_assert_eq!(generation, cap),
            None => prop_assert!(false, "terminal run without outcome"),
        }
    }
}
