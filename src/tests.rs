#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::automaton::{
        run, topple, Grid, Outcome, Parallel, Sequential, Strategy as SweepStrategy, TileLattice,
        TiledSequential, TracingObserver,
    };
    use crate::presets::Preset;
    use crate::state::Sandpile;

    const BUDGET: u32 = 100_000;

    /// Sparse random grain counts, sink layer included.
    fn arb_grid() -> impl Strategy<Value = Grid> {
        (5usize..20).prop_flat_map(|dim| {
            proptest::collection::vec(prop_oneof![3 => Just(0u32), 2 => 0u32..16], dim * dim)
                .prop_map(move |cells| Grid::from_cells(dim, cells).unwrap())
        })
    }

    fn arb_grid_and_tiling() -> impl Strategy<Value = (Grid, usize, usize, usize)> {
        arb_grid().prop_flat_map(|grid| {
            let dim = grid.dim();
            (Just(grid), 2..=dim, 2..=dim, 1usize..5)
        })
    }

    fn uniform_four(dim: usize) -> Grid {
        let mut grid = Grid::new(dim).unwrap();
        Preset::Uniform.apply(&mut grid, 0);
        grid
    }

    fn all_strategies(dim: usize, tw: usize, th: usize, workers: usize) -> Vec<Box<dyn SweepStrategy>> {
        vec![
            Box::new(Sequential::new()),
            Box::new(TiledSequential::new(dim, tw, th).unwrap()),
            Box::new(Parallel::new(dim, tw, th, workers).unwrap()),
        ]
    }

    #[test]
    fn test_single_pile_scenario() {
        // dim 5, (2,2) = 8: the first sweep topples, the second is quiet
        for strategy in all_strategies(5, 2, 2, 2) {
            let mut grid = Grid::new(5).unwrap();
            grid.set(2, 2, 8).unwrap();

            assert_eq!(
                run(&mut grid, strategy.as_ref(), 10),
                Outcome::Stable { iteration: 2 },
                "{}",
                strategy.name()
            );

            let mut expected = Grid::new(5).unwrap();
            for (y, x) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
                expected.set(y, x, 2).unwrap();
            }
            assert_eq!(grid, expected, "{}", strategy.name());
        }
    }

    #[test]
    fn test_uniform_four_scenario() {
        let expected: Vec<u32> = vec![
            0, 2, 2, 2, 2, 0, //
            2, 0, 3, 3, 0, 2, //
            2, 3, 2, 2, 3, 2, //
            2, 3, 2, 2, 3, 2, //
            2, 0, 3, 3, 0, 2, //
            0, 2, 2, 2, 2, 0, //
        ];

        for (tw, th) in [(2, 2), (3, 3), (2, 5), (6, 6)] {
            for strategy in all_strategies(6, tw, th, 3) {
                let mut grid = uniform_four(6);
                let outcome = run(&mut grid, strategy.as_ref(), 100);

                assert!(outcome.is_stable(), "{} {tw}x{th}", strategy.name());
                assert_eq!(grid.cells(), expected.as_slice(), "{} {tw}x{th}", strategy.name());
                assert_eq!(grid.total_mass(), 64);
                assert_eq!(grid.sink_mass(), 32);
            }
        }
    }

    #[test]
    fn test_zero_budget_scenario() {
        for strategy in all_strategies(8, 4, 4, 2) {
            let mut grid = uniform_four(8);
            let before = grid.clone();

            assert_eq!(run(&mut grid, strategy.as_ref(), 0), Outcome::NotConverged);
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_middle_pile_all_strategies_agree() {
        let dim = 48;
        let mut reference = Sandpile::new(dim).unwrap();
        reference.apply_preset(Preset::Middle, 0);
        let mut tiled = reference.clone();
        let mut parallel = reference.clone();

        assert!(reference.run_sequential(BUDGET).is_stable());
        assert!(tiled.run_tiled(BUDGET, 8, 8).unwrap().is_stable());
        assert!(parallel.run_parallel(BUDGET, 8, 6, 4).unwrap().is_stable());

        assert_eq!(tiled.grid(), reference.grid());
        assert_eq!(parallel.grid(), reference.grid());
        assert!(reference.grid().is_stable());
        assert_eq!(reference.grid().total_mass(), 10_000);
    }

    #[test]
    fn test_random_preset_with_tracing_observer() {
        let dim = 64;
        let mut grid = Grid::new(dim).unwrap();
        Preset::Random.apply(&mut grid, 7);
        let mut expected = grid.clone();

        let strategy = Parallel::new(dim, 16, 16, 4)
            .unwrap()
            .with_observer(Arc::new(TracingObserver));
        assert!(run(&mut grid, &strategy, BUDGET).is_stable());
        assert!(run(&mut expected, &Sequential::new(), BUDGET).is_stable());

        assert_eq!(grid, expected);
    }

    proptest! {
        #[test]
        fn prop_topple_moves_quarter_to_each_neighbour(
            dim in 3usize..10,
            fill in proptest::collection::vec(0u32..64, 100),
            pick in any::<prop::sample::Index>(),
            value in 0u32..100_000,
        ) {
            let mut grid = Grid::from_cells(dim, fill[..dim * dim].to_vec()).unwrap();
            let interior: Vec<(usize, usize)> = (1..dim - 1)
                .flat_map(|y| (1..dim - 1).map(move |x| (y, x)))
                .collect();
            let (y, x) = *pick.get(&interior);
            grid.set(y, x, value).unwrap();
            let before = grid.clone();

            let toppled = topple(&mut grid, y, x);

            prop_assert_eq!(toppled, value >= 4);
            prop_assert_eq!(grid.total_mass(), before.total_mass());
            if toppled {
                prop_assert_eq!(grid.get(y, x).unwrap(), value % 4);
                for (ny, nx) in [(y - 1, x), (y + 1, x), (y, x - 1), (y, x + 1)] {
                    prop_assert_eq!(grid.get(ny, nx).unwrap(), before.get(ny, nx).unwrap() + value / 4);
                }
            } else {
                prop_assert_eq!(&grid, &before);
            }
        }

        #[test]
        fn prop_parity_phases_never_alias(
            (dim, tw, th) in (3usize..40).prop_flat_map(|dim| (Just(dim), 2..=dim, 2..=dim)),
        ) {
            let lattice = TileLattice::new(dim, tw, th).unwrap();
            prop_assert!(lattice.phases_are_disjoint());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_strategies_reach_same_fixed_point((grid, tw, th, workers) in arb_grid_and_tiling()) {
            let dim = grid.dim();
            let mut results = Vec::new();

            for strategy in all_strategies(dim, tw, th, workers) {
                let mut g = grid.clone();
                let outcome = run(&mut g, strategy.as_ref(), BUDGET);
                prop_assert!(outcome.is_stable());
                prop_assert!(g.is_stable());
                prop_assert_eq!(g.total_mass(), grid.total_mass());
                results.push(g);
            }

            prop_assert_eq!(&results[0], &results[1]);
            prop_assert_eq!(&results[0], &results[2]);
        }

        #[test]
        fn prop_parallel_independent_of_worker_count(
            (grid, tw, th, workers) in arb_grid_and_tiling(),
            budget in 0u32..12,
        ) {
            let dim = grid.dim();

            let mut single = grid.clone();
            let single_outcome = run(&mut single, &Parallel::new(dim, tw, th, 1).unwrap(), budget);

            let mut many = grid.clone();
            let many_outcome = run(&mut many, &Parallel::new(dim, tw, th, workers).unwrap(), budget);

            prop_assert_eq!(single_outcome, many_outcome);
            prop_assert_eq!(single, many);
        }

        #[test]
        fn prop_stability_is_absorbing((grid, tw, th, workers) in arb_grid_and_tiling()) {
            let dim = grid.dim();
            let strategies = all_strategies(dim, tw, th, workers);

            let mut g = grid;
            prop_assert!(run(&mut g, strategies[0].as_ref(), BUDGET).is_stable());
            let fixed_point = g.clone();

            for strategy in &strategies {
                for _ in 0..3 {
                    prop_assert!(!strategy.sweep(&mut g));
                }
            }
            prop_assert_eq!(g, fixed_point);
        }

        #[test]
        fn prop_iteration_index_within_budget(
            (grid, tw, th, workers) in arb_grid_and_tiling(),
            budget in 0u32..40,
        ) {
            let dim = grid.dim();
            for strategy in all_strategies(dim, tw, th, workers) {
                let mut g = grid.clone();
                let outcome = run(&mut g, strategy.as_ref(), budget);
                match outcome {
                    Outcome::Stable { iteration } => {
                        prop_assert!(iteration >= 1 && iteration <= budget);
                        prop_assert!(g.is_stable());
                    }
                    Outcome::NotConverged => prop_assert_eq!(outcome.as_raw(), 0),
                }
            }
        }
    }
}
