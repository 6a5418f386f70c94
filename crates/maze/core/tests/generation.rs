use maze_core::{
    Cell, Distance, GenerateError, Grid, Heading, MazeGenerator, Position, SimError, flood_fill,
    generate,
};

/// Undirected edges between horizontally or vertically adjacent free cells.
fn free_edges(grid: &Grid) -> usize {
    grid.iter()
        .filter(|(_, cell)| cell.is_free())
        .map(|(position, _)| {
            [Heading::East, Heading::South]
                .into_iter()
                .filter(|&heading| grid.is_free(position.neighbor(heading)))
                .count()
        })
        .sum()
}

fn assert_perfect(grid: &Grid, from: Position) {
    let free = grid.count(Cell::Free);
    assert_eq!(free_edges(grid), free - 1, "free cells must form a tree\n{grid}");

    let distances = flood_fill(grid, from);
    for (position, cell) in grid.iter() {
        if cell.is_free() {
            assert!(
                distances.get(position).is_reachable(),
                "{position} unreachable\n{grid}"
            );
        }
    }
}

#[test]
fn generated_mazes_are_perfect() {
    for (height, width) in [(3, 3), (5, 5), (7, 13), (21, 9), (31, 31)] {
        for seed in 0..8 {
            let maze = generate(height, width, Some(seed)).unwrap();
            assert_eq!(maze.grid().dimensions().height, height);
            assert_eq!(maze.grid().dimensions().width, width);
            assert_perfect(maze.grid(), maze.goal());
        }
    }
}

#[test]
fn tree_property_holds_for_short_budgets_too() {
    for iterations in [0, 1, 2, 5, 17, 100] {
        let maze = MazeGenerator::new()
            .with_iterations(iterations)
            .generate(9, 11, 3)
            .unwrap();
        assert_perfect(maze.grid(), maze.start());
    }
}

#[test]
fn same_seed_reproduces_the_maze() {
    let a = generate(25, 19, Some(2024)).unwrap();
    let b = generate(25, 19, Some(2024)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed(), 2024);

    let c = generate(25, 19, Some(2025)).unwrap();
    assert_ne!(a.grid(), c.grid());
}

#[test]
fn random_seed_is_reported_and_reproducible() {
    let drawn = generate(11, 11, None).unwrap();
    let replay = generate(11, 11, Some(drawn.seed())).unwrap();
    assert_eq!(drawn, replay);
}

#[test]
fn ideal_step_count_matches_flood_fill_over_truth() {
    let maze = generate(15, 15, Some(9)).unwrap();
    let expected = flood_fill(maze.grid(), maze.goal()).get(maze.start());
    assert_eq!(maze.ideal_step_count().map(Distance::new), Some(expected));
    assert!(maze.ideal_step_count().unwrap() >= maze.start().manhattan(maze.goal()));
}

#[test]
fn invalid_dimensions_are_validation_errors() {
    let error = generate(8, 9, Some(0)).unwrap_err();
    assert_eq!(
        error,
        GenerateError::InvalidDimensions {
            height: 8,
            width: 9
        }
    );
    assert!(!error.severity().is_recoverable());
    assert_eq!(error.error_code(), "invalid_dimensions");
}

#[test]
fn dimensions_beyond_the_coordinate_range_are_rejected() {
    // Both odd, but 46341 * 46341 cells overflow i32 row-major offsets.
    assert_eq!(
        generate(46_341, 46_341, Some(0)),
        Err(GenerateError::InvalidDimensions {
            height: 46_341,
            width: 46_341
        })
    );
    assert_eq!(
        generate(3, u32::MAX, Some(0)),
        Err(GenerateError::InvalidDimensions {
            height: 3,
            width: u32::MAX
        })
    );
}

