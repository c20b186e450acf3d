use worldshift_core::{
    CellCoord, Command, DirectionalInput, Event, SubCellOffset, WorldTag, TILE_SIZE,
};
use worldshift_world::{self as world, query, Legend, Level, LevelSet};

const RIGHT: DirectionalInput = DirectionalInput {
    right: true,
    ..DirectionalInput::IDLE
};

const RIGHT_DOWN: DirectionalInput = DirectionalInput {
    right: true,
    down: true,
    ..DirectionalInput::IDLE
};

fn level_set(rows: &[&str]) -> LevelSet {
    let level = Level::parse(&rows.join("\n"), &Legend::standard()).expect("valid level");
    LevelSet::new(vec![level]).expect("non-empty level set")
}

fn tick(level_set: &mut LevelSet, input: DirectionalInput) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(level_set, Command::Tick { input }, &mut events);
    events
}

fn corner_level(row_five: &str, row_six: &str) -> LevelSet {
    let solid = "########";
    level_set(&[solid, solid, solid, solid, solid, row_five, row_six, solid])
}

#[test]
fn diagonal_move_wins_when_available() {
    let mut level_set = corner_level("#####P##", "######,#");
    assert_eq!(query::player(&level_set).cell, CellCoord::new(5, 5));

    let events = tick(&mut level_set, RIGHT_DOWN);

    let player = query::player(&level_set);
    assert_eq!(player.cell, CellCoord::new(6, 6));
    assert_eq!(player.offset, SubCellOffset::new(-TILE_SIZE, -TILE_SIZE));
    assert!(events.contains(&Event::PlayerStepped {
        from: CellCoord::new(5, 5),
        to: CellCoord::new(6, 6),
    }));
}

#[test]
fn horizontal_fallback_when_diagonal_blocked() {
    let mut level_set = corner_level("#####P,#", "########");

    let _ = tick(&mut level_set, RIGHT_DOWN);

    let player = query::player(&level_set);
    assert_eq!(player.cell, CellCoord::new(6, 5));
    assert_eq!(player.offset, SubCellOffset::new(-TILE_SIZE, 0));
}

#[test]
fn vertical_fallback_when_horizontal_blocked() {
    let mut level_set = corner_level("#####P##", "#####,##");

    let _ = tick(&mut level_set, RIGHT_DOWN);

    let player = query::player(&level_set);
    assert_eq!(player.cell, CellCoord::new(5, 6));
    assert_eq!(player.offset, SubCellOffset::new(0, -TILE_SIZE));
}

#[test]
fn no_walkable_neighbour_leaves_player_settled() {
    let mut level_set = corner_level("#####P##", "########");

    let events = tick(&mut level_set, RIGHT_DOWN);

    let player = query::player(&level_set);
    assert_eq!(player.cell, CellCoord::new(5, 5));
    assert_eq!(player.offset, SubCellOffset::ZERO);
    assert_eq!(events.len(), 1, "only the time advance is reported: {events:?}");
}

#[test]
fn grid_edge_and_void_are_never_walkable() {
    let mut level_set = level_set(&["P.,"]);

    let _ = tick(
        &mut level_set,
        DirectionalInput {
            left: true,
            ..DirectionalInput::IDLE
        },
    );
    let _ = tick(&mut level_set, RIGHT);

    assert_eq!(query::player(&level_set).cell, CellCoord::new(0, 0));
}

#[test]
fn world_gated_door_blocks_world_zero() {
    let mut level_set = level_set(&["P2,"]);

    for _ in 0..(TILE_SIZE * 2) {
        let _ = tick(&mut level_set, RIGHT);
    }

    let player = query::player(&level_set);
    assert_eq!(player.cell, CellCoord::new(0, 0));
    assert_eq!(player.world, WorldTag::new(0));
}

#[test]
fn world_gated_door_opens_after_world_change() {
    let mut level_set = level_set(&["P12,"]);

    let _ = tick(&mut level_set, RIGHT);
    assert_eq!(query::player(&level_set).cell, CellCoord::new(1, 0));

    for _ in 0..TILE_SIZE {
        let _ = tick(&mut level_set, RIGHT);
    }

    let player = query::player(&level_set);
    assert_eq!(player.world, WorldTag::new(2));
    assert_eq!(player.cell, CellCoord::new(2, 0), "door must open for world 2");
}

#[test]
fn world_changes_only_once_animation_settles() {
    let mut level_set = level_set(&["P1,"]);

    let _ = tick(&mut level_set, RIGHT);
    assert_eq!(query::player(&level_set).cell, CellCoord::new(1, 0));
    assert_eq!(query::player(&level_set).world, WorldTag::new(0));

    for elapsed in 1..TILE_SIZE {
        let events = tick(&mut level_set, DirectionalInput::IDLE);
        assert_eq!(
            query::player(&level_set).world,
            WorldTag::new(0),
            "world changed early after {elapsed} ticks"
        );
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::WorldShifted { .. })));
    }

    let events = tick(&mut level_set, DirectionalInput::IDLE);
    let player = query::player(&level_set);
    assert_eq!(player.world, WorldTag::new(2));
    assert_eq!(player.offset, SubCellOffset::ZERO);
    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced {
                tick: u64::try_from(TILE_SIZE).expect("tile size fits") + 1
            },
            Event::PlayerArrived {
                cell: CellCoord::new(1, 0)
            },
            Event::WorldShifted {
                from: WorldTag::new(0),
                to: WorldTag::new(2)
            },
        ]
    );
}

#[test]
fn input_is_ignored_while_animating() {
    let mut level_set = level_set(&["P,,,"]);

    let _ = tick(&mut level_set, RIGHT);
    for _ in 1..TILE_SIZE {
        let _ = tick(&mut level_set, RIGHT);
        assert_eq!(query::player(&level_set).cell, CellCoord::new(1, 0));
    }

    let _ = tick(&mut level_set, RIGHT);
    assert_eq!(query::player(&level_set).cell, CellCoord::new(2, 0));
}

#[test]
fn identical_input_scripts_replay_identically() {
    let script: Vec<DirectionalInput> = (0..200)
        .map(|frame| match frame % 50 {
            0..=19 => RIGHT,
            20..=29 => RIGHT_DOWN,
            _ => DirectionalInput {
                up: true,
                left: frame % 3 == 0,
                ..DirectionalInput::IDLE
            },
        })
        .collect();
    let rows = ["#########", "#P,1,2,,#", "#,,#,#,,#", "#,,,,3,4#", "#########"];

    let replay = |script: &[DirectionalInput]| {
        let mut level_set = level_set(&rows);
        let mut log = Vec::new();
        for input in script {
            log.extend(tick(&mut level_set, *input));
        }
        (log, query::player(&level_set))
    };

    assert_eq!(replay(&script), replay(&script));
}
