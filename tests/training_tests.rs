//! Training loop, chunked resumption and cancellation

mod common;

use common::key;
use qtictactoe::{
    Difficulty, QLearningAgent,
    adapters::InMemoryRepository,
    pipeline::{
        AGENT, Anneal, ChunkedTrainer, MetricsObserver, StopAfter, TrainingConfig, TrainingLoop,
    },
    ports::ValueTableRepository,
    q_learning::{TdParams, TerminalValue, Transition, ValueTable},
    tictactoe::{Board, Player},
};

fn seeded_config(episodes: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        episodes,
        seed: Some(seed),
        ..TrainingConfig::default()
    }
}

#[test]
fn test_single_td_update_from_zero() {
    let before = key("X________");
    let after = key("X___O____");
    let mut table = ValueTable::new();

    let value = table.td_update(
        Transition {
            before: &before,
            action: 4,
            reward: 1.0,
            after: &after,
            terminal: false,
        },
        TdParams {
            learning_rate: 0.5,
            discount: 0.9,
            terminal_value: TerminalValue::Bootstrap,
        },
    );

    assert_eq!(value, 0.5);
    assert_eq!(table.value(&before, 4), 0.5);
    assert_eq!(table.values(&after), Some(&[0.0; 9]));
}

#[test]
fn test_training_grows_table_from_empty() {
    let mut table = ValueTable::new();
    let mut training = TrainingLoop::new(seeded_config(5000, 2024)).unwrap();

    let report = training.run(&mut table).unwrap();

    assert_eq!(report.episodes, 5000);
    assert_eq!(report.table_size_before, 0);
    assert!(report.table_size_after > 0);
    assert_eq!(report.table_size_after, table.len());
    assert_eq!(
        report.agent_wins + report.opponent_wins + report.draws,
        5000
    );
    assert!(!report.cancelled);
}

#[test]
fn test_trained_values_stay_finite_and_bounded() {
    let mut table = ValueTable::new();
    TrainingLoop::new(Difficulty::Medium.training_config())
        .unwrap()
        .run(&mut table)
        .unwrap();

    for (_, values) in table.iter() {
        for &v in values {
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v), "value {v} out of range");
        }
    }
}

#[test]
fn test_opponent_wins_are_never_credited_to_the_agent() {
    // The opponent's winning move is not the agent's transition, and an
    // agent move can only end the game in its own win or a draw. The only
    // negative reward would come from crediting an opponent win.
    for seed in [1, 2, 3] {
        let mut table = ValueTable::new();
        let report = TrainingLoop::new(seeded_config(3000, seed))
            .unwrap()
            .run(&mut table)
            .unwrap();
        assert!(report.opponent_wins > 0, "seed {seed} never lost");

        for (state, values) in table.iter() {
            assert!(
                values.iter().all(|&v| v >= 0.0),
                "negative value in {state}: {values:?}"
            );
        }
    }
}

#[test]
fn test_agent_blocks_fixed_opponent() {
    // Opponent plays cell 0, then cell 1. The table prefers the centre first
    // and the block on cell 2 next.
    let mut table = ValueTable::new();
    table.set(&key("X________"), 4, 0.4);
    table.set(&key("XX__O____"), 2, 0.7);
    table.set(&key("XX__O____"), 8, 0.2);

    let mut agent = QLearningAgent::for_difficulty(Difficulty::Hard);
    let mut board = Board::new().apply_action(0, Player::X).unwrap();

    let first = agent.select_move(&table, &board).unwrap();
    assert_eq!(first, 4);
    board = board.apply_action(first, AGENT).unwrap();
    board = board.apply_action(1, Player::X).unwrap();

    let second = agent.select_move(&table, &board).unwrap();
    assert_eq!(second, 2);
}

#[test]
fn test_learned_win_preferred_over_block() {
    // X: 0, 1, 6. O: 3, 4. O can win on 5 or block on 2.
    let state = key("XX_OO_X__");
    let params = TdParams {
        learning_rate: 0.5,
        discount: 0.9,
        terminal_value: TerminalValue::Bootstrap,
    };
    let mut table = ValueTable::new();
    table.td_update(
        Transition {
            before: &state,
            action: 5,
            reward: 1.0,
            after: &key("XX_OOOX__"),
            terminal: true,
        },
        params,
    );
    table.td_update(
        Transition {
            before: &state,
            action: 2,
            reward: 0.0,
            after: &key("XXOOO_X__"),
            terminal: false,
        },
        params,
    );

    let board = Board::from_key(&state);
    let mut agent = QLearningAgent::new(0.0);
    assert_eq!(agent.select_move(&table, &board).unwrap(), 5);
}

#[test]
fn test_stop_request_ends_run_at_batch_boundary() {
    let metrics = MetricsObserver::new();
    let handle = metrics.handle();

    let mut training = TrainingLoop::new(seeded_config(1000, 5))
        .unwrap()
        .with_observer(Box::new(metrics))
        .with_observer(Box::new(StopAfter::new(300)));

    let mut table = ValueTable::new();
    let report = training.run(&mut table).unwrap();

    // 300 is not a boundary; the stop lands on 400
    assert_eq!(report.episodes, 400);
    assert!(report.cancelled);

    let metrics = handle.lock().unwrap().clone();
    assert_eq!(metrics.episodes, 400);
    assert_eq!(metrics.progress, vec![(200, 1000), (400, 1000)]);
}

#[test]
fn test_progress_reported_after_final_episode() {
    let metrics = MetricsObserver::new();
    let handle = metrics.handle();
    let mut training = TrainingLoop::new(seeded_config(450, 1))
        .unwrap()
        .with_observer(Box::new(metrics));

    training.run(&mut ValueTable::new()).unwrap();

    let progress = handle.lock().unwrap().progress.clone();
    assert_eq!(progress, vec![(200, 450), (400, 450), (450, 450)]);
}

#[test]
fn test_chunked_training_saves_every_chunk() {
    let repo = InMemoryRepository::new();
    let training = TrainingLoop::new(seeded_config(300, 8)).unwrap();
    let mut trainer = ChunkedTrainer::new(repo.clone(), training);
    assert_eq!(trainer.chunk_size(), 100);

    let (table, report) = trainer.run().unwrap();

    assert_eq!(repo.save_count(), 3);
    assert_eq!(report.episodes, 300);
    assert_eq!(repo.load().unwrap(), table);
}

#[test]
fn test_chunked_training_matches_single_run() {
    let mut single = ValueTable::new();
    TrainingLoop::new(seeded_config(600, 77))
        .unwrap()
        .run(&mut single)
        .unwrap();

    let repo = InMemoryRepository::new();
    let training = TrainingLoop::new(seeded_config(600, 77)).unwrap();
    let (chunked, _) = ChunkedTrainer::new(repo, training)
        .with_chunk_size(150)
        .with_anneal(Anneal::Global)
        .run()
        .unwrap();

    assert_eq!(chunked, single);
}

#[test]
fn test_per_chunk_anneal_matches_back_to_back_sessions() {
    // Two sessions of 100 episodes, each annealing over its own episodes
    let mut sessions = ValueTable::new();
    let mut training = TrainingLoop::new(seeded_config(100, 31)).unwrap();
    training.run_range(&mut sessions, 0..100).unwrap();
    training.run_range(&mut sessions, 0..100).unwrap();

    let training = TrainingLoop::new(seeded_config(200, 31)).unwrap();
    let (chunked, report) = ChunkedTrainer::new(InMemoryRepository::new(), training)
        .with_chunk_size(100)
        .run()
        .unwrap();

    assert_eq!(report.episodes, 200);
    assert_eq!(chunked, sessions);
}

#[test]
fn test_chunked_training_resumes_from_store() {
    let repo = InMemoryRepository::new();

    let stopped = TrainingLoop::new(seeded_config(400, 3))
        .unwrap()
        .with_observer(Box::new(StopAfter::new(100)));
    let (partial, first) = ChunkedTrainer::new(repo.clone(), stopped)
        .with_chunk_size(100)
        .run()
        .unwrap();

    assert!(first.cancelled);
    assert_eq!(first.episodes, 100);
    assert_eq!(repo.save_count(), 1);
    assert_eq!(repo.load().unwrap(), partial);

    let resumed = TrainingLoop::new(seeded_config(400, 4)).unwrap();
    let (full, second) = ChunkedTrainer::new(repo.clone(), resumed)
        .with_chunk_size(100)
        .run()
        .unwrap();

    assert_eq!(second.table_size_before, partial.len());
    assert!(full.len() >= partial.len());
    for (state, _) in partial.iter() {
        assert!(full.contains(state));
    }
}

#[test]
fn test_corrupt_store_does_not_block_training() {
    let repo = InMemoryRepository::new();
    repo.put_raw("definitely not a table");

    let training = TrainingLoop::new(seeded_config(100, 1)).unwrap();
    let (table, report) = ChunkedTrainer::new(repo.clone(), training).run().unwrap();

    assert_eq!(report.table_size_before, 0);
    assert!(!table.is_empty());
    assert_eq!(repo.load().unwrap(), table);
}

#[test]
fn test_terminal_value_modes_learn_same_table() {
    let mut bootstrap = ValueTable::new();
    let mut zero = ValueTable::new();

    TrainingLoop::new(seeded_config(500, 21))
        .unwrap()
        .run(&mut bootstrap)
        .unwrap();
    TrainingLoop::new(TrainingConfig {
        terminal_value: TerminalValue::Zero,
        ..seeded_config(500, 21)
    })
    .unwrap()
    .run(&mut zero)
    .unwrap();

    // Terminal states are never updated as "before" states, so their stored
    // vector stays zero and both conventions learn the same table.
    assert_eq!(bootstrap, zero);
}
