//! End-to-end tests for chess-review.
//!
//! Most tests drive a scripted UCI engine hosted in-process on the same
//! channel transport a real engine process uses. The Stockfish test is
//! ignored by default.
//! Run it with: `cargo test -p chess-review --test integration -- --ignored`

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chess_core::Fen;
use chess_openings::OpeningBook;
use chess_review::{
    AnalysisController, EngineClient, EngineChannel, LiveSnapshot, MoveQuality, NullPresenter,
    RecordedGame, RecordedPly, ReviewConfig, ReviewEntry, ReviewError, ReviewPipeline,
    ReviewPresenter, ReviewReport, ReviewState,
};
use uci::GuiCommand;

const BEFORE_E4: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const BEFORE_E5: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
const BEFORE_NF3: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
const BEFORE_NC6: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";
const BEFORE_BB5: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";

/// White-perspective scores per position, best line first.
#[derive(Clone, Default)]
struct Script {
    lines: HashMap<String, Vec<i32>>,
    /// Positions whose bounded searches never finish.
    silent: HashSet<String>,
}

impl Script {
    fn with(mut self, fen: &str, scores: &[i32]) -> Self {
        self.lines.insert(fen.to_string(), scores.to_vec());
        self
    }

    fn silent(mut self, fen: &str) -> Self {
        self.silent.insert(fen.to_string());
        self
    }
}

type CommandLog = Arc<Mutex<Vec<String>>>;

/// Starts a scripted engine and returns a client connected to it.
fn scripted_engine(script: Script) -> (EngineClient, CommandLog) {
    let (channel, mut endpoint) = EngineChannel::pair(256);
    let log: CommandLog = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();

    tokio::spawn(async move {
        let mut multipv = 1usize;
        let mut position: Option<Fen> = None;
        let mut pending = false;
        let mut infinite_searches = 0u32;

        while let Some(command) = endpoint.next_command().await {
            let Ok(command) = command else { continue };
            seen.lock().unwrap().push(command.to_uci());
            match command {
                GuiCommand::Uci => {
                    let _ = endpoint.emit("id name Scripted 1.0").await;
                    let _ = endpoint.emit("id author chess-review tests").await;
                    let _ = endpoint.emit("uciok").await;
                }
                GuiCommand::IsReady => {
                    let _ = endpoint.emit("readyok").await;
                }
                GuiCommand::SetOption { name, value } if name == "MultiPV" => {
                    multipv = value.and_then(|v| v.parse().ok()).unwrap_or(1);
                }
                GuiCommand::Position { fen: Some(fen), .. } => {
                    position = Fen::parse(&fen).ok();
                }
                GuiCommand::Go(options) => {
                    let Some(fen) = &position else { continue };
                    let sign = fen.side_to_move().perspective();
                    let scores = script.lines.get(fen.as_str()).cloned().unwrap_or_else(|| vec![0]);

                    if options.infinite {
                        infinite_searches += 1;
                        let _ = endpoint
                            .emit(format!(
                                "info depth {} multipv 1 score cp {} pv a2a3",
                                infinite_searches,
                                scores[0] * sign
                            ))
                            .await;
                        pending = true;
                    } else if script.silent.contains(fen.as_str()) {
                        pending = true;
                    } else {
                        let depth = options.depth.unwrap_or(1);
                        for (rank, score) in scores.iter().take(multipv).enumerate() {
                            let _ = endpoint
                                .emit(format!(
                                    "info depth {} multipv {} score cp {} nodes 1000 pv a2a3",
                                    depth,
                                    rank + 1,
                                    score * sign
                                ))
                                .await;
                        }
                        let _ = endpoint.emit("bestmove a2a3").await;
                    }
                }
                GuiCommand::Stop => {
                    if pending {
                        pending = false;
                        let _ = endpoint.emit("bestmove a2a3").await;
                    }
                }
                GuiCommand::Quit => break,
                _ => {}
            }
        }
    });

    (EngineClient::new(channel), log)
}

/// Commands the engine has processed once it has caught up.
async fn settled(log: &CommandLog) -> Vec<String> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    log.lock().unwrap().clone()
}

fn ply(san: &str, fen: &str) -> RecordedPly {
    RecordedPly {
        san: san.to_string(),
        fen: Fen::parse(fen).unwrap(),
    }
}

fn ruy_lopez() -> RecordedGame {
    RecordedGame::new(vec![
        ply("e4", BEFORE_E4),
        ply("e5", BEFORE_E5),
        ply("Nf3", BEFORE_NF3),
        ply("Nc6", BEFORE_NC6),
        ply("Bb5", BEFORE_BB5),
    ])
    .unwrap()
}

fn config() -> ReviewConfig {
    let mut config = ReviewConfig::default();
    config.review.timeout_ms = 2_000;
    config
}

#[derive(Default)]
struct Recorder {
    started: Option<usize>,
    progress: Vec<(usize, usize)>,
    completed: bool,
    failed_fen: Option<String>,
    live_scores: Vec<Option<i32>>,
}

impl ReviewPresenter for Recorder {
    fn review_started(&mut self, total: usize) {
        self.started = Some(total);
    }

    fn review_progress(&mut self, entry: &ReviewEntry, completed: usize, total: usize) {
        assert_eq!(entry.record.ply + 1, completed);
        self.progress.push((completed, total));
    }

    fn review_complete(&mut self, _report: &ReviewReport) {
        self.completed = true;
    }

    fn review_failed(&mut self, error: &ReviewError) {
        self.failed_fen = error.fen().map(str::to_string);
    }

    fn live_evaluation(&mut self, snapshot: &LiveSnapshot) {
        self.live_scores.push(snapshot.line.score);
    }
}

#[tokio::test]
async fn ruy_lopez_bishop_move_is_theory_despite_loss() {
    // Bb5 position looks terrible for White: a 530cp "loss" if judged by the engine.
    let script = Script::default()
        .with(BEFORE_E4, &[20, 15])
        .with(BEFORE_E5, &[25, 20])
        .with(BEFORE_NF3, &[20, 10])
        .with(BEFORE_NC6, &[30, 25])
        .with(BEFORE_BB5, &[-500, -520]);
    let (mut client, _log) = scripted_engine(script);
    client.handshake(Duration::from_secs(1)).await.unwrap();
    assert_eq!(client.name(), Some("Scripted 1.0"));

    let mut controller = AnalysisController::new(client, &config(), OpeningBook::builtin());
    let mut recorder = Recorder::default();
    let report = controller
        .start_review(&ruy_lopez(), &mut recorder)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.entries.len(), 5);
    for (i, entry) in report.entries.iter().enumerate() {
        assert_eq!(entry.record.ply, i);
        assert_eq!(entry.quality, MoveQuality::Theory);
    }
    assert_eq!(report.entries[4].record.san, "Bb5");
    assert_eq!(report.entries[4].loss, 530);
    assert_eq!(report.curve, vec![20, 20, 25, 20, 30, -500]);
    assert_eq!(report.white.theory, 3);
    assert_eq!(report.black.theory, 2);

    assert_eq!(recorder.started, Some(5));
    assert_eq!(recorder.progress.len(), 5);
    assert_eq!(recorder.progress.last(), Some(&(5, 5)));
    assert!(recorder.completed);
    assert_eq!(controller.review_state(), &ReviewState::Complete);
    assert_eq!(controller.review_entries().len(), 5);
    assert_eq!(
        controller.opening_name("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4"),
        Some("Ruy Lopez: Morphy Defense")
    );
}

#[tokio::test]
async fn engine_judged_moves_follow_the_ladder() {
    let script = Script::default()
        .with(BEFORE_E4, &[20, 10])
        .with(BEFORE_E5, &[25, 20])
        .with(BEFORE_NF3, &[30, -250])
        .with(BEFORE_NC6, &[230, 220]);
    let (client, log) = scripted_engine(script);
    let game = RecordedGame::new(vec![
        ply("e4", BEFORE_E4),
        ply("e5", BEFORE_E5),
        ply("Nf3", BEFORE_NF3),
        ply("Nc6", BEFORE_NC6),
    ])
    .unwrap();

    let mut controller = AnalysisController::new(client, &config(), OpeningBook::new(Vec::new()));
    let report = controller
        .start_review(&game, &mut NullPresenter)
        .await
        .unwrap()
        .unwrap();

    let tiers: Vec<_> = report.entries.iter().map(|e| e.quality).collect();
    assert_eq!(
        tiers,
        vec![
            MoveQuality::Best,
            MoveQuality::Excellent,
            MoveQuality::Brilliant,
            MoveQuality::Blunder
        ]
    );
    let losses: Vec<_> = report.entries.iter().map(|e| e.loss).collect();
    assert_eq!(losses, vec![0, 5, -5, 200]);
    assert!(report.entries[2].critical);
    assert!(!report.entries[3].critical);
    assert_eq!(report.curve, vec![20, 20, 25, 30, 230]);
    assert_eq!(report.white.best, 1);
    assert_eq!(report.white.brilliant, 1);
    assert_eq!(report.black.excellent, 1);
    assert_eq!(report.black.blunders, 1);

    // Each request: MultiPV 2, position, go, then MultiPV back to 1.
    let commands = settled(&log).await;
    let per_ply: Vec<_> = commands.chunks(4).collect();
    assert_eq!(per_ply.len(), 4);
    for chunk in per_ply {
        assert_eq!(chunk[0], "setoption name MultiPV value 2");
        assert!(chunk[1].starts_with("position fen "));
        assert_eq!(chunk[2], "go depth 14");
        assert_eq!(chunk[3], "setoption name MultiPV value 1");
    }
}

#[tokio::test]
async fn single_reported_line_is_not_critical() {
    // Only one legal reply: the engine reports a single line.
    let script = Script::default().with(BEFORE_E4, &[-400]);
    let (client, _log) = scripted_engine(script);
    let game = RecordedGame::new(vec![ply("e4", BEFORE_E4)]).unwrap();

    let mut controller = AnalysisController::new(client, &config(), OpeningBook::new(Vec::new()));
    let report = controller
        .start_review(&game, &mut NullPresenter)
        .await
        .unwrap()
        .unwrap();

    let entry = &report.entries[0];
    assert_eq!(entry.score, -400);
    assert!(!entry.critical);
    assert_eq!(entry.loss, 420);
    assert_eq!(entry.quality, MoveQuality::Blunder);
}

#[tokio::test]
async fn timeout_fails_run_and_discards_entries() {
    let script = Script::default()
        .with(BEFORE_E4, &[20, 15])
        .silent(BEFORE_E5);
    let (client, log) = scripted_engine(script);
    let mut config = config();
    config.review.timeout_ms = 50;

    let mut controller = AnalysisController::new(client, &config, OpeningBook::builtin());
    let mut recorder = Recorder::default();
    let err = controller
        .start_review(&ruy_lopez(), &mut recorder)
        .await
        .unwrap_err();

    match &err {
        ReviewError::Timeout { fen, .. } => assert_eq!(fen, BEFORE_E5),
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert_eq!(
        controller.review_state(),
        &ReviewState::Failed {
            fen: Some(BEFORE_E5.to_string())
        }
    );
    assert!(controller.review_entries().is_empty());
    assert_eq!(recorder.progress.len(), 1);
    assert_eq!(recorder.failed_fen.as_deref(), Some(BEFORE_E5));
    assert!(!recorder.completed);

    // Nothing was requested after the failing position.
    let commands = settled(&log).await;
    assert!(!commands.iter().any(|c| c.contains(BEFORE_NF3)));
    assert!(commands.iter().any(|c| c == "stop"));

    // The run can be started again.
    let short = RecordedGame::new(vec![ply("e4", BEFORE_E4)]).unwrap();
    let report = controller
        .start_review(&short, &mut NullPresenter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(controller.review_state(), &ReviewState::Complete);
}

#[tokio::test]
async fn empty_game_yields_prior_only_curve() {
    let (client, log) = scripted_engine(Script::default());
    let mut controller = AnalysisController::new(client, &config(), OpeningBook::builtin());

    let report = controller
        .start_review(&RecordedGame::default(), &mut NullPresenter)
        .await
        .unwrap()
        .unwrap();

    assert!(report.entries.is_empty());
    assert_eq!(report.curve, vec![20]);
    assert_eq!(report.white.moves, 0);
    assert!(settled(&log).await.is_empty());
}

#[tokio::test]
async fn starting_while_running_is_a_no_op() {
    let script = Script::default().silent(BEFORE_E4);
    let (mut client, _log) = scripted_engine(script);
    let mut pipeline = ReviewPipeline::new(config().review);
    let book = OpeningBook::builtin();
    let game = ruy_lopez();

    // Abandon a run mid-request.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(30),
        pipeline.run(&mut client, &game, &book, &mut NullPresenter),
    )
    .await;
    assert!(abandoned.is_err());
    assert_eq!(
        pipeline.state(),
        &ReviewState::Running {
            completed: 0,
            total: 5
        }
    );

    let again = pipeline
        .run(&mut client, &game, &book, &mut NullPresenter)
        .await
        .unwrap();
    assert!(again.is_none());

    pipeline.reset();
    assert_eq!(pipeline.state(), &ReviewState::Idle);
}

#[tokio::test]
async fn review_halts_and_then_resumes_live_analysis() {
    let script = Script::default()
        .with(BEFORE_E4, &[35, 10])
        .with(BEFORE_E5, &[-60]);
    let (client, log) = scripted_engine(script);
    let mut controller = AnalysisController::new(client, &config(), OpeningBook::builtin());
    let mut recorder = Recorder::default();

    controller
        .view_position(Fen::parse(BEFORE_E5).unwrap(), &mut recorder)
        .await
        .unwrap();
    assert!(controller.wait_live(&mut recorder).await.unwrap());
    assert_eq!(controller.live_snapshot().unwrap().line.score, Some(-60));

    let game = RecordedGame::new(vec![ply("e4", BEFORE_E4)]).unwrap();
    let report = controller
        .start_review(&game, &mut recorder)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.entries[0].score, 35);

    let commands = settled(&log).await;
    let first_infinite = commands.iter().position(|c| c == "go infinite").unwrap();
    let stop = commands.iter().position(|c| c == "stop").unwrap();
    let review_go = commands.iter().position(|c| c == "go depth 14").unwrap();
    let resumed = commands.iter().rposition(|c| c == "go infinite").unwrap();
    assert!(first_infinite < stop && stop < review_go && review_go < resumed);

    // Output of the halted search never reaches the resumed session.
    assert!(controller.wait_live(&mut recorder).await.unwrap());
    assert_eq!(recorder.live_scores, vec![Some(-60), Some(-60)]);
    assert_eq!(controller.live_snapshot().unwrap().line.depth, Some(2));
}

#[tokio::test]
async fn continuous_analysis_toggle_and_exit() {
    let (client, log) = scripted_engine(Script::default().with(BEFORE_E4, &[18]));
    let mut controller = AnalysisController::new(client, &config(), OpeningBook::builtin());

    controller.set_continuous_analysis(false).await.unwrap();
    controller
        .view_position(Fen::startpos(), &mut NullPresenter)
        .await
        .unwrap();
    assert!(settled(&log).await.iter().all(|c| c != "go infinite"));

    controller.set_continuous_analysis(true).await.unwrap();
    assert!(controller.wait_live(&mut NullPresenter).await.unwrap());
    assert_eq!(controller.live_snapshot().unwrap().line.score, Some(18));

    controller.exit_analysis().await.unwrap();
    assert_eq!(controller.review_state(), &ReviewState::Idle);
    assert_eq!(settled(&log).await.last().map(String::as_str), Some("stop"));
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn stockfish_reviews_ruy_lopez() {
    let mut config = ReviewConfig::default();
    config.review.depth = 8;
    let (mut controller, process) = AnalysisController::connect(&config, OpeningBook::builtin())
        .await
        .expect("Failed to start Stockfish");
    assert!(controller
        .engine_name()
        .unwrap_or_default()
        .to_lowercase()
        .contains("stockfish"));

    let report = controller
        .start_review(&ruy_lopez(), &mut NullPresenter)
        .await
        .expect("review failed")
        .expect("review did not start");

    assert_eq!(report.entries.len(), 5);
    assert_eq!(report.entries[4].quality, MoveQuality::Theory);
    assert_eq!(report.curve.len(), 6);
    process.shutdown().await;
}
