//! Demo data for local development.

use tracing::info;

use crate::api::AppState;
use crate::error::ApiResult;
use crate::models::{CreateLivePlayer, Direction, GameMode, GameStatus, Position};

pub const DEMO_PASSWORD: &str = "pass123";

const DEMO_USERS: &[(&str, &str, i32, GameMode)] = &[
    ("ProSnaker", "pro@snake.com", 2450, GameMode::Walls),
    ("SnakeKing", "king@snake.com", 2100, GameMode::PassThrough),
    ("Slither99", "slither@snake.com", 1890, GameMode::Walls),
    ("ViperQueen", "viper@snake.com", 1750, GameMode::PassThrough),
    ("PythonMaster", "python@snake.com", 1620, GameMode::Walls),
    ("CobraKai", "cobra@snake.com", 1500, GameMode::PassThrough),
    ("Anaconda", "ana@snake.com", 1350, GameMode::Walls),
];

fn pos(x: i32, y: i32) -> Position {
    Position { x, y }
}

fn demo_live_players() -> Vec<CreateLivePlayer> {
    vec![
        CreateLivePlayer {
            id: "live-1".into(),
            username: "SpeedySnake".into(),
            score: 150,
            mode: GameMode::PassThrough,
            snake: vec![pos(10, 10), pos(9, 10), pos(8, 10)],
            food: pos(15, 15),
            direction: Direction::Right,
            status: GameStatus::Playing,
        },
        CreateLivePlayer {
            id: "live-2".into(),
            username: "NeonViper".into(),
            score: 340,
            mode: GameMode::Walls,
            snake: vec![pos(20, 20), pos(20, 19), pos(20, 18), pos(20, 17)],
            food: pos(5, 5),
            direction: Direction::Down,
            status: GameStatus::Playing,
        },
        CreateLivePlayer {
            id: "live-3".into(),
            username: "CyberSerpent".into(),
            score: 80,
            mode: GameMode::PassThrough,
            snake: vec![pos(5, 5), pos(6, 5), pos(7, 5)],
            food: pos(12, 12),
            direction: Direction::Left,
            status: GameStatus::Playing,
        },
    ]
}

/// Loads demo users, scores and live sessions. Returns false if already seeded.
pub async fn seed_demo_data(state: &AppState) -> ApiResult<bool> {
    let (_, first_email, _, _) = DEMO_USERS[0];
    if state.accounts.find_by_email(first_email).await?.is_some() {
        info!("Demo data already present, skipping seed");
        return Ok(false);
    }

    for &(username, email, score, mode) in DEMO_USERS {
        let user = state.accounts.register(username, email, DEMO_PASSWORD).await?;
        state.leaderboard.submit(&user, score, mode).await?;
    }

    for player in demo_live_players() {
        state.live.create(player).await?;
    }

    info!(
        "Seeded {} demo users and {} live sessions",
        DEMO_USERS.len(),
        demo_live_players().len()
    );
    Ok(true)
}
