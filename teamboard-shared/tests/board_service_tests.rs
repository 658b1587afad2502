/// Integration tests for BoardService
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test board_service_tests -- --ignored

mod common;

use chrono::{TimeZone, Utc};
use common::unique;
use teamboard_shared::error::ServiceError;
use teamboard_shared::models::board::{Board, BoardStatus};
use teamboard_shared::models::task::{Task, TaskStatus};
use teamboard_shared::services::board::{AddTaskRequest, CreateBoardRequest, UpdateTaskStatusRequest};
use teamboard_shared::services::team::CreateTeamRequest;
use teamboard_shared::services::user::CreateUserRequest;
use teamboard_shared::services::Services;

struct Fixture {
    services: Services,
    team_id: i32,
    user_id: i32,
}

async fn fixture() -> Fixture {
    let services = common::services().await;
    let user_id = services
        .users
        .create_user(CreateUserRequest {
            name: unique("owner"),
            display_name: "Board Owner".to_string(),
        })
        .await
        .unwrap()
        .id;
    let team_id = services
        .teams
        .create_team(CreateTeamRequest {
            name: unique("team"),
            description: String::new(),
            admin: user_id.to_string(),
        })
        .await
        .unwrap()
        .id;

    Fixture {
        services,
        team_id,
        user_id,
    }
}

impl Fixture {
    async fn board(&self, name: &str) -> i32 {
        self.services
            .boards
            .create_board(CreateBoardRequest {
                name: name.to_string(),
                description: "Board under test".to_string(),
                team_id: self.team_id,
                creation_time: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn task(&self, board_id: i32, title: &str) -> Result<i32, ServiceError> {
        self.services
            .boards
            .add_task(AddTaskRequest {
                title: title.to_string(),
                description: String::new(),
                user_id: self.user_id,
                board_id,
                creation_time: None,
            })
            .await
            .map(|r| r.id)
    }

    async fn set_status(&self, task_id: i32, status: &str) -> Result<(), ServiceError> {
        self.services
            .boards
            .update_task_status(UpdateTaskStatusRequest {
                id: task_id,
                status: status.to_string(),
            })
            .await
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_create_board_defaults_and_explicit_creation_time() {
    let fx = fixture().await;
    let id = fx.board("Sprint 1").await;

    let board = Board::find_by_id(fx.services.pool(), id).await.unwrap().unwrap();
    assert_eq!(board.status, BoardStatus::Open);
    assert!(board.end_time.is_none());

    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let id = fx
        .services
        .boards
        .create_board(CreateBoardRequest {
            name: "Backfilled".to_string(),
            description: String::new(),
            team_id: fx.team_id,
            creation_time: Some(at),
        })
        .await
        .unwrap()
        .id;
    let board = Board::find_by_id(fx.services.pool(), id).await.unwrap().unwrap();
    assert_eq!(board.creation_time, at);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_board_names_are_unique_per_team() {
    let fx = fixture().await;
    fx.board("Roadmap").await;

    let err = fx
        .services
        .boards
        .create_board(CreateBoardRequest {
            name: "Roadmap".to_string(),
            description: String::new(),
            team_id: fx.team_id,
            creation_time: None,
        })
        .await
        .unwrap_err();
    assert!(
        matches!(err, ServiceError::DuplicateEntity { entity: "board", .. }),
        "got {:?}",
        err
    );

    let err = fx
        .services
        .boards
        .create_board(CreateBoardRequest {
            name: "Roadmap".to_string(),
            description: String::new(),
            team_id: i32::MAX,
            creation_time: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "team", .. }), "got {:?}", err);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_invalid_board_is_rejected_and_not_persisted() {
    let fx = fixture().await;
    let long_name = "b".repeat(65);

    for (name, description) in [
        (long_name.as_str(), String::new()),
        ("Verbose", "d".repeat(129)),
        ("", String::new()),
    ] {
        let err = fx
            .services
            .boards
            .create_board(CreateBoardRequest {
                name: name.to_string(),
                description,
                team_id: fx.team_id,
                creation_time: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{:?} gave {:?}", name, err);
    }

    let boards = fx.services.boards.list_boards(fx.team_id).await.unwrap();
    assert!(boards.is_empty(), "no board should be persisted: {:?}", boards);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_overlong_task_title_is_rejected_and_not_persisted() {
    let fx = fixture().await;
    let board_id = fx.board("Sprint").await;

    let err = fx.task(board_id, &"t".repeat(65)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {:?}", err);

    let tasks = Task::list_with_assignees(fx.services.pool(), board_id).await.unwrap();
    assert!(tasks.is_empty());

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_task_titles_are_unique_per_board() {
    let fx = fixture().await;
    let board_id = fx.board("Sprint").await;

    fx.task(board_id, "Write docs").await.unwrap();
    let err = fx.task(board_id, "Write docs").await.unwrap_err();
    assert!(
        matches!(err, ServiceError::DuplicateEntity { entity: "task", .. }),
        "got {:?}",
        err
    );

    let other_board = fx.board("Other").await;
    assert!(fx.task(other_board, "Write docs").await.is_ok());

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_add_task_not_found_cases() {
    let fx = fixture().await;
    let board_id = fx.board("Sprint").await;

    let err = fx.task(i32::MAX, "Orphan").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "board", .. }), "got {:?}", err);

    let err = fx
        .services
        .boards
        .add_task(AddTaskRequest {
            title: "Unassigned".to_string(),
            description: String::new(),
            user_id: i32::MAX,
            board_id,
            creation_time: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "user", .. }), "got {:?}", err);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_close_requires_every_task_complete() {
    let fx = fixture().await;
    let board_id = fx.board("Release").await;

    let done = fx.task(board_id, "Tag release").await.unwrap();
    let pending = fx.task(board_id, "Announce").await.unwrap();
    fx.set_status(done, "COMPLETE").await.unwrap();
    fx.set_status(pending, "IN_PROGRESS").await.unwrap();

    let err = fx.services.boards.close_board(board_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)), "got {:?}", err);

    fx.set_status(pending, "COMPLETE").await.unwrap();
    fx.services.boards.close_board(board_id).await.unwrap();

    let board = Board::find_by_id(fx.services.pool(), board_id).await.unwrap().unwrap();
    assert_eq!(board.status, BoardStatus::Closed);
    assert!(board.end_time.is_some());

    let err = fx.services.boards.close_board(board_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)), "got {:?}", err);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_empty_board_can_be_closed() {
    let fx = fixture().await;
    let board_id = fx.board("Empty").await;

    fx.services.boards.close_board(board_id).await.unwrap();

    let err = fx.services.boards.close_board(i32::MAX).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }), "got {:?}", err);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_closed_board_rejects_task_changes() {
    let fx = fixture().await;
    let board_id = fx.board("Frozen").await;
    let task_id = fx.task(board_id, "Only task").await.unwrap();
    fx.set_status(task_id, "COMPLETE").await.unwrap();
    fx.services.boards.close_board(board_id).await.unwrap();

    let err = fx.task(board_id, "Late task").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)), "got {:?}", err);

    let err = fx.set_status(task_id, "OPEN").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)), "got {:?}", err);

    let task = Task::find_by_id(fx.services.pool(), task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Complete);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_update_task_status_validation() {
    let fx = fixture().await;
    let board_id = fx.board("Statuses").await;
    let task_id = fx.task(board_id, "Flip").await.unwrap();

    for bad in ["DONE", "complete", ""] {
        let err = fx.set_status(task_id, bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{:?} gave {:?}", bad, err);
    }

    // Any transition is allowed, including backwards
    for status in ["COMPLETE", "OPEN", "IN_PROGRESS", "OPEN"] {
        fx.set_status(task_id, status).await.unwrap();
    }

    let err = fx.set_status(i32::MAX, "OPEN").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "task", .. }), "got {:?}", err);

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_list_boards_returns_only_open_boards() {
    let fx = fixture().await;
    let open_a = fx.board("A").await;
    let closed = fx.board("B").await;
    let open_c = fx.board("C").await;
    fx.services.boards.close_board(closed).await.unwrap();

    let boards = fx.services.boards.list_boards(fx.team_id).await.unwrap();
    assert_eq!(boards.iter().map(|b| b.id).collect::<Vec<_>>(), vec![open_a, open_c]);
    assert!(boards.iter().all(|b| b.status == BoardStatus::Open));

    assert!(fx.services.boards.list_boards(i32::MAX).await.unwrap().is_empty());

    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_export_board_writes_report() {
    let fx = fixture().await;
    let board_id = fx.board("Exported").await;
    let task_id = fx.task(board_id, "Ship it").await.unwrap();
    fx.set_status(task_id, "COMPLETE").await.unwrap();
    fx.task(board_id, "Celebrate").await.unwrap();

    let response = fx.services.boards.export_board(board_id).await.unwrap();
    let expected = fx.services.boards.export_dir().join(format!("board-{}.txt", board_id));
    assert_eq!(response.out_file, expected.display().to_string());

    let report = tokio::fs::read_to_string(&expected).await.unwrap();
    assert!(report.contains(&format!("Board #{}: Exported", board_id)));
    assert!(report.contains("Progress: 1/2 tasks complete"));
    assert!(report.contains("Ship it"));
    assert!(report.contains("Assignee: Board Owner"));

    let _ = tokio::fs::remove_dir_all(fx.services.boards.export_dir()).await;
    fx.services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_export_missing_board_writes_nothing() {
    let fx = fixture().await;

    let err = fx.services.boards.export_board(i32::MAX).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "board", .. }), "got {:?}", err);

    assert!(
        !fx.services.boards.export_dir().exists(),
        "no export directory or file should be created"
    );

    fx.services.shutdown().await;
}
