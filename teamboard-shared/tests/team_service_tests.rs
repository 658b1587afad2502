/// Integration tests for TeamService
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test team_service_tests -- --ignored

mod common;

use common::unique;
use teamboard_shared::error::ServiceError;
use teamboard_shared::models::membership::{TeamMember, MAX_TEAM_MEMBERS};
use teamboard_shared::services::team::{CreateTeamRequest, TeamUsersRequest, UpdateTeamRequest};
use teamboard_shared::services::user::CreateUserRequest;
use teamboard_shared::services::Services;

fn team_request(name: &str) -> CreateTeamRequest {
    CreateTeamRequest {
        name: name.to_string(),
        description: "Test team".to_string(),
        admin: "1".to_string(),
    }
}

async fn create_users(services: &Services, count: usize) -> Vec<i32> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let created = services
            .users
            .create_user(CreateUserRequest {
                name: unique("user"),
                display_name: "Member".to_string(),
            })
            .await
            .unwrap();
        ids.push(created.id);
    }
    ids
}

async fn member_ids(services: &Services, team_id: i32) -> Vec<i32> {
    services
        .teams
        .list_team_users(team_id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_create_update_and_describe_team() {
    let services = common::services().await;
    let id = services.teams.create_team(team_request(&unique("core"))).await.unwrap().id;

    let new_name = unique("core-renamed");
    services
        .teams
        .update_team(UpdateTeamRequest {
            id,
            team: CreateTeamRequest {
                name: new_name.clone(),
                description: "Renamed".to_string(),
                admin: "2".to_string(),
            },
        })
        .await
        .unwrap();

    let team = services.teams.describe_team(id).await.unwrap();
    assert_eq!(team.name, new_name);
    assert_eq!(team.description, "Renamed");
    assert_eq!(team.admin, "2");

    let teams = services.teams.list_teams().await.unwrap();
    assert!(teams.iter().any(|t| t.id == id));

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_duplicate_team_names_are_rejected() {
    let services = common::services().await;
    let name = unique("dup");

    services.teams.create_team(team_request(&name)).await.unwrap();
    let err = services.teams.create_team(team_request(&name)).await.unwrap_err();
    assert!(
        matches!(err, ServiceError::DuplicateEntity { entity: "team", .. }),
        "got {:?}",
        err
    );

    let other = services.teams.create_team(team_request(&unique("other"))).await.unwrap().id;
    let err = services
        .teams
        .update_team(UpdateTeamRequest {
            id: other,
            team: team_request(&name),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateEntity { .. }), "got {:?}", err);

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_overlong_description_is_rejected_and_not_persisted() {
    let services = common::services().await;
    let name = unique("verbose");

    let err = services
        .teams
        .create_team(CreateTeamRequest {
            name: name.clone(),
            description: "d".repeat(129),
            admin: "1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {:?}", err);

    let teams = services.teams.list_teams().await.unwrap();
    assert!(teams.iter().all(|t| t.name != name));

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_overlapping_adds_yield_union() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("union"))).await.unwrap().id;
    let users = create_users(&services, 4).await;

    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![users[0], users[1], users[2]],
        })
        .await
        .unwrap();
    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![users[2], users[3], users[3]],
        })
        .await
        .unwrap();

    assert_eq!(member_ids(&services, team_id).await, users);
    assert_eq!(
        TeamMember::count_by_team(services.pool(), team_id).await.unwrap(),
        4
    );

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_add_then_remove_leaves_difference() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("diff"))).await.unwrap().id;
    let users = create_users(&services, 3).await;
    let (a, b, c) = (users[0], users[1], users[2]);

    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![a, b, c],
        })
        .await
        .unwrap();

    // Non-members in the removal set are ignored
    let outsider = create_users(&services, 1).await[0];
    services
        .teams
        .remove_users_from_team(TeamUsersRequest {
            id: team_id,
            users: vec![b, outsider],
        })
        .await
        .unwrap();

    assert_eq!(member_ids(&services, team_id).await, vec![a, c]);

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_membership_cap_is_enforced() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("cap"))).await.unwrap().id;
    let users = create_users(&services, MAX_TEAM_MEMBERS + 1).await;

    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: users[..MAX_TEAM_MEMBERS].to_vec(),
        })
        .await
        .unwrap();

    // Re-adding existing members does not count against the cap
    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: users[..10].to_vec(),
        })
        .await
        .unwrap();

    let err = services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![users[MAX_TEAM_MEMBERS]],
        })
        .await
        .unwrap_err();

    match err {
        ServiceError::CapacityExceeded {
            team_id: id,
            limit,
            requested,
        } => {
            assert_eq!(id, team_id);
            assert_eq!(limit, MAX_TEAM_MEMBERS);
            assert_eq!(requested, MAX_TEAM_MEMBERS + 1);
        }
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }

    assert_eq!(member_ids(&services, team_id).await.len(), MAX_TEAM_MEMBERS);

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_concurrent_adds_never_exceed_cap() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("race"))).await.unwrap().id;
    let users = create_users(&services, 60).await;

    let first = services.teams.clone();
    let second = services.teams.clone();
    let batch_a = users[..30].to_vec();
    let batch_b = users[30..].to_vec();

    let (ra, rb) = tokio::join!(
        first.add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: batch_a,
        }),
        second.add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: batch_b,
        }),
    );

    // Exactly one batch fits
    assert!(ra.is_ok() != rb.is_ok(), "one add should fail: {:?} / {:?}", ra, rb);
    assert_eq!(member_ids(&services, team_id).await.len(), 30);

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_membership_not_found_cases() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("nf"))).await.unwrap().id;
    let user = create_users(&services, 1).await[0];

    let err = services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: i32::MAX,
            users: vec![user],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "team", .. }), "got {:?}", err);

    let err = services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![user, i32::MAX],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "user", .. }), "got {:?}", err);

    // The failed add must not have added the valid user
    assert!(member_ids(&services, team_id).await.is_empty());

    let err = services.teams.list_team_users(i32::MAX).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }), "got {:?}", err);

    services.shutdown().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_repeated_ids_count_once_against_request_limit() {
    let services = common::services().await;
    let team_id = services.teams.create_team(team_request(&unique("repeat"))).await.unwrap().id;
    let user = create_users(&services, 1).await[0];

    services
        .teams
        .add_users_to_team(TeamUsersRequest {
            id: team_id,
            users: vec![user; MAX_TEAM_MEMBERS + 1],
        })
        .await
        .unwrap();
    assert_eq!(member_ids(&services, team_id).await, vec![user]);

    services
        .teams
        .remove_users_from_team(TeamUsersRequest {
            id: team_id,
            users: vec![user; MAX_TEAM_MEMBERS + 1],
        })
        .await
        .unwrap();
    assert!(member_ids(&services, team_id).await.is_empty());

    let err = services
        .teams
        .remove_users_from_team(TeamUsersRequest {
            id: team_id,
            users: (1..=(MAX_TEAM_MEMBERS as i32 + 1)).collect(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)), "got {:?}", err);

    services.shutdown().await;
}
