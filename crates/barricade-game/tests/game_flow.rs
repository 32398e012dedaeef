//! End-to-end flows against the game store: creating and joining
//! tables, voting, passing tokens, planting flags, and assigning roles.

use std::collections::HashSet;

use barricade_game::{GameError, GameStore, PlayerProfile};
use barricade_protocol::{FlagColor, GamePhase, Role, UserId};

fn profile(name: &str) -> PlayerProfile {
    PlayerProfile {
        name: name.to_owned(),
        color: "#445566".to_owned(),
    }
}

// =========================================================================
// Create / join / quit
// =========================================================================

#[tokio::test]
async fn test_create_seats_the_creator() {
    let store = GameStore::new();
    let view = store.create(UserId(1), &profile("ada")).await.unwrap();

    assert_eq!(view.phase, GamePhase::Start);
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.players[0].user_id, UserId(1));
    assert_eq!(view.join_code.len(), 8);
}

#[tokio::test]
async fn test_create_twice_is_rejected_while_playing() {
    let store = GameStore::new();
    store.create(UserId(1), &profile("ada")).await.unwrap();

    let err = store.create(UserId(1), &profile("ada")).await.unwrap_err();
    assert!(matches!(err, GameError::AlreadyInGame(UserId(1))));
}

#[tokio::test]
async fn test_closing_frees_the_user_for_a_new_game() {
    let store = GameStore::new();
    let view = store.create(UserId(1), &profile("ada")).await.unwrap();
    store.close(view.id).await.unwrap();

    let second = store.create(UserId(1), &profile("ada")).await.unwrap();
    assert_eq!(store.current_game_of(UserId(1)).await, Some(second.id));
}

#[tokio::test]
async fn test_join_by_code() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();

    let joined = store
        .join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap();

    assert_eq!(joined.id, created.id);
    assert_eq!(joined.players.len(), 2);
}

#[tokio::test]
async fn test_join_is_idempotent_per_user() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();

    store
        .join(&created.join_code, UserId(1), &profile("ada"))
        .await
        .unwrap();
    let view = store.view(created.id, None).await.unwrap();
    assert_eq!(view.players.len(), 1);
}

#[tokio::test]
async fn test_join_unknown_code_fails() {
    let store = GameStore::new();
    let err = store
        .join("deadbeef", UserId(1), &profile("ada"))
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::UnknownJoinCode(_)));
}

#[tokio::test]
async fn test_join_finished_game_fails() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    store.close(created.id).await.unwrap();

    let err = store
        .join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::GameOver(_)));
}

#[tokio::test]
async fn test_quit_removes_the_seat() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    store
        .join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap();

    let view = store.quit(created.id, UserId(2)).await.unwrap();
    assert_eq!(view.players.len(), 1);
    assert_eq!(store.current_game_of(UserId(2)).await, None);
}

// =========================================================================
// Votes, tokens, flags
// =========================================================================

#[tokio::test]
async fn test_votes_accumulate_and_reset() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();

    store.add_vote(created.id).await.unwrap();
    store.add_vote(created.id).await.unwrap();
    let view = store.add_vote(created.id).await.unwrap();
    assert_eq!(view.nb_votes, 3);

    let view = store.reset_votes(created.id).await.unwrap();
    assert_eq!(view.nb_votes, 0);
}

#[tokio::test]
async fn test_give_token_across_the_store() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    let joined = store
        .join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap();
    let bob = joined
        .players
        .iter()
        .find(|p| p.user_id == UserId(2))
        .unwrap()
        .id;

    let view = store.give_token(created.id, UserId(1), bob).await.unwrap();
    let seat_bob = view.players.iter().find(|p| p.id == bob).unwrap();
    assert_eq!(seat_bob.playable_tokens.len(), 4);
}

#[tokio::test]
async fn test_plant_flag_shows_in_the_view() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();

    let view = store
        .plant_flag(created.id, UserId(1), FlagColor::Red)
        .await
        .unwrap();
    assert_eq!(view.flags.len(), 1);
    assert_eq!(view.flags[0].color, FlagColor::Red);
}

#[tokio::test]
async fn test_mutations_on_finished_game_fail() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    store.close(created.id).await.unwrap();

    let err = store.add_vote(created.id).await.unwrap_err();
    assert!(matches!(err, GameError::GameOver(_)));
}

#[tokio::test]
async fn test_change_color_updates_the_seat() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();

    let view = store
        .change_color(created.id, UserId(1), "#ff0000".to_owned())
        .await
        .unwrap();
    assert_eq!(view.players[0].color, "#ff0000");
}

// =========================================================================
// Ranking and role assignment
// =========================================================================

#[tokio::test]
async fn test_assign_roles_end_to_end() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    for (user, name) in [(2, "bob"), (3, "cleo"), (4, "dan")] {
        store
            .join(&created.join_code, UserId(user), &profile(name))
            .await
            .unwrap();
    }

    store
        .save_ranking(created.id, UserId(1), vec![Role::Echo, Role::Pouvoir])
        .await
        .unwrap();
    store
        .save_ranking(created.id, UserId(2), vec![Role::Pouvoir])
        .await
        .unwrap();

    let view = store.assign_roles(created.id).await.unwrap();

    assert_eq!(view.phase, GamePhase::OnGoing);
    let roles: Vec<Role> =
        view.players.iter().map(|p| p.role.unwrap()).collect();
    assert_eq!(roles.len(), 4);
    let distinct: HashSet<Role> = roles.iter().copied().collect();
    assert_eq!(distinct.len(), 4, "roles must be injective");

    // Ada's only positive-cost role is Pouvoir (ranked second), so the
    // optimizer steers it to Bob, whose first choice it is.
    let ada = view
        .players
        .iter()
        .find(|p| p.user_id == UserId(1))
        .unwrap();
    let bob = view
        .players
        .iter()
        .find(|p| p.user_id == UserId(2))
        .unwrap();
    assert_ne!(ada.role, Some(Role::Pouvoir));
    assert_eq!(bob.role, Some(Role::Pouvoir));
}

#[tokio::test]
async fn test_view_marks_the_viewer() {
    let store = GameStore::new();
    let created = store.create(UserId(1), &profile("ada")).await.unwrap();
    store
        .join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap();

    let view = store.view(created.id, Some(UserId(2))).await.unwrap();
    for player in &view.players {
        assert_eq!(player.is_me, player.user_id == UserId(2));
    }
}
