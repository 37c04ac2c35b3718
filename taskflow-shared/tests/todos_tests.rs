/// Integration tests for the per-user todo store

mod common;

use common::{insert_user, setup_pool};
use sqlx::SqlitePool;
use taskflow_shared::error::DomainError;
use taskflow_shared::models::todo::{Todo, TodoFilter, TodoState, UpdateTodo};
use taskflow_shared::services::todos::{self, NewTodo, TODO_NOT_FOUND};

async fn todo(pool: &SqlitePool, owner_id: i64, title: &str, description: &str, state: TodoState) -> Todo {
    todos::create_todo(
        pool,
        owner_id,
        NewTodo {
            title: title.to_string(),
            description: description.to_string(),
            state,
        },
    )
    .await
    .expect("Todo creation should succeed")
}

fn titles(todos: &[Todo]) -> Vec<&str> {
    todos.iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test]
async fn test_create_todo() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let created = todo(&pool, user.id, "Buy milk", "Semi-skimmed", TodoState::Todo).await;

    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description, "Semi-skimmed");
    assert_eq!(created.state, TodoState::Todo);
    assert_eq!(created.user_id, user.id);
}

#[tokio::test]
async fn test_list_only_own_todos() {
    let pool = setup_pool().await;
    let mari = insert_user(&pool, "mari").await;
    let bia = insert_user(&pool, "bia").await;

    todo(&pool, mari.id, "mine", "d", TodoState::Draft).await;
    todo(&pool, bia.id, "hers", "d", TodoState::Draft).await;

    let listed = todos::list_todos(&pool, mari.id, &TodoFilter::default()).await.unwrap();
    assert_eq!(titles(&listed), vec!["mine"]);
}

#[tokio::test]
async fn test_filters_are_combined() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    todo(&pool, user.id, "Write report", "quarterly numbers", TodoState::Doing).await;
    todo(&pool, user.id, "Write email", "to the board", TodoState::Todo).await;
    todo(&pool, user.id, "Read book", "quarterly review", TodoState::Doing).await;

    let by_title = TodoFilter {
        title: Some("Write".to_string()),
        ..TodoFilter::default()
    };
    let listed = todos::list_todos(&pool, user.id, &by_title).await.unwrap();
    assert_eq!(titles(&listed), vec!["Write report", "Write email"]);

    let by_description = TodoFilter {
        description: Some("quarterly".to_string()),
        ..TodoFilter::default()
    };
    let listed = todos::list_todos(&pool, user.id, &by_description).await.unwrap();
    assert_eq!(titles(&listed), vec!["Write report", "Read book"]);

    let combined = TodoFilter {
        title: Some("Write".to_string()),
        state: Some(TodoState::Doing),
        ..TodoFilter::default()
    };
    let listed = todos::list_todos(&pool, user.id, &combined).await.unwrap();
    assert_eq!(titles(&listed), vec!["Write report"]);

    let no_match = TodoFilter {
        state: Some(TodoState::Trash),
        ..TodoFilter::default()
    };
    assert!(todos::list_todos(&pool, user.id, &no_match).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_title_filter_is_case_sensitive() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    todo(&pool, user.id, "Write report", "d", TodoState::Draft).await;

    let filter = TodoFilter {
        title: Some("write".to_string()),
        ..TodoFilter::default()
    };
    assert!(todos::list_todos(&pool, user.id, &filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pagination() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    for i in 0..5 {
        todo(&pool, user.id, &format!("todo {}", i), "d", TodoState::Draft).await;
    }

    let page = TodoFilter {
        offset: 1,
        limit: 2,
        ..TodoFilter::default()
    };
    let listed = todos::list_todos(&pool, user.id, &page).await.unwrap();
    assert_eq!(titles(&listed), vec!["todo 1", "todo 2"]);

    let past_end = TodoFilter {
        offset: 10,
        ..TodoFilter::default()
    };
    assert!(todos::list_todos(&pool, user.id, &past_end).await.unwrap().is_empty());

    let zero = TodoFilter {
        limit: 0,
        ..TodoFilter::default()
    };
    assert!(todos::list_todos(&pool, user.id, &zero).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_pagination_rejected() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let negative_limit = TodoFilter {
        limit: -1,
        ..TodoFilter::default()
    };
    let err = todos::list_todos(&pool, user.id, &negative_limit).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "limit"));

    let negative_offset = TodoFilter {
        offset: -5,
        ..TodoFilter::default()
    };
    let err = todos::list_todos(&pool, user.id, &negative_offset).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "offset"));
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let created = todo(&pool, user.id, "Write report", "quarterly", TodoState::Todo).await;

    let updated = todos::update_todo(
        &pool,
        user.id,
        created.id,
        UpdateTodo {
            state: Some(TodoState::Done),
            ..UpdateTodo::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.state, TodoState::Done);
    assert_eq!(updated.title, "Write report");
    assert_eq!(updated.description, "quarterly");
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_other_users_todo_is_not_found() {
    let pool = setup_pool().await;
    let mari = insert_user(&pool, "mari").await;
    let bia = insert_user(&pool, "bia").await;

    let hers = todo(&pool, bia.id, "hers", "d", TodoState::Draft).await;

    let err = todos::update_todo(
        &pool,
        mari.id,
        hers.id,
        UpdateTodo {
            title: Some("stolen".to_string()),
            ..UpdateTodo::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref d) if d == TODO_NOT_FOUND));

    let err = todos::delete_todo(&pool, mari.id, hers.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(ref d) if d == TODO_NOT_FOUND));

    let still_there = todos::list_todos(&pool, bia.id, &TodoFilter::default()).await.unwrap();
    assert_eq!(titles(&still_there), vec!["hers"]);
}

#[tokio::test]
async fn test_delete_todo() {
    let pool = setup_pool().await;
    let user = insert_user(&pool, "mari").await;

    let created = todo(&pool, user.id, "t", "d", TodoState::Draft).await;

    todos::delete_todo(&pool, user.id, created.id).await.unwrap();
    assert!(todos::list_todos(&pool, user.id, &TodoFilter::default())
        .await
        .unwrap()
        .is_empty());

    let err = todos::delete_todo(&pool, user.id, created.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}
