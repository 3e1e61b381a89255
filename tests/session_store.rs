use storyrelay::error::CoreError;
use storyrelay::llm::models::{Role, Turn};
use storyrelay::session::{SessionId, SessionStore};

#[tokio::test]
async fn test_session_lifecycle() {
    let store = SessionStore::new();
    assert!(store.is_empty().await);

    // 1. Create
    let id = store.create_session().await.unwrap();
    assert_eq!(store.len().await, 1);

    // 2. Fresh history is empty
    assert!(store.get_history(&id).await.unwrap().is_empty());

    // 3. Append keeps user then model order
    store
        .append_turns(&id, Turn::user("look around"), Turn::model("{}"))
        .await
        .unwrap();
    let history = store.get_history(&id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "look around");
    assert_eq!(history[1].role, Role::Model);
}

#[tokio::test]
async fn test_sessions_get_distinct_ids_and_histories() {
    let store = SessionStore::new();
    let a = store.create_session().await.unwrap();
    let b = store.create_session().await.unwrap();
    assert_ne!(a, b);

    store
        .append_turns(&a, Turn::user("a"), Turn::model("a"))
        .await
        .unwrap();
    assert_eq!(store.get_history(&a).await.unwrap().len(), 2);
    assert!(store.get_history(&b).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_session_is_reported() {
    let store = SessionStore::new();
    let missing = SessionId::from("unknown-id");

    assert!(matches!(
        store.get_history(&missing).await,
        Err(CoreError::SessionNotFound(id)) if id == missing
    ));
    assert!(matches!(
        store
            .append_turns(&missing, Turn::user("x"), Turn::model("y"))
            .await,
        Err(CoreError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_independent_store_instances() {
    let first = SessionStore::new();
    let second = SessionStore::new();
    let id = first.create_session().await.unwrap();

    assert!(first.handle(&id).await.is_ok());
    assert!(second.handle(&id).await.is_err());
}
