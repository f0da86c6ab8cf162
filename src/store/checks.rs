//! Behaviour every [`Store`] backend must share. Each check starts from an
//! empty schema, so the same functions run against a throwaway SQLite
//! database and a real MySQL server.

use chrono::NaiveDate;

use super::Store;
use crate::model::{Board, BoardItems};
use crate::schema::{BoardPost, NewEvent, NewHomework, NewNews};

async fn reset(store: &dyn Store) {
    assert!(store.clear_database().await.unwrap().is_empty());
}

pub(crate) async fn duplicate_username_is_rejected(store: &dyn Store) {
    reset(store).await;
    store.create_user("ada", "pw", "Ada L").await.unwrap();
    assert!(store.create_user("ada", "other", "Someone Else").await.is_err());
}

pub(crate) async fn credentials_must_match(store: &dyn Store) {
    reset(store).await;
    store.create_user("ada", "pw", "Ada L").await.unwrap();

    let user = store
        .find_user_by_credentials(Some("ada"), Some("pw"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.full_name, "Ada L");

    assert!(store
        .find_user_by_credentials(Some("ada"), Some("nope"))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .find_user_by_credentials(Some("ada"), None)
        .await
        .unwrap()
        .is_none());
}

pub(crate) async fn users_are_listed_by_full_name(store: &dyn Store) {
    reset(store).await;
    store.create_user("z", "pw", "Zed").await.unwrap();
    store.create_user("a", "pw", "Alice").await.unwrap();
    store.create_user("m", "pw", "Mona").await.unwrap();

    let names: Vec<_> = store
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.full_name)
        .collect();
    assert_eq!(names, ["Alice", "Mona", "Zed"]);
}

pub(crate) async fn task_toggle_and_delete(store: &dyn Store) {
    reset(store).await;
    let created = store.create_task(Some(1), Some("essay")).await.unwrap();
    assert!(!created.is_done);
    assert!(created.id > 0);

    assert_eq!(store.toggle_task(created.id).await.unwrap(), 1);
    assert!(store.list_tasks(Some(1)).await.unwrap()[0].is_done);

    assert_eq!(store.toggle_task(created.id).await.unwrap(), 1);
    assert!(!store.list_tasks(Some(1)).await.unwrap()[0].is_done);

    assert_eq!(store.delete_task(created.id).await.unwrap(), 1);
    assert!(store.list_tasks(Some(1)).await.unwrap().is_empty());

    assert_eq!(store.toggle_task(created.id).await.unwrap(), 0);
    assert_eq!(store.delete_task(created.id).await.unwrap(), 0);
}

pub(crate) async fn tasks_need_an_owner_filter(store: &dyn Store) {
    reset(store).await;
    store.create_task(Some(1), Some("essay")).await.unwrap();
    store.create_task(Some(2), Some("lab report")).await.unwrap();

    assert!(store.list_tasks(None).await.unwrap().is_empty());
    let mine = store.list_tasks(Some(2)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].text.as_deref(), Some("lab report"));
}

pub(crate) async fn chat_keeps_newest_fifty_in_ascending_order(store: &dyn Store) {
    reset(store).await;
    for i in 1..=60 {
        store
            .create_chat_message(Some("bot"), Some(&format!("msg {i}")))
            .await
            .unwrap();
    }

    let messages = store.list_chat().await.unwrap();
    assert_eq!(messages.len(), 50);
    assert_eq!(messages[0].message.as_deref(), Some("msg 11"));
    assert_eq!(messages[49].message.as_deref(), Some("msg 60"));
    assert!(messages.windows(2).all(|w| w[0].id < w[1].id));
}

pub(crate) async fn board_items_keep_their_dates(store: &dyn Store) {
    reset(store).await;
    store
        .create_board_item(&BoardPost::Homework(NewHomework {
            subject: Some("Math".into()),
            task: Some("p. 42".into()),
            deadline: NaiveDate::from_ymd_opt(2025, 3, 1),
        }))
        .await
        .unwrap();
    store
        .create_board_item(&BoardPost::Events(NewEvent {
            title: Some("Concert".into()),
            event_date: NaiveDate::from_ymd_opt(2025, 3, 2).and_then(|d| d.and_hms_opt(18, 30, 0)),
            location: Some("Hall".into()),
        }))
        .await
        .unwrap();

    match store.list_board(Board::Homework).await.unwrap() {
        BoardItems::Homework(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].deadline, NaiveDate::from_ymd_opt(2025, 3, 1));
        }
        other => panic!("unexpected items: {other:?}"),
    }
    match store.list_board(Board::Events).await.unwrap() {
        BoardItems::Events(items) => {
            assert_eq!(items[0].location.as_deref(), Some("Hall"));
            assert_eq!(
                items[0].event_date,
                NaiveDate::from_ymd_opt(2025, 3, 2).and_then(|d| d.and_hms_opt(18, 30, 0))
            );
        }
        other => panic!("unexpected items: {other:?}"),
    }
}

pub(crate) async fn board_listing_is_capped_at_twenty_newest(store: &dyn Store) {
    reset(store).await;
    for i in 1..=25 {
        store
            .create_board_item(&BoardPost::News(NewNews {
                title: Some(format!("news {i}")),
                content: None,
            }))
            .await
            .unwrap();
    }

    match store.list_board(Board::News).await.unwrap() {
        BoardItems::News(items) => {
            assert_eq!(items.len(), 20);
            assert_eq!(items[0].title.as_deref(), Some("news 25"));
            assert_eq!(items[19].title.as_deref(), Some("news 6"));
        }
        other => panic!("unexpected items: {other:?}"),
    }
}

pub(crate) async fn clear_database_empties_and_rebuilds(store: &dyn Store) {
    reset(store).await;
    store.create_user("ada", "pw", "Ada L").await.unwrap();
    store.create_task(Some(1), Some("essay")).await.unwrap();
    store.create_chat_message(Some("ada"), Some("hi")).await.unwrap();

    assert!(store.clear_database().await.unwrap().is_empty());

    assert!(store.list_users().await.unwrap().is_empty());
    assert!(store.list_tasks(Some(1)).await.unwrap().is_empty());
    assert!(store.list_chat().await.unwrap().is_empty());
    // Usable again, and the username is free
    store.create_user("ada", "pw", "Ada L").await.unwrap();
}

/// Every check above, in order.
pub(crate) async fn run_all(store: &dyn Store) {
    duplicate_username_is_rejected(store).await;
    credentials_must_match(store).await;
    users_are_listed_by_full_name(store).await;
    task_toggle_and_delete(store).await;
    tasks_need_an_owner_filter(store).await;
    chat_keeps_newest_fifty_in_ascending_order(store).await;
    board_items_keep_their_dates(store).await;
    board_listing_is_capped_at_twenty_newest(store).await;
    clear_database_empties_and_rebuilds(store).await;
}
