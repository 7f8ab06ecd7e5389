use std::time::Duration;

use clientes_admin::controller::{
    ControllerError, DELETE_ERROR_MESSAGE, DELETE_SUCCESS_MESSAGE, EMPTY_SEARCH_MESSAGE, LoadPhase,
    NotificationKind, PendingDeletion,
};
use clientes_admin::domain::client::{Client, ClientListQuery};
use clientes_admin::domain::types::{ClientId, PerPage};
use clientes_admin::repository::errors::RepositoryError;
use tokio::time::sleep;

mod common;

use common::{DialogEvent, FakeRepository, Harness, client, numbered_clients};

fn id(value: i64) -> ClientId {
    ClientId::new(value).unwrap()
}

fn people() -> Vec<Client> {
    vec![
        client(1, "Ana Pérez", "ana@example.com"),
        client(2, "Bruno Díaz", "bruno@example.com"),
        client(3, "Mariana López", "mariana@example.com"),
        client(4, "Carlos Ruiz", "carlos@example.com"),
    ]
}

#[tokio::test(start_paused = true)]
async fn initial_load_uses_url_parameters() {
    let harness = Harness::loaded(
        FakeRepository::new(numbered_clients(60)),
        "?search=cliente&page=2&per_page=25",
    )
    .await;

    let calls = harness.repo.list_calls();
    assert_eq!(
        calls,
        vec![
            ClientListQuery::new()
                .search("cliente")
                .paginate(2, PerPage::TwentyFive)
        ]
    );

    let state = harness.handle.state();
    assert_eq!(state.search_input, "cliente");
    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.last_page(), Some(3));
    assert_eq!(harness.url.get(), "search=cliente&page=2&per_page=25");
}

#[tokio::test(start_paused = true)]
async fn malformed_url_parameters_fall_back_to_defaults() {
    let harness =
        Harness::loaded(FakeRepository::new(numbered_clients(5)), "?page=abc&per_page=20").await;

    assert_eq!(harness.repo.list_calls(), vec![ClientListQuery::new()]);
    assert_eq!(harness.url.get(), "");
}

#[tokio::test(start_paused = true)]
async fn typing_is_debounced_into_one_fetch() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;

    for text in ["a", "an", "ana"] {
        harness.handle.set_search_text(text).await.unwrap();
        sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(harness.repo.list_calls().len(), 1);

    sleep(Duration::from_millis(500)).await;
    let state = harness.handle.settled().await.unwrap();

    let calls = harness.repo.list_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], ClientListQuery::new().search("ana"));

    let names: Vec<_> = state
        .page
        .unwrap()
        .items
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Ana Pérez", "Mariana López"]);
    assert_eq!(harness.url.get(), "search=ana");
}

#[tokio::test(start_paused = true)]
async fn debounced_blank_input_does_not_fetch() {
    let harness = Harness::loaded(FakeRepository::new(people()), "?search=ana").await;

    harness.handle.set_search_text("   ").await.unwrap();
    sleep(Duration::from_secs(1)).await;

    assert_eq!(harness.repo.list_calls().len(), 1);
    assert_eq!(harness.handle.state().query.search, "ana");
}

#[tokio::test(start_paused = true)]
async fn blank_submit_is_rejected_and_focuses_input() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;

    harness.handle.set_search_text("   ").await.unwrap();
    let result = harness.handle.submit_search().await;

    assert_eq!(result, Err(ControllerError::EmptySearch));
    assert_eq!(
        harness.notifier.messages(),
        vec![(EMPTY_SEARCH_MESSAGE.to_string(), NotificationKind::Error)]
    );
    assert_eq!(harness.focus.count(), 1);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(harness.repo.list_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn submit_skips_the_pending_debounce() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(30)), "?page=3").await;

    harness.handle.set_search_text(" cliente 1 ").await.unwrap();
    harness.handle.submit_search().await.unwrap();
    harness.handle.settled().await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let calls = harness.repo.list_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], ClientListQuery::new().search("cliente 1"));
}

#[tokio::test(start_paused = true)]
async fn clear_search_resets_to_the_first_page() {
    let harness = Harness::loaded(
        FakeRepository::new(numbered_clients(60)),
        "?search=cliente&page=2&per_page=25",
    )
    .await;

    harness.handle.clear_search().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(
        harness.repo.list_calls().last(),
        Some(&ClientListQuery::new().paginate(1, PerPage::TwentyFive))
    );
    assert_eq!(state.search_input, "");
    assert_eq!(state.current_page(), 1);
    assert_eq!(harness.url.get(), "per_page=25");
}

#[tokio::test(start_paused = true)]
async fn go_to_page_clamps_and_skips_current_page() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(23)), "").await;
    assert_eq!(harness.handle.state().last_page(), Some(3));

    harness.handle.go_to_page(4).await.unwrap();
    let state = harness.handle.settled().await.unwrap();
    assert_eq!(harness.repo.list_calls().last().unwrap().page, 3);
    assert_eq!(state.current_page(), 3);
    assert_eq!(state.page.unwrap().items.len(), 3);
    assert_eq!(harness.url.get(), "page=3");

    harness.handle.go_to_page(3).await.unwrap();
    harness.handle.go_to_page(10).await.unwrap();
    harness.handle.settled().await.unwrap();
    assert_eq!(harness.repo.list_calls().len(), 2);

    harness.handle.go_to_page(0).await.unwrap();
    let state = harness.handle.settled().await.unwrap();
    assert_eq!(harness.repo.list_calls().last().unwrap().page, 1);
    assert_eq!(state.current_page(), 1);
    assert_eq!(harness.url.get(), "");
}

#[tokio::test(start_paused = true)]
async fn per_page_change_is_used_by_the_next_fetch() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(60)), "?page=2").await;

    harness
        .handle
        .set_per_page(PerPage::TwentyFive)
        .await
        .unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(
        harness.repo.list_calls().last(),
        Some(&ClientListQuery::new().paginate(1, PerPage::TwentyFive))
    );
    assert_eq!(state.page.unwrap().items.len(), 25);
    assert_eq!(harness.url.get(), "per_page=25");
}

#[tokio::test(start_paused = true)]
async fn server_page_is_adopted_without_refetching() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(23)), "?page=5").await;

    let state = harness.handle.state();
    assert_eq!(harness.repo.list_calls().len(), 1);
    assert_eq!(state.current_page(), 3);
    assert_eq!(harness.url.get(), "page=3");
    assert_eq!(harness.url.history(), vec!["page=3".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn stale_responses_are_discarded() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;

    harness.repo.delay_next_list(Duration::from_secs(2));
    harness.handle.set_search_text("ana").await.unwrap();
    harness.handle.submit_search().await.unwrap();
    harness.handle.set_search_text("bruno").await.unwrap();
    harness.handle.submit_search().await.unwrap();

    let state = harness.handle.settled().await.unwrap();
    assert_eq!(state.query.search, "bruno");

    // Let the slow "ana" response arrive.
    sleep(Duration::from_secs(3)).await;
    let state = harness.handle.state();
    assert_eq!(state.query.search, "bruno");
    let page = state.page.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Bruno Díaz");
    assert_eq!(harness.url.get(), "search=bruno");
    assert!(!harness.url.history().contains(&"search=ana".to_string()));
}

#[tokio::test(start_paused = true)]
async fn load_failure_keeps_previous_page_and_retry_recovers() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(23)), "").await;

    harness
        .repo
        .fail_next_list(RepositoryError::Network("connection refused".into()));
    harness.handle.go_to_page(2).await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(state.phase, LoadPhase::Failed);
    assert_eq!(
        state.error.as_deref(),
        Some("Error al conectar con el servidor")
    );
    assert_eq!(state.page.as_ref().unwrap().current_page, 1);
    assert_eq!(harness.url.get(), "");

    harness.handle.retry().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(state.error, None);
    assert_eq!(state.page.unwrap().current_page, 2);
    assert_eq!(harness.repo.list_calls().len(), 3);
    assert_eq!(harness.url.get(), "page=2");
}

#[tokio::test(start_paused = true)]
async fn confirmed_delete_removes_row_and_refetches_once() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;

    harness
        .handle
        .request_delete(id(2), "Bruno Díaz")
        .await
        .unwrap();
    let state = harness.handle.state();
    assert_eq!(
        state.pending_deletion,
        Some(PendingDeletion {
            client_id: id(2),
            client_name: "Bruno Díaz".into(),
        })
    );

    harness.handle.confirm_delete().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(harness.repo.delete_calls(), vec![id(2)]);
    assert_eq!(harness.repo.list_calls().len(), 2);
    assert_eq!(state.pending_deletion, None);
    assert_eq!(state.deleting, None);
    let page = state.page.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.items.iter().all(|c| c.id != id(2)));
    assert_eq!(
        harness.notifier.messages(),
        vec![(DELETE_SUCCESS_MESSAGE.to_string(), NotificationKind::Success)]
    );

    let events = harness.dialog.events();
    assert_eq!(events.len(), 4);
    match &events[0] {
        DialogEvent::Opened(prompt) => assert!(prompt.message.contains("Bruno Díaz")),
        other => panic!("expected the dialog to open first, got {other:?}"),
    }
    assert_eq!(
        events[1..],
        [
            DialogEvent::Loading(true),
            DialogEvent::Loading(false),
            DialogEvent::Closed
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn row_is_marked_while_delete_is_in_flight() {
    let repo = FakeRepository::new(people());
    repo.delay_deletes(Duration::from_secs(1));
    let harness = Harness::loaded(repo, "").await;

    harness.handle.request_delete(id(1), "Ana Pérez").await.unwrap();
    harness.handle.confirm_delete().await.unwrap();

    let state = harness.handle.state();
    assert!(state.is_deleting(id(1)));
    assert!(!state.is_deleting(id(2)));

    // Ignored while the call is running.
    harness.handle.cancel_delete().await.unwrap();
    harness.handle.confirm_delete().await.unwrap();
    harness
        .handle
        .request_delete(id(3), "Mariana López")
        .await
        .unwrap();

    let state = harness.handle.settled().await.unwrap();
    assert_eq!(harness.repo.delete_calls(), vec![id(1)]);
    assert_eq!(state.deleting, None);
    assert_eq!(state.pending_deletion, None);
}

#[tokio::test(start_paused = true)]
async fn failed_delete_keeps_dialog_open() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;
    harness.repo.fail_next_delete(RepositoryError::Server {
        status: 500,
        message: "boom".into(),
    });

    harness.handle.request_delete(id(4), "Carlos Ruiz").await.unwrap();
    harness.handle.confirm_delete().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(state.deleting, None);
    assert_eq!(
        state.pending_deletion.map(|pending| pending.client_id),
        Some(id(4))
    );
    assert_eq!(state.page.unwrap().items.len(), 4);
    assert_eq!(harness.repo.list_calls().len(), 1);
    assert_eq!(
        harness.notifier.messages(),
        vec![(DELETE_ERROR_MESSAGE.to_string(), NotificationKind::Error)]
    );
    assert!(!harness.dialog.events().contains(&DialogEvent::Closed));

    // The user may retry from the still-open dialog.
    harness.handle.confirm_delete().await.unwrap();
    let state = harness.handle.settled().await.unwrap();
    assert_eq!(harness.repo.delete_calls(), vec![id(4), id(4)]);
    assert_eq!(state.pending_deletion, None);
    assert_eq!(harness.dialog.events().last(), Some(&DialogEvent::Closed));
}

#[tokio::test(start_paused = true)]
async fn cancel_closes_dialog_without_deleting() {
    let harness = Harness::loaded(FakeRepository::new(people()), "").await;

    harness.handle.request_delete(id(1), "Ana Pérez").await.unwrap();
    harness.handle.cancel_delete().await.unwrap();
    harness.handle.confirm_delete().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert!(harness.repo.delete_calls().is_empty());
    assert_eq!(state.pending_deletion, None);
    assert_eq!(harness.dialog.events().last(), Some(&DialogEvent::Closed));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_loading_then_loaded() {
    let repo = FakeRepository::new(people());
    repo.delay_next_list(Duration::from_secs(1));
    let harness = Harness::start(repo, "?page=1");
    let mut updates = harness.handle.subscribe();

    harness.handle.initialize().await.unwrap();

    updates.changed().await.unwrap();
    {
        let state = updates.borrow_and_update();
        assert_eq!(state.phase, LoadPhase::Loading);
        assert_eq!(state.requested, Some(ClientListQuery::new()));
        assert_eq!(state.page, None);
    }

    updates.changed().await.unwrap();
    let state = updates.borrow_and_update();
    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(state.requested, None);
    assert_eq!(state.page.as_ref().map(|page| page.items.len()), Some(4));
}

#[tokio::test(start_paused = true)]
async fn failed_page_change_keeps_displayed_page_and_can_be_repeated() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(23)), "").await;

    harness
        .repo
        .fail_next_list(RepositoryError::Network("timeout".into()));
    harness.handle.go_to_page(2).await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(state.phase, LoadPhase::Failed);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.page.as_ref().unwrap().current_page, 1);
    assert_eq!(
        state.requested,
        Some(ClientListQuery::new().paginate(2, PerPage::Ten))
    );
    assert_eq!(harness.url.get(), "");

    harness.handle.go_to_page(2).await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    assert_eq!(harness.repo.list_calls().len(), 3);
    assert_eq!(state.phase, LoadPhase::Loaded);
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.requested, None);
    assert_eq!(harness.url.get(), "page=2");
}

#[tokio::test(start_paused = true)]
async fn deleting_last_row_of_last_page_falls_back_one_page() {
    let harness = Harness::loaded(FakeRepository::new(numbered_clients(21)), "?page=3").await;
    let state = harness.handle.state();
    assert_eq!(state.current_page(), 3);
    assert_eq!(state.page.as_ref().unwrap().items.len(), 1);

    harness
        .handle
        .request_delete(id(21), "Cliente 21")
        .await
        .unwrap();
    harness.handle.confirm_delete().await.unwrap();
    let state = harness.handle.settled().await.unwrap();

    let calls = harness.repo.list_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].page, 3);
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.last_page(), Some(2));
    assert_eq!(state.page.unwrap().items.len(), 10);
    assert_eq!(harness.url.get(), "page=2");
}
