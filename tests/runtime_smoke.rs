use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::broadcast;

use catalog_overlay::{
    api::{ApiError, ApiResult, CatalogApi},
    character::{Character, CharacterDraft, PageEnvelope, PageInfo},
    controller::detail::{AutoConfirm, DetailExit, DetailSource, Presentation},
    core::store::CatalogStore,
    routes::Route,
    runtime::{
        events::CatalogEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_catalog},
    },
    types::{CharacterStatus, PageNumber},
};

const PAGE_SIZE: u64 = 2;
const TOTAL_PAGES: u32 = 3;

#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<(PageNumber, String)>>,
}

impl FakeApi {
    fn calls(&self) -> Vec<(PageNumber, String)> {
        self.calls.lock().expect("lock").clone()
    }
}

fn rec(id: u64, prefix: &str) -> Character {
    Character {
        id,
        name: format!("{prefix}{id}"),
        status: CharacterStatus::Alive,
        species: "Human".to_string(),
        image: format!("https://img/{id}.jpeg"),
    }
}

impl CatalogApi for FakeApi {
    async fn list_characters(&self, page: PageNumber, name: &str) -> ApiResult<PageEnvelope> {
        self.calls.lock().expect("lock").push((page, name.to_string()));
        let first = u64::from(page - 1) * PAGE_SIZE + 1;
        Ok(PageEnvelope {
            info: PageInfo {
                count: PAGE_SIZE * u64::from(TOTAL_PAGES),
                pages: TOTAL_PAGES,
                next: None,
                prev: None,
            },
            results: (first..first + PAGE_SIZE).map(|id| rec(id, name)).collect(),
        })
    }

    async fn get_character(&self, id: u64) -> ApiResult<Character> {
        if id < 1000 {
            Ok(rec(id, "remote-"))
        } else {
            Err(ApiError::Http {
                status: 404,
                status_text: "Not Found".to_string(),
            })
        }
    }
}

async fn wait_for(
    sub: &mut broadcast::Receiver<CatalogEvent>,
    pred: impl Fn(&CatalogEvent) -> bool,
) -> CatalogEvent {
    loop {
        let evt = tokio::time::timeout(Duration::from_secs(5), sub.recv())
            .await
            .expect("event")
            .expect("recv");
        if pred(&evt) {
            return evt;
        }
    }
}

fn ids(list: &[Character]) -> Vec<u64> {
    list.iter().map(|c| c.id).collect()
}

#[tokio::test(start_paused = true)]
async fn initial_load_then_near_end_appends() {
    let api = Arc::new(FakeApi::default());
    let handle = spawn_catalog(CatalogStore::new(), Arc::clone(&api), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { len: 2 })).await;
    assert_eq!(ids(&handle.filtered().await.expect("filtered")), vec![1, 2]);

    assert!(handle.near_end().await.expect("near end"));
    let evt = wait_for(&mut sub, |e| matches!(e, CatalogEvent::PageAppended { .. })).await;
    assert_eq!(evt, CatalogEvent::PageAppended { page: 2, added: 2 });

    let cursor = handle.cursor().await.expect("cursor");
    assert_eq!(cursor.page(), 2);
    assert!(cursor.has_more());
    assert_eq!(ids(&handle.filtered().await.expect("filtered")), vec![1, 2, 3, 4]);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn search_is_debounced_and_distinct() {
    let api = Arc::new(FakeApi::default());
    let handle = spawn_catalog(CatalogStore::new(), Arc::clone(&api), RuntimeConfig::default());
    let mut sub = handle.subscribe();
    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { .. })).await;

    for text in ["r", "ri", "ric", "rick"] {
        handle.search(text).await.expect("search");
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let settled = wait_for(&mut sub, |e| matches!(e, CatalogEvent::QuerySettled { .. })).await;
    assert_eq!(settled, CatalogEvent::QuerySettled { query: "rick".into() });
    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { .. })).await;

    assert_eq!(api.calls(), vec![(1, String::new()), (1, "rick".to_string())]);
    let visible = handle.filtered().await.expect("filtered");
    assert_eq!(visible[0].name, "rick1");

    handle.search("rick").await.expect("search again");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(api.calls().len(), 2, "unchanged query is not refetched");

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn detail_resolves_locally_then_remotely() {
    let api = Arc::new(FakeApi::default());
    let handle = spawn_catalog(CatalogStore::new(), api, RuntimeConfig::default());
    let mut sub = handle.subscribe();
    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { .. })).await;

    let local = handle
        .resolve_detail(DetailSource::Route("2".into()))
        .await
        .expect("resolve");
    assert_eq!(local.map(|c| c.name), Some("2".to_string()));

    let remote = handle
        .resolve_detail(DetailSource::Route("500".into()))
        .await
        .expect("resolve");
    assert_eq!(remote.map(|c| c.name), Some("remote-500".to_string()));

    let missing = handle
        .resolve_detail(DetailSource::Route("5000".into()))
        .await
        .expect("resolve");
    assert!(missing.is_none());

    let garbage = handle
        .resolve_detail(DetailSource::Route("abc".into()))
        .await
        .expect("resolve");
    assert!(garbage.is_none());

    let inline = rec(42, "inline-");
    let resolved = handle
        .resolve_detail(DetailSource::Inline(inline.clone()))
        .await
        .expect("resolve");
    assert_eq!(resolved, Some(inline));

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn form_and_delete_workflows_emit_events() {
    let api = Arc::new(FakeApi::default());
    let handle = spawn_catalog(CatalogStore::new(), api, RuntimeConfig::default());
    let mut sub = handle.subscribe();
    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { .. })).await;

    let created = handle
        .create(CharacterDraft {
            name: "Squanchy".to_string(),
            status: CharacterStatus::Alive,
            species: "Cat".to_string(),
            image: "s.png".to_string(),
        })
        .await
        .expect("create");
    assert_eq!(created.id, 3);
    assert_eq!(
        wait_for(&mut sub, |e| matches!(e, CatalogEvent::Created { .. })).await,
        CatalogEvent::Created { id: 3 }
    );

    let mut form = handle.edit_form(3).await.expect("form");
    assert_eq!(form.name, "Squanchy");
    form.name = "Squanchy Jr".to_string();
    let route = handle.submit(&mut form).await.expect("submit");
    assert_eq!(route, Some(Route::detail(3)));
    assert_eq!(
        wait_for(&mut sub, |e| matches!(e, CatalogEvent::Updated { .. })).await,
        CatalogEvent::Updated { id: 3 }
    );

    form.name.clear();
    assert_eq!(handle.submit(&mut form).await.expect("submit"), None);

    let mut decline = |_: &str| false;
    let exit = handle
        .remove(3, &mut decline, Presentation::Routed)
        .await
        .expect("remove");
    assert!(exit.is_none());
    assert!(handle.find(3).await.expect("find").is_some());

    let exit = handle
        .remove(3, &mut AutoConfirm, Presentation::Routed)
        .await
        .expect("remove");
    assert_eq!(exit, Some(DetailExit::Navigate(Route::List)));
    assert!(handle.find(3).await.expect("find").is_none());
    assert_eq!(
        wait_for(&mut sub, |e| matches!(e, CatalogEvent::Deleted { .. })).await,
        CatalogEvent::Deleted { id: 3 }
    );

    let visible = handle.filtered().await.expect("filtered");
    assert_eq!(ids(&visible), vec![1, 2]);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test(start_paused = true)]
async fn edit_of_unknown_id_emits_no_update() {
    let api = Arc::new(FakeApi::default());
    let handle = spawn_catalog(CatalogStore::new(), api, RuntimeConfig::default());
    let mut sub = handle.subscribe();
    wait_for(&mut sub, |e| matches!(e, CatalogEvent::ListReplaced { .. })).await;

    let mut form = handle.edit_form(77).await.expect("form");
    assert!(form.name.is_empty());
    form.name = "Ghost".to_string();
    form.species = "Unknown".to_string();
    form.image = "g.png".to_string();

    let route = handle.submit(&mut form).await.expect("submit");
    assert_eq!(route, Some(Route::detail(77)));
    assert!(handle.find(77).await.expect("find").is_none());

    handle.delete(99).await.expect("delete");
    let next = tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event")
        .expect("recv");
    assert_eq!(next, CatalogEvent::Deleted { id: 99 });

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn calls_after_shutdown_report_closed_channel() {
    let config = RuntimeConfig {
        reload_on_start: false,
        ..RuntimeConfig::default()
    };
    let handle = spawn_catalog(CatalogStore::new(), Arc::new(FakeApi::default()), config);
    handle.shutdown().await.expect("shutdown");

    let err = handle.find(1).await.expect_err("closed");
    assert!(matches!(err, RuntimeError::ChannelClosed));
}
