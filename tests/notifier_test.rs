use std::net::SocketAddr;
use std::sync::Arc;
use serde_json::json;
use tg_task_webhook::config::{Config, NotifierConfig};
use tg_task_webhook::models::TaskUpdateEvent;
use tg_task_webhook::notifier::TaskNotifier;
use tg_task_webhook::routes::routes;
use tg_task_webhook::store::InMemoryTaskStore;

async fn spawn_webhook(secret: &str, store: Arc<InMemoryTaskStore>) -> SocketAddr {
  let api = routes(Arc::new(Config::with_secret(secret)), store);
  let (addr, server) = warp::serve(api).bind_ephemeral(([127, 0, 0, 1], 0));
  tokio::spawn(server);
  addr
}

fn webhook_url(addr: SocketAddr) -> String {
  format!("http://{addr}/telegram-task-update")
}

#[tokio::test]
async fn notifier_delivers_update_to_webhook() {
  let store = Arc::new(InMemoryTaskStore::new());
  store.register("42", "tg_referral_5").await;
  let addr = spawn_webhook("s3cr3t", store.clone()).await;

  let notifier = TaskNotifier::from_config(&NotifierConfig {
    webhook_url: Some(webhook_url(addr)),
    webhook_secret: Some("s3cr3t".into()),
  })
  .unwrap();

  let event = TaskUpdateEvent::new(42, "tg_referral_5", "completed", Some(json!({"referrals": 5})));
  let status = notifier.send(&event).await.unwrap();
  assert_eq!(status, reqwest::StatusCode::OK);

  let row = store.get("42", "tg_referral_5").await.unwrap();
  assert_eq!(row.status.as_deref(), Some("completed"));
  assert_eq!(row.meta, Some(json!({"referrals": 5})));
}

#[tokio::test]
async fn notifier_surfaces_rejected_secret() {
  let addr = spawn_webhook("s3cr3t", Arc::new(InMemoryTaskStore::new())).await;
  let notifier = TaskNotifier::new(reqwest::Client::new(), webhook_url(addr), "wrong");

  let err = notifier
    .send(&TaskUpdateEvent::new(1, "daily_login", "completed", None))
    .await
    .unwrap_err();
  assert!(format!("{err:#}").contains("401"), "{err:#}");
}

#[test]
fn notifier_is_skipped_without_configuration() {
  assert!(TaskNotifier::from_config(&NotifierConfig::default()).is_none());
  assert!(TaskNotifier::from_config(&NotifierConfig {
    webhook_url: Some("http://localhost:8080/telegram-task-update".into()),
    webhook_secret: None,
  })
  .is_none());
}
