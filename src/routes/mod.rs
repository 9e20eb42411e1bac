use std::sync::Arc;
use warp::Filter;
use crate::config::Config;
use crate::store::TaskStore;
pub mod webhook;
pub mod health;

pub fn routes(
  config: Arc<Config>,
  store: Arc<dyn TaskStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  health::health_route()
    .or(webhook::task_update_route(config, store))
    .with(warp::trace::request())
}
