use warp::Filter;
use serde_json::json;

pub fn health_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("api" / "health")
    .and(warp::get())
    .map(|| warp::reply::json(&json!({"status": "ok"})))
}
