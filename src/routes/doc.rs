use crate::routes::{health, tasks};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "taskboard-server",
    description = "Task management API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(tasks::TasksApi::openapi());
    root.merge(health::HealthApi::openapi());
    root
}
