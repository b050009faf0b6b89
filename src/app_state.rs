use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use crate::{config::Config, disclosure::DisclosureService, templates::DefaultTemplateRenderer};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Sqlite>,
    pub config: Arc<Config>,
    pub disclosure: Arc<DisclosureService<DefaultTemplateRenderer>>,
}
