use crate::auth::TokenService;
use crate::db::DB;

#[derive(Clone)]
pub struct AppState {
    pub users: DB,
    pub tokens: TokenService,
}
