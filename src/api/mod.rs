pub mod catalog;
pub mod interactions;
pub mod recommend;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
