pub mod auth;
pub mod backends;
pub mod gateway;
pub mod interactions;
pub mod registry;

pub use auth::TokenService;
pub use gateway::{Gateway, RecommendRequest};
pub use interactions::InteractionLogger;
pub use registry::{ModelKind, ModelRegistry};
