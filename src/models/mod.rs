pub mod interaction;
pub mod movie;
pub mod user;

pub use interaction::{Interaction, InteractionType};
pub use movie::Movie;
pub use user::User;
