pub mod manager;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use manager::{connect, DatabaseError};
pub use postgres::PgStore;
pub use store::{CommentStore, LikeStore, PostStore, Store, SubscriptionStore, UserStore};
