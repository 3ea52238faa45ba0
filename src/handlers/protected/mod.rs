// handlers/protected - every route here sits behind jwt_auth_middleware,
// so handlers receive the caller as a `Subject` argument.
pub mod comments;
pub mod posts;
pub mod users;
