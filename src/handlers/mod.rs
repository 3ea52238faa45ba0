// Two security tiers:
// public (no token) and protected (behind jwt_auth_middleware).
// Handlers translate HTTP into service calls; services own the rules.
pub mod protected;
pub mod public;
