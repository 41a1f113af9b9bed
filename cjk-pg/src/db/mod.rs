//! Accès PostgreSQL (connexion, transaction par lieu)

pub mod pool;
pub mod transaction;
