// Composition root.
//
// Responsibilities
// - Read config from the environment.
// - Instantiate the store, queue and GitHub client once.
// - Wire them into the producer, consumer and read path.
// - Spawn the background workers and serve HTTP.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
pub mod workers;
