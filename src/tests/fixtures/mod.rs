pub mod fakes;
pub mod raw_events;
pub mod state;
pub mod stores;
