pub mod common;
pub mod draw;
pub mod hanchan;
pub mod lifecycle;
pub mod listener;
pub mod progression;
pub mod score_table;
pub mod settle;
pub mod store;

pub use self::{
    common::{next_dealer, round_number_within_wind, wind_for_round},
    hanchan::Hanchan,
    progression::{next_settings, next_settings_from_record},
    settle::settle,
    store::{MemoryStore, RoundStore, StoreError},
};
