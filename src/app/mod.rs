// mainから直接呼び出すアプリケーションの動作モードのモジュール

mod calculator;
mod engine;

pub use calculator::{settle_request, CalculatorApp, SettleRequest, SettleResponse};
pub use engine::{default_players, play_hanchan, random_scenario, EngineApp, RoundScenario};
