// 半荘・局・得点のデータモデル
mod action;
mod define;
mod event;
mod round;
mod score;
mod tile;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::{action::*, define::*, event::*, round::*, score::*, tile::*};
