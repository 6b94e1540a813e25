#![warn(rust_2018_idioms)]
// 構造的な意味合いや一貫性を保つために以下のclippy警告は無効化
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]

pub mod app;
pub mod control;
pub mod error;
pub mod listener;
pub mod model;
pub mod util;
