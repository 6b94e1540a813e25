use log::debug;

use super::common::wind_for_round;
use crate::error::{ValidationError, ValidationResult};
use crate::model::*;

// 終了した局から次局の局番号,場風,本場,供託,連荘を求める
// 局中のリーチ宣言による供託は呼び出し前にround.riichi_sticksに加算済みであること
pub fn next_settings(
    round: &Round,
    winner: Option<PlayerId>,
    is_dealer_tenpai: Option<bool>,
) -> ValidationResult<NextRoundSettings> {
    let result = round.result().ok_or(ValidationError::NotCompleted(round.id()))?;

    let is_dealer_win = result.has_winner() && winner == Some(round.dealer());
    let is_dealer_tenpai = result.is_draw() && is_dealer_tenpai.unwrap_or(false);
    let is_renchan = is_dealer_win || is_dealer_tenpai;

    let (next_round_number, next_honba) = if is_renchan {
        (round.number(), round.honba() + 1)
    } else {
        (round.number() + 1, 0)
    };
    // 和了があった場合,供託は和了者が獲得済み
    let next_riichi_sticks = if result.has_winner() {
        0
    } else {
        round.riichi_sticks()
    };

    let settings = NextRoundSettings {
        next_round_number,
        next_wind: wind_for_round(next_round_number),
        next_honba,
        next_riichi_sticks,
        is_renchan,
    };
    debug!("next settings of round {}: {}", round.id(), settings);
    Ok(settings)
}

// 確定済みのScoreから和了者と親の聴牌を読み取ってnext_settingsを呼び出す
// 親を含む複数の和了者がいる場合は親を和了者とする
pub fn next_settings_from_record(round: &Round) -> ValidationResult<NextRoundSettings> {
    let dealer = round.dealer();
    let winner = round
        .winners()
        .find(|s| s.player_id == dealer)
        .or_else(|| round.winners().next())
        .map(|s| s.player_id);
    let is_dealer_tenpai = round.score_of(dealer).and_then(|s| s.is_tenpai);
    next_settings(round, winner, is_dealer_tenpai)
}

#[cfg(test)]
fn completed(number: u32, honba: u32, riichi_sticks: u32, result: ResultType) -> Round {
    let mut r = Round::new(1, number, 100, honba, riichi_sticks);
    r.result = Some(result);
    r.started_at = Some(0.0);
    r.ended_at = Some(1.0);
    r
}

#[test]
fn test_dealer_win_renchan() {
    let r = completed(3, 1, 2, ResultType::Ron);
    let n = next_settings(&r, Some(100), None).unwrap();
    assert!(n.is_renchan);
    assert_eq!(n.next_round_number, 3);
    assert_eq!(n.next_honba, 2);
    assert_eq!(n.next_riichi_sticks, 0);
    assert_eq!(n.next_wind, Wind::East);
}

#[test]
fn test_non_dealer_win() {
    let r = completed(4, 3, 1, ResultType::Tsumo);
    let n = next_settings(&r, Some(7), None).unwrap();
    assert!(!n.is_renchan);
    assert_eq!(n.next_round_number, 5);
    assert_eq!(n.next_wind, Wind::South);
    assert_eq!(n.next_honba, 0);
    assert_eq!(n.next_riichi_sticks, 0);
}

#[test]
fn test_draw_dealer_tenpai() {
    let r = completed(2, 0, 3, ResultType::Draw);
    let n = next_settings(&r, None, Some(true)).unwrap();
    assert!(n.is_renchan);
    assert_eq!(n.next_round_number, 2);
    assert_eq!(n.next_honba, 1);
    assert_eq!(n.next_riichi_sticks, 3);

    let n = next_settings(&r, None, Some(false)).unwrap();
    assert!(!n.is_renchan);
    assert_eq!(n.next_round_number, 3);
    assert_eq!(n.next_honba, 0);
    assert_eq!(n.next_riichi_sticks, 3);
}

#[test]
fn test_special_draw() {
    let r = completed(8, 2, 1, ResultType::SpecialDraw(SpecialDrawType::FourWind));
    let n = next_settings(&r, None, None).unwrap();
    assert!(!n.is_renchan);
    assert_eq!(n.next_round_number, 9);
    assert_eq!(n.next_wind, Wind::West);
    assert_eq!(n.next_riichi_sticks, 1);
}

#[test]
fn test_not_completed() {
    let r = Round::new(5, 1, 100, 0, 0);
    assert_eq!(
        next_settings(&r, None, None),
        Err(ValidationError::NotCompleted(5))
    );
}

#[test]
fn test_from_record_prefers_dealer() {
    let mut r = completed(1, 0, 0, ResultType::Ron);
    let score = |player_id, seat, is_winner, is_ron_target| Score {
        player_id,
        seat,
        point: 0,
        is_dealer: player_id == 100,
        is_winner,
        is_ron_target,
        is_tenpai: None,
        detail: None,
    };
    r.scores = vec![
        score(7, 0, true, false),
        score(100, 1, true, false),
        score(8, 2, false, true),
        score(9, 3, false, false),
    ];
    let n = next_settings_from_record(&r).unwrap();
    assert!(n.is_renchan);
}
