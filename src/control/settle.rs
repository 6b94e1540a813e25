use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};

use super::common::upper_seat;
use super::draw::resolve_tenpai;
use crate::error::{ValidationError, ValidationResult};
use crate::model::*;

// 局の結果から各プレイヤーの得点変動を求める
// 入力のスナップショットから新しいScoreの配列を生成し,roundや入力は変更しない
// リーチ棒の支払いは宣言時に処理済みのため,ここでは供託の受け取りのみ扱う
pub fn settle(
    round: &Round,
    result: ResultType,
    inputs: &[ScoreInput],
    riichi_players: &BTreeSet<PlayerId>,
) -> ValidationResult<Vec<Score>> {
    validate(round, result, inputs)?;

    let tenpais = if result.is_draw() {
        Some(resolve_tenpai(inputs, riichi_players))
    } else {
        None
    };
    let mut scores = base_scores(round, result, inputs, tenpais.as_deref());

    let honba = round.honba() as Point;
    let pool = round.riichi_sticks() as Point * RIICHI_STAKE;
    match result {
        ResultType::Tsumo => {
            let w = winner_indices(&scores)[0];
            apply_tsumo_honba(&mut scores, w, honba);
            scores[w].point += pool;
        }
        ResultType::NagashiMangan => {
            let w = winner_indices(&scores)[0];
            scores[w].point += pool;
        }
        ResultType::Ron => {
            let winners = winner_indices(&scores);
            let target = scores.iter().position(|s| s.is_ron_target);
            let winner_seats: Vec<Seat> = winners.iter().map(|&i| scores[i].seat).collect();
            let target_seat = target.map(|i| scores[i].seat);
            match bonus_recipient(&winner_seats, target_seat) {
                Some(k) => {
                    let r = winners[k];
                    if let Some(t) = target {
                        scores[t].point -= honba * HONBA_RON;
                        scores[r].point += honba * HONBA_RON;
                    }
                    scores[r].point += pool;
                }
                None => {
                    warn!(
                        "round {}: no winner at the upper seat of the ron target, honba {} and {} riichi sticks are not paid",
                        round.id(),
                        honba,
                        round.riichi_sticks(),
                    );
                }
            }
        }
        ResultType::Draw | ResultType::SpecialDraw(_) => {}
    }

    debug!(
        "settle round {} ({}): {}",
        round.id(),
        result,
        scores
            .iter()
            .map(|s| format!("{}:{:+}", s.player_id, s.point))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(scores)
}

// 積み棒と供託を受け取る和了者 (winner_seats内のindex)
// ダブロン・トリロンの場合は放銃者の上家の和了者のみが受け取る
// 放銃者が不明な場合は誰も受け取らない
pub fn bonus_recipient(winner_seats: &[Seat], ron_target: Option<Seat>) -> Option<Index> {
    match winner_seats {
        [] => None,
        [_] => Some(0),
        _ => {
            let upper = upper_seat(ron_target?);
            winner_seats.iter().position(|&s| s == upper)
        }
    }
}

pub fn validate(round: &Round, result: ResultType, inputs: &[ScoreInput]) -> ValidationResult<()> {
    use ValidationError::*;

    if inputs.len() != SEAT {
        return Err(PlayerCount {
            expected: SEAT,
            found: inputs.len(),
        });
    }

    let mut players = HashSet::new();
    let mut seats = HashSet::new();
    for i in inputs {
        if !players.insert(i.player_id) {
            return Err(DuplicatePlayer(i.player_id));
        }
        if i.seat >= SEAT || !seats.insert(i.seat) {
            return Err(InvalidSeat(i.seat));
        }
    }
    if !players.contains(&round.dealer()) {
        return Err(DealerMissing(round.dealer()));
    }

    let n_winner = inputs.iter().filter(|i| i.is_winner).count();
    let n_target = inputs.iter().filter(|i| i.is_ron_target).count();
    let (winner_ok, winner_expected, target_ok, target_expected) = match result {
        ResultType::Tsumo | ResultType::NagashiMangan => (n_winner == 1, "exactly 1", n_target == 0, "0"),
        ResultType::Ron => ((1..=3).contains(&n_winner), "1 to 3", n_target == 1, "exactly 1"),
        ResultType::Draw | ResultType::SpecialDraw(_) => (n_winner == 0, "0", n_target == 0, "0"),
    };
    if !winner_ok {
        return Err(WinnerCount {
            result,
            expected: winner_expected,
            found: n_winner,
        });
    }
    if !target_ok {
        return Err(RonTargetCount {
            result,
            expected: target_expected,
            found: n_target,
        });
    }
    if let Some(i) = inputs.iter().find(|i| i.is_winner && i.is_ron_target) {
        return Err(WinnerIsRonTarget(i.player_id));
    }

    let needs_point = |i: &ScoreInput| match result {
        ResultType::Tsumo | ResultType::NagashiMangan => true,
        ResultType::Ron => i.is_winner,
        ResultType::Draw | ResultType::SpecialDraw(_) => false,
    };
    if let Some(i) = inputs.iter().find(|i| needs_point(i) && i.point.is_none()) {
        return Err(MissingPoint {
            result,
            player: i.player_id,
        });
    }

    Ok(())
}

fn base_scores(
    round: &Round,
    result: ResultType,
    inputs: &[ScoreInput],
    tenpais: Option<&[bool]>,
) -> Vec<Score> {
    // ロンの場合,放銃者の支払いは和了者の得点の合計
    let ron_total: Point = inputs
        .iter()
        .filter(|i| i.is_winner)
        .filter_map(|i| i.point)
        .sum();

    inputs
        .iter()
        .enumerate()
        .map(|(idx, i)| {
            let point = match result {
                ResultType::Tsumo | ResultType::NagashiMangan => i.point.unwrap_or_default(),
                ResultType::Ron if i.is_winner => i.point.unwrap_or_default(),
                ResultType::Ron if i.is_ron_target => {
                    if i.point.is_some_and(|p| p != -ron_total) {
                        debug!(
                            "ron target {} point {:?} replaced by {}",
                            i.player_id, i.point, -ron_total
                        );
                    }
                    -ron_total
                }
                ResultType::Ron => 0,
                ResultType::Draw | ResultType::SpecialDraw(_) => 0,
            };
            Score {
                player_id: i.player_id,
                seat: i.seat,
                point,
                is_dealer: i.player_id == round.dealer(),
                is_winner: i.is_winner,
                is_ron_target: i.is_ron_target,
                is_tenpai: tenpais.map(|t| t[idx]),
                detail: if i.is_winner { i.detail.clone() } else { None },
            }
        })
        .collect()
}

fn winner_indices(scores: &[Score]) -> Vec<usize> {
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_winner)
        .map(|(i, _)| i)
        .collect()
}

// 積み棒 (ツモ) 親子の区別なく1人100点ずつ
fn apply_tsumo_honba(scores: &mut [Score], winner: usize, honba: Point) {
    for (i, s) in scores.iter_mut().enumerate() {
        if i == winner {
            s.point += honba * HONBA_RON;
        } else {
            s.point -= honba * HONBA_TSUMO;
        }
    }
}

#[cfg(test)]
fn inputs4(f: impl Fn(ScoreInput) -> ScoreInput) -> Vec<ScoreInput> {
    (0..SEAT)
        .map(|s| f(ScoreInput::new(s as PlayerId + 1, s)))
        .collect()
}

#[test]
fn test_tsumo_honba() {
    let round = Round::new(1, 1, 1, 2, 0);
    let inputs = inputs4(|i| match i.seat {
        0 => i.winner().point(3900),
        _ => i.point(-1300),
    });
    let scores = settle(&round, ResultType::Tsumo, &inputs, &BTreeSet::new()).unwrap();
    assert_eq!(scores[0].point, 3900 + 600);
    for s in &scores[1..] {
        assert_eq!(s.point, -1300 - 200);
    }
    assert_eq!(delta_sum(&scores), 0);
    assert!(scores[0].is_dealer);
    assert_eq!(scores[0].is_tenpai, None);
}

#[test]
fn test_ron_single_winner() {
    let round = Round::new(1, 2, 2, 1, 2);
    let inputs = inputs4(|i| match i.seat {
        2 => i.winner().point(8000),
        0 => i.ron_target(),
        _ => i,
    });
    let scores = settle(&round, ResultType::Ron, &inputs, &BTreeSet::new()).unwrap();
    assert_eq!(scores[2].point, 8000 + 300 + 2000);
    assert_eq!(scores[0].point, -8000 - 300);
    assert_eq!(scores[1].point, 0);
    assert_eq!(scores[3].point, 0);
}

#[test]
fn test_double_ron_upper_seat() {
    let round = Round::new(1, 3, 1, 1, 1);
    let inputs = inputs4(|i| match i.seat {
        1 => i.winner().point(2000),
        3 => i.winner().point(5200),
        2 => i.ron_target(),
        _ => i,
    });
    let scores = settle(&round, ResultType::Ron, &inputs, &BTreeSet::new()).unwrap();
    // 放銃者(seat2)の上家はseat1
    assert_eq!(scores[1].point, 2000 + 300 + 1000);
    assert_eq!(scores[3].point, 5200);
    assert_eq!(scores[2].point, -2000 - 5200 - 300);
}

#[test]
fn test_double_ron_inputs_out_of_seat_order() {
    let round = Round::new(1, 3, 1, 1, 1);
    let mut inputs = inputs4(|i| match i.seat {
        1 => i.winner().point(2000),
        3 => i.winner().point(5200),
        2 => i.ron_target(),
        _ => i,
    });
    inputs.reverse();
    let scores = settle(&round, ResultType::Ron, &inputs, &BTreeSet::new()).unwrap();
    // 入力の順序に関係なく上家(seat1)が受け取る
    let by_seat = |seat: Seat| scores.iter().find(|s| s.seat == seat).unwrap().point;
    assert_eq!(by_seat(1), 2000 + 300 + 1000);
    assert_eq!(by_seat(3), 5200);
    assert_eq!(by_seat(2), -2000 - 5200 - 300);
}

#[test]
fn test_double_ron_without_upper_seat_winner() {
    let round = Round::new(1, 3, 1, 1, 1);
    let inputs = inputs4(|i| match i.seat {
        0 => i.winner().point(2000),
        3 => i.winner().point(5200),
        2 => i.ron_target(),
        _ => i,
    });
    let scores = settle(&round, ResultType::Ron, &inputs, &BTreeSet::new()).unwrap();
    assert_eq!(scores[0].point, 2000);
    assert_eq!(scores[3].point, 5200);
    assert_eq!(scores[2].point, -7200);
}

#[test]
fn test_bonus_recipient() {
    assert_eq!(bonus_recipient(&[1, 3], Some(2)), Some(0));
    assert_eq!(bonus_recipient(&[3, 1], Some(2)), Some(1));
    assert_eq!(bonus_recipient(&[0, 1, 3], Some(2)), Some(1));
    assert_eq!(bonus_recipient(&[0, 3], Some(2)), None);
    assert_eq!(bonus_recipient(&[1, 3], None), None);
    assert_eq!(bonus_recipient(&[3], Some(0)), Some(0));
    assert_eq!(bonus_recipient(&[], Some(0)), None);
}

#[test]
fn test_draw_forces_zero() {
    let round = Round::new(1, 1, 1, 0, 3);
    let inputs = inputs4(|i| i.point(1500));
    let riichi = BTreeSet::from([2]);
    let scores = settle(&round, ResultType::Draw, &inputs, &riichi).unwrap();
    assert!(scores.iter().all(|s| s.point == 0));
    assert_eq!(scores[1].is_tenpai, Some(true));
    assert_eq!(scores[0].is_tenpai, Some(false));
}

#[test]
fn test_nagashi_mangan_pool() {
    let round = Round::new(1, 1, 1, 1, 2);
    let inputs = inputs4(|i| match i.seat {
        1 => i.winner().point(8000),
        0 => i.point(-4000),
        _ => i.point(-2000),
    });
    let scores = settle(&round, ResultType::NagashiMangan, &inputs, &BTreeSet::new()).unwrap();
    assert_eq!(scores[1].point, 8000 + 2000);
    assert_eq!(scores[0].point, -4000);
    assert!(scores[1].is_tenpai.is_some());
}

#[test]
fn test_validation_errors() {
    let round = Round::new(1, 1, 1, 0, 0);
    let none = BTreeSet::new();

    let inputs = inputs4(|i| i.point(0));
    assert!(matches!(
        settle(&round, ResultType::Tsumo, &inputs, &none),
        Err(ValidationError::WinnerCount { found: 0, .. })
    ));

    let inputs = inputs4(|i| match i.seat {
        0 => i.winner().point(3900),
        1 => i,
        _ => i.point(-1300),
    });
    assert_eq!(
        settle(&round, ResultType::Tsumo, &inputs, &none),
        Err(ValidationError::MissingPoint {
            result: ResultType::Tsumo,
            player: 2
        })
    );

    let inputs = inputs4(|i| match i.seat {
        0 => i.winner().point(3900),
        _ => i,
    });
    assert!(matches!(
        settle(&round, ResultType::Ron, &inputs, &none),
        Err(ValidationError::RonTargetCount { found: 0, .. })
    ));

    let inputs = inputs4(|i| i.winner().point(1000));
    assert!(matches!(
        settle(&round, ResultType::Ron, &inputs, &none),
        Err(ValidationError::WinnerCount { found: 4, .. })
    ));

    let inputs = inputs4(|i| match i.seat {
        0 => i.winner(),
        _ => i,
    });
    assert!(matches!(
        settle(&round, ResultType::Draw, &inputs, &none),
        Err(ValidationError::WinnerCount { found: 1, .. })
    ));

    let mut inputs = inputs4(|i| i);
    inputs.pop();
    assert!(matches!(
        settle(&round, ResultType::Draw, &inputs, &none),
        Err(ValidationError::PlayerCount { found: 3, .. })
    ));

    let inputs = inputs4(|i| ScoreInput { player_id: 9, ..i });
    assert_eq!(
        settle(&round, ResultType::Draw, &inputs, &none),
        Err(ValidationError::DuplicatePlayer(9))
    );
}

#[test]
fn test_settle_is_pure() {
    let round = Round::new(1, 1, 1, 1, 1);
    let inputs = inputs4(|i| match i.seat {
        1 => i.winner().point(1000),
        3 => i.ron_target(),
        _ => i,
    });
    let riichi = BTreeSet::from([2]);
    let a = settle(&round, ResultType::Ron, &inputs, &riichi).unwrap();
    let b = settle(&round, ResultType::Ron, &inputs, &riichi).unwrap();
    assert_eq!(a, b);
}
