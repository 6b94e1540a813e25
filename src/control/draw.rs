use std::collections::BTreeSet;

use crate::model::*;

// 流局時の聴牌フラグの決定
// 1. 呼び出し側が指定したフラグを適用
// 2. 未指定のフラグはリーチ者なら聴牌,それ以外はノーテンで埋める
pub fn resolve_tenpai(inputs: &[ScoreInput], riichi_players: &BTreeSet<PlayerId>) -> Vec<bool> {
    let flags = apply_tenpai_flags(inputs);
    default_tenpai(inputs, &flags, riichi_players)
}

pub fn apply_tenpai_flags(inputs: &[ScoreInput]) -> Vec<Option<bool>> {
    inputs.iter().map(|i| i.is_tenpai).collect()
}

pub fn default_tenpai(
    inputs: &[ScoreInput],
    flags: &[Option<bool>],
    riichi_players: &BTreeSet<PlayerId>,
) -> Vec<bool> {
    inputs
        .iter()
        .zip(flags)
        .map(|(i, f)| f.unwrap_or_else(|| riichi_players.contains(&i.player_id)))
        .collect()
}

// 荒牌平局時の聴牌人数による得点変動 (ノーテン罰符)
pub fn tenpai_payments(tenpais: &[bool]) -> Vec<Point> {
    let n_tenpai = tenpais.iter().filter(|&&t| t).count();
    let (pay, recv) = match n_tenpai {
        1 => (1000, 3000),
        2 => (1500, 1500),
        3 => (3000, 1000),
        _ => (0, 0), // 全員ノーテン or 全員聴牌
    };
    tenpais
        .iter()
        .map(|&t| if t { recv } else { -pay })
        .collect()
}

// 荒牌平局のScoreにノーテン罰符を加算 (途中流局,流し満貫には適用しない)
pub fn apply_tenpai_payments(result: ResultType, scores: Vec<Score>) -> Vec<Score> {
    if result != ResultType::Draw {
        return scores;
    }
    let tenpais: Vec<bool> = scores.iter().map(|s| s.is_tenpai == Some(true)).collect();
    let payments = tenpai_payments(&tenpais);
    scores
        .into_iter()
        .zip(payments)
        .map(|(s, p)| Score {
            point: s.point + p,
            ..s
        })
        .collect()
}

#[test]
fn test_default_tenpai() {
    let inputs: Vec<ScoreInput> = vec![
        ScoreInput::new(1, 0),
        ScoreInput::new(2, 1).tenpai(false),
        ScoreInput::new(3, 2).tenpai(true),
        ScoreInput::new(4, 3),
    ];
    let riichi = BTreeSet::from([1, 2]);

    let flags = apply_tenpai_flags(&inputs);
    assert_eq!(flags, vec![None, Some(false), Some(true), None]);

    // リーチ者でも明示的にノーテンが指定されていればノーテン
    let tenpais = default_tenpai(&inputs, &flags, &riichi);
    assert_eq!(tenpais, vec![true, false, true, false]);
    assert_eq!(resolve_tenpai(&inputs, &riichi), tenpais);
}

#[test]
fn test_tenpai_payments() {
    assert_eq!(
        tenpai_payments(&[true, false, false, false]),
        vec![3000, -1000, -1000, -1000]
    );
    assert_eq!(
        tenpai_payments(&[true, false, true, false]),
        vec![1500, -1500, 1500, -1500]
    );
    assert_eq!(
        tenpai_payments(&[true, true, true, false]),
        vec![1000, 1000, 1000, -3000]
    );
    assert_eq!(tenpai_payments(&[true; 4]), vec![0; 4]);
    assert_eq!(tenpai_payments(&[false; 4]), vec![0; 4]);
}
