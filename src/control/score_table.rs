use crate::error::{ValidationError, ValidationResult};
use crate::model::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinType {
    Tsumo,
    Ron,
}

// 飜数,符数から得点を求める点数表
pub trait ScoreTable {
    // (ロン, ツモ・子の支払い, ツモ・親の支払い)
    fn points(&self, han: usize, fu: usize, is_dealer: bool) -> Points;

    // 和了者の得点 (積み棒,供託を含まない)
    fn lookup(&self, han: usize, fu: usize, is_dealer: bool, win_type: WinType) -> Point {
        let (ron, non_dealer, dealer) = self.points(han, fu, is_dealer);
        match (win_type, is_dealer) {
            (WinType::Ron, _) => ron,
            (WinType::Tsumo, true) => non_dealer * 3,
            (WinType::Tsumo, false) => non_dealer * 2 + dealer,
        }
    }
}

// 一般的な点数表
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScoreTable;

fn ceil(n: Point) -> Point {
    (n + 99) / 100 * 100
}

fn calc_base_point(fu: usize, han: usize) -> Point {
    match han {
        0..=4 => fu.saturating_mul(1 << (han + 2)).min(2000) as Point, // 4飜以下は満貫で頭打ち
        5 => 2000,       // 満貫
        6..=7 => 3000,   // 跳満
        8..=10 => 4000,  // 倍満
        11..=12 => 6000, // 三倍満
        _ => 8000,       // 数え役満
    }
}

pub fn get_score_title(han: usize, fu: usize) -> &'static str {
    match calc_base_point(fu, han) {
        2000 => "満貫",
        3000 => "跳満",
        4000 => "倍満",
        6000 => "三倍満",
        8000 => "数え役満",
        _ => "",
    }
}

impl ScoreTable for StandardScoreTable {
    fn points(&self, han: usize, fu: usize, is_dealer: bool) -> Points {
        let base = calc_base_point(fu, han);
        if is_dealer {
            (ceil(base * 6), ceil(base * 2), 0)
        } else {
            (ceil(base * 4), ceil(base), ceil(base * 2))
        }
    }
}

// 得点が未指定で飜数,符数が指定されている入力を点数表から補完する
// 得点が指定済みの入力はそのまま
pub fn fill_points(
    round: &Round,
    result: ResultType,
    inputs: &[ScoreInput],
    table: &dyn ScoreTable,
) -> ValidationResult<Vec<ScoreInput>> {
    let mut filled = inputs.to_vec();
    let dealer = round.dealer();

    match result {
        ResultType::Tsumo => {
            let Some(w) = filled.iter().position(|i| i.is_winner) else {
                return Ok(filled);
            };
            let is_dealer_win = filled[w].player_id == dealer;
            if filled.iter().all(|i| i.point.is_some()) {
                return Ok(filled);
            }
            let detail = filled[w]
                .detail
                .clone()
                .ok_or(ValidationError::MissingDetail(filled[w].player_id))?;
            let (_, non_dealer, dealer_pay) = table.points(detail.han, detail.fu, is_dealer_win);
            for (i, input) in filled.iter_mut().enumerate() {
                if input.point.is_some() {
                    continue;
                }
                input.point = Some(if i == w {
                    table.lookup(detail.han, detail.fu, is_dealer_win, WinType::Tsumo)
                } else if !is_dealer_win && input.player_id == dealer {
                    -dealer_pay
                } else {
                    -non_dealer
                });
            }
        }
        ResultType::Ron => {
            for input in filled.iter_mut().filter(|i| i.is_winner && i.point.is_none()) {
                let detail = input
                    .detail
                    .as_ref()
                    .ok_or(ValidationError::MissingDetail(input.player_id))?;
                let is_dealer = input.player_id == dealer;
                input.point = Some(table.lookup(detail.han, detail.fu, is_dealer, WinType::Ron));
            }
        }
        ResultType::NagashiMangan => {
            // 満貫のツモ和了と同じ支払い
            let Some(w) = filled.iter().position(|i| i.is_winner) else {
                return Ok(filled);
            };
            let is_dealer_win = filled[w].player_id == dealer;
            let (_, non_dealer, dealer_pay) = table.points(5, 30, is_dealer_win);
            for (i, input) in filled.iter_mut().enumerate() {
                if input.point.is_some() {
                    continue;
                }
                input.point = Some(if i == w {
                    table.lookup(5, 30, is_dealer_win, WinType::Tsumo)
                } else if !is_dealer_win && input.player_id == dealer {
                    -dealer_pay
                } else {
                    -non_dealer
                });
            }
        }
        ResultType::Draw | ResultType::SpecialDraw(_) => {}
    }

    Ok(filled)
}

// cargo test --release print_points_table -- --nocapture
#[test]
fn print_points_table() {
    let table = StandardScoreTable;
    let fu_list = [20, 25, 30, 40, 50, 60, 70, 80, 90, 100, 110];

    println!("点数計算表 (子) ============================================");
    for fu in fu_list {
        print!("[{fu:3}符] ");
        for han in 1..=4 {
            let scores = table.points(han, fu, false);
            print!("{han}飜:{:5}({:4}/{:4}) ", scores.0, scores.1, scores.2)
        }
        println!();
    }
    for han in 5..=13 {
        let scores = table.points(han, 30, false);
        println!(
            "{han:2}飜:{:5}({:4}/{:5}) {}",
            scores.0,
            scores.1,
            scores.2,
            get_score_title(han, 30)
        );
    }
}

#[test]
fn test_standard_points() {
    let t = StandardScoreTable;
    assert_eq!(t.points(1, 30, false), (1000, 300, 500));
    assert_eq!(t.points(3, 30, false), (3900, 1000, 2000));
    assert_eq!(t.points(4, 30, true), (11600, 3900, 0));
    assert_eq!(t.points(4, 40, false), (8000, 2000, 4000));
    assert_eq!(t.points(6, 30, true), (18000, 6000, 0));
    assert_eq!(t.points(13, 30, false), (32000, 8000, 16000));
    assert_eq!(t.lookup(3, 30, false, WinType::Tsumo), 4000);
    assert_eq!(t.lookup(2, 30, true, WinType::Tsumo), 3000);
    assert_eq!(t.lookup(2, 30, true, WinType::Ron), 2900);
    assert_eq!(get_score_title(5, 30), "満貫");
}

#[test]
fn test_large_han_is_capped() {
    let t = StandardScoreTable;
    assert_eq!(t.points(13, 30, false), t.points(64, 30, false));
    assert_eq!(t.points(200, 110, true), (48000, 16000, 0));
    assert_eq!(t.points(4, usize::MAX, false), (8000, 2000, 4000));
    assert_eq!(get_score_title(64, 30), "数え役満");

    let round = Round::new(1, 1, 1, 0, 0);
    let inputs = vec![
        ScoreInput::new(1, 0),
        ScoreInput::new(2, 1).winner().detail(64, 30),
        ScoreInput::new(3, 2).ron_target(),
        ScoreInput::new(4, 3),
    ];
    let filled = fill_points(&round, ResultType::Ron, &inputs, &StandardScoreTable).unwrap();
    assert_eq!(filled[1].point, Some(32000));
}

#[test]
fn test_fill_points_tsumo() {
    let round = Round::new(1, 1, 1, 0, 0);
    let inputs = vec![
        ScoreInput::new(1, 0),
        ScoreInput::new(2, 1).winner().detail(3, 30),
        ScoreInput::new(3, 2),
        ScoreInput::new(4, 3),
    ];
    let filled = fill_points(&round, ResultType::Tsumo, &inputs, &StandardScoreTable).unwrap();
    let points: Vec<Point> = filled.iter().map(|i| i.point.unwrap()).collect();
    assert_eq!(points, vec![-2000, 4000, -1000, -1000]);
}

#[test]
fn test_fill_points_ron() {
    let round = Round::new(1, 1, 1, 0, 0);
    let inputs = vec![
        ScoreInput::new(1, 0).winner().detail(2, 30),
        ScoreInput::new(2, 1).ron_target(),
        ScoreInput::new(3, 2).winner(),
        ScoreInput::new(4, 3),
    ];
    assert_eq!(
        fill_points(&round, ResultType::Ron, &inputs, &StandardScoreTable),
        Err(ValidationError::MissingDetail(3))
    );
    let inputs = vec![inputs[0].clone(), inputs[1].clone()];
    let filled = fill_points(&round, ResultType::Ron, &inputs, &StandardScoreTable).unwrap();
    assert_eq!(filled[0].point, Some(2900));
    assert_eq!(filled[1].point, None);
}

#[test]
fn test_fill_points_nagashi() {
    let round = Round::new(1, 1, 1, 0, 0);
    let inputs: Vec<ScoreInput> = (0..SEAT)
        .map(|s| {
            let i = ScoreInput::new(s as PlayerId + 1, s);
            if s == 2 { i.winner() } else { i }
        })
        .collect();
    let filled = fill_points(&round, ResultType::NagashiMangan, &inputs, &StandardScoreTable).unwrap();
    let points: Vec<Point> = filled.iter().map(|i| i.point.unwrap()).collect();
    assert_eq!(points, vec![-4000, -2000, 8000, -2000]);
}
