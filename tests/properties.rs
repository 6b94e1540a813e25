// 精算と半荘進行の不変条件のテスト
// シード付き乱数で生成した局の結果を公開APIで精算し,点数の保存と次局の決定を検証

use hanchan::app::{default_players, random_scenario, RoundScenario};
use hanchan::control::common::{round_number_within_wind, wind_for_round};
use hanchan::control::draw::apply_tenpai_payments;
use hanchan::control::hanchan::Hanchan;
use hanchan::control::progression::next_settings_from_record;
use hanchan::control::score_table::{fill_points, StandardScoreTable};
use hanchan::control::settle::settle;
use hanchan::control::store::MemoryStore;
use hanchan::model::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX_ROUNDS: usize = 200;

fn players() -> [Player; SEAT] {
    default_players().try_into().unwrap()
}

// 局を開始してリーチを宣言
fn started_round(number: u32, dealer_seat: Seat, honba: u32, sticks: u32, sc: &RoundScenario) -> Round {
    let dealer = players()[dealer_seat].id;
    let mut round = Round::new(1, number, dealer, honba, sticks);
    round.start(0.0).unwrap();
    for a in &sc.actions {
        round.add_action(a.clone()).unwrap();
    }
    round
}

// ---------------------------------------------------------------------------
// 座席
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn round_number_within_wind_is_periodic(n in 1u32..1000) {
        let k = round_number_within_wind(n);
        prop_assert!((1..=4).contains(&k));
        prop_assert_eq!(k, round_number_within_wind(n + 4));
        prop_assert_eq!(k, (n - 1) % 4 + 1);
    }

    #[test]
    fn wind_follows_round_number(n in 1u32..=16) {
        let expected = [Wind::East, Wind::South, Wind::West, Wind::North][((n - 1) / 4) as usize];
        prop_assert_eq!(wind_for_round(n), expected);
    }
}

// ---------------------------------------------------------------------------
// 精算
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // 積み棒の支払いは相殺され,和了時のみ供託が卓に戻る
    #[test]
    fn settlement_conserves_points(
        seed in 0u64..1_000_000,
        number in 1u32..=12,
        dealer_seat in 0usize..4,
        honba in 0u32..8,
        sticks in 0u32..4,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sc = random_scenario(&mut rng, &players());
        let round = started_round(number, dealer_seat, honba, sticks, &sc);
        let inputs = fill_points(&round, sc.result, &sc.inputs, &StandardScoreTable).unwrap();
        let scores = settle(&round, sc.result, &inputs, &round.riichi_players()).unwrap();
        let scores = apply_tenpai_payments(sc.result, scores);

        let pool = round.riichi_sticks() as Point * RIICHI_STAKE;
        let expected = if sc.result.has_winner() { pool } else { 0 };
        prop_assert_eq!(delta_sum(&scores), expected, "{} {:?}", sc.result, scores);
        prop_assert_eq!(scores.len(), SEAT);
        if !sc.result.has_winner() && sc.result != ResultType::Draw {
            prop_assert!(scores.iter().all(|s| s.point == 0));
        }
    }

    // 精算は局のスナップショットと入力のみで決まる
    #[test]
    fn settlement_is_repeatable(seed in 0u64..1_000_000, honba in 0u32..5, sticks in 0u32..3) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sc = random_scenario(&mut rng, &players());
        let round = started_round(1, 0, honba, sticks, &sc);
        let inputs = fill_points(&round, sc.result, &sc.inputs, &StandardScoreTable).unwrap();
        let before = round.clone();
        let a = settle(&round, sc.result, &inputs, &round.riichi_players()).unwrap();
        let b = settle(&round, sc.result, &inputs, &round.riichi_players()).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(round, before);
    }
}

// ---------------------------------------------------------------------------
// 次局の決定
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn next_round_follows_renchan(
        seed in 0u64..1_000_000,
        number in 1u32..=12,
        dealer_seat in 0usize..4,
        honba in 0u32..8,
        sticks in 0u32..4,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sc = random_scenario(&mut rng, &players());
        let mut round = started_round(number, dealer_seat, honba, sticks, &sc);
        let inputs = fill_points(&round, sc.result, &sc.inputs, &StandardScoreTable).unwrap();
        round.complete(sc.result, &inputs, 1.0).unwrap();
        let next = next_settings_from_record(&round).unwrap();

        let dealer = round.score_of(round.dealer()).unwrap();
        let renchan = (sc.result.has_winner() && dealer.is_winner)
            || (sc.result.is_draw() && dealer.is_tenpai == Some(true));
        prop_assert_eq!(next.is_renchan, renchan);
        if renchan {
            prop_assert_eq!(next.next_round_number, number);
            prop_assert_eq!(next.next_honba, honba + 1);
        } else {
            prop_assert_eq!(next.next_round_number, number + 1);
            prop_assert_eq!(next.next_honba, 0);
        }
        prop_assert_eq!(next.next_wind, wind_for_round(next.next_round_number));

        // 和了があれば供託は精算済み,流局なら持ち越し
        if sc.result.has_winner() {
            prop_assert_eq!(next.next_riichi_sticks, 0);
        } else {
            prop_assert_eq!(next.next_riichi_sticks, round.riichi_sticks());
        }
    }
}

// ---------------------------------------------------------------------------
// 半荘
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // 持ち点の合計と卓上の供託の和は常に配給原点の合計
    #[test]
    fn hanchan_conserves_points(seed in 0u64..1_000_000) {
        let rule = Rule::default();
        let total = rule.initial_score * SEAT as Point;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut h = Hanchan::new(rule, default_players(), MemoryStore::new(), vec![]).unwrap();
        h.begin(0.0).unwrap();

        let mut n_round = 0;
        while !h.is_over() && n_round < MAX_ROUNDS {
            n_round += 1;
            let sc = random_scenario(&mut rng, h.players());
            for a in sc.actions {
                h.declare(a).unwrap();
            }
            let round = h.current_round().unwrap();
            let sum: Point = h.standings().iter().map(|s| s.score).sum();
            prop_assert_eq!(sum + round.riichi_sticks() as Point * RIICHI_STAKE, total);

            match h.end_round(sc.result, &sc.inputs, n_round as f64).unwrap() {
                Some(next) => {
                    let sum: Point = h.standings().iter().map(|s| s.score).sum();
                    prop_assert_eq!(sum + next.next_riichi_sticks as Point * RIICHI_STAKE, total);
                    let r = h.current_round().unwrap();
                    prop_assert_eq!(r.number(), next.next_round_number);
                    prop_assert_eq!(r.honba(), next.next_honba);
                    prop_assert_eq!(r.riichi_sticks(), next.next_riichi_sticks);
                    prop_assert_eq!(r.carried_from(), Some(round.id()));
                }
                None => prop_assert!(h.is_over()),
            }
        }
        prop_assert!(h.is_over() || n_round >= MAX_ROUNDS);
    }
}
