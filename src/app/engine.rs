use log::{info, warn};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::control::{common::upper_seat, hanchan::Hanchan, listener::Listener, store::MemoryStore};
use crate::error::HanchanResult;
use crate::listener::*;
use crate::model::*;
use crate::util::misc::*;

// 1半荘の局数の上限 (延長や連荘が続いた場合の打ち切り)
const MAX_ROUNDS: usize = 200;

// [App]
// ランダムな局結果で半荘を進行させるシミュレーションモード
#[derive(Debug)]
pub struct EngineApp {
    seed: u64,
    rule: Rule,
    n_game: u32,
    write: bool,
    quiet: bool,
}

impl EngineApp {
    pub fn new(seed: u64, rule: Rule, n_game: u32, write: bool, quiet: bool) -> Self {
        let mut app = Self {
            seed,
            rule,
            n_game,
            write,
            quiet,
        };

        if app.seed == 0 {
            app.seed = unixtime_now() as u64;
            info!(
                "Random seed is not specified. Unix timestamp '{}' is used as seed.",
                app.seed
            );
        }

        app
    }

    pub fn run(self) -> Res {
        println!("seed: {}", self.seed);
        let start = std::time::Instant::now();
        if self.n_game == 0 {
            self.run_single_game()?;
        } else {
            self.run_multiple_game()?;
        }
        println!(
            "total elapsed time: {:8.3}sec",
            start.elapsed().as_nanos() as f32 / 1000000000.0
        );
        Ok(())
    }

    fn run_single_game(&self) -> Res {
        let mut listeners: Vec<Box<dyn Listener>> = vec![];
        if !self.quiet {
            listeners.push(Box::new(EventPrinter::new()));
        }
        if self.write {
            listeners.push(Box::new(EventWriter::new()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut hanchan = Hanchan::new(self.rule.clone(), default_players(), MemoryStore::new(), listeners)?;
        let n_round = play_hanchan(&mut hanchan, &mut rng)?;
        println!("rounds: {}", n_round);
        for st in hanchan.standings() {
            println!("player {}: {:6} ({})", st.player_id, st.score, st.rank + 1);
        }
        Ok(())
    }

    fn run_multiple_game(&self) -> Res {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut sum_delta_scores = [0; SEAT];
        let mut sum_ranks = [0; SEAT];
        for n in 0..self.n_game {
            let seed = rng.next_u64();
            let mut game_rng = StdRng::seed_from_u64(seed);
            let listeners: Vec<Box<dyn Listener>> = if self.write {
                vec![Box::new(EventWriter::new())]
            } else {
                vec![]
            };
            let mut hanchan =
                Hanchan::new(self.rule.clone(), default_players(), MemoryStore::new(), listeners)?;
            let n_round = play_hanchan(&mut hanchan, &mut game_rng)?;

            print!("{:5},{:4},{:20}", n, n_round, seed);
            for st in hanchan.standings() {
                sum_delta_scores[st.seat] += st.score - self.rule.initial_score;
                sum_ranks[st.seat] += st.rank + 1;
                print!(", seat{}:{:6}({})", st.seat, st.score, st.rank + 1);
            }
            println!();
        }

        for s in 0..SEAT {
            println!(
                "seat{} avg_rank: {:.2}, avg_delta_score: {:6}",
                s,
                sum_ranks[s] as f32 / self.n_game as f32,
                sum_delta_scores[s] / self.n_game as i32,
            );
        }
        Ok(())
    }
}

pub fn default_players() -> Vec<Player> {
    (0..SEAT)
        .map(|s| Player::new(s as PlayerId + 1, &format!("player{}", s), s))
        .collect()
}

// 半荘が終了するまでランダムな局を繰り返す 戻り値は消化した局数
pub fn play_hanchan<S: crate::control::store::RoundStore, R: Rng>(
    hanchan: &mut Hanchan<S>,
    rng: &mut R,
) -> HanchanResult<usize> {
    hanchan.begin(unixtime_now())?;
    for n in 1..=MAX_ROUNDS {
        let scenario = random_scenario(rng, hanchan.players());
        for a in scenario.actions {
            hanchan.declare(a)?;
        }
        if hanchan
            .end_round(scenario.result, &scenario.inputs, unixtime_now())?
            .is_none()
        {
            return Ok(n);
        }
    }
    warn!("hanchan did not end within {} rounds", MAX_ROUNDS);
    Ok(MAX_ROUNDS)
}

// [RoundScenario]
// 1局分の宣言と結果
#[derive(Debug, Clone)]
pub struct RoundScenario {
    pub actions: Vec<RoundAction>,
    pub result: ResultType,
    pub inputs: Vec<ScoreInput>,
}

// 結果の出現率(%): ロン45, ツモ22, 流局28, 途中流局3, 流し満貫2
// ダブロンは放銃者の上家を含む組み合わせのみ生成
pub fn random_scenario<R: Rng>(rng: &mut R, players: &[Player; SEAT]) -> RoundScenario {
    let riichi: Vec<bool> = (0..SEAT).map(|_| rng.gen_bool(0.15)).collect();
    let actions = players
        .iter()
        .filter(|p| riichi[p.seat])
        .map(|p| RoundAction::riichi(p.id))
        .collect();
    let mut inputs: Vec<ScoreInput> = players.iter().map(|p| ScoreInput::new(p.id, p.seat)).collect();

    let roll = rng.gen_range(0..100);
    let result = if roll < 45 {
        let target = rng.gen_range(0..SEAT);
        let upper = upper_seat(target);
        let mut winners = vec![upper];
        if rng.gen_bool(0.05) {
            let others: Vec<Seat> = (0..SEAT).filter(|&s| s != target && s != upper).collect();
            if let Some(&s) = others.choose(rng) {
                winners.push(s);
            }
        } else {
            // シングルロンは任意の他家
            let others: Vec<Seat> = (0..SEAT).filter(|&s| s != target).collect();
            if let Some(&s) = others.choose(rng) {
                winners[0] = s;
            }
        }
        for &w in &winners {
            let (han, fu) = random_han_fu(rng);
            inputs[w] = inputs[w].clone().winner().detail(han, fu);
        }
        inputs[target] = inputs[target].clone().ron_target();
        ResultType::Ron
    } else if roll < 67 {
        let w = rng.gen_range(0..SEAT);
        let (han, fu) = random_han_fu(rng);
        inputs[w] = inputs[w].clone().winner().detail(han, fu);
        ResultType::Tsumo
    } else if roll < 95 {
        for (i, input) in inputs.iter_mut().enumerate() {
            let t = riichi[i] || rng.gen_bool(0.4);
            *input = input.clone().tenpai(t);
        }
        ResultType::Draw
    } else if roll < 98 {
        let t = *[
            SpecialDrawType::FourKan,
            SpecialDrawType::FourWind,
            SpecialDrawType::NineTerminals,
        ]
        .choose(rng)
        .unwrap_or(&SpecialDrawType::NineTerminals);
        ResultType::SpecialDraw(t)
    } else {
        let w = rng.gen_range(0..SEAT);
        for (i, input) in inputs.iter_mut().enumerate() {
            let t = riichi[i] || rng.gen_bool(0.4);
            *input = input.clone().tenpai(t);
        }
        inputs[w] = inputs[w].clone().winner();
        ResultType::NagashiMangan
    };

    RoundScenario {
        actions,
        result,
        inputs,
    }
}

fn random_han_fu<R: Rng>(rng: &mut R) -> (usize, usize) {
    let han = match rng.gen_range(0..100) {
        0..=29 => 1,
        30..=54 => 2,
        55..=74 => 3,
        75..=86 => 4,
        87..=94 => 5,
        95..=97 => 6,
        98 => 8,
        _ => 13,
    };
    let fu = *[30, 30, 30, 40, 40, 50, 60, 70]
        .choose(rng)
        .unwrap_or(&30);
    (han, fu)
}

#[test]
fn test_random_scenario_is_valid() {
    let players: [Player; SEAT] = [
        Player::new(1, "a", 0),
        Player::new(2, "b", 1),
        Player::new(3, "c", 2),
        Player::new(4, "d", 3),
    ];
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let sc = random_scenario(&mut rng, &players);
        let mut round = Round::new(1, 1, 1, 0, 0);
        round.start(0.0).unwrap();
        for a in sc.actions {
            round.add_action(a).unwrap();
        }
        let inputs = crate::control::score_table::fill_points(
            &round,
            sc.result,
            &sc.inputs,
            &crate::control::score_table::StandardScoreTable,
        )
        .unwrap();
        round.complete(sc.result, &inputs, 1.0).unwrap();
    }
}

#[test]
fn test_play_hanchan() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let mut h = Hanchan::new(Rule::default(), default_players(), MemoryStore::new(), vec![]).unwrap();
        let n = play_hanchan(&mut h, &mut rng).unwrap();
        assert!(n >= 1);
        assert!(h.is_over());
    }
}
