use std::fs::File;
use std::io::{self, BufRead};

use log::error;
use serde::{Deserialize, Serialize};

use crate::control::{draw::apply_tenpai_payments, progression::next_settings_from_record};
use crate::control::score_table::{fill_points, StandardScoreTable};
use crate::model::*;
use crate::util::misc::*;

// [SettleRequest]
// 1局分の精算の入力 riichi_sticksは局開始時点の供託 (局中のリーチはriichiで指定)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    #[serde(default = "first_round")]
    pub number: u32,
    pub dealer: PlayerId,
    #[serde(default)]
    pub honba: u32,
    #[serde(default)]
    pub riichi_sticks: u32,
    #[serde(default)]
    pub riichi: Vec<PlayerId>,
    pub result: ResultType,
    pub inputs: Vec<ScoreInput>,
    // 検証用 inputsと同じ順序の得点変動
    #[serde(default)]
    pub expected: Option<Vec<Point>>,
}

fn first_round() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResponse {
    pub scores: Vec<Score>,
    pub next: NextRoundSettings,
}

#[derive(Debug, PartialEq)]
enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Debug)]
pub struct CalculatorApp {
    rule: Rule,
    file_path: Option<String>,
    exp: Option<String>,
}

impl CalculatorApp {
    pub fn new(rule: Rule, file_path: Option<String>, exp: Option<String>) -> Self {
        Self { rule, file_path, exp }
    }

    pub fn run(&self) -> Res {
        match (&self.file_path, &self.exp) {
            (Some(path), None) => self.run_from_file(path),
            (None, Some(exp)) => self.process_expression(exp).map(|_| ()),
            _ => Err("either a request file or a json expression is required".into()),
        }
    }

    fn run_from_file(&self, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        for exp in lines.map_while(Result::ok) {
            let e = exp.trim();
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
            } else if let Err(e) = self.process_expression(e) {
                error!("{}", e);
            }
            println!();
        }
        Ok(())
    }

    fn process_expression(&self, exp: &str) -> Res<Verify> {
        println!("> {}", exp);
        let req: SettleRequest = serde_json::from_str(exp)?;
        let res = settle_request(&self.rule, &req)?;
        println!("{}", serde_json::to_string_pretty(&res)?);

        let verify = match &req.expected {
            Some(points) => {
                let actual: Vec<Point> = res.scores.iter().map(|s| s.point).collect();
                if &actual == points {
                    Verify::Ok
                } else {
                    Verify::Error
                }
            }
            None => Verify::Skip,
        };
        println!("verify: {:?}", verify);
        Ok(verify)
    }
}

// 局を生成して開始,リーチを宣言した後に精算して次局の設定を求める
pub fn settle_request(rule: &Rule, req: &SettleRequest) -> Res<SettleResponse> {
    let mut round = Round::new(0, req.number, req.dealer, req.honba, req.riichi_sticks);
    round.start(0.0)?;
    for &id in &req.riichi {
        round.add_action(RoundAction::riichi(id))?;
    }

    let inputs = fill_points(&round, req.result, &req.inputs, &StandardScoreTable)?;
    if rule.tenpai_payment {
        round.complete_with(req.result, &inputs, 0.0, apply_tenpai_payments)?;
    } else {
        round.complete(req.result, &inputs, 0.0)?;
    }
    let next = next_settings_from_record(&round)?;

    Ok(SettleResponse {
        scores: round.scores().to_vec(),
        next,
    })
}

#[test]
fn test_calculator() {
    let app = CalculatorApp::new(Rule::default(), None, None);
    let file = File::open("tests/settle_requests.txt").unwrap();
    let lines = io::BufReader::new(file).lines();
    for exp in lines.map_while(Result::ok) {
        let e = exp.trim();
        if e.is_empty() || e.starts_with('#') {
            // 空行とコメント行はスキップ
            println!("> {}", exp);
        } else {
            assert_eq!(Verify::Ok, app.process_expression(e).unwrap());
        }
    }
}

#[test]
fn test_settle_request_next() {
    let req: SettleRequest = serde_json::from_str(
        r#"{"number": 4, "dealer": 4, "honba": 2, "result": "DRAW", "riichi": [4],
            "inputs": [{"player_id": 1, "seat": 0}, {"player_id": 2, "seat": 1},
                       {"player_id": 3, "seat": 2}, {"player_id": 4, "seat": 3}]}"#,
    )
    .unwrap();
    let res = settle_request(&Rule::default(), &req).unwrap();
    let points: Vec<Point> = res.scores.iter().map(|s| s.point).collect();
    assert_eq!(points, vec![-1000, -1000, -1000, 3000]);
    assert!(res.next.is_renchan);
    assert_eq!(res.next.next_round_number, 4);
    assert_eq!(res.next.next_honba, 3);
    assert_eq!(res.next.next_riichi_sticks, 1);
}
