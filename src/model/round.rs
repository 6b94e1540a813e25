use std::collections::BTreeSet;

use super::*;
use crate::control::common::{round_number_within_wind, wind_for_round};

// [ResultType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    Tsumo,                        // ツモ和了
    Ron,                          // ロン和了 (ダブロン, トリロンを含む)
    Draw,                         // 荒牌平局
    NagashiMangan,                // 流し満貫
    SpecialDraw(SpecialDrawType), // 途中流局
}

impl ResultType {
    #[inline]
    pub fn has_winner(self) -> bool {
        matches!(
            self,
            ResultType::Tsumo | ResultType::Ron | ResultType::NagashiMangan
        )
    }

    // 聴牌フラグが意味を持つ結果 (流し満貫は荒牌時に成立するため含む)
    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            ResultType::Draw | ResultType::NagashiMangan | ResultType::SpecialDraw(_)
        )
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Tsumo => write!(f, "ツモ"),
            ResultType::Ron => write!(f, "ロン"),
            ResultType::Draw => write!(f, "荒牌平局"),
            ResultType::NagashiMangan => write!(f, "流し満貫"),
            ResultType::SpecialDraw(t) => write!(f, "途中流局({})", t),
        }
    }
}

// [SpecialDrawType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialDrawType {
    FourKan,       // 四槓散了
    FourWind,      // 四風連打
    NineTerminals, // 九種九牌
}

impl fmt::Display for SpecialDrawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpecialDrawType::FourKan => "四槓散了",
            SpecialDrawType::FourWind => "四風連打",
            SpecialDrawType::NineTerminals => "九種九牌",
        };
        write!(f, "{}", s)
    }
}

// [RoundPhase]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// [Round]
// 状態遷移は control::lifecycle で定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub(crate) id: RoundId,
    pub(crate) number: u32,                   // 局番号 (1-origin, 東1局=1, 南1局=5)
    pub(crate) dealer: PlayerId,              // 親
    pub(crate) honba: u32,                    // 本場
    pub(crate) riichi_sticks: u32,            // 供託 (局中のリーチ宣言分を含む)
    pub(crate) carried_from: Option<RoundId>, // 本場・供託の引き継ぎ元
    pub(crate) result: Option<ResultType>,
    pub(crate) started_at: Option<f64>,
    pub(crate) ended_at: Option<f64>,
    pub(crate) actions: Vec<RoundAction>,
    pub(crate) scores: Vec<Score>,
}

impl Round {
    pub fn new(id: RoundId, number: u32, dealer: PlayerId, honba: u32, riichi_sticks: u32) -> Self {
        Self {
            id,
            number,
            dealer,
            honba,
            riichi_sticks,
            carried_from: None,
            result: None,
            started_at: None,
            ended_at: None,
            actions: vec![],
            scores: vec![],
        }
    }

    pub fn with_carried_from(mut self, from: Option<RoundId>) -> Self {
        self.carried_from = from;
        self
    }

    #[inline]
    pub fn id(&self) -> RoundId {
        self.id
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn wind(&self) -> Wind {
        wind_for_round(self.number)
    }

    #[inline]
    pub fn dealer(&self) -> PlayerId {
        self.dealer
    }

    #[inline]
    pub fn honba(&self) -> u32 {
        self.honba
    }

    #[inline]
    pub fn riichi_sticks(&self) -> u32 {
        self.riichi_sticks
    }

    #[inline]
    pub fn carried_from(&self) -> Option<RoundId> {
        self.carried_from
    }

    #[inline]
    pub fn result(&self) -> Option<ResultType> {
        self.result
    }

    #[inline]
    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    #[inline]
    pub fn ended_at(&self) -> Option<f64> {
        self.ended_at
    }

    #[inline]
    pub fn actions(&self) -> &[RoundAction] {
        &self.actions
    }

    #[inline]
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn phase(&self) -> RoundPhase {
        match (self.started_at, self.ended_at) {
            (_, Some(_)) => RoundPhase::Completed,
            (Some(_), None) => RoundPhase::InProgress,
            (None, None) => RoundPhase::NotStarted,
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.phase() == RoundPhase::Completed
    }

    pub fn riichi_players(&self) -> BTreeSet<PlayerId> {
        self.actions
            .iter()
            .filter(|a| a.is_riichi())
            .map(|a| a.player_id)
            .collect()
    }

    pub fn winners(&self) -> impl Iterator<Item = &Score> {
        self.scores.iter().filter(|s| s.is_winner)
    }

    pub fn ron_target(&self) -> Option<&Score> {
        self.scores.iter().find(|s| s.is_ron_target)
    }

    pub fn score_of(&self, player_id: PlayerId) -> Option<&Score> {
        self.scores.iter().find(|s| s.player_id == player_id)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}局 {}本場 (供託:{}, 親:{}, {})",
            self.wind(),
            round_number_within_wind(self.number),
            self.honba,
            self.riichi_sticks,
            self.dealer,
            self.phase(),
        )?;
        if let Some(r) = self.result {
            write!(f, " {}", r)?;
        }
        Ok(())
    }
}

// [NextRoundSettings]
// 次局の局番号,場風,本場,供託 親の決定は呼び出し側で行う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRoundSettings {
    pub next_round_number: u32,
    pub next_wind: Wind,
    pub next_honba: u32,
    pub next_riichi_sticks: u32,
    pub is_renchan: bool, // 連荘
}

impl fmt::Display for NextRoundSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}局 {}本場 供託:{}{}",
            self.next_wind,
            round_number_within_wind(self.next_round_number),
            self.next_honba,
            self.next_riichi_sticks,
            if self.is_renchan { " (連荘)" } else { "" },
        )
    }
}

#[test]
fn test_result_type_serde() {
    let r = ResultType::SpecialDraw(SpecialDrawType::NineTerminals);
    let s = serde_json::to_string(&r).unwrap();
    assert_eq!(s, r#"{"SPECIAL_DRAW":"NINE_TERMINALS"}"#);
    let r2: ResultType = serde_json::from_str(&s).unwrap();
    assert_eq!(r, r2);
    let t: ResultType = serde_json::from_str("\"TSUMO\"").unwrap();
    assert_eq!(t, ResultType::Tsumo);
}

#[test]
fn test_round_phase() {
    let mut r = Round::new(1, 5, 10, 0, 0);
    assert_eq!(r.phase(), RoundPhase::NotStarted);
    assert_eq!(r.wind(), Wind::South);
    r.started_at = Some(1.0);
    assert_eq!(r.phase(), RoundPhase::InProgress);
    r.ended_at = Some(2.0);
    assert_eq!(r.phase(), RoundPhase::Completed);
}
