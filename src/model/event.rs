use super::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Begin(EventBegin),   // 半荘開始
    New(EventNew),       // 局開始
    Action(EventAction), // リーチ・鳴きの追加,取り消し
    Win(EventWin),       // 局終了 (和了,流し満貫)
    Draw(EventDraw),     // 局終了 (流局)
    End(EventEnd),       // 半荘終了
}

impl Event {
    #[inline]
    pub fn begin(rule: Rule, players: Vec<Player>) -> Self {
        Self::Begin(EventBegin { rule, players })
    }

    #[inline]
    pub fn new(round: &Round, dealer_seat: Seat, standings: Vec<Standing>) -> Self {
        Self::New(EventNew {
            round_id: round.id(),
            number: round.number(),
            wind: round.wind(),
            dealer: round.dealer(),
            dealer_seat,
            honba: round.honba(),
            riichi_sticks: round.riichi_sticks(),
            standings,
        })
    }

    #[inline]
    pub fn action(round_id: RoundId, action: RoundAction, is_removed: bool) -> Self {
        Self::Action(EventAction {
            round_id,
            action,
            is_removed,
        })
    }

    // 結果の種別によってWinかDrawに振り分け
    pub fn round_end(round: &Round, next: Option<NextRoundSettings>, standings: Vec<Standing>) -> Self {
        let result = round.result().unwrap_or(ResultType::Draw);
        let scores = round.scores().to_vec();
        if result.has_winner() {
            Self::Win(EventWin {
                round_id: round.id(),
                result,
                honba: round.honba(),
                riichi_sticks: round.riichi_sticks(),
                scores,
                next,
                standings,
            })
        } else {
            Self::Draw(EventDraw {
                round_id: round.id(),
                result,
                scores,
                next,
                standings,
            })
        }
    }

    #[inline]
    pub fn end(standings: Vec<Standing>) -> Self {
        Self::End(EventEnd { standings })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBegin {
    pub rule: Rule,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNew {
    pub round_id: RoundId,
    pub number: u32,
    pub wind: Wind,
    pub dealer: PlayerId,
    pub dealer_seat: Seat,
    pub honba: u32,
    pub riichi_sticks: u32,
    pub standings: Vec<Standing>, // 局開始時点の持ち点
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAction {
    pub round_id: RoundId,
    pub action: RoundAction,
    pub is_removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWin {
    pub round_id: RoundId,
    pub result: ResultType,
    pub honba: u32,
    pub riichi_sticks: u32,
    pub scores: Vec<Score>,
    pub next: Option<NextRoundSettings>, // 半荘終了の場合はNone
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraw {
    pub round_id: RoundId,
    pub result: ResultType,
    pub scores: Vec<Score>, // ノーテン罰符による変動を含む
    pub next: Option<NextRoundSettings>,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnd {
    pub standings: Vec<Standing>,
}
