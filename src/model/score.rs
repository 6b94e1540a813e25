use super::*;

// 和了の詳細 (表示・記録用, 点数計算には使用しない)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinDetail {
    pub han: usize, // 飜数(ドラを含む)
    pub fu: usize,  // 符数
    #[serde(default)]
    pub yakus: Vec<String>,
}

// 局終了時に呼び出し側から渡される各プレイヤーの入力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreInput {
    pub player_id: PlayerId,
    pub seat: Seat,
    pub point: Option<Point>, // 点数表から求めた得点変動 (積み棒,供託を含まない)
    pub is_winner: bool,
    pub is_ron_target: bool,
    pub is_tenpai: Option<bool>, // 未指定の場合はリーチ者のみ聴牌扱い
    pub detail: Option<WinDetail>,
}

impl ScoreInput {
    pub fn new(player_id: PlayerId, seat: Seat) -> Self {
        Self {
            player_id,
            seat,
            ..Default::default()
        }
    }

    pub fn point(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    pub fn winner(mut self) -> Self {
        self.is_winner = true;
        self
    }

    pub fn ron_target(mut self) -> Self {
        self.is_ron_target = true;
        self
    }

    pub fn tenpai(mut self, is_tenpai: bool) -> Self {
        self.is_tenpai = Some(is_tenpai);
        self
    }

    pub fn detail(mut self, han: usize, fu: usize) -> Self {
        self.detail = Some(WinDetail {
            han,
            fu,
            yakus: vec![],
        });
        self
    }
}

// 局の確定した得点変動 (1局につき各プレイヤー1つ)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player_id: PlayerId,
    pub seat: Seat,
    pub point: Point, // 得点変動 (リーチ棒の支払いは含まない)
    pub is_dealer: bool,
    pub is_winner: bool,
    pub is_ron_target: bool,
    pub is_tenpai: Option<bool>, // 流局系の結果の場合のみSome
    pub detail: Option<WinDetail>,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat{} player{}: {:+}", self.seat, self.player_id, self.point)?;
        if self.is_dealer {
            write!(f, " [親]")?;
        }
        if self.is_winner {
            write!(f, " [和了]")?;
        }
        if self.is_ron_target {
            write!(f, " [放銃]")?;
        }
        if self.is_tenpai == Some(true) {
            write!(f, " [聴牌]")?;
        }
        Ok(())
    }
}

pub fn delta_sum(scores: &[Score]) -> Point {
    scores.iter().map(|s| s.point).sum()
}
