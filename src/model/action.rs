use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundActionType {
    Riichi, // リーチ (供託に1000点)
    Chi,    // チー
    Pon,    // ポン
    Minkan, // 明槓
    Ankan,  // 暗槓
    Kakan,  // 加槓
}

impl RoundActionType {
    // 他家の捨て牌を取る鳴き
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(
            self,
            RoundActionType::Chi | RoundActionType::Pon | RoundActionType::Minkan
        )
    }
}

// 局中のプレイヤーの宣言 追加と削除のみで書き換えは行わない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAction {
    pub player_id: PlayerId,
    pub action_type: RoundActionType,
    #[serde(default)]
    pub target: Option<PlayerId>, // 鳴かれたプレイヤー
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

impl RoundAction {
    #[inline]
    pub fn new(
        player_id: PlayerId,
        action_type: RoundActionType,
        target: Option<PlayerId>,
        tiles: Vec<Tile>,
    ) -> Self {
        Self {
            player_id,
            action_type,
            target,
            tiles,
        }
    }

    #[inline]
    pub fn riichi(player_id: PlayerId) -> Self {
        Self::new(player_id, RoundActionType::Riichi, None, vec![])
    }

    #[inline]
    pub fn is_riichi(&self) -> bool {
        self.action_type == RoundActionType::Riichi
    }
}

impl fmt::Display for RoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(player:{}", self.action_type, self.player_id)?;
        if let Some(t) = self.target {
            write!(f, ", from:{}", t)?;
        }
        if !self.tiles.is_empty() {
            write!(f, ", {}", tiles_to_string(&self.tiles))?;
        }
        write!(f, ")")
    }
}
