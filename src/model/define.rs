use super::*;

// 型エイリアス
pub type Seat = usize; // 座席 (0~3, 半荘の間は不変)
pub type Point = i32; // 点数 (得点変動は符号付き)
pub type Points = (Point, Point, Point); // (ロン, ツモ時の子の支払い, ツモ時の親の支払い)
pub type PlayerId = u32;
pub type RoundId = u64;
pub type Index = usize; // その他Index
pub type Type = usize; // 牌の種別部分 (萬子,筒子,索子,字牌)
pub type Tnum = usize; // 牌の数字部分 (1~9, 0:赤5)

// Number
pub const SEAT: usize = 4; // 座席の数
pub const TYPE: usize = 4; // 牌の種別部分の数
pub const RIICHI_STAKE: Point = 1000; // リーチ棒1本の点数
pub const HONBA_TSUMO: Point = 100; // 積み棒1本あたりのツモ時の1人の支払い
pub const HONBA_RON: Point = 300; // 積み棒1本あたりのロン時の支払い

// Type Index
pub const TM: usize = 0; // Type: Manzu (萬子)
pub const TP: usize = 1; // Type: Pinzu (筒子)
pub const TS: usize = 2; // Type: Souzu (索子)
pub const TZ: usize = 3; // Type: Zihai (字牌)

// [Wind]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Wind::East => "東",
            Wind::South => "南",
            Wind::West => "西",
            Wind::North => "北",
        };
        write!(f, "{}", s)
    }
}

// [Rule]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub initial_score: Point,    // 配給原点
    pub settlement_score: Point, // 1位終了に必要な点数 (返し)
    pub last_round: u32,         // 最終局の局番号 (4: 東風戦, 8: 半荘戦)
    pub bust: bool,              // 飛び終了
    pub tenpai_payment: bool,    // 荒牌平局時のノーテン罰符
    pub first_dealer: Seat,      // 起家
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            initial_score: 25000,
            settlement_score: 30000,
            last_round: 8,
            bust: true,
            tenpai_payment: true,
            first_dealer: 0,
        }
    }
}

// [Player]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat: Seat, // 半荘開始時に決定し,終了まで不変
}

impl Player {
    pub fn new(id: PlayerId, name: &str, seat: Seat) -> Self {
        Self {
            id,
            name: name.to_string(),
            seat,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(id:{}, seat:{})", self.name, self.id, self.seat)
    }
}

// [Standing]
// 半荘中のプレイヤーの持ち点と順位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub seat: Seat,
    pub score: Point,
    pub rank: usize, // 0-origin
}
