use crate::model::*;

// 呼び出し側の入力が結果の種別や局の状態と矛盾している場合のエラー
// 検証に失敗した場合,局やスコアは一切変更されない
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("scores: expected {expected} inputs (one per seat), found {found}")]
    PlayerCount { expected: usize, found: usize },
    #[error("scores: player {0} appears more than once")]
    DuplicatePlayer(PlayerId),
    #[error("scores: seat {0} appears more than once or is out of range")]
    InvalidSeat(Seat),
    #[error("scores: dealer {0} has no input")]
    DealerMissing(PlayerId),
    #[error("is_winner: {result} requires {expected} winner(s), found {found}")]
    WinnerCount {
        result: ResultType,
        expected: &'static str,
        found: usize,
    },
    #[error("is_ron_target: {result} requires {expected} ron target(s), found {found}")]
    RonTargetCount {
        result: ResultType,
        expected: &'static str,
        found: usize,
    },
    #[error("is_ron_target: player {0} cannot be both winner and ron target")]
    WinnerIsRonTarget(PlayerId),
    #[error("point: {result} requires a point delta for player {player}")]
    MissingPoint { result: ResultType, player: PlayerId },
    #[error("detail: player {0} has neither a point delta nor han/fu detail")]
    MissingDetail(PlayerId),
    #[error("round {round}: cannot {operation} while {phase}")]
    InvalidTransition {
        round: RoundId,
        operation: &'static str,
        phase: RoundPhase,
    },
    #[error("actions: player {0} has already declared riichi")]
    DuplicateRiichi(PlayerId),
    #[error("actions: player {0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("scores: player {player} is seated at {expected}, not {seat}")]
    SeatMismatch {
        player: PlayerId,
        seat: Seat,
        expected: Seat,
    },
    #[error("actions: call by player {0} has no target")]
    MissingCallTarget(PlayerId),
    #[error("actions: no action at index {0}")]
    ActionNotFound(Index),
    #[error("round {0}: result is not set")]
    NotCompleted(RoundId),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

// 半荘の進行中のエラー 永続化のエラーはそのまま呼び出し側に返す
#[derive(Debug, thiserror::Error)]
pub enum HanchanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] crate::control::store::StoreError),
    #[error("hanchan has not begun")]
    NotBegun,
    #[error("hanchan is already over")]
    Over,
}

pub type HanchanResult<T> = Result<T, HanchanError>;
