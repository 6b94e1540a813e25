use log::debug;

use super::settle::settle;
use crate::error::{ValidationError, ValidationResult};
use crate::model::*;

// [Round] 状態遷移
// NotStarted -> InProgress -> Completed の順にのみ遷移し,逆方向の遷移はない
// Completedへの遷移は精算(settle)の成功時のみ
impl Round {
    fn expect_phase(&self, phase: RoundPhase, operation: &'static str) -> ValidationResult<()> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(ValidationError::InvalidTransition {
                round: self.id,
                operation,
                phase: self.phase(),
            })
        }
    }

    pub fn start(&mut self, now: f64) -> ValidationResult<()> {
        self.expect_phase(RoundPhase::NotStarted, "start")?;
        self.started_at = Some(now);
        Ok(())
    }

    // リーチ宣言は供託に1本追加
    pub fn add_action(&mut self, action: RoundAction) -> ValidationResult<()> {
        self.expect_phase(RoundPhase::InProgress, "add action")?;
        if action.action_type.is_call() && action.target.is_none() {
            return Err(ValidationError::MissingCallTarget(action.player_id));
        }
        if action.is_riichi() {
            if self.riichi_players().contains(&action.player_id) {
                return Err(ValidationError::DuplicateRiichi(action.player_id));
            }
            self.riichi_sticks += 1;
        }
        debug!("round {}: add {}", self.id, action);
        self.actions.push(action);
        Ok(())
    }

    // リーチ宣言の取り消しは供託から1本戻す
    pub fn remove_action(&mut self, index: Index) -> ValidationResult<RoundAction> {
        self.expect_phase(RoundPhase::InProgress, "remove action")?;
        if index >= self.actions.len() {
            return Err(ValidationError::ActionNotFound(index));
        }
        let action = self.actions.remove(index);
        if action.is_riichi() {
            self.riichi_sticks = self.riichi_sticks.saturating_sub(1);
        }
        debug!("round {}: remove {}", self.id, action);
        Ok(action)
    }

    pub fn complete(
        &mut self,
        result: ResultType,
        inputs: &[ScoreInput],
        now: f64,
    ) -> ValidationResult<&[Score]> {
        self.complete_with(result, inputs, now, |_, scores| scores)
    }

    // adjustは精算後のScoreに対する追加の変動 (ノーテン罰符など)
    // 検証に失敗した場合はInProgressのまま何も変更しない
    pub fn complete_with(
        &mut self,
        result: ResultType,
        inputs: &[ScoreInput],
        now: f64,
        adjust: impl FnOnce(ResultType, Vec<Score>) -> Vec<Score>,
    ) -> ValidationResult<&[Score]> {
        self.expect_phase(RoundPhase::InProgress, "complete")?;
        let scores = settle(self, result, inputs, &self.riichi_players())?;
        self.scores = adjust(result, scores);
        self.result = Some(result);
        self.ended_at = Some(now);
        Ok(&self.scores)
    }
}

#[cfg(test)]
fn draw_inputs() -> Vec<ScoreInput> {
    (0..SEAT)
        .map(|s| ScoreInput::new(s as PlayerId + 1, s))
        .collect()
}

#[test]
fn test_round_lifecycle() {
    let mut r = Round::new(1, 1, 1, 0, 0);
    assert!(r.add_action(RoundAction::riichi(1)).is_err());
    assert!(r.complete(ResultType::Draw, &draw_inputs(), 1.0).is_err());

    r.start(1.0).unwrap();
    assert_eq!(r.phase(), RoundPhase::InProgress);
    assert!(r.start(2.0).is_err());

    r.complete(ResultType::Draw, &draw_inputs(), 3.0).unwrap();
    assert_eq!(r.phase(), RoundPhase::Completed);
    assert_eq!(r.result(), Some(ResultType::Draw));
    assert!(matches!(
        r.complete(ResultType::Draw, &draw_inputs(), 4.0),
        Err(ValidationError::InvalidTransition {
            phase: RoundPhase::Completed,
            ..
        })
    ));
    assert!(r.add_action(RoundAction::riichi(1)).is_err());
}

#[test]
fn test_riichi_stake() {
    let mut r = Round::new(1, 1, 1, 0, 2);
    r.start(0.0).unwrap();
    r.add_action(RoundAction::riichi(3)).unwrap();
    r.add_action(RoundAction::new(2, RoundActionType::Pon, Some(1), vec![])).unwrap();
    assert_eq!(r.riichi_sticks(), 3);
    assert_eq!(
        r.add_action(RoundAction::riichi(3)),
        Err(ValidationError::DuplicateRiichi(3))
    );

    let removed = r.remove_action(0).unwrap();
    assert!(removed.is_riichi());
    assert_eq!(r.riichi_sticks(), 2);
    assert!(r.riichi_players().is_empty());
    assert_eq!(r.remove_action(5), Err(ValidationError::ActionNotFound(5)));
}

#[test]
fn test_call_needs_target() {
    let mut r = Round::new(1, 1, 1, 0, 0);
    r.start(0.0).unwrap();
    assert_eq!(
        r.add_action(RoundAction::new(2, RoundActionType::Chi, None, vec![])),
        Err(ValidationError::MissingCallTarget(2))
    );
    assert!(r.actions().is_empty());
    // 暗槓は他家の牌を取らない
    r.add_action(RoundAction::new(2, RoundActionType::Ankan, None, vec![])).unwrap();
    r.add_action(RoundAction::new(3, RoundActionType::Minkan, Some(2), vec![])).unwrap();
    assert_eq!(r.actions().len(), 2);
}

#[test]
fn test_failed_completion_keeps_round() {
    let mut r = Round::new(1, 1, 1, 0, 0);
    r.start(0.0).unwrap();
    let inputs = draw_inputs();
    assert!(r.complete(ResultType::Tsumo, &inputs, 1.0).is_err());
    assert_eq!(r.phase(), RoundPhase::InProgress);
    assert!(r.scores().is_empty());
    assert_eq!(r.result(), None);
}

#[test]
fn test_riichi_player_is_tenpai_on_draw() {
    let mut r = Round::new(1, 1, 1, 0, 0);
    r.start(0.0).unwrap();
    r.add_action(RoundAction::riichi(2)).unwrap();
    let scores = r.complete(ResultType::Draw, &draw_inputs(), 1.0).unwrap();
    assert_eq!(scores[1].is_tenpai, Some(true));
    assert_eq!(scores[0].is_tenpai, Some(false));
    assert_eq!(r.riichi_sticks(), 1);
}
