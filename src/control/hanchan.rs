use std::cmp::Ordering;

use log::info;

use super::{
    common::next_dealer,
    draw::apply_tenpai_payments,
    listener::Listener,
    progression::next_settings_from_record,
    score_table::{fill_points, ScoreTable, StandardScoreTable},
    store::RoundStore,
};
use crate::error::{HanchanError, HanchanResult, ValidationError};
use crate::model::*;
use crate::util::misc::rank_by_rank_vec;

// [Hanchan]
// 局の作成から精算,次局の決定までの半荘全体の進行を管理
pub struct Hanchan<S: RoundStore> {
    rule: Rule,
    players: [Player; SEAT], // seat順
    store: S,
    table: Box<dyn ScoreTable + Send>,
    listeners: Vec<Box<dyn Listener>>,
    current: Option<RoundId>,
    is_over: bool,
}

impl<S: RoundStore> Hanchan<S> {
    pub fn new(
        rule: Rule,
        players: Vec<Player>,
        store: S,
        listeners: Vec<Box<dyn Listener>>,
    ) -> HanchanResult<Self> {
        if players.len() != SEAT {
            return Err(ValidationError::PlayerCount {
                expected: SEAT,
                found: players.len(),
            }
            .into());
        }
        let mut seated: [Option<Player>; SEAT] = Default::default();
        for p in players {
            if p.seat >= SEAT || seated[p.seat].is_some() {
                return Err(ValidationError::InvalidSeat(p.seat).into());
            }
            if seated.iter().flatten().any(|q| q.id == p.id) {
                return Err(ValidationError::DuplicatePlayer(p.id).into());
            }
            let s = p.seat;
            seated[s] = Some(p);
        }
        if rule.first_dealer >= SEAT {
            return Err(ValidationError::InvalidSeat(rule.first_dealer).into());
        }

        Ok(Self {
            rule,
            players: seated.map(|p| p.unwrap_or_else(|| Player::new(0, "", 0))),
            store,
            table: Box::new(StandardScoreTable),
            listeners,
            current: None,
            is_over: false,
        })
    }

    pub fn with_score_table(mut self, table: Box<dyn ScoreTable + Send>) -> Self {
        self.table = table;
        self
    }

    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[inline]
    pub fn players(&self) -> &[Player; SEAT] {
        &self.players
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<Seat> {
        self.players.iter().find(|p| p.id == player_id).map(|p| p.seat)
    }

    pub fn current_round(&self) -> HanchanResult<Round> {
        if self.is_over {
            return Err(HanchanError::Over);
        }
        let id = self.current.ok_or(HanchanError::NotBegun)?;
        Ok(self.store.get(id)?)
    }

    // 東1局を作成して開始
    pub fn begin(&mut self, now: f64) -> HanchanResult<RoundId> {
        if self.current.is_some() || self.is_over {
            let round = self.current_round()?;
            return Err(ValidationError::InvalidTransition {
                round: round.id(),
                operation: "begin hanchan",
                phase: round.phase(),
            }
            .into());
        }
        info!(
            "hanchan begin: {}",
            self.players.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
        );
        self.notify(&Event::begin(self.rule.clone(), self.players.to_vec()));

        let dealer = self.players[self.rule.first_dealer].id;
        self.open_round(1, dealer, 0, 0, None, now)
    }

    pub fn declare(&mut self, action: RoundAction) -> HanchanResult<()> {
        self.check_player(action.player_id)?;
        if let Some(t) = action.target {
            self.check_player(t)?;
        }
        let mut round = self.current_round()?;
        round.add_action(action.clone())?;
        self.store.update(round.clone())?;
        self.notify(&Event::action(round.id(), action, false));
        Ok(())
    }

    pub fn retract(&mut self, index: Index) -> HanchanResult<RoundAction> {
        let mut round = self.current_round()?;
        let action = round.remove_action(index)?;
        self.store.update(round.clone())?;
        self.notify(&Event::action(round.id(), action.clone(), true));
        Ok(action)
    }

    // 局を精算して終了し,次局を開始する
    // 半荘が終了した場合はNoneを返却
    pub fn end_round(
        &mut self,
        result: ResultType,
        inputs: &[ScoreInput],
        now: f64,
    ) -> HanchanResult<Option<NextRoundSettings>> {
        let mut round = self.current_round()?;
        self.check_inputs(inputs)?;
        let inputs = fill_points(&round, result, inputs, self.table.as_ref())?;
        if self.rule.tenpai_payment {
            round.complete_with(result, &inputs, now, apply_tenpai_payments)?;
        } else {
            round.complete(result, &inputs, now)?;
        }
        self.store.update(round.clone())?;

        // 永続化された局の記録から次局を決定
        let round = self.store.get(round.id())?;
        let next = next_settings_from_record(&round)?;
        let standings = self.standings();
        info!("round end: {} -> {}", round, next);

        if self.is_hanchan_end(&round, &next, &standings) {
            self.notify(&Event::round_end(&round, None, standings.clone()));
            self.notify(&Event::end(standings));
            self.current = None;
            self.is_over = true;
            info!("hanchan end");
            return Ok(None);
        }
        self.notify(&Event::round_end(&round, Some(next), standings));

        self.open_next(&round, &next, now)?;
        Ok(Some(next))
    }

    // 局の削除 この局から本場・供託を引き継いだ局の参照は解除される
    // 進行中の局を削除した場合は最後に終了した局の記録から次局を開き直す
    pub fn delete_round(&mut self, id: RoundId, now: f64) -> HanchanResult<Round> {
        let round = self.store.delete(id)?;
        info!("round deleted: {}", round);
        if self.current == Some(id) {
            self.current = None;
            self.reopen(now)?;
        }
        Ok(round)
    }

    // 各プレイヤーの持ち点 = 配給原点 + 確定した得点変動 - リーチ棒
    pub fn standings(&self) -> Vec<Standing> {
        let mut scores = [self.rule.initial_score; SEAT];
        for round in self.store.rounds() {
            for s in round.scores() {
                scores[s.seat] += s.point;
            }
            for a in round.actions().iter().filter(|a| a.is_riichi()) {
                if let Some(seat) = self.seat_of(a.player_id) {
                    scores[seat] -= RIICHI_STAKE;
                }
            }
        }
        let ranks = rank_by_rank_vec(&scores);
        self.players
            .iter()
            .map(|p| Standing {
                player_id: p.id,
                seat: p.seat,
                score: scores[p.seat],
                rank: ranks[p.seat],
            })
            .collect()
    }

    fn is_hanchan_end(&self, round: &Round, next: &NextRoundSettings, standings: &[Standing]) -> bool {
        let rule = &self.rule;

        // 飛び
        if rule.bust && standings.iter().any(|s| s.score < 0) {
            return true;
        }

        // オーラスで親が連荘しても1位かつ返し以上ならアガリやめ
        if round.number() >= rule.last_round && next.is_renchan {
            if let Some(d) = standings.iter().find(|s| s.player_id == round.dealer()) {
                if d.rank == 0 && d.score >= rule.settlement_score {
                    return true;
                }
            }
        }

        if next.next_round_number > rule.last_round {
            // 返し以上のプレイヤーがいれば終了 いなければ延長
            if standings.iter().any(|s| s.score >= rule.settlement_score) {
                return true;
            }
            // 延長は1場まで
            if next.next_round_number > rule.last_round + SEAT as u32 {
                return true;
            }
        }

        false
    }

    fn open_next(&mut self, round: &Round, next: &NextRoundSettings, now: f64) -> HanchanResult<RoundId> {
        let dealer_seat = self.seat_of(round.dealer()).unwrap_or(self.rule.first_dealer);
        let dealer = self.players[next_dealer(dealer_seat, next.is_renchan)].id;
        self.open_round(
            next.next_round_number,
            dealer,
            next.next_honba,
            next.next_riichi_sticks,
            Some(round.id()),
            now,
        )
    }

    // 終了した局がなければ東1局から
    fn reopen(&mut self, now: f64) -> HanchanResult<RoundId> {
        let last = self
            .store
            .rounds()
            .into_iter()
            .filter(|r| r.is_completed())
            .max_by(|a, b| {
                a.ended_at()
                    .partial_cmp(&b.ended_at())
                    .unwrap_or(Ordering::Equal)
                    .then(a.id().cmp(&b.id()))
            });
        match last {
            Some(round) => {
                let next = next_settings_from_record(&round)?;
                self.open_next(&round, &next, now)
            }
            None => {
                let dealer = self.players[self.rule.first_dealer].id;
                self.open_round(1, dealer, 0, 0, None, now)
            }
        }
    }

    fn open_round(
        &mut self,
        number: u32,
        dealer: PlayerId,
        honba: u32,
        riichi_sticks: u32,
        carried_from: Option<RoundId>,
        now: f64,
    ) -> HanchanResult<RoundId> {
        let mut round = match self.store.find_reusable(number, honba) {
            Some(mut r) => {
                info!("reuse round {}", r.id());
                r.dealer = dealer;
                r.riichi_sticks = riichi_sticks;
                r.carried_from = carried_from;
                r
            }
            None => {
                let id = self.store.next_id();
                let r = Round::new(id, number, dealer, honba, riichi_sticks).with_carried_from(carried_from);
                self.store.insert(r.clone())?;
                r
            }
        };
        round.start(now)?;
        self.store.update(round.clone())?;
        self.current = Some(round.id());

        let dealer_seat = self.seat_of(dealer).unwrap_or_default();
        info!("round new: {}", round);
        self.notify(&Event::new(&round, dealer_seat, self.standings()));
        Ok(round.id())
    }

    // 入力のプレイヤーと座席は半荘の座席表と一致すること
    fn check_inputs(&self, inputs: &[ScoreInput]) -> HanchanResult<()> {
        for i in inputs {
            let seat = self
                .seat_of(i.player_id)
                .ok_or(ValidationError::UnknownPlayer(i.player_id))?;
            if seat != i.seat {
                return Err(ValidationError::SeatMismatch {
                    player: i.player_id,
                    seat: i.seat,
                    expected: seat,
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_player(&self, player_id: PlayerId) -> HanchanResult<()> {
        if self.seat_of(player_id).is_none() {
            return Err(ValidationError::UnknownPlayer(player_id).into());
        }
        Ok(())
    }

    fn notify(&mut self, event: &Event) {
        for l in &mut self.listeners {
            l.notify_event(event);
        }
    }
}

#[cfg(test)]
fn new_hanchan() -> Hanchan<super::store::MemoryStore> {
    let players = (0..SEAT)
        .map(|s| Player::new(s as PlayerId + 1, &format!("p{}", s), s))
        .collect();
    Hanchan::new(Rule::default(), players, super::store::MemoryStore::new(), vec![]).unwrap()
}

#[cfg(test)]
fn inputs(f: impl Fn(ScoreInput) -> ScoreInput) -> Vec<ScoreInput> {
    (0..SEAT)
        .map(|s| f(ScoreInput::new(s as PlayerId + 1, s)))
        .collect()
}

#[test]
fn test_hanchan_progress() {
    let mut h = new_hanchan();
    assert!(matches!(h.current_round(), Err(HanchanError::NotBegun)));
    h.begin(0.0).unwrap();
    let r = h.current_round().unwrap();
    assert_eq!((r.number(), r.dealer(), r.phase()), (1, 1, RoundPhase::InProgress));

    // 子(seat1)のリーチ後,流局で親聴牌
    h.declare(RoundAction::riichi(2)).unwrap();
    let next = h
        .end_round(ResultType::Draw, &inputs(|i| if i.seat == 0 { i.tenpai(true) } else { i }), 1.0)
        .unwrap()
        .unwrap();
    assert!(next.is_renchan);
    let r = h.current_round().unwrap();
    assert_eq!((r.number(), r.honba(), r.riichi_sticks(), r.dealer()), (1, 1, 1, 1));

    // 2人聴牌なので1500点ずつの移動, seat1はリーチ棒を供託済み
    let st = h.standings();
    assert_eq!(st[0].score, 26500);
    assert_eq!(st[1].score, 25000 + 1500 - 1000);
    assert_eq!(st[2].score, 23500);

    // 子のツモ和了で供託と積み棒を獲得して親流れ
    let next = h
        .end_round(ResultType::Tsumo, &inputs(|i| if i.seat == 2 { i.winner().detail(3, 30) } else { i }), 2.0)
        .unwrap()
        .unwrap();
    assert!(!next.is_renchan);
    let r = h.current_round().unwrap();
    assert_eq!((r.number(), r.honba(), r.riichi_sticks(), r.dealer()), (2, 0, 0, 2));

    let st = h.standings();
    assert_eq!(st[2].score, 23500 + 4000 + 300 + 1000);
    assert_eq!(st[0].score, 26500 - 2000 - 100);
    assert_eq!(st.iter().map(|s| s.score).sum::<Point>(), 100000);
    assert_eq!(st[2].rank, 0);
}

#[test]
fn test_failed_end_round_keeps_state() {
    let mut h = new_hanchan();
    h.begin(0.0).unwrap();
    let before = h.current_round().unwrap();
    let res = h.end_round(ResultType::Ron, &inputs(|i| i), 1.0);
    assert!(matches!(res, Err(HanchanError::Validation(_))));
    assert_eq!(h.current_round().unwrap(), before);
    assert!(matches!(
        h.declare(RoundAction::riichi(99)),
        Err(HanchanError::Validation(ValidationError::UnknownPlayer(99)))
    ));
}

#[test]
fn test_inputs_must_match_seating() {
    let mut h = new_hanchan();
    h.begin(0.0).unwrap();
    let before = h.current_round().unwrap();

    // seat0のplayer1とseat2のplayer3の座席を入れ替えた入力
    let swapped = vec![
        ScoreInput::new(3, 0),
        ScoreInput::new(2, 1).winner().point(8000),
        ScoreInput::new(1, 2).ron_target(),
        ScoreInput::new(4, 3),
    ];
    assert!(matches!(
        h.end_round(ResultType::Ron, &swapped, 1.0),
        Err(HanchanError::Validation(ValidationError::SeatMismatch {
            player: 3,
            seat: 0,
            expected: 2
        }))
    ));

    let unknown = vec![
        ScoreInput::new(1, 0),
        ScoreInput::new(2, 1).winner().point(8000),
        ScoreInput::new(3, 2).ron_target(),
        ScoreInput::new(99, 3),
    ];
    assert!(matches!(
        h.end_round(ResultType::Ron, &unknown, 1.0),
        Err(HanchanError::Validation(ValidationError::UnknownPlayer(99)))
    ));

    assert_eq!(h.current_round().unwrap(), before);
    assert!(h.standings().iter().all(|s| s.score == 25000));
}

#[test]
fn test_bust_ends_hanchan() {
    let mut h = new_hanchan();
    h.begin(0.0).unwrap();
    let res = h
        .end_round(
            ResultType::Ron,
            &inputs(|i| match i.seat {
                1 => i.winner().point(32000),
                3 => i.ron_target(),
                _ => i,
            }),
            1.0,
        )
        .unwrap();
    assert!(res.is_none());
    assert!(h.is_over());
    assert!(matches!(h.current_round(), Err(HanchanError::Over)));
}

#[test]
fn test_delete_round_clears_carry() {
    let mut h = new_hanchan();
    let first = h.begin(0.0).unwrap();
    h.end_round(ResultType::SpecialDraw(SpecialDrawType::NineTerminals), &inputs(|i| i), 1.0)
        .unwrap();
    let second = h.current_round().unwrap();
    assert_eq!(second.carried_from(), Some(first));
    h.delete_round(first, 2.0).unwrap();
    assert_eq!(h.current_round().unwrap().carried_from(), None);
}

#[test]
fn test_delete_current_round_reopens() {
    let mut h = new_hanchan();
    h.begin(0.0).unwrap();
    // 親聴牌で連荘
    h.end_round(ResultType::Draw, &inputs(|i| if i.seat == 0 { i.tenpai(true) } else { i }), 1.0)
        .unwrap();
    // 子のリーチのみ聴牌で親流れ,供託は持ち越し
    h.declare(RoundAction::riichi(2)).unwrap();
    h.end_round(ResultType::Draw, &inputs(|i| i), 2.0).unwrap();
    let third = h.current_round().unwrap();
    assert_eq!((third.number(), third.honba(), third.riichi_sticks()), (2, 0, 1));

    h.delete_round(third.id(), 3.0).unwrap();
    let r = h.current_round().unwrap();
    assert_ne!(r.id(), third.id());
    assert_eq!(
        (r.number(), r.honba(), r.riichi_sticks(), r.dealer(), r.phase()),
        (2, 0, 1, 2, RoundPhase::InProgress)
    );
    assert_eq!(r.carried_from(), third.carried_from());
    h.declare(RoundAction::riichi(3)).unwrap();
    assert!(h.begin(4.0).is_err());
}

#[test]
fn test_delete_only_round_restarts_first() {
    let mut h = new_hanchan();
    let first = h.begin(0.0).unwrap();
    h.delete_round(first, 1.0).unwrap();
    let r = h.current_round().unwrap();
    assert_eq!((r.number(), r.honba(), r.riichi_sticks(), r.dealer()), (1, 0, 0, 1));
    assert!(h.store().get(first).is_err());
}
