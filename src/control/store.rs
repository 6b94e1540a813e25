use std::collections::BTreeMap;

use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("round {0} not found")]
    NotFound(RoundId),
    #[error("round {0} already exists")]
    AlreadyExists(RoundId),
}

// 局の永続化を行う外部コンポーネントのインターフェース
pub trait RoundStore {
    fn next_id(&mut self) -> RoundId;
    fn insert(&mut self, round: Round) -> Result<(), StoreError>;
    fn get(&self, id: RoundId) -> Result<Round, StoreError>;
    fn update(&mut self, round: Round) -> Result<(), StoreError>;
    // 削除した局を引き継ぎ元とする局の参照も解除する
    fn delete(&mut self, id: RoundId) -> Result<Round, StoreError>;
    // id順
    fn rounds(&self) -> Vec<Round>;

    // 同じ局番号・本場の未開始の局 (再利用候補)
    fn find_reusable(&self, number: u32, honba: u32) -> Option<Round> {
        self.rounds().into_iter().find(|r| {
            r.number() == number && r.honba() == honba && r.phase() == RoundPhase::NotStarted
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    rounds: BTreeMap<RoundId, Round>,
    last_id: RoundId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundStore for MemoryStore {
    fn next_id(&mut self) -> RoundId {
        self.last_id += 1;
        self.last_id
    }

    fn insert(&mut self, round: Round) -> Result<(), StoreError> {
        if self.rounds.contains_key(&round.id()) {
            return Err(StoreError::AlreadyExists(round.id()));
        }
        self.last_id = self.last_id.max(round.id());
        self.rounds.insert(round.id(), round);
        Ok(())
    }

    fn get(&self, id: RoundId) -> Result<Round, StoreError> {
        self.rounds.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn update(&mut self, round: Round) -> Result<(), StoreError> {
        let r = self
            .rounds
            .get_mut(&round.id())
            .ok_or(StoreError::NotFound(round.id()))?;
        *r = round;
        Ok(())
    }

    fn delete(&mut self, id: RoundId) -> Result<Round, StoreError> {
        let round = self.rounds.remove(&id).ok_or(StoreError::NotFound(id))?;
        for r in self.rounds.values_mut() {
            if r.carried_from == Some(id) {
                r.carried_from = None;
            }
        }
        Ok(round)
    }

    fn rounds(&self) -> Vec<Round> {
        self.rounds.values().cloned().collect()
    }
}

#[test]
fn test_memory_store() {
    let mut store = MemoryStore::new();
    let id1 = store.next_id();
    let id2 = store.next_id();
    store.insert(Round::new(id1, 1, 1, 0, 0)).unwrap();
    store
        .insert(Round::new(id2, 2, 2, 0, 1).with_carried_from(Some(id1)))
        .unwrap();
    assert_eq!(
        store.insert(Round::new(id1, 1, 1, 0, 0)),
        Err(StoreError::AlreadyExists(id1))
    );

    assert_eq!(store.find_reusable(2, 0).map(|r| r.id()), Some(id2));
    assert!(store.find_reusable(2, 1).is_none());

    store.delete(id1).unwrap();
    assert_eq!(store.get(id2).unwrap().carried_from(), None);
    assert_eq!(store.get(id1), Err(StoreError::NotFound(id1)));
    assert_eq!(store.rounds().len(), 1);
}
