use log::error;
use serde_json::{json, Value};

use crate::control::listener::Listener;
use crate::model::*;
use crate::util::misc::*;

// [EventWriter]
// 局毎にイベントをjson形式で data/{開始時刻}/{局index}.json に書き出す
#[derive(Debug)]
pub struct EventWriter {
    dir: String,
    start_time: u64,
    round_index: i32,
    record: Vec<Value>,
}

impl EventWriter {
    pub fn new() -> Self {
        Self::with_dir("data")
    }

    pub fn with_dir(dir: &str) -> Self {
        Self {
            dir: dir.to_string(),
            start_time: unixtime_now() as u64,
            round_index: 0,
            record: vec![],
        }
    }

    fn write(&self, path: &str) -> Res {
        let data = serde_json::to_string_pretty(&json!(self.record))?;
        write_to_file(path, &data)
    }

    fn flush(&mut self) {
        let path = format!("{}/{}/{:02}.json", self.dir, self.start_time, self.round_index);
        if let Err(e) = self.write(&path) {
            error!("failed to write {}: {}", path, e);
        }
        self.record.clear();
        self.round_index += 1;
    }
}

impl Listener for EventWriter {
    fn notify_event(&mut self, event: &Event) {
        let mut write = false;
        match event {
            Event::Begin(_) => {
                self.record.clear();
                self.start_time = unixtime_now() as u64;
                self.round_index = 0;
            }
            Event::New(_) => {
                self.record.clear();
            }
            Event::Win(_) | Event::Draw(_) => {
                write = true;
            }
            Event::Action(_) | Event::End(_) => {}
        }

        self.record.push(json!(event));
        if write {
            self.flush();
        }
    }
}

#[test]
fn test_event_writer() {
    let dir = std::env::temp_dir().join(format!("hanchan_writer_{}", std::process::id()));
    let dir = dir.to_string_lossy().to_string();
    let mut writer = EventWriter::with_dir(&dir);

    let mut round = Round::new(1, 1, 1, 0, 0);
    round.start(0.0).unwrap();
    writer.notify_event(&Event::new(&round, 0, vec![]));
    writer.notify_event(&Event::action(1, RoundAction::riichi(1), false));
    assert_eq!(writer.record.len(), 2);

    let inputs: Vec<ScoreInput> = (0..SEAT).map(|s| ScoreInput::new(s as PlayerId + 1, s)).collect();
    round.complete(ResultType::Draw, &inputs, 1.0).unwrap();
    writer.notify_event(&Event::round_end(&round, None, vec![]));
    assert!(writer.record.is_empty());
    assert_eq!(writer.round_index, 1);

    let path = format!("{}/{}/00.json", dir, writer.start_time);
    let data = std::fs::read_to_string(&path).unwrap();
    let v: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v.as_array().map(|a| a.len()), Some(3));
    assert_eq!(v[0]["type"], "New");
    assert_eq!(v[2]["type"], "Draw");
    let _ = std::fs::remove_dir_all(&dir);
}
