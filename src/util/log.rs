use log::{Level, LevelFilter, Log, Metadata, Record};

// 標準エラー出力へのロガー
// 出力形式: [LEVEL](file:line) message
#[derive(Debug)]
pub struct StderrLogger;

impl StderrLogger {
    fn format(record: &Record<'_>) -> String {
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        format!(
            "[{}]({}:{}) {}",
            level,
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", Self::format(record));
        }
    }

    fn flush(&self) {}
}

// 2回目以降の呼び出しはレベルの変更のみ
pub fn init(level: LevelFilter) {
    let _ = log::set_boxed_logger(Box::new(StderrLogger));
    log::set_max_level(level);
}

#[test]
fn test_format() {
    assert_eq!(
        StderrLogger::format(
            &Record::builder()
                .args(format_args!("hello {}", 1))
                .level(Level::Warn)
                .file(Some("src/control/settle.rs"))
                .line(Some(42))
                .build()
        ),
        "[WARN](src/control/settle.rs:42) hello 1"
    );
}
