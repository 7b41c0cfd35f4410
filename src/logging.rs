use std::cell::Cell;
use std::cmp::Ordering;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
                LogLevel::Error => 2,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

thread_local! {
    static MIN_LEVEL: Cell<LogLevel> = const { Cell::new(DEFAULT_LOG_LEVEL) };
}

pub fn set_min_level(level: LogLevel) {
    MIN_LEVEL.with(|min| min.set(level));
}

pub fn min_level() -> LogLevel {
    MIN_LEVEL.with(Cell::get)
}

fn now_unix_millis() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|value| value.as_millis() as u64)
            .unwrap_or(0)
    }
}

fn build_record(
    ts: u64,
    level: LogLevel,
    event: &str,
    fields: serde_json::Value,
) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(ts)),
    );
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    serde_json::Value::Object(payload)
}

/// Emits one structured record if `level` passes the configured minimum.
pub fn log_event(level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < min_level() {
        return;
    }

    let record = build_record(now_unix_millis(), level, event, fields).to_string();

    #[cfg(target_arch = "wasm32")]
    match level {
        LogLevel::Error => gloo::console::error!(record),
        LogLevel::Debug => gloo::console::debug!(record),
        LogLevel::Info => gloo::console::log!(record),
    }

    #[cfg(not(target_arch = "wasm32"))]
    match level {
        LogLevel::Error => eprintln!("{record}"),
        _ => println!("{record}"),
    }
}

const BANNER: &str = r"
    +--------------------------------------------------------------+
    |                                                              |
    |   CYBERSECURITY STUDENT PORTFOLIO                            |
    |                                                              |
    |   Welcome to my digital fortress!                            |
    |   Built with: Rust, WebAssembly, Yew                         |
    |   Security Level: MAXIMUM                                    |
    |                                                              |
    |   Feel free to explore the code - it's open source!          |
    |                                                              |
    +--------------------------------------------------------------+
";

pub fn print_banner() {
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(BANNER);

    #[cfg(not(target_arch = "wasm32"))]
    println!("{BANNER}");
}
