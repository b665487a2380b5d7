use std::io::Write;

use log::LevelFilter;

/// env_logger를 초기화한다. `RUST_LOG`가 있으면 그 값을, 없으면 verbose 단계로 수준을 정한다.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(default_level);
    // 두 번째 초기화는 무시한다 (테스트, GUI 재시작)
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .try_init();
    log::debug!("logger initialized (level: {level})");
}
