use chrono::Local;
use std::io::Write;

/// 初始化日志（env_logger），RUST_LOG 优先于传入的默认级别
///
/// 重复调用不会报错，测试里可以随意调用。
pub fn init_logger(default_level: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", default_level);

    let _ = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
