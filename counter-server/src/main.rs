use counter_server::{AppState, Config};
use counter_server::core::server;
use counter_server::utils::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    logger::init_logger();

    tracing::info!("☕ Brew Counter Server starting...");

    // 2. 加载配置
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_url,
        "Configuration loaded"
    );

    // 3. 初始化服务器状态
    let state = AppState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器 (含后台任务)
    server::run(state).await
}
