/// 服务器配置 - 柜台节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/brew-counter | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite://brew-counter.db | SQLite 连接串 |
/// | ENVIRONMENT | development | 运行环境 |
/// | AVAILABILITY_POLL_MS | 15000 | 营业状态轮询间隔(毫秒) |
/// | READY_PROMOTE_MS | 5000 | 倒计时扫描间隔(毫秒) |
/// | FEED_CAPACITY | 1024 | 变更总线容量 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/counter HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 连接串
    pub database_url: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 营业状态轮询间隔 (毫秒)
    pub availability_poll_ms: u64,
    /// 倒计时扫描间隔 (毫秒)
    pub ready_promote_ms: u64,
    /// 变更总线容量
    pub feed_capacity: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/brew-counter".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://brew-counter.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            availability_poll_ms: std::env::var("AVAILABILITY_POLL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(15_000),
            ready_promote_ms: std::env::var("READY_PROMOTE_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5_000),
            feed_capacity: std::env::var("FEED_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
